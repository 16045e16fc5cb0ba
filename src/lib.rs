pub mod api;
pub mod bot;
pub mod chart;
pub mod config;
pub mod datasource;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod recipes;

pub use config::Config;
pub use datasource::{Gw2PriceSource, MockPriceSource, PriceBook, PriceError, PriceSource};
pub use db::{init_db, Repository};
pub use domain::{Gsc, ItemId, Money, MoneyFields, PriceRecord, PriceSide, TimeMs};
pub use engine::{EvalError, Evaluation, Evaluator};
pub use error::AppError;
pub use recipes::Catalog;
