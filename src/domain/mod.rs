//! Domain types for trading post pricing.
//!
//! This module provides:
//! - Copper-denominated `Money` with gold/silver/copper display
//! - Flat `_g/_s/_c` field maps used by every JSON endpoint
//! - Item identifiers and normalized price records

pub mod fields;
pub mod money;
pub mod price;
pub mod primitives;

pub use fields::MoneyFields;
pub use money::{Gsc, Money, SELLER_SHARE};
pub use price::PriceRecord;
pub use primitives::{ItemId, ItemIdParseError, PriceSide, TimeMs};
