pub mod bot;
pub mod health;
pub mod history;
pub mod pages;
pub mod prices;
pub mod recipes;

use crate::db::Repository;
use crate::engine::Evaluator;
use crate::recipes::Catalog;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub evaluator: Evaluator,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, evaluator: Evaluator) -> Self {
        Self { repo, evaluator }
    }

    pub fn catalog(&self) -> &Catalog {
        self.evaluator.catalog()
    }
}

/// JSON endpoints under `/api`, excluding the bot adapter that calls them.
pub fn json_routes() -> Router<AppState> {
    Router::new()
        .route("/api/recipes", get(recipes::list_recipes))
        .route("/api/price", get(prices::get_price))
        .route("/api/history/:recipe", get(history::get_history))
        .route("/api/history/:recipe/chart", get(history::get_chart))
        .route("/api/:recipe", get(recipes::get_recipe))
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/", get(pages::index))
        .route("/history/:recipe", get(pages::history_page))
        .route("/api/bot", get(bot::handle_command))
        .merge(json_routes())
        .layer(cors)
        .with_state(state)
}
