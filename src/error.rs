use crate::datasource::PriceError;
use crate::db::RepoError;
use crate::engine::EvalError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Upstream unavailable: {0}")]
    Upstream(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<PriceError> for AppError {
    fn from(err: PriceError) -> Self {
        match err {
            PriceError::EmptyRequest => AppError::BadRequest(err.to_string()),
            PriceError::MissingItem(_) => AppError::NotFound(err.to_string()),
            _ => AppError::Upstream(err.to_string()),
        }
    }
}

impl From<EvalError> for AppError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::UnknownRecipe(_) => AppError::NotFound(err.to_string()),
            EvalError::NoPaths(_) => AppError::Internal(err.to_string()),
            EvalError::Price(price) => price.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::UnknownTable(_) => AppError::NotFound(err.to_string()),
            RepoError::Db(db) => db.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
