use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{json_routes, AppState};
use crate::bot::{BotReply, BotResponder};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct BotQuery {
    pub command: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BotResponse {
    /// `None` when the message is not addressed to the bot.
    pub reply: Option<BotReply>,
}

pub async fn handle_command(
    Query(params): Query<BotQuery>,
    State(state): State<AppState>,
) -> Result<Json<BotResponse>, AppError> {
    let command = params
        .command
        .ok_or_else(|| AppError::BadRequest("command is required".into()))?;

    let catalog = state.evaluator.shared_catalog();
    let responder = BotResponder::new(json_routes().with_state(state), catalog);
    let reply = responder.respond(&command).await;

    Ok(Json(BotResponse { reply }))
}
