//! Chat-bot adapter over the JSON surface.
//!
//! Commands are parsed, dispatched to the matching JSON endpoint, and the
//! flat money map is rendered as an embed.

pub mod command;
pub mod embed;

pub use command::{help_lines, parse_command, BotCommand, COMMAND_PREFIX};
pub use embed::{Embed, EmbedField};

use crate::recipes::Catalog;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;
use tracing::{debug, warn};

pub const UNKNOWN_COMMAND: &str = "Unknown command. Use `/gw2tp help` for a list of commands.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BotReply {
    Embed(Embed),
    Text { content: String },
}

impl BotReply {
    fn text(content: impl Into<String>) -> Self {
        BotReply::Text {
            content: content.into(),
        }
    }
}

/// Answers chat commands by calling the JSON routes in-process.
#[derive(Debug, Clone)]
pub struct BotResponder {
    routes: Router,
    catalog: Arc<Catalog>,
}

impl BotResponder {
    pub fn new(routes: Router, catalog: Arc<Catalog>) -> Self {
        Self { routes, catalog }
    }

    /// Reply to a message, or `None` if it is not a bot command.
    pub async fn respond(&self, text: &str) -> Option<BotReply> {
        let command = parse_command(text, &self.catalog)?;
        debug!("Bot command: {:?}", command);

        let reply = match command {
            BotCommand::Help => {
                let embed = help_lines(&self.catalog)
                    .into_iter()
                    .fold(Embed::new("GW2TP Bot Commands", embed::HELP_COLOR), |e, line| {
                        e.field("", line)
                    });
                BotReply::Embed(embed)
            }
            BotCommand::Recipe(slug) => {
                let title = self.catalog.get(slug).map(|r| r.title).unwrap_or(slug);
                self.fetch_embed(&format!("/api/{}", slug), title).await
            }
            BotCommand::Price(id) => {
                self.fetch_embed(
                    &format!("/api/price?item_id={}", id),
                    &format!("Price for Item ID: {}", id),
                )
                .await
            }
            BotCommand::Usage(usage) => BotReply::text(format!("Usage: {}", usage)),
            BotCommand::Unknown => BotReply::text(UNKNOWN_COMMAND),
        };
        Some(reply)
    }

    async fn fetch_embed(&self, uri: &str, title: &str) -> BotReply {
        match self.get_json(uri).await {
            Ok((status, body)) if status.is_success() => match body.as_object() {
                Some(map) => BotReply::Embed(Embed::from_money_map(title, map)),
                None => BotReply::text("Error: unexpected response"),
            },
            Ok((status, body)) => {
                let message = body
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"));
                BotReply::text(format!("Error: {}", message))
            }
            Err(e) => {
                warn!("Bot request to {} failed: {}", uri, e);
                BotReply::text("Error: service unavailable")
            }
        }
    }

    async fn get_json(&self, uri: &str) -> Result<(StatusCode, Value), anyhow::Error> {
        let request = Request::builder().uri(uri).body(Body::empty())?;
        let response = self.routes.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, serde_json::from_slice(&bytes)?))
    }
}
