use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::AppState;
use crate::datasource::PriceError;
use crate::domain::{ItemId, ItemIdParseError};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub item_id: Option<String>,
}

/// Raw buy/sell copper for one item, plus display triples for buy, sell,
/// flip and after-tax figures.
pub async fn get_price(
    Query(params): Query<PriceQuery>,
    State(state): State<AppState>,
) -> Result<Json<Map<String, Value>>, AppError> {
    let raw = params
        .item_id
        .ok_or_else(|| AppError::BadRequest("item_id is required".into()))?;
    let item_id: ItemId = raw
        .parse()
        .map_err(|e: ItemIdParseError| AppError::BadRequest(e.to_string()))?;

    // Upstream answers a lone unknown id with an empty list or a 404.
    let book = match state.evaluator.source().fetch_prices(&[item_id]).await {
        Err(PriceError::Empty) | Err(PriceError::Http { status: 404 }) => {
            return Err(PriceError::MissingItem(item_id).into())
        }
        result => result?,
    };
    let record = book.get(item_id)?;

    let mut body = Map::new();
    body.insert("item_id".to_string(), Value::from(item_id.as_u32()));
    body.insert("buy_copper".to_string(), Value::from(record.buy.copper()));
    body.insert("sell_copper".to_string(), Value::from(record.sell.copper()));
    body.extend(record.display_fields().to_json_map());
    Ok(Json(body))
}
