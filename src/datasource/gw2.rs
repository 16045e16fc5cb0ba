//! Guild Wars 2 commerce API client.

use super::{normalize_ids, PriceBook, PriceError, PriceSource};
use crate::domain::{ItemId, Money, PriceRecord};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_PRICES_URL: &str = "https://api.guildwars2.com/v2/commerce/prices";

/// Price source backed by the public `/v2/commerce/prices` endpoint.
#[derive(Debug, Clone)]
pub struct Gw2PriceSource {
    client: Client,
    prices_url: String,
}

impl Gw2PriceSource {
    /// Create a client with the given per-request timeout.
    pub fn new(prices_url: String, timeout: Duration) -> Result<Self, PriceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PriceError::Network(e.to_string()))?;
        Ok(Self { client, prices_url })
    }

    /// Create with the public API URL and a 10 second timeout.
    pub fn default_url() -> Result<Self, PriceError> {
        Self::new(DEFAULT_PRICES_URL.to_string(), Duration::from_secs(10))
    }
}

#[async_trait]
impl PriceSource for Gw2PriceSource {
    async fn fetch_prices(&self, ids: &[ItemId]) -> Result<PriceBook, PriceError> {
        let ids = normalize_ids(ids)?;
        let joined = ids
            .iter()
            .map(ItemId::to_string)
            .collect::<Vec<_>>()
            .join(",");

        debug!("Fetching prices for ids={}", joined);

        let response = self
            .client
            .get(&self.prices_url)
            .query(&[("ids", joined.as_str())])
            .send()
            .await
            .map_err(|e| PriceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| PriceError::Parse(e.to_string()))?;

        parse_prices(&body)
    }
}

/// Parse the upstream array. Malformed entries are skipped, so their ids end
/// up missing from the book.
pub(crate) fn parse_prices(body: &serde_json::Value) -> Result<PriceBook, PriceError> {
    let entries = body
        .as_array()
        .ok_or_else(|| PriceError::Parse("Expected array response".to_string()))?;

    if entries.is_empty() {
        return Err(PriceError::Empty);
    }

    let mut book = PriceBook::new();
    for entry in entries {
        match parse_entry(entry) {
            Ok(record) => book.insert(record),
            Err(e) => warn!("Failed to parse price entry: {}", e),
        }
    }

    Ok(book)
}

fn parse_entry(entry: &serde_json::Value) -> Result<PriceRecord, PriceError> {
    let id = entry
        .get("id")
        .and_then(|v| v.as_u64())
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| PriceError::Parse("Missing id field".to_string()))?;

    let buy = entry
        .get("buys")
        .and_then(|v| v.get("unit_price"))
        .and_then(|v| v.as_i64())
        .ok_or_else(|| PriceError::Parse(format!("Missing buys.unit_price for {}", id)))?;

    let sell = entry
        .get("sells")
        .and_then(|v| v.get("unit_price"))
        .and_then(|v| v.as_i64())
        .ok_or_else(|| PriceError::Parse(format!("Missing sells.unit_price for {}", id)))?;

    Ok(PriceRecord::new(
        ItemId::new(id),
        Money::from_copper(buy),
        Money::from_copper(sell),
    ))
}
