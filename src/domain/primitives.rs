//! Domain primitives: TimeMs, ItemId, PriceSide.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Time in milliseconds since Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeMs(pub i64);

impl TimeMs {
    /// Create a TimeMs from milliseconds.
    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    pub fn now() -> Self {
        TimeMs(chrono::Utc::now().timestamp_millis())
    }

    /// Get the underlying milliseconds value.
    pub fn as_ms(&self) -> i64 {
        self.0
    }

    pub fn saturating_sub_ms(&self, ms: i64) -> Self {
        TimeMs(self.0.saturating_sub(ms))
    }

    /// Format as `YYYY-MM-DD HH:MM` in UTC.
    pub fn format_minutes(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }
}

/// Trading post item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl ItemId {
    pub const fn new(id: u32) -> Self {
        ItemId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid item id: {0}")]
pub struct ItemIdParseError(pub String);

impl FromStr for ItemId {
    type Err = ItemIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u32>() {
            Ok(id) if id > 0 => Ok(ItemId(id)),
            _ => Err(ItemIdParseError(s.to_string())),
        }
    }
}

/// Which side of the order book a price is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSide {
    /// Highest standing buy order: what a patient buyer pays.
    Buy,
    /// Lowest standing sell listing.
    Sell,
}

impl std::fmt::Display for PriceSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceSide::Buy => write!(f, "buy"),
            PriceSide::Sell => write!(f, "sell"),
        }
    }
}
