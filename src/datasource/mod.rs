//! Price source abstraction for fetching trading post listings.

use crate::domain::{ItemId, PriceRecord};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

pub mod gw2;
pub mod mock;

pub use gw2::Gw2PriceSource;
pub use mock::MockPriceSource;

/// Source of current buy/sell prices.
///
/// Implementations issue exactly one upstream request per call; there is no
/// retry and no caching.
#[async_trait]
pub trait PriceSource: Send + Sync + fmt::Debug {
    /// Fetch prices for the given items in a single batched request.
    ///
    /// # Returns
    /// A book with one record per item upstream knows about. Items without
    /// resting orders on both sides are absent from the book.
    async fn fetch_prices(&self, ids: &[ItemId]) -> Result<PriceBook, PriceError>;
}

/// Error type for price lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("no item ids requested")]
    EmptyRequest,
    /// Connection failure or timeout.
    #[error("fetch failed: network error: {0}")]
    Network(String),
    /// Non-2xx upstream response.
    #[error("fetch failed: HTTP {status}")]
    Http { status: u16 },
    /// Body was not a JSON array of price entries.
    #[error("fetch failed: parse error: {0}")]
    Parse(String),
    /// Upstream answered with an empty list.
    #[error("fetch failed: no items found")]
    Empty,
    /// Requested id absent from the upstream response.
    #[error("price unavailable for item {0}")]
    MissingItem(ItemId),
}

impl PriceError {
    /// True for every upstream-unavailable condition.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            PriceError::Network(_) | PriceError::Http { .. } | PriceError::Parse(_) | PriceError::Empty
        )
    }
}

/// Prices keyed by item id, as returned by one upstream call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceBook {
    records: HashMap<ItemId, PriceRecord>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: PriceRecord) {
        self.records.insert(record.item_id, record);
    }

    /// Look up an item. A missing item is an error, never a zero price.
    pub fn get(&self, id: ItemId) -> Result<&PriceRecord, PriceError> {
        self.records.get(&id).ok_or(PriceError::MissingItem(id))
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<PriceRecord> for PriceBook {
    fn from_iter<T: IntoIterator<Item = PriceRecord>>(iter: T) -> Self {
        let mut book = PriceBook::new();
        for record in iter {
            book.insert(record);
        }
        book
    }
}

/// Collapse duplicates and sort, rejecting an empty request.
pub fn normalize_ids(ids: &[ItemId]) -> Result<Vec<ItemId>, PriceError> {
    let unique: BTreeSet<ItemId> = ids.iter().copied().collect();
    if unique.is_empty() {
        return Err(PriceError::EmptyRequest);
    }
    Ok(unique.into_iter().collect())
}
