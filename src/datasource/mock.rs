//! Mock price source for testing without network calls.

use super::{normalize_ids, PriceBook, PriceError, PriceSource};
use crate::domain::{ItemId, Money, PriceRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock price source returning predefined prices.
///
/// Prices can be changed after construction through a shared handle, and
/// every call is counted so tests can assert one upstream request per
/// evaluation.
#[derive(Debug, Clone, Default)]
pub struct MockPriceSource {
    prices: Arc<Mutex<HashMap<ItemId, PriceRecord>>>,
    failure: Arc<Mutex<Option<PriceError>>>,
    calls: Arc<AtomicUsize>,
}

impl MockPriceSource {
    /// Create a new mock with no prices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a price (buy, sell) in copper.
    pub fn with_price(self, id: u32, buy: i64, sell: i64) -> Self {
        self.set_price(id, buy, sell);
        self
    }

    /// Make every call fail with the given error.
    pub fn with_failure(self, error: PriceError) -> Self {
        self.set_failure(Some(error));
        self
    }

    pub fn set_price(&self, id: u32, buy: i64, sell: i64) {
        let record = PriceRecord::new(
            ItemId::new(id),
            Money::from_copper(buy),
            Money::from_copper(sell),
        );
        self.prices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(record.item_id, record);
    }

    pub fn remove_price(&self, id: u32) {
        self.prices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&ItemId::new(id));
    }

    pub fn set_failure(&self, error: Option<PriceError>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = error;
    }

    /// Number of `fetch_prices` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn fetch_prices(&self, ids: &[ItemId]) -> Result<PriceBook, PriceError> {
        let ids = normalize_ids(ids)?;
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self
            .failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(error);
        }

        let prices = self.prices.lock().unwrap_or_else(|e| e.into_inner());
        let book: PriceBook = ids
            .iter()
            .filter_map(|id| prices.get(id).copied())
            .collect();

        if book.is_empty() {
            return Err(PriceError::Empty);
        }
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_returns_requested_prices_only() {
        let mock = MockPriceSource::new()
            .with_price(1, 10, 20)
            .with_price(2, 30, 40);

        let book = tokio_test::block_on(mock.fetch_prices(&[ItemId::new(1)])).unwrap();
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(ItemId::new(1)).unwrap().sell.copper(), 20);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_omits_unknown_items() {
        let mock = MockPriceSource::new().with_price(1, 10, 20);
        let book = mock
            .fetch_prices(&[ItemId::new(1), ItemId::new(2)])
            .await
            .unwrap();
        assert!(book.get(ItemId::new(2)).is_err());
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockPriceSource::new()
            .with_price(1, 10, 20)
            .with_failure(PriceError::Http { status: 503 });
        assert_eq!(
            mock.fetch_prices(&[ItemId::new(1)]).await.unwrap_err(),
            PriceError::Http { status: 503 }
        );
    }

    #[tokio::test]
    async fn test_mock_nothing_known_is_empty() {
        let mock = MockPriceSource::new();
        assert_eq!(
            mock.fetch_prices(&[ItemId::new(5)]).await.unwrap_err(),
            PriceError::Empty
        );
    }
}
