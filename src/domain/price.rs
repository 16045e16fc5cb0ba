//! Normalized trading post price records.

use super::fields::MoneyFields;
use super::money::Money;
use super::primitives::{ItemId, PriceSide};
use serde::Serialize;

/// Best standing buy order and lowest sell listing for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRecord {
    pub item_id: ItemId,
    pub buy: Money,
    pub sell: Money,
}

impl PriceRecord {
    pub fn new(item_id: ItemId, buy: Money, sell: Money) -> Self {
        Self { item_id, buy, sell }
    }

    pub fn side(&self, side: PriceSide) -> Money {
        match side {
            PriceSide::Buy => self.buy,
            PriceSide::Sell => self.sell,
        }
    }

    pub fn sell_after_tax(&self) -> Money {
        self.sell.after_tax()
    }

    /// Profit of buying at the buy order and relisting at the sell price.
    pub fn flip_profit(&self) -> Money {
        self.sell_after_tax() - self.buy
    }

    /// Display figures for the price endpoint. Keys match the recipe
    /// endpoints, so `sell_after_tax` means the same thing everywhere.
    pub fn display_fields(&self) -> MoneyFields {
        MoneyFields::new()
            .with("buy", self.buy)
            .with("sell", self.sell)
            .with("flip", self.flip_profit())
            .with("sell_after_tax", self.sell_after_tax())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(buy: i64, sell: i64) -> PriceRecord {
        PriceRecord::new(
            ItemId::new(19721),
            Money::from_copper(buy),
            Money::from_copper(sell),
        )
    }

    #[test]
    fn test_flip_profit() {
        let r = record(2_000, 2_500);
        assert_eq!(r.sell_after_tax().copper(), 2_125);
        assert_eq!(r.flip_profit().copper(), 125);
    }

    #[test]
    fn test_flip_profit_can_be_negative() {
        let r = record(1_000, 1_001);
        assert_eq!(r.flip_profit().copper(), -150);
    }

    #[test]
    fn test_side() {
        let r = record(10, 20);
        assert_eq!(r.side(PriceSide::Buy).copper(), 10);
        assert_eq!(r.side(PriceSide::Sell).copper(), 20);
    }

    #[test]
    fn test_display_fields() {
        let map = record(123_456, 200_000).display_fields().to_json_map();
        assert_eq!(map["buy_g"], 12);
        assert_eq!(map["buy_s"], 34);
        assert_eq!(map["buy_c"], 56);
        assert_eq!(map["sell_after_tax_g"], 17);
        assert_eq!(map["flip_g"], 4);
        assert_eq!(map["flip_s"], 65);
        assert_eq!(map["flip_c"], 44);
    }
}
