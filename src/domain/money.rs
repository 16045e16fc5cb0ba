//! Copper-denominated money with gold/silver/copper display decomposition.
//!
//! All prices on the trading post are integer copper. Ratios (tax, yield
//! fractions, success rates) are applied as exact decimals and truncated
//! toward zero once, when the result is turned back into [`Money`].
//! Integer arithmetic saturates at the `i64` bounds.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

pub const COPPER_PER_SILVER: i64 = 100;
pub const COPPER_PER_GOLD: i64 = 10_000;

/// Share of the sale price the seller keeps after the 15% trading post cut.
pub const SELLER_SHARE: Decimal = dec!(0.85);

/// Signed amount of copper.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

/// Display triple. The sign is carried on every limb.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gsc {
    pub gold: i64,
    pub silver: i64,
    pub copper: i64,
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_copper(copper: i64) -> Self {
        Money(copper)
    }

    pub const fn copper(&self) -> i64 {
        self.0
    }

    /// Split into (gold, silver, copper), truncating each limb toward zero.
    pub fn to_display(&self) -> Gsc {
        let sign = if self.0 < 0 { -1 } else { 1 };
        let magnitude = self.0.unsigned_abs();
        let gold = (magnitude / COPPER_PER_GOLD as u64) as i64;
        let silver = ((magnitude % COPPER_PER_GOLD as u64) / COPPER_PER_SILVER as u64) as i64;
        let copper = (magnitude % COPPER_PER_SILVER as u64) as i64;
        Gsc {
            gold: gold * sign,
            silver: silver * sign,
            copper: copper * sign,
        }
    }

    /// Out-of-range limbs saturate.
    pub fn from_display(gold: i64, silver: i64, copper: i64) -> Self {
        Money(
            gold.saturating_mul(COPPER_PER_GOLD)
                .saturating_add(silver.saturating_mul(COPPER_PER_SILVER))
                .saturating_add(copper),
        )
    }

    /// Convert a fractional copper amount, dropping the fraction toward zero.
    ///
    /// Out-of-range values saturate.
    pub fn from_decimal_trunc(value: Decimal) -> Self {
        let truncated = value.trunc();
        Money(truncated.to_i64().unwrap_or(if truncated.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        }))
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }

    /// Multiply by an exact ratio and truncate toward zero.
    pub fn scale(&self, ratio: Decimal) -> Self {
        Self::from_decimal_trunc(self.to_decimal() * ratio)
    }

    /// What the seller receives after the trading post cut: `floor(self * 0.85)`
    /// for non-negative amounts.
    pub fn after_tax(&self) -> Self {
        self.scale(SELLER_SHARE)
    }

    /// Value in gold as a float, for plotting only.
    pub fn as_gold_f64(&self) -> f64 {
        self.0 as f64 / COPPER_PER_GOLD as f64
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Gsc {
    pub fn new(gold: i64, silver: i64, copper: i64) -> Self {
        Gsc {
            gold,
            silver,
            copper,
        }
    }

    pub fn to_money(&self) -> Money {
        Money::from_display(self.gold, self.silver, self.copper)
    }
}

impl From<Gsc> for Money {
    fn from(value: Gsc) -> Self {
        value.to_money()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gsc = self.to_display();
        if self.is_negative() {
            write!(
                f,
                "-{}g {}s {}c",
                -gsc.gold, -gsc.silver, -gsc.copper
            )
        } else {
            write!(f, "{}g {}s {}c", gsc.gold, gsc.silver, gsc.copper)
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, rhs: i64) -> Money {
        Money(self.0.saturating_mul(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}
