//! Summable quantities and their channel breakdowns.
//!
//! Counts are `u64`, money is integer [`Cents`]. Splits always derive one part
//! by multiplication and the other by complementary subtraction, so the parts
//! of a [`Breakdown`] reconcile with its total exactly.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A value that can be summed, split by a fraction and projected to a chart.
pub trait Quantity:
    Copy + Default + PartialEq + fmt::Debug + Add<Output = Self> + Sub<Output = Self> + Send + Sync
{
    /// `round(self × fraction)`, never exceeding `self` for non-negative values
    fn share(self, fraction: f64) -> Self;

    /// Value in chart units (counts, or dollars for money)
    fn to_f64(self) -> f64;
}

impl Quantity for u64 {
    fn share(self, fraction: f64) -> Self {
        let part = (self as f64 * fraction.clamp(0.0, 1.0)).round() as u64;
        part.min(self)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// Money in integer cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    #[must_use]
    pub fn from_dollars(dollars: f64) -> Self {
        Cents((dollars * 100.0).round() as i64)
    }

    #[must_use]
    pub fn dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Price times a unit count
    #[must_use]
    pub fn times(self, units: u64) -> Self {
        Cents(self.0.saturating_mul(units as i64))
    }
}

impl Quantity for Cents {
    fn share(self, fraction: f64) -> Self {
        Cents((self.0 as f64 * fraction).round() as i64)
    }

    fn to_f64(self) -> f64 {
        self.dollars()
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0 + rhs.0)
    }
}

impl Sub for Cents {
    type Output = Cents;

    fn sub(self, rhs: Cents) -> Cents {
        Cents(self.0 - rhs.0)
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Self {
        iter.fold(Cents::ZERO, Add::add)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

/// Online vs. in-store split of a sales quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSplit<T> {
    pub total: T,
    pub online: T,
    pub in_store: T,
}

impl<T: Quantity> SalesSplit<T> {
    /// Split `total` with `online = round(total × online_fraction)` and the
    /// remainder in store.
    #[must_use]
    pub fn split(total: T, online_fraction: f64) -> Self {
        let online = total.share(online_fraction);
        Self {
            total,
            online,
            in_store: total - online,
        }
    }

    #[must_use]
    pub fn from_parts(online: T, in_store: T) -> Self {
        Self {
            total: online + in_store,
            online,
            in_store,
        }
    }

    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.online + self.in_store == self.total
    }
}

impl<T: Quantity> Add for SalesSplit<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            total: self.total + rhs.total,
            online: self.online + rhs.online,
            in_store: self.in_store + rhs.in_store,
        }
    }
}

impl<T: Quantity> Sub for SalesSplit<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            total: self.total - rhs.total,
            online: self.online - rhs.online,
            in_store: self.in_store - rhs.in_store,
        }
    }
}

/// `{ total, repair, sales: { total, online, inStore } }`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown<T> {
    pub total: T,
    pub repair: T,
    pub sales: SalesSplit<T>,
}

impl<T: Quantity> Breakdown<T> {
    /// Split `total` into repair and sales, then sales into online and
    /// in-store.
    #[must_use]
    pub fn split(total: T, repair_fraction: f64, online_fraction: f64) -> Self {
        let repair = total.share(repair_fraction);
        Self {
            total,
            repair,
            sales: SalesSplit::split(total - repair, online_fraction),
        }
    }

    #[must_use]
    pub fn from_parts(repair: T, sales: SalesSplit<T>) -> Self {
        Self {
            total: repair + sales.total,
            repair,
            sales,
        }
    }

    /// Scale each leaf part by `ratio` and rebuild the totals from the parts.
    #[must_use]
    pub fn scale_parts(&self, ratio: f64) -> Self {
        Self::from_parts(
            self.repair.share(ratio),
            SalesSplit::from_parts(self.sales.online.share(ratio), self.sales.in_store.share(ratio)),
        )
    }

    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.sales.is_balanced() && self.repair + self.sales.total == self.total
    }
}

impl<T: Quantity> Add for Breakdown<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            total: self.total + rhs.total,
            repair: self.repair + rhs.repair,
            sales: self.sales + rhs.sales,
        }
    }
}

impl<T: Quantity> Sub for Breakdown<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            total: self.total - rhs.total,
            repair: self.repair - rhs.repair,
            sales: self.sales - rhs.sales,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_is_complementary() {
        for total in [0_u64, 1, 7, 99, 1_000, 123_457] {
            let b = Breakdown::split(total, 0.37, 0.61);
            assert!(b.is_balanced(), "unbalanced split of {total}: {b:?}");
            assert!(b.repair <= total);
        }
    }

    #[test]
    fn test_share_rounds() {
        assert_eq!(10_u64.share(0.25), 3);
        assert_eq!(10_u64.share(1.5), 10);
        assert_eq!(Cents(1_001).share(0.5), Cents(501));
    }

    #[test]
    fn test_scale_parts_stays_balanced() {
        let revenue = Breakdown::split(Cents(987_654), 0.3, 0.45);
        let expenses = revenue.scale_parts(0.72);
        assert!(expenses.is_balanced());
        let profit = revenue - expenses;
        assert!(profit.is_balanced());
        assert_eq!(profit.total + expenses.total, revenue.total);
    }

    #[test]
    fn test_cents_display() {
        assert_eq!(Cents(123_456).to_string(), "$1234.56");
        assert_eq!(Cents(-5).to_string(), "-$0.05");
        assert_eq!(Cents::from_dollars(19.99), Cents(1_999));
        assert_eq!(Cents(2_500).times(4), Cents(10_000));
    }

    #[test]
    fn test_breakdown_serializes_camel_case() {
        let b = Breakdown::split(10_u64, 0.5, 0.5);
        let json = serde_json::to_value(b).unwrap();
        assert!(json["sales"].get("inStore").is_some());
    }
}
