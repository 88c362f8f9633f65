//! Per-domain metric values and the [`Metrics`] fold contract.
//!
//! Every domain value has two kinds of fields: summable quantities, which add
//! up the tree, and rate fields, which are averaged. A rollup adds every field
//! of the children (rates included) and then divides the rate fields by the
//! child count once, after the fold.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::quantity::{Breakdown, Cents, Quantity, SalesSplit};

/// Fold contract shared by all domain values.
pub trait Metrics: Clone + Default + fmt::Debug + Send + Sync + 'static {
    /// Elementwise sum of every field, rate fields included
    fn add(&self, other: &Self) -> Self;

    /// Divide rate fields by `count`, leaving summable fields untouched.
    /// A zero count leaves the value unchanged.
    fn average_rates(self, count: usize) -> Self;

    /// Pairwise merge used by the cross-location fold: summable fields add,
    /// rate fields become `(a + b) / 2`.
    fn combine(&self, other: &Self) -> Self {
        self.add(other).average_rates(2)
    }
}

/// Roll children up into a parent value: add everything, then average rates
/// over the number of children.
pub fn roll_up<'a, M, I>(items: I) -> M
where
    M: Metrics,
    I: IntoIterator<Item = &'a M>,
{
    let mut count = 0;
    let mut acc = M::default();
    for item in items {
        acc = acc.add(item);
        count += 1;
    }
    acc.average_rates(count)
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 { sum } else { sum / count as f64 }
}

// ============================================================================
// Customer
// ============================================================================

/// New vs. returning customer counts, each with a channel breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCounts {
    pub total: Breakdown<u64>,
    pub new: Breakdown<u64>,
    pub returning: Breakdown<u64>,
}

impl CustomerCounts {
    #[must_use]
    pub fn from_parts(new: Breakdown<u64>, returning: Breakdown<u64>) -> Self {
        Self {
            total: new + returning,
            new,
            returning,
        }
    }

    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.new + self.returning == self.total
            && self.total.is_balanced()
            && self.new.is_balanced()
            && self.returning.is_balanced()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerMetrics {
    pub customers: CustomerCounts,
    pub churn_rate: f64,
    pub retention_rate: f64,
}

impl Metrics for CustomerMetrics {
    fn add(&self, other: &Self) -> Self {
        Self {
            customers: CustomerCounts {
                total: self.customers.total + other.customers.total,
                new: self.customers.new + other.customers.new,
                returning: self.customers.returning + other.customers.returning,
            },
            churn_rate: self.churn_rate + other.churn_rate,
            retention_rate: self.retention_rate + other.retention_rate,
        }
    }

    fn average_rates(self, count: usize) -> Self {
        Self {
            churn_rate: mean(self.churn_rate, count),
            retention_rate: mean(self.retention_rate, count),
            ..self
        }
    }
}

// ============================================================================
// Financial
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetrics {
    pub profit: Breakdown<Cents>,
    pub expenses: Breakdown<Cents>,
    pub revenue: Breakdown<Cents>,
    pub transactions: Breakdown<u64>,
    /// Dollars per transaction
    pub average_order_value: f64,
    pub conversion_rate: f64,
    /// Profit over revenue
    pub net_profit_margin: f64,
}

impl FinancialMetrics {
    /// Revenue over transactions at this node's totals (0 with no transactions)
    #[must_use]
    pub fn derived_average_order_value(&self) -> f64 {
        if self.transactions.total == 0 {
            0.0
        } else {
            self.revenue.total.dollars() / self.transactions.total as f64
        }
    }

    /// Profit over revenue at this node's totals (0 with no revenue)
    #[must_use]
    pub fn derived_net_profit_margin(&self) -> f64 {
        if self.revenue.total == Cents::ZERO {
            0.0
        } else {
            self.profit.total.0 as f64 / self.revenue.total.0 as f64
        }
    }

    /// Replace the order value and margin with values derived from totals.
    #[must_use]
    pub fn with_derived_ratios(self) -> Self {
        Self {
            average_order_value: self.derived_average_order_value(),
            net_profit_margin: self.derived_net_profit_margin(),
            ..self
        }
    }
}

impl Metrics for FinancialMetrics {
    fn add(&self, other: &Self) -> Self {
        Self {
            profit: self.profit + other.profit,
            expenses: self.expenses + other.expenses,
            revenue: self.revenue + other.revenue,
            transactions: self.transactions + other.transactions,
            average_order_value: self.average_order_value + other.average_order_value,
            conversion_rate: self.conversion_rate + other.conversion_rate,
            net_profit_margin: self.net_profit_margin + other.net_profit_margin,
        }
    }

    fn average_rates(self, count: usize) -> Self {
        Self {
            average_order_value: mean(self.average_order_value, count),
            conversion_rate: mean(self.conversion_rate, count),
            net_profit_margin: mean(self.net_profit_margin, count),
            ..self
        }
    }
}

// ============================================================================
// Product / Repair
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMetrics {
    pub revenue: SalesSplit<Cents>,
    pub units_sold: SalesSplit<u64>,
}

impl Metrics for ProductMetrics {
    fn add(&self, other: &Self) -> Self {
        Self {
            revenue: self.revenue + other.revenue,
            units_sold: self.units_sold + other.units_sold,
        }
    }

    fn average_rates(self, _count: usize) -> Self {
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairMetrics {
    pub revenue: Cents,
    pub units_repaired: u64,
}

impl Metrics for RepairMetrics {
    fn add(&self, other: &Self) -> Self {
        Self {
            revenue: self.revenue + other.revenue,
            units_repaired: self.units_repaired + other.units_repaired,
        }
    }

    fn average_rates(self, _count: usize) -> Self {
        self
    }
}

impl RepairMetrics {
    /// Average revenue per repaired unit, in dollars
    #[must_use]
    pub fn average_ticket(&self) -> f64 {
        if self.units_repaired == 0 {
            0.0
        } else {
            self.revenue.to_f64() / self.units_repaired as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(total: u64, churn: f64) -> CustomerMetrics {
        let new = Breakdown::split(total / 3, 0.4, 0.5);
        let returning = Breakdown::split(total - total / 3, 0.4, 0.5);
        CustomerMetrics {
            customers: CustomerCounts::from_parts(new, returning),
            churn_rate: churn,
            retention_rate: 1.0 - churn,
        }
    }

    #[test]
    fn test_roll_up_sums_counts_and_averages_rates() {
        let days = [customer(30, 0.1), customer(60, 0.2), customer(90, 0.3)];
        let month = roll_up(&days);
        assert_eq!(month.customers.total.total, 180);
        assert!(month.customers.is_balanced());
        assert!((month.churn_rate - 0.2).abs() < 1e-12);
        assert!((month.retention_rate - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_roll_up_of_nothing_is_default() {
        let none: [RepairMetrics; 0] = [];
        assert_eq!(roll_up(&none), RepairMetrics::default());
    }

    #[test]
    fn test_combine_averages_pairwise() {
        let merged = customer(10, 0.1).combine(&customer(20, 0.3));
        assert_eq!(merged.customers.total.total, 30);
        assert!((merged.churn_rate - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_financial_derived_ratios() {
        let revenue = Breakdown::split(Cents(10_000), 0.5, 0.5);
        let expenses = revenue.scale_parts(0.75);
        let metrics = FinancialMetrics {
            profit: revenue - expenses,
            expenses,
            revenue,
            transactions: Breakdown::split(4, 0.5, 0.5),
            ..FinancialMetrics::default()
        }
        .with_derived_ratios();
        assert!((metrics.average_order_value - 25.0).abs() < 1e-9);
        assert!((metrics.net_profit_margin - 0.25).abs() < 1e-9);

        assert_eq!(FinancialMetrics::default().derived_average_order_value(), 0.0);
        assert_eq!(FinancialMetrics::default().derived_net_profit_margin(), 0.0);
    }
}
