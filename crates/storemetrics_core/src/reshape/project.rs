//! Projection of metric values onto y-axis keys.
//!
//! A metric selector picks which field of a domain value is charted; a
//! [`YAxisKey`] picks which slice of that field. Combinations that make no
//! sense for a field project to `None`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseKindError;
use crate::model::{
    Breakdown, CustomerMetrics, FinancialMetrics, Metrics, ProductMetrics, Quantity,
    RepairMetrics, SalesSplit,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum YAxisKey {
    Total,
    Repair,
    Sales,
    Online,
    InStore,
    Overview,
    All,
}

impl YAxisKey {
    pub const ALL: [YAxisKey; 7] = [
        YAxisKey::Total,
        YAxisKey::Repair,
        YAxisKey::Sales,
        YAxisKey::Online,
        YAxisKey::InStore,
        YAxisKey::Overview,
        YAxisKey::All,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            YAxisKey::Total => "total",
            YAxisKey::Repair => "repair",
            YAxisKey::Sales => "sales",
            YAxisKey::Online => "online",
            YAxisKey::InStore => "inStore",
            YAxisKey::Overview => "overview",
            YAxisKey::All => "all",
        }
    }
}

impl fmt::Display for YAxisKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for YAxisKey {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        YAxisKey::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(s.trim()) || matches_slug(*key, s))
            .ok_or_else(|| ParseKindError::new("y-axis key", s))
    }
}

fn matches_slug(key: YAxisKey, s: &str) -> bool {
    key == YAxisKey::InStore && matches!(s.trim(), "in-store" | "in_store" | "instore")
}

/// One named number in a projected slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: &'static str,
    pub value: f64,
}

fn named(name: &'static str, value: impl Quantity) -> NamedValue {
    NamedValue {
        name,
        value: value.to_f64(),
    }
}

fn rate(name: &'static str, value: f64) -> NamedValue {
    NamedValue { name, value }
}

/// Domain values that can be charted.
pub trait ChartMetrics: Metrics {
    type Selector: Copy + fmt::Debug + fmt::Display + Send + Sync;

    /// The values plotted for `selector` under `key`, `None` when `key` does
    /// not apply.
    fn project(&self, selector: Self::Selector, key: YAxisKey) -> Option<Vec<NamedValue>>;

    /// The parts of a whole shown in a pie chart, `None` when the slice has no
    /// sub-category split.
    fn split(&self, selector: Self::Selector, key: YAxisKey) -> Option<Vec<NamedValue>>;
}

// ============================================================================
// Shared breakdown projections
// ============================================================================

fn breakdown_values<T: Quantity>(b: &Breakdown<T>, key: YAxisKey) -> Vec<NamedValue> {
    match key {
        YAxisKey::Total => vec![named("total", b.total)],
        YAxisKey::Repair => vec![named("repair", b.repair)],
        YAxisKey::Sales => vec![named("sales", b.sales.total)],
        YAxisKey::Online => vec![named("online", b.sales.online)],
        YAxisKey::InStore => vec![named("inStore", b.sales.in_store)],
        YAxisKey::Overview => vec![named("repair", b.repair), named("sales", b.sales.total)],
        YAxisKey::All => vec![
            named("total", b.total),
            named("repair", b.repair),
            named("sales", b.sales.total),
            named("online", b.sales.online),
            named("inStore", b.sales.in_store),
        ],
    }
}

fn breakdown_split<T: Quantity>(b: &Breakdown<T>, key: YAxisKey) -> Option<Vec<NamedValue>> {
    match key {
        YAxisKey::Total | YAxisKey::Overview | YAxisKey::All => {
            Some(vec![named("repair", b.repair), named("sales", b.sales.total)])
        }
        YAxisKey::Sales => Some(sales_parts(&b.sales)),
        YAxisKey::Repair | YAxisKey::Online | YAxisKey::InStore => None,
    }
}

fn sales_parts<T: Quantity>(s: &SalesSplit<T>) -> Vec<NamedValue> {
    vec![named("online", s.online), named("inStore", s.in_store)]
}

fn sales_values<T: Quantity>(s: &SalesSplit<T>, key: YAxisKey) -> Option<Vec<NamedValue>> {
    match key {
        YAxisKey::Total => Some(vec![named("total", s.total)]),
        YAxisKey::Online => Some(vec![named("online", s.online)]),
        YAxisKey::InStore => Some(vec![named("inStore", s.in_store)]),
        YAxisKey::Overview => Some(sales_parts(s)),
        YAxisKey::All => Some(vec![
            named("total", s.total),
            named("online", s.online),
            named("inStore", s.in_store),
        ]),
        YAxisKey::Repair | YAxisKey::Sales => None,
    }
}

fn sales_split<T: Quantity>(s: &SalesSplit<T>, key: YAxisKey) -> Option<Vec<NamedValue>> {
    match key {
        YAxisKey::Total | YAxisKey::Overview | YAxisKey::All => Some(sales_parts(s)),
        _ => None,
    }
}

fn overview_only(key: YAxisKey, values: impl FnOnce() -> Vec<NamedValue>) -> Option<Vec<NamedValue>> {
    matches!(key, YAxisKey::Overview | YAxisKey::All).then(values)
}

macro_rules! selector_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = ParseKindError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted: String = s
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .collect();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|selector| selector.name().to_ascii_lowercase() == wanted)
                    .ok_or_else(|| ParseKindError::new($kind, s))
            }
        }
    };
}

// ============================================================================
// Customer
// ============================================================================

selector_enum!(
    /// Which customer figure to chart.
    CustomerMetric, "customer metric" {
        Total => "total",
        New => "new",
        Returning => "returning",
        Rates => "rates",
    }
);

impl ChartMetrics for CustomerMetrics {
    type Selector = CustomerMetric;

    fn project(&self, selector: CustomerMetric, key: YAxisKey) -> Option<Vec<NamedValue>> {
        let counts = &self.customers;
        match selector {
            CustomerMetric::Total => Some(breakdown_values(&counts.total, key)),
            CustomerMetric::New => Some(breakdown_values(&counts.new, key)),
            CustomerMetric::Returning => Some(breakdown_values(&counts.returning, key)),
            CustomerMetric::Rates => overview_only(key, || {
                vec![
                    rate("churnRate", self.churn_rate),
                    rate("retentionRate", self.retention_rate),
                ]
            }),
        }
    }

    fn split(&self, selector: CustomerMetric, key: YAxisKey) -> Option<Vec<NamedValue>> {
        let counts = &self.customers;
        match (selector, key) {
            (CustomerMetric::Total, YAxisKey::Total) => Some(vec![
                named("new", counts.new.total),
                named("returning", counts.returning.total),
            ]),
            (CustomerMetric::Total, _) => breakdown_split(&counts.total, key),
            (CustomerMetric::New, _) => breakdown_split(&counts.new, key),
            (CustomerMetric::Returning, _) => breakdown_split(&counts.returning, key),
            (CustomerMetric::Rates, _) => self.project(selector, key),
        }
    }
}

// ============================================================================
// Financial
// ============================================================================

selector_enum!(
    /// Which financial figure to chart.
    FinancialMetric, "financial metric" {
        Profit => "profit",
        Expenses => "expenses",
        Revenue => "revenue",
        Transactions => "transactions",
        OtherMetrics => "otherMetrics",
    }
);

impl ChartMetrics for FinancialMetrics {
    type Selector = FinancialMetric;

    fn project(&self, selector: FinancialMetric, key: YAxisKey) -> Option<Vec<NamedValue>> {
        match selector {
            FinancialMetric::Profit => Some(breakdown_values(&self.profit, key)),
            FinancialMetric::Expenses => Some(breakdown_values(&self.expenses, key)),
            FinancialMetric::Revenue => Some(breakdown_values(&self.revenue, key)),
            FinancialMetric::Transactions => Some(breakdown_values(&self.transactions, key)),
            FinancialMetric::OtherMetrics => overview_only(key, || {
                vec![
                    rate("averageOrderValue", self.average_order_value),
                    rate("conversionRate", self.conversion_rate),
                    rate("netProfitMargin", self.net_profit_margin),
                ]
            }),
        }
    }

    fn split(&self, selector: FinancialMetric, key: YAxisKey) -> Option<Vec<NamedValue>> {
        match selector {
            FinancialMetric::Profit => breakdown_split(&self.profit, key),
            FinancialMetric::Expenses => breakdown_split(&self.expenses, key),
            FinancialMetric::Revenue => breakdown_split(&self.revenue, key),
            FinancialMetric::Transactions => breakdown_split(&self.transactions, key),
            FinancialMetric::OtherMetrics => None,
        }
    }
}

// ============================================================================
// Product / Repair
// ============================================================================

selector_enum!(
    /// Which product figure to chart.
    ProductMetric, "product metric" {
        Revenue => "revenue",
        UnitsSold => "unitsSold",
    }
);

impl ChartMetrics for ProductMetrics {
    type Selector = ProductMetric;

    fn project(&self, selector: ProductMetric, key: YAxisKey) -> Option<Vec<NamedValue>> {
        match selector {
            ProductMetric::Revenue => sales_values(&self.revenue, key),
            ProductMetric::UnitsSold => sales_values(&self.units_sold, key),
        }
    }

    fn split(&self, selector: ProductMetric, key: YAxisKey) -> Option<Vec<NamedValue>> {
        match selector {
            ProductMetric::Revenue => sales_split(&self.revenue, key),
            ProductMetric::UnitsSold => sales_split(&self.units_sold, key),
        }
    }
}

selector_enum!(
    /// Which repair figure to chart.
    RepairMetric, "repair metric" {
        Revenue => "revenue",
        UnitsRepaired => "unitsRepaired",
        Overview => "overview",
    }
);

impl ChartMetrics for RepairMetrics {
    type Selector = RepairMetric;

    fn project(&self, selector: RepairMetric, key: YAxisKey) -> Option<Vec<NamedValue>> {
        match (selector, key) {
            (RepairMetric::Revenue, YAxisKey::Total) => Some(vec![named("revenue", self.revenue)]),
            (RepairMetric::UnitsRepaired, YAxisKey::Total) => {
                Some(vec![named("unitsRepaired", self.units_repaired)])
            }
            (RepairMetric::Overview, _) => overview_only(key, || {
                vec![
                    named("revenue", self.revenue),
                    named("unitsRepaired", self.units_repaired),
                    rate("averageTicket", self.average_ticket()),
                ]
            }),
            _ => None,
        }
    }

    fn split(&self, _selector: RepairMetric, _key: YAxisKey) -> Option<Vec<NamedValue>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cents, CustomerCounts};

    fn customers() -> CustomerMetrics {
        CustomerMetrics {
            customers: CustomerCounts::from_parts(
                Breakdown::split(40, 0.25, 0.5),
                Breakdown::split(60, 0.5, 0.5),
            ),
            churn_rate: 0.2,
            retention_rate: 0.8,
        }
    }

    fn names(values: Option<Vec<NamedValue>>) -> Vec<&'static str> {
        values.unwrap_or_default().into_iter().map(|v| v.name).collect()
    }

    #[test]
    fn test_breakdown_keys() {
        let c = customers();
        assert_eq!(c.project(CustomerMetric::Total, YAxisKey::Total).unwrap()[0].value, 100.0);
        assert_eq!(
            names(c.project(CustomerMetric::Total, YAxisKey::Overview)),
            vec!["repair", "sales"]
        );
        assert_eq!(c.project(CustomerMetric::Total, YAxisKey::All).unwrap().len(), 5);
    }

    #[test]
    fn test_rates_only_project_as_overview() {
        let c = customers();
        assert!(c.project(CustomerMetric::Rates, YAxisKey::Total).is_none());
        assert_eq!(
            names(c.project(CustomerMetric::Rates, YAxisKey::All)),
            vec!["churnRate", "retentionRate"]
        );
    }

    #[test]
    fn test_splits() {
        let c = customers();
        assert_eq!(
            names(c.split(CustomerMetric::Total, YAxisKey::Total)),
            vec!["new", "returning"]
        );
        assert_eq!(
            names(c.split(CustomerMetric::New, YAxisKey::Sales)),
            vec!["online", "inStore"]
        );
        assert!(c.split(CustomerMetric::New, YAxisKey::Online).is_none());

        let repair = RepairMetrics {
            revenue: Cents(10_000),
            units_repaired: 4,
        };
        assert!(repair.split(RepairMetric::Revenue, YAxisKey::Total).is_none());
        assert_eq!(repair.project(RepairMetric::Revenue, YAxisKey::Total).unwrap()[0].value, 100.0);
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!("units-sold".parse(), Ok(ProductMetric::UnitsSold));
        assert_eq!("otherMetrics".parse(), Ok(FinancialMetric::OtherMetrics));
        assert_eq!("in-store".parse(), Ok(YAxisKey::InStore));
        assert_eq!("inStore".parse(), Ok(YAxisKey::InStore));
        assert!("margin".parse::<FinancialMetric>().is_err());
    }
}
