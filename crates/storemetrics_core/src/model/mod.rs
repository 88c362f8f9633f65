mod collections;
mod dates;
mod ids;
mod metrics;
mod quantity;
mod tree;

pub use collections::{CategoryCollection, CategoryKind, CategoryTree, LocationCollection};
pub use dates::{CalendarDate, DAYS_IN_MONTH, Day, Month, Year};
pub use ids::{MetricsDomain, ProductCategory, RepairCategory, StoreLocation};
pub use metrics::{
    CustomerCounts, CustomerMetrics, FinancialMetrics, Metrics, ProductMetrics, RepairMetrics,
    roll_up,
};
pub use quantity::{Breakdown, Cents, Quantity, SalesSplit};
pub use tree::{DayNode, MetricTree, MonthNode, YearNode};
