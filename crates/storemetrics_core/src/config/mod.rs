//! Range configuration
//!
//! Generators draw every base quantity from a location × year range table.
//! Tables are immutable configuration data reached through the
//! [`RangeProvider`] trait; [`RangeSet`] is the built-in implementation and
//! deserializes from YAML/JSON with every table optional.
//!
//! # Builder DSL
//!
//! ```ignore
//! use storemetrics_core::config::{RangeSetBuilder, ValueRange};
//! use storemetrics_core::StoreLocation;
//!
//! let ranges = RangeSetBuilder::new()
//!     .opening_year(StoreLocation::Calgary, 2016)
//!     .daily_customers(StoreLocation::Calgary, 2016, ValueRange::new(10.0, 25.0)?)
//!     .churn_fallback(ValueRange::new(0.1, 0.2)?)
//!     .build();
//! ```

use serde::{Deserialize, Serialize};

mod builder;
mod defaults;
mod ranges;

pub use builder::RangeSetBuilder;
pub use ranges::{
    CustomerRanges, FinancialRanges, OperatingHistory, ProductCategoryRanges, ProductRanges,
    RangeTable, RepairCategoryRanges, RepairRanges, ValueRange,
};

/// Source of the range tables and operating history a generator reads.
pub trait RangeProvider: Send + Sync {
    fn history(&self) -> &OperatingHistory;
    fn customer(&self) -> &CustomerRanges;
    fn financial(&self) -> &FinancialRanges;
    fn product(&self) -> &ProductRanges;
    fn repair(&self) -> &RepairRanges;
}

/// The complete set of range tables. Missing sections deserialize to the
/// built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeSet {
    pub history: OperatingHistory,
    pub customer: CustomerRanges,
    pub financial: FinancialRanges,
    pub product: ProductRanges,
    pub repair: RepairRanges,
}

impl RangeProvider for RangeSet {
    fn history(&self) -> &OperatingHistory {
        &self.history
    }

    fn customer(&self) -> &CustomerRanges {
        &self.customer
    }

    fn financial(&self) -> &FinancialRanges {
        &self.financial
    }

    fn product(&self) -> &ProductRanges {
        &self.product
    }

    fn repair(&self) -> &RepairRanges {
        &self.repair
    }
}
