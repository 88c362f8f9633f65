//! Fluent builder for overriding individual range tables.

use super::RangeSet;
use super::ranges::{
    CustomerRanges, FinancialRanges, ProductCategoryRanges, RepairCategoryRanges, ValueRange,
};
use crate::model::{ProductCategory, RepairCategory, StoreLocation, Year};

/// Builder starting from the built-in ranges
#[derive(Debug, Clone, Default)]
pub struct RangeSetBuilder {
    ranges: RangeSet,
}

impl RangeSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set, e.g. one loaded from a file
    #[must_use]
    pub fn from_ranges(ranges: RangeSet) -> Self {
        Self { ranges }
    }

    // =========================================================================
    // Operating history
    // =========================================================================

    #[must_use]
    pub fn opening_year(mut self, location: StoreLocation, year: Year) -> Self {
        self.ranges.history.opening_years.insert(location, year);
        self
    }

    #[must_use]
    pub fn closed(mut self, location: StoreLocation) -> Self {
        self.ranges.history.opening_years.remove(&location);
        self
    }

    // =========================================================================
    // Customer
    // =========================================================================

    #[must_use]
    pub fn daily_customers(mut self, location: StoreLocation, year: Year, range: ValueRange) -> Self {
        let table = &mut self.ranges.customer.daily_customers;
        table.by_location.entry(location).or_default().insert(year, range);
        self
    }

    #[must_use]
    pub fn churn_rate(mut self, location: StoreLocation, year: Year, range: ValueRange) -> Self {
        let table = &mut self.ranges.customer.churn_rate;
        table.by_location.entry(location).or_default().insert(year, range);
        self
    }

    #[must_use]
    pub fn churn_fallback(mut self, range: ValueRange) -> Self {
        self.ranges.customer.churn_rate.fallback = range;
        self
    }

    #[must_use]
    pub fn customer(mut self, ranges: CustomerRanges) -> Self {
        self.ranges.customer = ranges;
        self
    }

    // =========================================================================
    // Financial
    // =========================================================================

    #[must_use]
    pub fn daily_transactions(
        mut self,
        location: StoreLocation,
        year: Year,
        range: ValueRange,
    ) -> Self {
        let table = &mut self.ranges.financial.daily_transactions;
        table.by_location.entry(location).or_default().insert(year, range);
        self
    }

    #[must_use]
    pub fn expense_ratio(mut self, range: ValueRange) -> Self {
        self.ranges.financial.expense_ratio.fallback = range;
        self
    }

    #[must_use]
    pub fn conversion_rate(mut self, range: ValueRange) -> Self {
        self.ranges.financial.conversion_rate.fallback = range;
        self
    }

    #[must_use]
    pub fn financial(mut self, ranges: FinancialRanges) -> Self {
        self.ranges.financial = ranges;
        self
    }

    // =========================================================================
    // Categories
    // =========================================================================

    #[must_use]
    pub fn product_category(mut self, category: ProductCategory, ranges: ProductCategoryRanges) -> Self {
        self.ranges.product.categories.insert(category, ranges);
        self
    }

    #[must_use]
    pub fn repair_category(mut self, category: RepairCategory, ranges: RepairCategoryRanges) -> Self {
        self.ranges.repair.categories.insert(category, ranges);
        self
    }

    #[must_use]
    pub fn build(self) -> RangeSet {
        self.ranges
    }
}
