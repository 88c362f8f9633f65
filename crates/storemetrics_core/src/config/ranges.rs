//! Range tables: location × year → `[min, max]` with a fallback range.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::model::{ProductCategory, RepairCategory, StoreLocation, Year};

/// A validated, inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct ValueRange {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct RawRange {
    min: f64,
    max: f64,
}

impl TryFrom<RawRange> for ValueRange {
    type Error = ConfigError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        ValueRange::new(raw.min, raw.max)
    }
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::InvalidRange {
                min,
                max,
                reason: "bounds must be finite",
            });
        }
        if min > max {
            return Err(ConfigError::InvalidRange {
                min,
                max,
                reason: "min exceeds max",
            });
        }
        Ok(Self { min, max })
    }

    /// A range of shares or rates, bounded to `[0, 1]`
    pub fn fraction(min: f64, max: f64) -> Result<Self, ConfigError> {
        Self::new(min, max)?.check_fraction()
    }

    /// A range that always yields `value`
    pub fn fixed(value: f64) -> Result<Self, ConfigError> {
        Self::new(value, value)
    }

    fn check_fraction(self) -> Result<Self, ConfigError> {
        if self.min < 0.0 || self.max > 1.0 {
            return Err(ConfigError::InvalidRange {
                min: self.min,
                max: self.max,
                reason: "fraction outside [0, 1]",
            });
        }
        Ok(self)
    }

    pub(crate) const fn unchecked(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Draw a uniform value from the range. Every call re-rolls.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.min == self.max {
            self.min
        } else {
            rng.random_range(self.min..=self.max)
        }
    }
}

/// Ranges indexed by store location and year, with a fallback for pairs the
/// table does not list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeTable {
    pub fallback: ValueRange,
    #[serde(default)]
    pub by_location: BTreeMap<StoreLocation, BTreeMap<Year, ValueRange>>,
}

impl RangeTable {
    #[must_use]
    pub fn new(fallback: ValueRange) -> Self {
        Self {
            fallback,
            by_location: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_year(mut self, location: StoreLocation, year: Year, range: ValueRange) -> Self {
        self.by_location
            .entry(location)
            .or_default()
            .insert(year, range);
        self
    }

    #[must_use]
    pub fn with_years<I>(mut self, location: StoreLocation, rows: I) -> Self
    where
        I: IntoIterator<Item = (Year, ValueRange)>,
    {
        self.by_location.entry(location).or_default().extend(rows);
        self
    }

    /// The range for `(location, year)`, or the fallback when absent
    #[must_use]
    pub fn range_for(&self, location: StoreLocation, year: Year) -> ValueRange {
        self.by_location
            .get(&location)
            .and_then(|years| years.get(&year))
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn sample<R: Rng + ?Sized>(&self, location: StoreLocation, year: Year, rng: &mut R) -> f64 {
        self.range_for(location, year).sample(rng)
    }

    /// Every range in the table, fallback first
    pub fn ranges(&self) -> impl Iterator<Item = &ValueRange> {
        std::iter::once(&self.fallback).chain(self.by_location.values().flat_map(BTreeMap::values))
    }
}

/// A table whose every range is a fraction (shares, ratios and rates).
fn fraction_table<'de, D>(deserializer: D) -> Result<RangeTable, D::Error>
where
    D: Deserializer<'de>,
{
    let table = RangeTable::deserialize(deserializer)?;
    for range in table.ranges() {
        range.check_fraction().map_err(serde::de::Error::custom)?;
    }
    Ok(table)
}

/// Year each physical location opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatingHistory {
    pub opening_years: BTreeMap<StoreLocation, Year>,
}

impl Default for OperatingHistory {
    fn default() -> Self {
        Self {
            opening_years: BTreeMap::from([
                (StoreLocation::Edmonton, 2013),
                (StoreLocation::Calgary, 2017),
                (StoreLocation::Vancouver, 2019),
            ]),
        }
    }
}

impl OperatingHistory {
    /// Opening year, `None` for composites or unknown locations
    #[must_use]
    pub fn opening_year(&self, location: StoreLocation) -> Option<Year> {
        if location.is_composite() {
            return None;
        }
        self.opening_years.get(&location).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerRanges {
    pub daily_customers: RangeTable,
    #[serde(deserialize_with = "fraction_table")]
    pub new_customer_share: RangeTable,
    #[serde(deserialize_with = "fraction_table")]
    pub repair_share: RangeTable,
    #[serde(deserialize_with = "fraction_table")]
    pub online_share: RangeTable,
    #[serde(deserialize_with = "fraction_table")]
    pub churn_rate: RangeTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialRanges {
    pub daily_transactions: RangeTable,
    #[serde(deserialize_with = "fraction_table")]
    pub repair_share: RangeTable,
    #[serde(deserialize_with = "fraction_table")]
    pub online_share: RangeTable,
    /// Dollars per repair ticket
    pub repair_ticket: RangeTable,
    pub online_ticket: RangeTable,
    pub in_store_ticket: RangeTable,
    /// Expenses as a share of revenue
    #[serde(deserialize_with = "fraction_table")]
    pub expense_ratio: RangeTable,
    #[serde(deserialize_with = "fraction_table")]
    pub conversion_rate: RangeTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCategoryRanges {
    pub daily_units: RangeTable,
    #[serde(deserialize_with = "fraction_table")]
    pub online_share: RangeTable,
    /// Dollars per unit
    pub unit_price: RangeTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductRanges {
    pub fallback: ProductCategoryRanges,
    pub categories: BTreeMap<ProductCategory, ProductCategoryRanges>,
}

impl ProductRanges {
    #[must_use]
    pub fn for_category(&self, category: ProductCategory) -> &ProductCategoryRanges {
        self.categories.get(&category).unwrap_or(&self.fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairCategoryRanges {
    pub daily_repairs: RangeTable,
    /// Dollars per repair
    pub repair_price: RangeTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairRanges {
    pub fallback: RepairCategoryRanges,
    pub categories: BTreeMap<RepairCategory, RepairCategoryRanges>,
}

impl RepairRanges {
    #[must_use]
    pub fn for_category(&self, category: RepairCategory) -> &RepairCategoryRanges {
        self.categories.get(&category).unwrap_or(&self.fallback)
    }
}
