//! Identifiers for store locations, metric domains and leaf categories
//!
//! Each kind of identifier is its own enum so that dispatch on it is checked
//! exhaustively by the compiler rather than by string comparison.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseKindError;

/// Lowercases `input` and drops separators so "All Locations", "all-locations"
/// and "all_locations" compare equal.
fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A store location, including the synthesized "All Locations" composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StoreLocation {
    Edmonton,
    Calgary,
    Vancouver,
    AllLocations,
}

impl StoreLocation {
    /// Locations that are generated rather than aggregated
    pub const PHYSICAL: [StoreLocation; 3] = [
        StoreLocation::Edmonton,
        StoreLocation::Calgary,
        StoreLocation::Vancouver,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StoreLocation::Edmonton => "Edmonton",
            StoreLocation::Calgary => "Calgary",
            StoreLocation::Vancouver => "Vancouver",
            StoreLocation::AllLocations => "All Locations",
        }
    }

    #[must_use]
    pub fn is_composite(self) -> bool {
        matches!(self, StoreLocation::AllLocations)
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StoreLocation {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "edmonton" => Ok(StoreLocation::Edmonton),
            "calgary" => Ok(StoreLocation::Calgary),
            "vancouver" => Ok(StoreLocation::Vancouver),
            "alllocations" | "all" => Ok(StoreLocation::AllLocations),
            _ => Err(ParseKindError::new("store location", s)),
        }
    }
}

/// The four metric domains the engine generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricsDomain {
    Customer,
    Financial,
    Product,
    Repair,
}

impl MetricsDomain {
    pub const ALL: [MetricsDomain; 4] = [
        MetricsDomain::Customer,
        MetricsDomain::Financial,
        MetricsDomain::Product,
        MetricsDomain::Repair,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MetricsDomain::Customer => "customer",
            MetricsDomain::Financial => "financial",
            MetricsDomain::Product => "product",
            MetricsDomain::Repair => "repair",
        }
    }

    /// Whether trees in this domain come per leaf category
    #[must_use]
    pub fn has_categories(self) -> bool {
        matches!(self, MetricsDomain::Product | MetricsDomain::Repair)
    }
}

impl fmt::Display for MetricsDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MetricsDomain {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "customer" | "customers" => Ok(MetricsDomain::Customer),
            "financial" | "financials" => Ok(MetricsDomain::Financial),
            "product" | "products" => Ok(MetricsDomain::Product),
            "repair" | "repairs" => Ok(MetricsDomain::Repair),
            _ => Err(ParseKindError::new("metrics domain", s)),
        }
    }
}

/// Product categories sold in store and online.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    AllProducts,
    Accessory,
    Desktop,
    Laptop,
    Smartphone,
    Tablet,
}

impl ProductCategory {
    pub const LEAVES: [ProductCategory; 5] = [
        ProductCategory::Accessory,
        ProductCategory::Desktop,
        ProductCategory::Laptop,
        ProductCategory::Smartphone,
        ProductCategory::Tablet,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProductCategory::AllProducts => "All Products",
            ProductCategory::Accessory => "Accessory",
            ProductCategory::Desktop => "Desktop",
            ProductCategory::Laptop => "Laptop",
            ProductCategory::Smartphone => "Smartphone",
            ProductCategory::Tablet => "Tablet",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProductCategory {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "allproducts" | "all" => Ok(ProductCategory::AllProducts),
            "accessory" | "accessories" => Ok(ProductCategory::Accessory),
            "desktop" | "desktops" => Ok(ProductCategory::Desktop),
            "laptop" | "laptops" => Ok(ProductCategory::Laptop),
            "smartphone" | "smartphones" => Ok(ProductCategory::Smartphone),
            "tablet" | "tablets" => Ok(ProductCategory::Tablet),
            _ => Err(ParseKindError::new("product category", s)),
        }
    }
}

/// Repair service categories, performed in store only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RepairCategory {
    AllRepairs,
    Battery,
    Screen,
    Keyboard,
    Motherboard,
    DataRecovery,
    VirusRemoval,
}

impl RepairCategory {
    pub const LEAVES: [RepairCategory; 6] = [
        RepairCategory::Battery,
        RepairCategory::Screen,
        RepairCategory::Keyboard,
        RepairCategory::Motherboard,
        RepairCategory::DataRecovery,
        RepairCategory::VirusRemoval,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RepairCategory::AllRepairs => "All Repairs",
            RepairCategory::Battery => "Battery",
            RepairCategory::Screen => "Screen",
            RepairCategory::Keyboard => "Keyboard",
            RepairCategory::Motherboard => "Motherboard",
            RepairCategory::DataRecovery => "Data Recovery",
            RepairCategory::VirusRemoval => "Virus Removal",
        }
    }
}

impl fmt::Display for RepairCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RepairCategory {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "allrepairs" | "all" => Ok(RepairCategory::AllRepairs),
            "battery" => Ok(RepairCategory::Battery),
            "screen" => Ok(RepairCategory::Screen),
            "keyboard" => Ok(RepairCategory::Keyboard),
            "motherboard" => Ok(RepairCategory::Motherboard),
            "datarecovery" => Ok(RepairCategory::DataRecovery),
            "virusremoval" => Ok(RepairCategory::VirusRemoval),
            _ => Err(ParseKindError::new("repair category", s)),
        }
    }
}
