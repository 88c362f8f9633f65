//! Built-in range tables.
//!
//! Volumes grow with each location's age and churn falls as a store matures.
//! Years a table does not list draw from its fallback range.

use std::collections::BTreeMap;

use super::ranges::{
    CustomerRanges, FinancialRanges, ProductCategoryRanges, ProductRanges, RangeTable,
    RepairCategoryRanges, RepairRanges, ValueRange,
};
use crate::model::StoreLocation::{Calgary, Edmonton, Vancouver};
use crate::model::{ProductCategory, RepairCategory, StoreLocation, Year};

type Row = (Year, f64, f64);

// ============================================================================
// Customer volume and churn
// ============================================================================

const EDMONTON_CUSTOMERS: &[Row] = &[
    (2013, 20.0, 45.0),
    (2014, 28.0, 55.0),
    (2015, 35.0, 65.0),
    (2016, 40.0, 75.0),
    (2017, 45.0, 85.0),
    (2018, 50.0, 90.0),
    (2019, 55.0, 95.0),
    (2020, 35.0, 70.0),
    (2021, 45.0, 85.0),
    (2022, 60.0, 105.0),
    (2023, 65.0, 115.0),
    (2024, 70.0, 120.0),
    (2025, 75.0, 130.0),
    (2026, 78.0, 135.0),
];

const CALGARY_CUSTOMERS: &[Row] = &[
    (2017, 18.0, 40.0),
    (2018, 25.0, 50.0),
    (2019, 32.0, 60.0),
    (2020, 25.0, 50.0),
    (2021, 35.0, 65.0),
    (2022, 42.0, 80.0),
    (2023, 48.0, 90.0),
    (2024, 52.0, 95.0),
    (2025, 55.0, 100.0),
    (2026, 58.0, 105.0),
];

const VANCOUVER_CUSTOMERS: &[Row] = &[
    (2019, 22.0, 48.0),
    (2020, 20.0, 42.0),
    (2021, 30.0, 60.0),
    (2022, 40.0, 78.0),
    (2023, 48.0, 92.0),
    (2024, 55.0, 105.0),
    (2025, 60.0, 112.0),
    (2026, 64.0, 118.0),
];

const EDMONTON_CHURN: &[Row] = &[
    (2013, 0.25, 0.40),
    (2014, 0.22, 0.36),
    (2015, 0.20, 0.33),
    (2016, 0.18, 0.30),
    (2017, 0.16, 0.28),
    (2018, 0.14, 0.26),
    (2019, 0.12, 0.24),
    (2020, 0.15, 0.30),
    (2021, 0.12, 0.25),
    (2022, 0.10, 0.22),
    (2023, 0.09, 0.20),
    (2024, 0.09, 0.19),
    (2025, 0.09, 0.18),
    (2026, 0.09, 0.18),
];

const CALGARY_CHURN: &[Row] = &[
    (2017, 0.24, 0.38),
    (2018, 0.20, 0.34),
    (2019, 0.17, 0.30),
    (2020, 0.18, 0.32),
    (2021, 0.15, 0.27),
    (2022, 0.12, 0.24),
    (2023, 0.10, 0.21),
    (2024, 0.09, 0.20),
    (2025, 0.09, 0.19),
    (2026, 0.09, 0.19),
];

const VANCOUVER_CHURN: &[Row] = &[
    (2019, 0.26, 0.40),
    (2020, 0.24, 0.38),
    (2021, 0.20, 0.33),
    (2022, 0.16, 0.28),
    (2023, 0.13, 0.24),
    (2024, 0.11, 0.22),
    (2025, 0.10, 0.20),
    (2026, 0.09, 0.20),
];

// ============================================================================
// Transaction volume
// ============================================================================

const EDMONTON_TRANSACTIONS: &[Row] = &[
    (2013, 15.0, 35.0),
    (2014, 20.0, 42.0),
    (2015, 25.0, 50.0),
    (2016, 30.0, 58.0),
    (2017, 34.0, 65.0),
    (2018, 38.0, 70.0),
    (2019, 42.0, 75.0),
    (2020, 28.0, 55.0),
    (2021, 35.0, 66.0),
    (2022, 45.0, 82.0),
    (2023, 50.0, 90.0),
    (2024, 54.0, 95.0),
    (2025, 58.0, 102.0),
    (2026, 60.0, 106.0),
];

const CALGARY_TRANSACTIONS: &[Row] = &[
    (2017, 12.0, 30.0),
    (2018, 18.0, 38.0),
    (2019, 24.0, 46.0),
    (2020, 19.0, 38.0),
    (2021, 26.0, 50.0),
    (2022, 32.0, 62.0),
    (2023, 36.0, 70.0),
    (2024, 40.0, 74.0),
    (2025, 42.0, 78.0),
    (2026, 44.0, 82.0),
];

const VANCOUVER_TRANSACTIONS: &[Row] = &[
    (2019, 16.0, 36.0),
    (2020, 15.0, 32.0),
    (2021, 22.0, 46.0),
    (2022, 30.0, 60.0),
    (2023, 36.0, 72.0),
    (2024, 42.0, 82.0),
    (2025, 46.0, 88.0),
    (2026, 49.0, 92.0),
];

fn table(fallback: (f64, f64), rows: &[(StoreLocation, &[Row])]) -> RangeTable {
    let mut table = RangeTable::new(ValueRange::unchecked(fallback.0, fallback.1));
    for &(location, years) in rows {
        table = table.with_years(
            location,
            years
                .iter()
                .map(|&(year, min, max)| (year, ValueRange::unchecked(min, max))),
        );
    }
    table
}

fn flat(min: f64, max: f64) -> RangeTable {
    RangeTable::new(ValueRange::unchecked(min, max))
}

impl Default for CustomerRanges {
    fn default() -> Self {
        Self {
            daily_customers: table(
                (30.0, 80.0),
                &[
                    (Edmonton, EDMONTON_CUSTOMERS),
                    (Calgary, CALGARY_CUSTOMERS),
                    (Vancouver, VANCOUVER_CUSTOMERS),
                ],
            ),
            new_customer_share: flat(0.2, 0.45),
            repair_share: flat(0.25, 0.45),
            online_share: flat(0.3, 0.55),
            churn_rate: table(
                (0.09, 0.2),
                &[
                    (Edmonton, EDMONTON_CHURN),
                    (Calgary, CALGARY_CHURN),
                    (Vancouver, VANCOUVER_CHURN),
                ],
            ),
        }
    }
}

impl Default for FinancialRanges {
    fn default() -> Self {
        Self {
            daily_transactions: table(
                (20.0, 60.0),
                &[
                    (Edmonton, EDMONTON_TRANSACTIONS),
                    (Calgary, CALGARY_TRANSACTIONS),
                    (Vancouver, VANCOUVER_TRANSACTIONS),
                ],
            ),
            repair_share: flat(0.25, 0.45),
            online_share: flat(0.3, 0.55),
            repair_ticket: flat(80.0, 240.0),
            online_ticket: flat(45.0, 160.0),
            in_store_ticket: flat(60.0, 210.0),
            expense_ratio: flat(0.6, 0.85),
            conversion_rate: flat(0.015, 0.045),
        }
    }
}

// ============================================================================
// Categories
// ============================================================================

/// (category, daily units, online share, unit price)
const PRODUCT_CATEGORIES: [(ProductCategory, (f64, f64), (f64, f64), (f64, f64)); 5] = [
    (ProductCategory::Accessory, (8.0, 30.0), (0.35, 0.6), (9.0, 80.0)),
    (ProductCategory::Desktop, (0.0, 4.0), (0.2, 0.45), (600.0, 2_200.0)),
    (ProductCategory::Laptop, (1.0, 8.0), (0.3, 0.55), (450.0, 2_600.0)),
    (ProductCategory::Smartphone, (2.0, 10.0), (0.35, 0.6), (250.0, 1_500.0)),
    (ProductCategory::Tablet, (1.0, 6.0), (0.3, 0.55), (180.0, 1_200.0)),
];

/// (category, daily repairs, repair price)
const REPAIR_CATEGORIES: [(RepairCategory, (f64, f64), (f64, f64)); 6] = [
    (RepairCategory::Battery, (2.0, 9.0), (60.0, 150.0)),
    (RepairCategory::Screen, (3.0, 12.0), (90.0, 320.0)),
    (RepairCategory::Keyboard, (0.0, 4.0), (50.0, 140.0)),
    (RepairCategory::Motherboard, (0.0, 3.0), (180.0, 520.0)),
    (RepairCategory::DataRecovery, (0.0, 3.0), (120.0, 600.0)),
    (RepairCategory::VirusRemoval, (1.0, 6.0), (70.0, 160.0)),
];

impl Default for ProductRanges {
    fn default() -> Self {
        let categories: BTreeMap<_, _> = PRODUCT_CATEGORIES
            .iter()
            .map(|&(category, units, online, price)| {
                let ranges = ProductCategoryRanges {
                    daily_units: flat(units.0, units.1),
                    online_share: flat(online.0, online.1),
                    unit_price: flat(price.0, price.1),
                };
                (category, ranges)
            })
            .collect();
        Self {
            fallback: ProductCategoryRanges {
                daily_units: flat(1.0, 10.0),
                online_share: flat(0.3, 0.55),
                unit_price: flat(20.0, 800.0),
            },
            categories,
        }
    }
}

impl Default for RepairRanges {
    fn default() -> Self {
        let categories: BTreeMap<_, _> = REPAIR_CATEGORIES
            .iter()
            .map(|&(category, repairs, price)| {
                let ranges = RepairCategoryRanges {
                    daily_repairs: flat(repairs.0, repairs.1),
                    repair_price: flat(price.0, price.1),
                };
                (category, ranges)
            })
            .collect();
        Self {
            fallback: RepairCategoryRanges {
                daily_repairs: flat(1.0, 6.0),
                repair_price: flat(60.0, 300.0),
            },
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_churn_stays_within_bounds() {
        let churn = CustomerRanges::default().churn_rate;
        for range in churn.ranges() {
            assert!(range.min() >= 0.09 && range.max() <= 0.4, "{range:?}");
        }
    }

    #[test]
    fn test_every_default_range_is_ordered() {
        let customer = CustomerRanges::default();
        let financial = FinancialRanges::default();
        let tables = [
            &customer.daily_customers,
            &customer.new_customer_share,
            &customer.churn_rate,
            &financial.daily_transactions,
            &financial.expense_ratio,
        ];
        for table in tables {
            for range in table.ranges() {
                assert!(ValueRange::new(range.min(), range.max()).is_ok());
            }
        }
    }

    #[test]
    fn test_every_leaf_category_has_ranges() {
        let products = ProductRanges::default();
        for category in ProductCategory::LEAVES {
            assert!(products.categories.contains_key(&category));
        }
        let repairs = RepairRanges::default();
        for category in RepairCategory::LEAVES {
            assert!(repairs.categories.contains_key(&category));
        }
    }
}
