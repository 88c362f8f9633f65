//! Tests for tree rollup and split invariants
//!
//! These tests verify that, for generated trees:
//! - Every parent's summable totals equal the sum of its children
//! - Averaged rate fields equal the mean of the children
//! - Every repair/sales and online/in-store split adds back to its total

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::calendar::CalendarIndex;
use crate::config::{RangeSet, RangeSetBuilder};
use crate::generate::{
    CustomerGenerator, FinancialGenerator, ProductGenerator, RepairGenerator, generate_tree,
};
use crate::model::{Cents, MetricTree, ProductCategory, RepairCategory, StoreLocation};

fn ranges() -> RangeSet {
    RangeSetBuilder::new()
        .opening_year(StoreLocation::Calgary, 2022)
        .build()
}

fn index(ranges: &RangeSet) -> CalendarIndex {
    CalendarIndex::for_location(StoreLocation::Calgary, &ranges.history, 2023).unwrap()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn test_customer_rollup_sums_counts_and_averages_rates() {
    let ranges = ranges();
    let generator = CustomerGenerator::new(&ranges.customer);
    let mut rng = SmallRng::seed_from_u64(11);
    let tree = generate_tree(&generator, &index(&ranges), StoreLocation::Calgary, &mut rng).unwrap();

    assert_eq!(tree.years.len(), 2);
    for year in &tree.years {
        let month_total: u64 = year.months.iter().map(|m| m.totals.customers.total.total).sum();
        assert_eq!(year.totals.customers.total.total, month_total);

        let mean_churn =
            year.months.iter().map(|m| m.totals.churn_rate).sum::<f64>() / year.months.len() as f64;
        assert_close(year.totals.churn_rate, mean_churn);

        for month in &year.months {
            let day_new: u64 = month.days.iter().map(|d| d.values.customers.new.total).sum();
            assert_eq!(month.totals.customers.new.total, day_new);
            assert_eq!(month.days.len(), usize::from(month.month.day_count()));
        }
    }

    let year_total: u64 = tree.years.iter().map(|y| y.totals.customers.total.total).sum();
    assert_eq!(tree.totals.customers.total.total, year_total);
}

#[test]
fn test_customer_splits_are_complementary_at_every_level() {
    let ranges = ranges();
    let generator = CustomerGenerator::new(&ranges.customer);
    let mut rng = SmallRng::seed_from_u64(12);
    let tree = generate_tree(&generator, &index(&ranges), StoreLocation::Calgary, &mut rng).unwrap();

    assert!(tree.totals.customers.is_balanced());
    for year in &tree.years {
        assert!(year.totals.customers.is_balanced());
        for month in &year.months {
            assert!(month.totals.customers.is_balanced());
        }
    }
    for (_, _, day) in tree.days() {
        assert!(day.values.customers.is_balanced(), "{day:?}");
        assert_close(day.values.churn_rate + day.values.retention_rate, 1.0);
    }
}

#[test]
fn test_financial_rollup_keeps_profit_identity() {
    let ranges = ranges();
    let generator = FinancialGenerator::new(&ranges.financial);
    let mut rng = SmallRng::seed_from_u64(13);
    let tree = generate_tree(&generator, &index(&ranges), StoreLocation::Calgary, &mut rng).unwrap();

    let check = |m: &crate::model::FinancialMetrics| {
        assert!(m.revenue.is_balanced());
        assert!(m.expenses.is_balanced());
        assert!(m.transactions.is_balanced());
        assert_eq!(m.profit.total, m.revenue.total - m.expenses.total);
        assert_close(m.average_order_value, m.derived_average_order_value());
    };

    check(&tree.totals);
    for year in &tree.years {
        check(&year.totals);
        let revenue: Cents = year.months.iter().map(|m| m.totals.revenue.total).sum();
        assert_eq!(year.totals.revenue.total, revenue);
        for month in &year.months {
            check(&month.totals);
            let transactions: u64 = month.days.iter().map(|d| d.values.transactions.total).sum();
            assert_eq!(month.totals.transactions.total, transactions);
        }
    }
}

fn assert_leaf_rollup<M: crate::model::Metrics + PartialEq>(tree: &MetricTree<M>) {
    for year in &tree.years {
        let rebuilt = crate::model::roll_up(year.months.iter().map(|m| &m.totals));
        assert_eq!(year.totals, rebuilt);
        for month in &year.months {
            let rebuilt = crate::model::roll_up(month.days.iter().map(|d| &d.values));
            assert_eq!(month.totals, rebuilt);
        }
    }
    let rebuilt = crate::model::roll_up(tree.years.iter().map(|y| &y.totals));
    assert_eq!(tree.totals, rebuilt);
}

#[test]
fn test_product_and_repair_trees_are_pure_rollups() {
    let ranges = ranges();
    let index = index(&ranges);
    let mut rng = SmallRng::seed_from_u64(14);

    let product = ProductGenerator::new(ranges.product.for_category(ProductCategory::Laptop));
    let tree = generate_tree(&product, &index, StoreLocation::Calgary, &mut rng).unwrap();
    assert_leaf_rollup(&tree);
    for (_, _, day) in tree.days() {
        assert!(day.values.revenue.is_balanced());
        assert!(day.values.units_sold.is_balanced());
    }

    let repair = RepairGenerator::new(ranges.repair.for_category(RepairCategory::Screen));
    let tree = generate_tree(&repair, &index, StoreLocation::Calgary, &mut rng).unwrap();
    assert_leaf_rollup(&tree);
}
