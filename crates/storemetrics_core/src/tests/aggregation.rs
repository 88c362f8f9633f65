//! Tests for the category and location composites
//!
//! These tests verify that:
//! - "All Products" / "All Repairs" are exact sums and carry no randomness
//! - The cross-location fold averages rates pairwise, in input order
//! - Locations that opened later report the template years they lack
//! - Generated datasets always include the "All Locations" composite

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::aggregate::{NodePath, SkippedNode, aggregate_categories, aggregate_locations};
use crate::calendar::CalendarIndex;
use crate::config::RangeSet;
use crate::dataset::{DomainDataset, GenerationRequest, generate_dataset};
use crate::generate::{CustomerGenerator, ProductGenerator, generate_tree};
use crate::model::{
    Breakdown, CategoryTree, CustomerCounts, CustomerMetrics, Day, DayNode, MetricTree,
    MetricsDomain, Month, MonthNode, ProductCategory, ProductMetrics, StoreLocation, Year,
    YearNode,
};

fn product_leaves(seed: u64) -> Vec<CategoryTree<ProductCategory, ProductMetrics>> {
    let ranges = RangeSet::default();
    let index = CalendarIndex::for_location(StoreLocation::Vancouver, &ranges.history, 2020).unwrap();
    let mut rng = SmallRng::seed_from_u64(seed);
    ProductCategory::LEAVES
        .iter()
        .map(|&category| {
            let generator = ProductGenerator::new(ranges.product.for_category(category));
            CategoryTree {
                category,
                tree: generate_tree(&generator, &index, StoreLocation::Vancouver, &mut rng).unwrap(),
            }
        })
        .collect()
}

#[test]
fn test_category_aggregation_is_idempotent() {
    let leaves = product_leaves(21);
    let first = aggregate_categories(&leaves).unwrap();
    let second = aggregate_categories(&leaves).unwrap();
    assert_eq!(first, second);
    assert!(first.is_complete());
}

#[test]
fn test_category_composite_is_the_sum_of_leaves() {
    let leaves = product_leaves(22);
    let all = aggregate_categories(&leaves).unwrap().value;

    let leaf_units: u64 = leaves.iter().map(|l| l.tree.totals.units_sold.total).sum();
    assert_eq!(all.totals.units_sold.total, leaf_units);

    let june_first = |tree: &MetricTree<ProductMetrics>| {
        tree.day(2020, Month::June, Day::new(1).unwrap())
            .map(|d| d.values.revenue.online)
            .unwrap()
    };
    let expected = leaves.iter().map(|l| june_first(&l.tree)).sum();
    assert_eq!(june_first(&all), expected);
}

#[test]
fn test_composite_input_is_ignored() {
    let mut leaves = product_leaves(23);
    let all = aggregate_categories(&leaves).unwrap().value;
    leaves.push(CategoryTree {
        category: ProductCategory::AllProducts,
        tree: all.clone(),
    });
    assert_eq!(aggregate_categories(&leaves).unwrap().value, all);
}

fn single_day_tree(churn: f64) -> MetricTree<CustomerMetrics> {
    let values = CustomerMetrics {
        customers: CustomerCounts::from_parts(
            Breakdown::split(1, 0.0, 1.0),
            Breakdown::split(1, 0.0, 1.0),
        ),
        churn_rate: churn,
        retention_rate: 1.0 - churn,
    };
    let day = DayNode::new(Day::new(1).unwrap(), values);
    MetricTree::from_years(vec![YearNode::from_months(
        2024,
        vec![MonthNode::from_days(Month::January, vec![day])],
    )])
}

#[test]
fn test_location_fold_order() {
    let (a, b, c) = (0.1, 0.2, 0.4);
    let ta = single_day_tree(a);
    let tb = single_day_tree(b);
    let tc = single_day_tree(c);

    let all = aggregate_locations(&[
        (StoreLocation::Edmonton, &ta),
        (StoreLocation::Calgary, &tb),
        (StoreLocation::Vancouver, &tc),
    ])
    .unwrap()
    .value;

    let expected = ((a + b) / 2.0 + c) / 2.0;
    let day = all.day(2024, Month::January, Day::new(1).unwrap()).unwrap();
    assert!((day.values.churn_rate - expected).abs() < 1e-12);
    assert!((all.totals.churn_rate - expected).abs() < 1e-12);
    // not the true mean
    assert!((expected - (a + b + c) / 3.0).abs() > 1e-3);
    assert_eq!(day.values.customers.total.total, 6);

    // nesting the fold gives the same result
    let ab = aggregate_locations(&[(StoreLocation::Edmonton, &ta), (StoreLocation::Calgary, &tb)])
        .unwrap()
        .value;
    let nested = aggregate_locations(&[(StoreLocation::Edmonton, &ab), (StoreLocation::Vancouver, &tc)])
        .unwrap()
        .value;
    assert_eq!(nested, all);
}

fn customer_tree(location: StoreLocation, ranges: &RangeSet, seed: u64) -> MetricTree<CustomerMetrics> {
    let index = CalendarIndex::for_location(location, &ranges.history, 2020).unwrap();
    let generator = CustomerGenerator::new(&ranges.customer);
    let mut rng = SmallRng::seed_from_u64(seed);
    generate_tree(&generator, &index, location, &mut rng).unwrap()
}

#[test]
fn test_late_opening_years_are_reported() {
    let ranges = RangeSet::default();
    let edmonton = customer_tree(StoreLocation::Edmonton, &ranges, 31);
    let vancouver = customer_tree(StoreLocation::Vancouver, &ranges, 32);

    // Vancouver listed first: Edmonton still wins the template on coverage
    let aggregation = aggregate_locations(&[
        (StoreLocation::Vancouver, &vancouver),
        (StoreLocation::Edmonton, &edmonton),
    ])
    .unwrap();
    let all = &aggregation.value;

    assert_eq!(all.first_year(), Some(2013));
    assert_eq!(all.years.len(), edmonton.years.len());
    for year in 2013..=2018 {
        assert_eq!(all.year(year), edmonton.year(year), "template-only {year} is unchanged");
    }
    let expected: Vec<SkippedNode> = (2013..=2018)
        .map(|year: Year| SkippedNode {
            source: "Vancouver".into(),
            path: NodePath::Year(year),
        })
        .collect();
    assert_eq!(aggregation.skipped, expected);

    let shared = all.year(2019).unwrap().totals.customers.total.total;
    assert_eq!(
        shared,
        edmonton.year(2019).unwrap().totals.customers.total.total
            + vancouver.year(2019).unwrap().totals.customers.total.total
    );
}

#[test]
fn test_datasets_include_all_locations() {
    let ranges = RangeSet::default();
    let request = GenerationRequest::new(2021).seed(3);

    let generated = generate_dataset(MetricsDomain::Repair, &request, &ranges).unwrap();
    let DomainDataset::Repair(collections) = &generated.dataset else {
        panic!("expected repair dataset");
    };
    assert_eq!(collections.len(), 4);
    let all = collections.get(StoreLocation::AllLocations).unwrap();
    assert_eq!(all.len(), collections.get(StoreLocation::Edmonton).unwrap().len());

    // Edmonton covers every year, so it is the template; the later stores
    // report each year before they opened, once per category
    let all_tree = all.all().unwrap();
    assert_eq!(all_tree.first_year(), Some(2013));
    assert_eq!(generated.skipped.len(), (4 + 6) * all.len());
    assert!(generated.skipped.contains(&SkippedNode {
        source: "Vancouver / Screen".into(),
        path: NodePath::Year(2018),
    }));
    assert!(generated.skipped.contains(&SkippedNode {
        source: "Calgary / All Repairs".into(),
        path: NodePath::Year(2013),
    }));
    assert!(!generated.skipped.iter().any(|node| node.source.starts_with("Edmonton")));
    assert!(!generated.skipped.contains(&SkippedNode {
        source: "Calgary / Screen".into(),
        path: NodePath::Year(2017),
    }));

    let unit_sum: u64 = StoreLocation::PHYSICAL
        .iter()
        .map(|&l| {
            collections
                .get(l)
                .and_then(|c| c.all())
                .and_then(|t| t.year(2020))
                .map_or(0, |y| y.totals.units_repaired)
        })
        .sum();
    assert_eq!(all_tree.year(2020).unwrap().totals.units_repaired, unit_sum);
}
