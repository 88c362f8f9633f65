//! Long-running generation scenarios with the built-in range tables

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::calendar::CalendarIndex;
use crate::config::RangeSet;
use crate::generate::{CustomerGenerator, generate_tree};
use crate::model::StoreLocation;

/// Edmonton customers, 2013 through 2025
#[test]
fn test_edmonton_customer_scenario() {
    let ranges = RangeSet::default();
    let index = CalendarIndex::for_location(StoreLocation::Edmonton, &ranges.history, 2025).unwrap();
    assert_eq!(index.first_year(), Some(2013));
    assert_eq!(index.year_count(), 13);

    let generator = CustomerGenerator::new(&ranges.customer);
    let runs: u64 = 100;
    let mut years_checked: u64 = 0;
    let mut years_in_range: u64 = 0;

    for run in 0..runs {
        let mut rng = SmallRng::seed_from_u64(run);
        let tree = generate_tree(&generator, &index, StoreLocation::Edmonton, &mut rng).unwrap();

        let yearly_total: u64 = tree.years.iter().map(|y| y.totals.customers.total.total).sum();
        assert_eq!(tree.totals.customers.total.total, yearly_total);

        for year in &tree.years {
            years_checked += 1;
            if (0.09..=0.4).contains(&year.totals.churn_rate) {
                years_in_range += 1;
            }
        }
    }

    assert_eq!(years_checked, 13 * runs);
    let share = years_in_range as f64 / years_checked as f64;
    assert!(share >= 0.95, "only {share:.3} of yearly churn rates in range");
}

#[test]
fn test_unseeded_runs_differ() {
    let ranges = RangeSet::default();
    let index = CalendarIndex::for_location(StoreLocation::Vancouver, &ranges.history, 2020).unwrap();
    let generator = CustomerGenerator::new(&ranges.customer);

    let a = generate_tree(&generator, &index, StoreLocation::Vancouver, &mut SmallRng::from_os_rng()).unwrap();
    let b = generate_tree(&generator, &index, StoreLocation::Vancouver, &mut SmallRng::from_os_rng()).unwrap();
    assert_ne!(a, b);
}
