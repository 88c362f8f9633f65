//! Metric generators
//!
//! Each domain implements [`MetricGenerator`], which draws one day's values
//! from the range tables. [`generate_tree`] walks a calendar index, draws
//! every day, and rolls days into months, months into years and years into
//! the root, giving each domain a hook to adjust a level's totals after the
//! rollup.

use rand::Rng;
use tracing::debug;

use crate::calendar::CalendarIndex;
use crate::config::RangeTable;
use crate::error::GenerationError;
use crate::model::{
    DayNode, Metrics, MetricTree, MetricsDomain, MonthNode, StoreLocation, Year, YearNode,
};

mod customer;
mod financial;
mod product;
mod repair;

pub use customer::CustomerGenerator;
pub use financial::FinancialGenerator;
pub use product::ProductGenerator;
pub use repair::RepairGenerator;

/// Location and year a draw is made for; selects the range table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawContext {
    pub location: StoreLocation,
    pub year: Year,
}

impl DrawContext {
    pub(crate) fn sample<R: Rng + ?Sized>(self, table: &RangeTable, rng: &mut R) -> f64 {
        table.sample(self.location, self.year, rng)
    }

    /// Draw a non-negative whole count
    pub(crate) fn count<R: Rng + ?Sized>(self, table: &RangeTable, rng: &mut R) -> u64 {
        self.sample(table, rng).round().max(0.0) as u64
    }
}

pub trait MetricGenerator: Sync {
    type Metrics: Metrics;

    fn domain(&self) -> MetricsDomain;

    /// Draw one day's values
    fn day<R: Rng + ?Sized>(&self, ctx: DrawContext, rng: &mut R) -> Self::Metrics;

    /// Adjust a month's rolled-up totals
    fn finish_month<R: Rng + ?Sized>(
        &self,
        _ctx: DrawContext,
        totals: Self::Metrics,
        _rng: &mut R,
    ) -> Self::Metrics {
        totals
    }

    /// Adjust a year's rolled-up totals
    fn finish_year<R: Rng + ?Sized>(
        &self,
        _ctx: DrawContext,
        totals: Self::Metrics,
        _rng: &mut R,
    ) -> Self::Metrics {
        totals
    }

    /// Adjust the all-time root totals
    fn finish_root(&self, totals: Self::Metrics) -> Self::Metrics {
        totals
    }
}

/// Generate a full metric tree for `location` over `index`.
///
/// Fails without returning a partial tree if the index, any of its years, or
/// any of its months is empty.
pub fn generate_tree<G, R>(
    generator: &G,
    index: &CalendarIndex,
    location: StoreLocation,
    rng: &mut R,
) -> Result<MetricTree<G::Metrics>, GenerationError>
where
    G: MetricGenerator,
    R: Rng + ?Sized,
{
    if index.is_empty() {
        return Err(GenerationError::EmptyCalendar { location });
    }

    let mut years = Vec::with_capacity(index.year_count());
    for (year, months) in index.years() {
        if months.is_empty() {
            return Err(GenerationError::EmptyYear { location, year });
        }
        let ctx = DrawContext { location, year };

        let mut month_nodes = Vec::with_capacity(months.len());
        for (&month, days) in months {
            if days.is_empty() {
                return Err(GenerationError::EmptyMonth {
                    location,
                    year,
                    month,
                });
            }
            let day_nodes = days
                .iter()
                .map(|&day| DayNode::new(day, generator.day(ctx, rng)))
                .collect();
            let mut node = MonthNode::from_days(month, day_nodes);
            node.totals = generator.finish_month(ctx, std::mem::take(&mut node.totals), rng);
            month_nodes.push(node);
        }

        let mut node = YearNode::from_months(year, month_nodes);
        node.totals = generator.finish_year(ctx, std::mem::take(&mut node.totals), rng);
        years.push(node);
    }

    let mut tree = MetricTree::from_years(years);
    tree.totals = generator.finish_root(std::mem::take(&mut tree.totals));

    debug!(
        domain = %generator.domain(),
        %location,
        years = tree.years.len(),
        days = tree.day_count(),
        "generated metric tree"
    );
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::{OperatingHistory, RangeSet};
    use crate::model::{Day, Month};

    fn repair_generator(ranges: &RangeSet) -> RepairGenerator<'_> {
        RepairGenerator::new(
            ranges
                .repair
                .for_category(crate::model::RepairCategory::Screen),
        )
    }

    #[test]
    fn test_empty_index_is_rejected() {
        let ranges = RangeSet::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let err = generate_tree(
            &repair_generator(&ranges),
            &CalendarIndex::default(),
            StoreLocation::Calgary,
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(
            err,
            GenerationError::EmptyCalendar {
                location: StoreLocation::Calgary
            }
        );
    }

    #[test]
    fn test_empty_year_and_month_are_rejected() {
        let ranges = RangeSet::default();
        let generator = repair_generator(&ranges);
        let mut rng = SmallRng::seed_from_u64(1);

        let empty_year = CalendarIndex::from_entries([(2020, BTreeMap::new())]);
        assert!(matches!(
            generate_tree(&generator, &empty_year, StoreLocation::Edmonton, &mut rng),
            Err(GenerationError::EmptyYear { year: 2020, .. })
        ));

        let empty_month = CalendarIndex::from_entries([(
            2020,
            BTreeMap::from([
                (Month::January, vec![Day::new(1).unwrap()]),
                (Month::February, Vec::new()),
            ]),
        )]);
        assert!(matches!(
            generate_tree(&generator, &empty_month, StoreLocation::Edmonton, &mut rng),
            Err(GenerationError::EmptyMonth {
                month: Month::February,
                ..
            })
        ));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let ranges = RangeSet::default();
        let generator = repair_generator(&ranges);
        let index =
            CalendarIndex::for_location(StoreLocation::Vancouver, &OperatingHistory::default(), 2021)
                .unwrap();

        let a = generate_tree(&generator, &index, StoreLocation::Vancouver, &mut SmallRng::seed_from_u64(9));
        let b = generate_tree(&generator, &index, StoreLocation::Vancouver, &mut SmallRng::seed_from_u64(9));
        assert_eq!(a, b);
        assert_eq!(a.unwrap().day_count(), 3 * 365);
    }
}
