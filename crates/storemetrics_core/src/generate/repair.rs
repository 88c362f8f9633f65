//! Repair generator for one category.

use rand::Rng;

use super::{DrawContext, MetricGenerator};
use crate::config::RepairCategoryRanges;
use crate::model::{Cents, MetricsDomain, RepairMetrics};

pub struct RepairGenerator<'a> {
    ranges: &'a RepairCategoryRanges,
}

impl<'a> RepairGenerator<'a> {
    #[must_use]
    pub fn new(ranges: &'a RepairCategoryRanges) -> Self {
        Self { ranges }
    }
}

impl MetricGenerator for RepairGenerator<'_> {
    type Metrics = RepairMetrics;

    fn domain(&self) -> MetricsDomain {
        MetricsDomain::Repair
    }

    fn day<R: Rng + ?Sized>(&self, ctx: DrawContext, rng: &mut R) -> RepairMetrics {
        let units_repaired = ctx.count(&self.ranges.daily_repairs, rng);
        let price = Cents::from_dollars(ctx.sample(&self.ranges.repair_price, rng));
        RepairMetrics {
            revenue: price.times(units_repaired),
            units_repaired,
        }
    }
}
