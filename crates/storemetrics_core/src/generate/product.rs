//! Product generator for one category: units sold and revenue per channel.

use rand::Rng;

use super::{DrawContext, MetricGenerator};
use crate::config::ProductCategoryRanges;
use crate::model::{Cents, MetricsDomain, ProductMetrics, SalesSplit};

pub struct ProductGenerator<'a> {
    ranges: &'a ProductCategoryRanges,
}

impl<'a> ProductGenerator<'a> {
    #[must_use]
    pub fn new(ranges: &'a ProductCategoryRanges) -> Self {
        Self { ranges }
    }
}

impl MetricGenerator for ProductGenerator<'_> {
    type Metrics = ProductMetrics;

    fn domain(&self) -> MetricsDomain {
        MetricsDomain::Product
    }

    fn day<R: Rng + ?Sized>(&self, ctx: DrawContext, rng: &mut R) -> ProductMetrics {
        let units = ctx.count(&self.ranges.daily_units, rng);
        let units_sold = SalesSplit::split(units, ctx.sample(&self.ranges.online_share, rng));
        let price = Cents::from_dollars(ctx.sample(&self.ranges.unit_price, rng));
        ProductMetrics {
            revenue: SalesSplit::from_parts(
                price.times(units_sold.online),
                price.times(units_sold.in_store),
            ),
            units_sold,
        }
    }
}
