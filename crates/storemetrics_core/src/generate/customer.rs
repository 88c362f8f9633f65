//! Customer generator: daily customer counts and churn.

use rand::Rng;

use super::{DrawContext, MetricGenerator};
use crate::config::CustomerRanges;
use crate::model::{Breakdown, CustomerCounts, CustomerMetrics, MetricsDomain, Quantity};

pub struct CustomerGenerator<'a> {
    ranges: &'a CustomerRanges,
}

impl<'a> CustomerGenerator<'a> {
    #[must_use]
    pub fn new(ranges: &'a CustomerRanges) -> Self {
        Self { ranges }
    }

    fn breakdown<R: Rng + ?Sized>(&self, ctx: DrawContext, total: u64, rng: &mut R) -> Breakdown<u64> {
        let repair = ctx.sample(&self.ranges.repair_share, rng);
        let online = ctx.sample(&self.ranges.online_share, rng);
        Breakdown::split(total, repair, online)
    }
}

impl MetricGenerator for CustomerGenerator<'_> {
    type Metrics = CustomerMetrics;

    fn domain(&self) -> MetricsDomain {
        MetricsDomain::Customer
    }

    fn day<R: Rng + ?Sized>(&self, ctx: DrawContext, rng: &mut R) -> CustomerMetrics {
        let total = ctx.count(&self.ranges.daily_customers, rng);
        let new_total = total.share(ctx.sample(&self.ranges.new_customer_share, rng));
        let new = self.breakdown(ctx, new_total, rng);
        let returning = self.breakdown(ctx, total - new_total, rng);

        let churn_rate = ctx.sample(&self.ranges.churn_rate, rng);
        CustomerMetrics {
            customers: CustomerCounts::from_parts(new, returning),
            churn_rate,
            retention_rate: 1.0 - churn_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::model::StoreLocation;

    #[test]
    fn test_day_is_balanced() {
        let ranges = CustomerRanges::default();
        let generator = CustomerGenerator::new(&ranges);
        let ctx = DrawContext {
            location: StoreLocation::Edmonton,
            year: 2020,
        };
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..200 {
            let day = generator.day(ctx, &mut rng);
            assert!(day.customers.is_balanced(), "{day:?}");
            assert!((day.churn_rate + day.retention_rate - 1.0).abs() < 1e-12);
            assert!(ranges.churn_rate.range_for(ctx.location, ctx.year).contains(day.churn_rate));
        }
    }
}
