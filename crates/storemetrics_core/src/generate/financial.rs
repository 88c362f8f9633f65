//! Financial generator: transactions, revenue, expenses and profit.
//!
//! Order value and net profit margin at month, year and root level are derived
//! from that level's totals rather than averaged, and each month and year
//! draws its own conversion rate.

use rand::Rng;

use super::{DrawContext, MetricGenerator};
use crate::config::{FinancialRanges, RangeTable};
use crate::model::{Breakdown, Cents, FinancialMetrics, MetricsDomain, SalesSplit};

pub struct FinancialGenerator<'a> {
    ranges: &'a FinancialRanges,
}

impl<'a> FinancialGenerator<'a> {
    #[must_use]
    pub fn new(ranges: &'a FinancialRanges) -> Self {
        Self { ranges }
    }

    fn ticket<R: Rng + ?Sized>(ctx: DrawContext, table: &RangeTable, rng: &mut R) -> Cents {
        Cents::from_dollars(ctx.sample(table, rng))
    }

    fn level_totals<R: Rng + ?Sized>(
        &self,
        ctx: DrawContext,
        totals: FinancialMetrics,
        rng: &mut R,
    ) -> FinancialMetrics {
        FinancialMetrics {
            conversion_rate: ctx.sample(&self.ranges.conversion_rate, rng),
            ..totals.with_derived_ratios()
        }
    }
}

impl MetricGenerator for FinancialGenerator<'_> {
    type Metrics = FinancialMetrics;

    fn domain(&self) -> MetricsDomain {
        MetricsDomain::Financial
    }

    fn day<R: Rng + ?Sized>(&self, ctx: DrawContext, rng: &mut R) -> FinancialMetrics {
        let r = self.ranges;
        let count = ctx.count(&r.daily_transactions, rng);
        let transactions = Breakdown::split(
            count,
            ctx.sample(&r.repair_share, rng),
            ctx.sample(&r.online_share, rng),
        );

        let revenue = Breakdown::from_parts(
            Self::ticket(ctx, &r.repair_ticket, rng).times(transactions.repair),
            SalesSplit::from_parts(
                Self::ticket(ctx, &r.online_ticket, rng).times(transactions.sales.online),
                Self::ticket(ctx, &r.in_store_ticket, rng).times(transactions.sales.in_store),
            ),
        );
        let expenses = revenue.scale_parts(ctx.sample(&r.expense_ratio, rng));

        FinancialMetrics {
            profit: revenue - expenses,
            expenses,
            revenue,
            transactions,
            conversion_rate: ctx.sample(&r.conversion_rate, rng),
            ..FinancialMetrics::default()
        }
        .with_derived_ratios()
    }

    fn finish_month<R: Rng + ?Sized>(
        &self,
        ctx: DrawContext,
        totals: FinancialMetrics,
        rng: &mut R,
    ) -> FinancialMetrics {
        self.level_totals(ctx, totals, rng)
    }

    fn finish_year<R: Rng + ?Sized>(
        &self,
        ctx: DrawContext,
        totals: FinancialMetrics,
        rng: &mut R,
    ) -> FinancialMetrics {
        self.level_totals(ctx, totals, rng)
    }

    fn finish_root(&self, totals: FinancialMetrics) -> FinancialMetrics {
        totals.with_derived_ratios()
    }
}
