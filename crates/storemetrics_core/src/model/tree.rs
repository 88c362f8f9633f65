//! Year → Month → Day metric trees.

use serde::{Deserialize, Serialize};

use super::dates::{Day, Month, Year};
use super::metrics::{Metrics, roll_up};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayNode<M> {
    pub day: Day,
    pub values: M,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthNode<M> {
    pub month: Month,
    pub totals: M,
    pub days: Vec<DayNode<M>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearNode<M> {
    pub year: Year,
    pub totals: M,
    pub months: Vec<MonthNode<M>>,
}

/// A full metric tree with all-time root totals.
///
/// Years, months and days are kept in calendar order. A parent's summable
/// totals equal the sum of its children's, and its rate fields are the mean
/// of its children's (unless a generator overrides them for that level).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTree<M> {
    pub totals: M,
    pub years: Vec<YearNode<M>>,
}

impl<M: Metrics> DayNode<M> {
    #[must_use]
    pub fn new(day: Day, values: M) -> Self {
        Self { day, values }
    }
}

impl<M: Metrics> MonthNode<M> {
    /// Build a month whose totals are the rollup of its days.
    #[must_use]
    pub fn from_days(month: Month, days: Vec<DayNode<M>>) -> Self {
        let totals = roll_up(days.iter().map(|d| &d.values));
        Self { month, totals, days }
    }

    #[must_use]
    pub fn day(&self, day: Day) -> Option<&DayNode<M>> {
        self.days.iter().find(|d| d.day == day)
    }
}

impl<M: Metrics> YearNode<M> {
    /// Build a year whose totals are the rollup of its months.
    #[must_use]
    pub fn from_months(year: Year, months: Vec<MonthNode<M>>) -> Self {
        let totals = roll_up(months.iter().map(|m| &m.totals));
        Self {
            year,
            totals,
            months,
        }
    }

    #[must_use]
    pub fn month(&self, month: Month) -> Option<&MonthNode<M>> {
        self.months.iter().find(|m| m.month == month)
    }
}

impl<M: Metrics> MetricTree<M> {
    /// Build a tree whose root totals are the rollup of its years.
    #[must_use]
    pub fn from_years(years: Vec<YearNode<M>>) -> Self {
        let totals = roll_up(years.iter().map(|y| &y.totals));
        Self { totals, years }
    }

    #[must_use]
    pub fn year(&self, year: Year) -> Option<&YearNode<M>> {
        self.years.iter().find(|y| y.year == year)
    }

    #[must_use]
    pub fn month(&self, year: Year, month: Month) -> Option<&MonthNode<M>> {
        self.year(year)?.month(month)
    }

    #[must_use]
    pub fn day(&self, year: Year, month: Month, day: Day) -> Option<&DayNode<M>> {
        self.month(year, month)?.day(day)
    }

    #[must_use]
    pub fn first_year(&self) -> Option<Year> {
        self.years.first().map(|y| y.year)
    }

    #[must_use]
    pub fn day_count(&self) -> usize {
        self.years
            .iter()
            .flat_map(|y| &y.months)
            .map(|m| m.days.len())
            .sum()
    }

    /// Every day node in calendar order, with its year and month
    pub fn days(&self) -> impl Iterator<Item = (Year, Month, &DayNode<M>)> {
        self.years.iter().flat_map(|y| {
            y.months
                .iter()
                .flat_map(move |m| m.days.iter().map(move |d| (y.year, m.month, d)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cents, RepairMetrics};

    fn repair(units: u64) -> RepairMetrics {
        RepairMetrics {
            revenue: Cents(units as i64 * 100),
            units_repaired: units,
        }
    }

    fn day(n: u8, units: u64) -> DayNode<RepairMetrics> {
        DayNode::new(Day::new(n).unwrap(), repair(units))
    }

    #[test]
    fn test_tree_rollup_and_lookup() {
        let january = MonthNode::from_days(Month::January, vec![day(1, 2), day(2, 3)]);
        let february = MonthNode::from_days(Month::February, vec![day(1, 5)]);
        let tree = MetricTree::from_years(vec![YearNode::from_months(2020, vec![january, february])]);

        assert_eq!(tree.totals.units_repaired, 10);
        assert_eq!(tree.year(2020).unwrap().totals.revenue, Cents(1_000));
        assert_eq!(tree.month(2020, Month::January).unwrap().totals.units_repaired, 5);
        assert!(tree.day(2020, Month::February, Day::new(2).unwrap()).is_none());
        assert_eq!(tree.day_count(), 3);
        assert_eq!(tree.days().count(), 3);
        assert_eq!(tree.first_year(), Some(2020));
    }
}
