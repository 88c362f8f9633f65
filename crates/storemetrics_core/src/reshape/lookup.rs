//! Resolution of the selected date and its previous periods.

use crate::error::LookupError;
use crate::model::{CalendarDate, DayNode, MetricTree, Month, MonthNode, YearNode};

/// The six nodes a chart is built around.
#[derive(Debug)]
pub struct ReferencePoints<'a, M> {
    pub year: &'a YearNode<M>,
    pub month: &'a MonthNode<M>,
    pub day: &'a DayNode<M>,
    pub previous_year: &'a YearNode<M>,
    pub previous_month: &'a MonthNode<M>,
    pub previous_day: &'a DayNode<M>,
}

impl<'a, M> ReferencePoints<'a, M> {
    /// Resolve every reference for `selected`. The previous month of January
    /// is December of the year before; the previous day of day 01 is the last
    /// day node of the previous month.
    pub fn resolve(tree: &'a MetricTree<M>, selected: CalendarDate) -> Result<Self, LookupError> {
        let CalendarDate { year, month, day } = selected;

        let year_node = find_year(tree, year).ok_or(LookupError::YearNotFound { year })?;
        let month_node = year_node
            .months
            .iter()
            .find(|m| m.month == month)
            .ok_or(LookupError::MonthNotFound { year, month })?;
        let day_node = month_node
            .days
            .iter()
            .find(|d| d.day == day)
            .ok_or(LookupError::DayNotFound { year, month, day })?;

        let previous_year = find_year(tree, year - 1)
            .ok_or(LookupError::PreviousYearNotFound { year: year - 1 })?;

        let (prev_month_year, prev_month) = match month.previous() {
            Some(previous) => (year, previous),
            None => (year - 1, Month::December),
        };
        let previous_month = find_year(tree, prev_month_year)
            .and_then(|y| y.months.iter().find(|m| m.month == prev_month))
            .ok_or(LookupError::PreviousMonthNotFound {
                year: prev_month_year,
                month: prev_month,
            })?;

        let previous_day = match day.previous() {
            Some(previous) => month_node.days.iter().find(|d| d.day == previous),
            None => previous_month.days.last(),
        }
        .ok_or(LookupError::PreviousDayNotFound { year, month })?;

        Ok(Self {
            year: year_node,
            month: month_node,
            day: day_node,
            previous_year,
            previous_month,
            previous_day,
        })
    }
}

fn find_year<M>(tree: &MetricTree<M>, year: i16) -> Option<&YearNode<M>> {
    tree.years.iter().find(|y| y.year == year)
}
