//! Chart and statistics reshaping
//!
//! Turns one metric tree plus a selected date into chart-ready data: bar and
//! line series over the buckets leading up to the selected date, a pie split
//! of the selected node, calendar heat-map series, current-vs-previous trend
//! cards and descriptive statistics of every bar series. Every output is
//! keyed by the [`YAxisKey`]s that apply to the selected metric.

mod cards;
mod lookup;
mod project;
mod series;
mod stats;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use cards::TrendCard;
pub use lookup::ReferencePoints;
pub use project::{
    ChartMetrics, CustomerMetric, FinancialMetric, NamedValue, ProductMetric, RepairMetric,
    YAxisKey,
};
pub use series::{BarRow, CalendarDay, CalendarSeries, LinePoint, LineSeries, PieSlice};
pub use stats::{Extremum, Statistics, describe};

use crate::error::{LookupError, ParseKindError};
use crate::model::{CalendarDate, MetricTree, YearNode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarGranularity {
    #[default]
    Daily,
    Monthly,
    Yearly,
}

impl fmt::Display for CalendarGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CalendarGranularity::Daily => "daily",
            CalendarGranularity::Monthly => "monthly",
            CalendarGranularity::Yearly => "yearly",
        })
    }
}

impl FromStr for CalendarGranularity {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" | "daily" => Ok(CalendarGranularity::Daily),
            "m" | "month" | "monthly" => Ok(CalendarGranularity::Monthly),
            "y" | "year" | "yearly" => Ok(CalendarGranularity::Yearly),
            _ => Err(ParseKindError::new("granularity", s)),
        }
    }
}

/// What to chart: the selected date, today's date (whose month and year are
/// incomplete and left out of monthly/yearly buckets) and the bucket size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartQuery {
    pub selected: CalendarDate,
    pub today: CalendarDate,
    pub granularity: CalendarGranularity,
}

impl ChartQuery {
    #[must_use]
    pub fn new(selected: jiff::civil::Date, today: jiff::civil::Date) -> Self {
        Self {
            selected: CalendarDate::from_civil(selected),
            today: CalendarDate::from_civil(today),
            granularity: CalendarGranularity::default(),
        }
    }

    #[must_use]
    pub fn granularity(mut self, granularity: CalendarGranularity) -> Self {
        self.granularity = granularity;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStatistics {
    pub name: &'static str,
    #[serde(flatten)]
    pub statistics: Statistics,
}

/// Everything a dashboard needs for one metric on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub selected: CalendarDate,
    pub granularity: CalendarGranularity,
    pub bar: BTreeMap<YAxisKey, Vec<BarRow>>,
    pub line: BTreeMap<YAxisKey, Vec<LineSeries>>,
    pub pie: BTreeMap<YAxisKey, Vec<PieSlice>>,
    pub calendar: BTreeMap<YAxisKey, CalendarSeries>,
    pub cards: BTreeMap<YAxisKey, Vec<TrendCard>>,
    pub statistics: BTreeMap<YAxisKey, Vec<SeriesStatistics>>,
}

impl ChartData {
    /// Keys with at least a bar series
    pub fn keys(&self) -> impl Iterator<Item = YAxisKey> + '_ {
        self.bar.keys().copied()
    }

    /// Keep only `key`'s entries.
    #[must_use]
    pub fn only(mut self, key: YAxisKey) -> Self {
        self.bar.retain(|k, _| *k == key);
        self.line.retain(|k, _| *k == key);
        self.pie.retain(|k, _| *k == key);
        self.calendar.retain(|k, _| *k == key);
        self.cards.retain(|k, _| *k == key);
        self.statistics.retain(|k, _| *k == key);
        self
    }
}

/// Reshape `tree` for `selector` around `query.selected`.
///
/// Fails when any of the selected year, month or day, or their previous
/// periods, has no node in the tree.
pub fn reshape<M: ChartMetrics>(
    tree: &MetricTree<M>,
    selector: M::Selector,
    query: &ChartQuery,
) -> Result<ChartData, LookupError> {
    let refs = ReferencePoints::resolve(tree, query.selected)?;
    let (current, previous) = match query.granularity {
        CalendarGranularity::Daily => (&refs.day.values, &refs.previous_day.values),
        CalendarGranularity::Monthly => (&refs.month.totals, &refs.previous_month.totals),
        CalendarGranularity::Yearly => (&refs.year.totals, &refs.previous_year.totals),
    };
    let buckets = buckets(tree, &refs, query);

    let mut chart = ChartData {
        selected: query.selected,
        granularity: query.granularity,
        bar: BTreeMap::new(),
        line: BTreeMap::new(),
        pie: BTreeMap::new(),
        calendar: BTreeMap::new(),
        cards: BTreeMap::new(),
        statistics: BTreeMap::new(),
    };

    for key in YAxisKey::ALL {
        let Some(now) = current.project(selector, key) else {
            continue;
        };

        let rows: Vec<BarRow> = buckets
            .iter()
            .filter_map(|(label, values)| {
                values.project(selector, key).map(|values| BarRow {
                    label: label.clone(),
                    values,
                })
            })
            .collect();
        let lines = series::lines_from_bars(&rows);

        let statistics: Vec<SeriesStatistics> = lines
            .iter()
            .filter_map(|line| {
                describe(&series::labelled(line)).map(|statistics| SeriesStatistics {
                    name: line.name,
                    statistics,
                })
            })
            .collect();
        if !statistics.is_empty() {
            chart.statistics.insert(key, statistics);
        }

        if let Some(parts) = current.split(selector, key) {
            let slices = parts
                .into_iter()
                .map(|part| PieSlice {
                    name: part.name,
                    value: part.value,
                })
                .collect();
            chart.pie.insert(key, slices);
        }

        if now.len() == 1 {
            let series = CalendarSeries {
                current_year: calendar_days(refs.year, selector, key),
                previous_year: calendar_days(refs.previous_year, selector, key),
            };
            chart.calendar.insert(key, series);
        }

        let before = previous.project(selector, key).unwrap_or_default();
        chart.cards.insert(key, cards::trend_cards(&now, &before));
        chart.bar.insert(key, rows);
        chart.line.insert(key, lines);
    }

    Ok(chart)
}

/// The labelled nodes leading up to the selected date at the query's
/// granularity.
fn buckets<'a, M>(
    tree: &'a MetricTree<M>,
    refs: &ReferencePoints<'a, M>,
    query: &ChartQuery,
) -> Vec<(String, &'a M)> {
    let selected = query.selected;
    let today = query.today;
    match query.granularity {
        CalendarGranularity::Daily => refs
            .month
            .days
            .iter()
            .take_while(|node| node.day <= selected.day)
            .map(|node| (node.day.to_string(), &node.values))
            .collect(),
        CalendarGranularity::Monthly => refs
            .year
            .months
            .iter()
            .take_while(|node| node.month <= selected.month)
            .filter(|node| !(selected.year == today.year && node.month == today.month))
            .map(|node| (node.month.name().to_string(), &node.totals))
            .collect(),
        CalendarGranularity::Yearly => tree
            .years
            .iter()
            .take_while(|node| node.year <= selected.year)
            .filter(|node| node.year != today.year)
            .map(|node| (node.year.to_string(), &node.totals))
            .collect(),
    }
}

fn calendar_days<M: ChartMetrics>(
    year: &YearNode<M>,
    selector: M::Selector,
    key: YAxisKey,
) -> Vec<CalendarDay> {
    year.months
        .iter()
        .flat_map(|month| {
            month.days.iter().filter_map(move |node| {
                let value = node.values.project(selector, key)?.first()?.value;
                Some(CalendarDay {
                    day: CalendarDate::new(year.year, month.month, node.day).label(),
                    value,
                })
            })
        })
        .collect()
}
