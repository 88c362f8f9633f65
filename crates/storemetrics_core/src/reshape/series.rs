//! Chart series shapes.

use serde::Serialize;

use super::project::NamedValue;

/// One bucket of a bar chart: a label and every projected value in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarRow {
    pub label: String,
    pub values: Vec<NamedValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub label: String,
    pub value: f64,
}

/// One named line, the same buckets as the bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: &'static str,
    pub points: Vec<LinePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    /// `YYYY-MM-DD`
    pub day: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSeries {
    pub current_year: Vec<CalendarDay>,
    pub previous_year: Vec<CalendarDay>,
}

/// Pivot bar rows into one line per value name, keeping first-seen order.
pub fn lines_from_bars(rows: &[BarRow]) -> Vec<LineSeries> {
    let mut lines: Vec<LineSeries> = Vec::new();
    for row in rows {
        for value in &row.values {
            let point = LinePoint {
                label: row.label.clone(),
                value: value.value,
            };
            match lines.iter_mut().find(|line| line.name == value.name) {
                Some(line) => line.points.push(point),
                None => lines.push(LineSeries {
                    name: value.name,
                    points: vec![point],
                }),
            }
        }
    }
    lines
}

/// The labelled values of one line, as statistics input.
pub fn labelled(line: &LineSeries) -> Vec<(String, f64)> {
    line.points
        .iter()
        .map(|point| (point.label.clone(), point.value))
        .collect()
}
