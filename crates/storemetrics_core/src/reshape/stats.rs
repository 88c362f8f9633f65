//! Descriptive statistics over a labelled numeric series.

use rustc_hash::FxHashMap;
use serde::Serialize;

/// A minimum or maximum and the label of the bucket it occurred in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extremum {
    pub value: f64,
    pub occurred_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub min: Extremum,
    pub max: Extremum,
    pub median: f64,
    /// Most frequent value, ties broken by first occurrence
    pub mode: f64,
    pub mean: f64,
    /// Q3 − Q1 with linearly interpolated quartiles
    pub interquartile_range: f64,
    /// Population standard deviation
    pub standard_deviation: f64,
}

/// Describe `points` (label, value). Returns `None` for an empty series.
pub fn describe(points: &[(String, f64)]) -> Option<Statistics> {
    let (first_label, first_value) = points.first()?;

    let mut min = Extremum {
        value: *first_value,
        occurred_at: first_label.clone(),
    };
    let mut max = min.clone();
    for (label, value) in &points[1..] {
        if *value < min.value {
            min = Extremum {
                value: *value,
                occurred_at: label.clone(),
            };
        }
        if *value > max.value {
            max = Extremum {
                value: *value,
                occurred_at: label.clone(),
            };
        }
    }

    let values: Vec<f64> = points.iter().map(|(_, value)| *value).collect();
    let mut sorted = values.clone();
    sorted.sort_by(f64::total_cmp);

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    Some(Statistics {
        min,
        max,
        median: quantile(&sorted, 0.5),
        mode: mode(&values),
        mean,
        interquartile_range: quantile(&sorted, 0.75) - quantile(&sorted, 0.25),
        standard_deviation: variance.sqrt(),
    })
}

/// Linearly interpolated quantile of sorted, non-empty data (Hyndman-Fan
/// type 7).
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lower = h.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    sorted[lower] + (h - lower as f64) * (sorted[upper] - sorted[lower])
}

fn mode(values: &[f64]) -> f64 {
    // -0.0 and 0.0 count as the same value
    let key = |value: f64| (value + 0.0).to_bits();

    let mut counts: FxHashMap<u64, usize> = FxHashMap::default();
    for &value in values {
        *counts.entry(key(value)).or_insert(0) += 1;
    }

    let mut best = values[0];
    let mut best_count = 0;
    for &value in values {
        let count = counts[&key(value)];
        if count > best_count {
            best = value;
            best_count = count;
        }
    }
    best
}
