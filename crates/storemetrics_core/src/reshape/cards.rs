//! Trend cards comparing the selected period with the one before it.

use serde::Serialize;

use super::project::NamedValue;

/// A current-vs-previous comparison for one projected value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendCard {
    pub name: &'static str,
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    /// `None` when the previous value is zero
    pub percent_change: Option<f64>,
}

impl TrendCard {
    #[must_use]
    pub fn new(name: &'static str, current: f64, previous: f64) -> Self {
        let percent_change = (previous != 0.0).then(|| (current - previous) / previous.abs() * 100.0);
        Self {
            name,
            current,
            previous,
            change: current - previous,
            percent_change,
        }
    }
}

/// Pair up current and previous projections by name.
pub fn trend_cards(current: &[NamedValue], previous: &[NamedValue]) -> Vec<TrendCard> {
    current
        .iter()
        .map(|now| {
            let before = previous
                .iter()
                .find(|value| value.name == now.name)
                .map_or(0.0, |value| value.value);
            TrendCard::new(now.name, now.value, before)
        })
        .collect()
}
