//! Error types shared by every stage of the engine.
//!
//! Every fallible operation returns `Result<T, E>`; operations that can
//! legitimately find nothing return `Option<T>` (or `Result<Option<T>, E>`).
//! Panics are reserved for broken invariants and are contained to the
//! generation unit that raised them (see [`crate::dispatch`]).

use crate::model::{Day, MetricsDomain, Month, StoreLocation, Year};

/// Invalid configuration data (range tables, overrides).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid range [{min}, {max}]: {reason}")]
    InvalidRange {
        min: f64,
        max: f64,
        reason: &'static str,
    },
}

/// Failures while building a calendar index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("no operating history defined for {0}")]
    NoOperatingHistory(StoreLocation),
    #[error("{location} opened in {opened}, after the final calendar year {through}")]
    OpensAfter {
        location: StoreLocation,
        opened: Year,
        through: Year,
    },
}

/// Structural failures while generating a metric tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error("calendar index for {location} is empty")]
    EmptyCalendar { location: StoreLocation },
    #[error("calendar index for {location} has no months in {year}")]
    EmptyYear { location: StoreLocation, year: Year },
    #[error("calendar index for {location} has no days in {month} {year}")]
    EmptyMonth {
        location: StoreLocation,
        year: Year,
        month: Month,
    },
    #[error("generation for {location} panicked: {message}")]
    UnitPanicked {
        location: StoreLocation,
        message: String,
    },
}

/// One location whose generation unit failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFailure {
    pub location: StoreLocation,
    pub cause: String,
}

/// Failures while combining trees across categories or locations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregationError {
    #[error("no category trees to aggregate")]
    NoCategories,
    #[error("no location trees to aggregate")]
    NoLocations,
    /// Names the first failed location in request order; `also_failed`
    /// holds every later one.
    #[error(
        "cannot aggregate all locations: {location} failed: {cause}{}",
        also_failed_suffix(.also_failed)
    )]
    LocationFailed {
        location: StoreLocation,
        cause: String,
        also_failed: Vec<LocationFailure>,
    },
}

impl AggregationError {
    /// Every failure carried by the error, first failure first
    #[must_use]
    pub fn location_failures(&self) -> Vec<LocationFailure> {
        match self {
            AggregationError::LocationFailed {
                location,
                cause,
                also_failed,
            } => std::iter::once(LocationFailure {
                location: *location,
                cause: cause.clone(),
            })
            .chain(also_failed.iter().cloned())
            .collect(),
            _ => Vec::new(),
        }
    }
}

fn also_failed_suffix(also_failed: &[LocationFailure]) -> String {
    if also_failed.is_empty() {
        return String::new();
    }
    let names: Vec<String> = also_failed.iter().map(|f| f.location.to_string()).collect();
    format!(" (also failed: {})", names.join(", "))
}

/// A selected date (or a metric selector) has no counterpart in a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("year {year} not found")]
    YearNotFound { year: Year },
    #[error("{month} {year} not found")]
    MonthNotFound { year: Year, month: Month },
    #[error("day {day} of {month} {year} not found")]
    DayNotFound { year: Year, month: Month, day: Day },
    #[error("previous year {year} not found")]
    PreviousYearNotFound { year: Year },
    #[error("previous month {month} {year} not found")]
    PreviousMonthNotFound { year: Year, month: Month },
    #[error("previous day of {month} {year} not found")]
    PreviousDayNotFound { year: Year, month: Month },
    #[error("metric {metric} does not belong to the {domain} domain")]
    MetricNotInDomain {
        domain: MetricsDomain,
        metric: String,
    },
}

/// An unrecognised name while parsing one of the engine's enums.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{input}'")]
pub struct ParseKindError {
    pub kind: &'static str,
    pub input: String,
}

impl ParseKindError {
    pub(crate) fn new(kind: &'static str, input: &str) -> Self {
        Self {
            kind,
            input: input.to_string(),
        }
    }
}

/// Broad error category, mirroring how callers are expected to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing calendar/index data; fatal to a generation unit
    Structural,
    /// A selected date has no node; fatal to a reshaping request
    Lookup,
    /// A composite could not be built because an input is missing
    PartialAggregation,
    /// Invalid configuration data
    Config,
}

/// Top-level error for the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl From<CalendarError> for MetricsError {
    fn from(err: CalendarError) -> Self {
        MetricsError::Generation(GenerationError::Calendar(err))
    }
}

impl MetricsError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            MetricsError::Config(_) => ErrorKind::Config,
            MetricsError::Generation(_) => ErrorKind::Structural,
            MetricsError::Aggregation(AggregationError::LocationFailed { .. }) => {
                ErrorKind::PartialAggregation
            }
            MetricsError::Aggregation(_) => ErrorKind::Structural,
            MetricsError::Lookup(_) => ErrorKind::Lookup,
        }
    }
}

pub type Result<T, E = MetricsError> = std::result::Result<T, E>;
