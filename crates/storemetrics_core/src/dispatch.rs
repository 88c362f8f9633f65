//! Per-location generation units
//!
//! Every location is generated as an independent unit that builds its own
//! calendar index and RNG and touches only fresh structures. With the
//! `parallel` feature the units run on the rayon pool; otherwise they run in
//! order on the calling thread. Each unit's outcome is kept separately and a
//! panicking unit becomes that location's failure without cancelling the
//! others.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::warn;

use crate::error::{AggregationError, GenerationError, LocationFailure, MetricsError};
use crate::model::StoreLocation;

/// The result of one location's generation unit.
#[derive(Debug)]
pub struct LocationOutcome<T> {
    pub location: StoreLocation,
    pub result: Result<T, MetricsError>,
}

/// Run `unit` once per location and collect every outcome, in input order.
pub fn run_per_location<T, F>(locations: &[StoreLocation], unit: F) -> Vec<LocationOutcome<T>>
where
    T: Send,
    F: Fn(StoreLocation) -> Result<T, MetricsError> + Sync,
{
    #[cfg(feature = "parallel")]
    let outcomes = locations
        .par_iter()
        .map(|&location| run_unit(location, &unit))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let outcomes = locations
        .iter()
        .map(|&location| run_unit(location, &unit))
        .collect();

    outcomes
}

fn run_unit<T, F>(location: StoreLocation, unit: &F) -> LocationOutcome<T>
where
    F: Fn(StoreLocation) -> Result<T, MetricsError>,
{
    let result = match catch_unwind(AssertUnwindSafe(|| unit(location))) {
        Ok(result) => result,
        Err(payload) => Err(GenerationError::UnitPanicked {
            location,
            message: panic_message(payload.as_ref()),
        }
        .into()),
    };
    if let Err(err) = &result {
        warn!(%location, error = %err, "generation unit failed");
    }
    LocationOutcome { location, result }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Collect successful outcomes, or fail naming the first failed location in
/// input order and carrying every other failure.
pub fn join_outcomes<T>(
    outcomes: Vec<LocationOutcome<T>>,
) -> Result<Vec<(StoreLocation, T)>, AggregationError> {
    let mut joined = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(value) => joined.push((outcome.location, value)),
            Err(cause) => failures.push(LocationFailure {
                location: outcome.location,
                cause: cause.to_string(),
            }),
        }
    }

    let mut failures = failures.into_iter();
    match failures.next() {
        None => Ok(joined),
        Some(first) => Err(AggregationError::LocationFailed {
            location: first.location,
            cause: first.cause,
            also_failed: failures.collect(),
        }),
    }
}
