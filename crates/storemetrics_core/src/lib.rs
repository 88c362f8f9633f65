//! Synthetic business-metrics engine for a multi-location retailer
//!
//! This crate generates year → month → day metric trees for every store
//! location and metric domain, aggregates them across product/repair
//! categories and across locations, and reshapes any tree into chart-ready
//! series and summary statistics. It supports:
//! - Customer, financial, product and repair metric domains
//! - Location- and year-indexed random range tables with fallbacks
//! - "All Products" / "All Repairs" / "All Locations" composites
//! - Bar, line, pie and calendar series plus trend cards and statistics
//! - Cache documents with deterministic keys and version counters
//!
//! # Generating a dataset
//!
//! ```ignore
//! use storemetrics_core::{GenerationRequest, MetricsDomain, RangeSet, generate_dataset};
//!
//! let ranges = RangeSet::default();
//! let request = GenerationRequest::new(2025).seed(7);
//! let generated = generate_dataset(MetricsDomain::Customer, &request, &ranges)?;
//! let documents = generated.dataset.documents("https://metrics.example", jiff::Timestamp::now());
//! ```
//!
//! # Reshaping a tree
//!
//! ```ignore
//! use storemetrics_core::reshape::{CalendarGranularity, ChartQuery, reshape};
//!
//! let query = ChartQuery::new(jiff::civil::date(2024, 1, 1), jiff::civil::date(2025, 6, 1))
//!     .granularity(CalendarGranularity::Monthly);
//! let chart = reshape(&tree, CustomerMetric::Total, &query)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod aggregate;
pub mod cache;
pub mod calendar;
pub mod dataset;
pub mod dispatch;
pub mod error;
pub mod generate;
pub mod reshape;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use cache::{CacheDocument, CacheKey, DocumentMeta, DocumentPayload, MetricSelector};
pub use calendar::CalendarIndex;
pub use config::{RangeProvider, RangeSet, RangeSetBuilder};
pub use dataset::{DomainDataset, Generated, GenerationRequest, generate_dataset};
pub use error::{ErrorKind, MetricsError};
pub use model::{
    CalendarDate, Day, MetricTree, MetricsDomain, Month, ProductCategory, RepairCategory,
    StoreLocation, Year,
};
