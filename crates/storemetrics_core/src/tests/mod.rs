//! Cross-module tests for the storemetrics engine
//!
//! Tests are organized by topic:
//! - `rollup` - Tree rollup and complementary-split invariants
//! - `aggregation` - Cross-category and cross-location composites
//! - `reshaping` - Reference resolution, chart buckets and statistics
//! - `scenario` - Long-running generation scenarios with real range tables
//! - `pipeline` - Generation through cache documents and back to charts

mod aggregation;
mod rollup;
mod scenario;
