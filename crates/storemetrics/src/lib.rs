//! Command-line driver for the storemetrics engine: generates datasets into a
//! local document cache and charts cached documents as JSON.

pub mod commands;
pub mod logging;
pub mod settings;
pub mod store;

pub use logging::init_logging;
pub use settings::{DATABASE_FILE, Settings};
pub use store::{DocumentStore, SqliteStore};
