//! Household electricity consumption, cost and emissions calculator for
//! Chile's regional tariffs.

/// REST API server (requires `api` feature).
#[cfg(feature = "api")]
pub mod api;
/// Consumption, ranking, comparison, aggregation and savings arithmetic.
pub mod calc;
pub mod catalog;
/// TOML tariff/catalog tables and validation.
pub mod config;
pub mod error;
pub mod format;
pub mod household;
/// CSV export.
pub mod io;
pub mod report;
pub mod rut;
/// Saved scenarios: the store trait, in-memory and JSON-file stores, and sync.
pub mod scenario;
