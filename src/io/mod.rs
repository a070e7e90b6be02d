//! File export.

/// CSV export of rankings and scenario history.
pub mod export;
