//! Error types for the calculator core and the scenario store.

use thiserror::Error;

use crate::catalog::RegionCode;

/// Input errors raised at the calculator boundary.
///
/// "No payback" is not represented here: the comparator reports it as `None`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("watts must be a finite value > 0, got {0}")]
    InvalidWatts(f64),

    #[error("hours per day must be in (0, 24], got {0}")]
    InvalidHours(f64),

    #[error("quantity must be >= 1, got {0}")]
    InvalidQuantity(u32),

    #[error("price per kWh must be a finite value > 0, got {0}")]
    InvalidPrice(f64),

    #[error("price delta must be a finite value, got {0}")]
    InvalidPriceDelta(f64),

    #[error("percentage must be in (0, 100], got {0}")]
    InvalidPercentage(f64),

    #[error("unknown appliance \"{0}\"")]
    UnknownAppliance(String),

    #[error("unknown region code \"{0}\"")]
    UnknownRegion(String),

    #[error("no tariff loaded for region {0}")]
    MissingTariff(RegionCode),

    #[error("entry index {index} out of range (household has {len} entries)")]
    EntryOutOfRange { index: usize, len: usize },
}

/// Failures reported by a [`crate::scenario::ScenarioStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scenario \"{0}\" not found")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, CalcError>;
