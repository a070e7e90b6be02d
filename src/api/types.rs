//! API request, query and response types.

use serde::{Deserialize, Serialize};

use crate::catalog::RegionCode;
use crate::household::HouseholdFile;

/// One row of `GET /regions`.
#[derive(Debug, Serialize)]
pub struct RegionResponse {
    pub code: RegionCode,
    pub name: String,
    pub cost_per_kwh: f64,
    pub co2_factor_per_kwh: f64,
}

/// Query parameters for `POST /estimate`.
#[derive(Debug, Deserialize)]
pub struct EstimateQuery {
    /// Target reduction (%) for an optional savings projection.
    pub savings: Option<f64>,
}

/// Query parameters for `GET /compare`.
#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub a: String,
    pub b: String,
    /// Daily hours; defaults to the tables' comparison default.
    pub hours: Option<f64>,
    #[serde(default)]
    pub price_delta: f64,
    /// Region whose tariff prices the saving; defaults to `RM`.
    pub region: Option<String>,
}

/// Body of `POST /scenarios/{rut}`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveScenarioRequest {
    pub name: String,
    pub household: HouseholdFile,
}

/// Response of `GET /regions/{code}/average`.
#[derive(Debug, Serialize)]
pub struct RegionAverageResponse {
    pub region: RegionCode,
    /// `null` when no scenario has been saved for the region.
    pub average_kwh: Option<f64>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
