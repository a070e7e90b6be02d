//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use log::debug;

use super::AppState;
use super::types::{
    CompareQuery, ErrorResponse, EstimateQuery, RegionAverageResponse, RegionResponse,
    SaveScenarioRequest,
};
use crate::calc::{Comparison, compare, project_savings};
use crate::catalog::{ApplianceDefinition, RegionCode, TariffProvider};
use crate::error::{CalcError, StoreError};
use crate::household::HouseholdFile;
use crate::report::EstimateReport;
use crate::rut::{Rut, RutError};
use crate::scenario::{ScenarioStore, StoredScenario};

/// Handler error carrying the HTTP status and a message for [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(ErrorResponse { error: self.1 })).into_response()
    }
}

impl From<CalcError> for ApiError {
    fn from(e: CalcError) -> Self {
        Self(StatusCode::BAD_REQUEST, e.to_string())
    }
}

impl From<RutError> for ApiError {
    fn from(e: RutError) -> Self {
        Self(StatusCode::BAD_REQUEST, e.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        let status = match e {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::Io(_) | StoreError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self(status, e.to_string())
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// `GET /catalog` → 200 + appliance definitions in table order
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<Vec<ApplianceDefinition>> {
    Json(state.tables.catalog.iter().cloned().collect())
}

/// `GET /regions` → 200 + one tariff row per loaded region
pub async fn get_regions(State(state): State<Arc<AppState>>) -> Json<Vec<RegionResponse>> {
    let rows = state
        .tables
        .tariffs
        .iter()
        .map(|(code, t)| RegionResponse {
            code,
            name: t.name.clone(),
            cost_per_kwh: t.cost_per_kwh,
            co2_factor_per_kwh: t.co2_factor_per_kwh,
        })
        .collect();
    Json(rows)
}

/// Estimates totals and ranking for a household body.
///
/// `POST /estimate` → 200 + `EstimateReport` JSON
/// `POST /estimate?savings=20` → includes a savings projection
/// Unknown region/appliance or invalid usage → 400
pub async fn post_estimate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EstimateQuery>,
    Json(body): Json<HouseholdFile>,
) -> ApiResult<Json<EstimateReport>> {
    let household = body.into_household(&state.tables, None)?;
    let mut report = EstimateReport::from_household(&household);
    if let Some(pct) = query.savings {
        let projection = project_savings(
            report.monthly.kwh,
            report.cost_per_kwh,
            pct,
            &state.tables.savings_measures,
        )?;
        report = report.with_savings(projection);
    }
    Ok(Json(report))
}

/// `GET /compare?a=..&b=..[&hours=..][&price_delta=..][&region=..]` → 200 + `Comparison`
///
/// A non-recovering switch has `"recovery_months": null`.
pub async fn get_compare(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompareQuery>,
) -> ApiResult<Json<Comparison>> {
    let region = match query.region.as_deref() {
        Some(code) => code.parse()?,
        None => RegionCode::Metropolitana,
    };
    let price = state.tables.tariff(region)?.cost_per_kwh;
    let hours = query
        .hours
        .unwrap_or(state.tables.comparison.default_hours);
    let result = compare(
        &state.tables,
        &query.a,
        &query.b,
        hours,
        price,
        query.price_delta,
    )?;
    Ok(Json(result))
}

/// `GET /scenarios/{rut}` → 200 + the owner's most recent scenarios
pub async fn list_scenarios(
    State(state): State<Arc<AppState>>,
    Path(rut): Path<String>,
) -> ApiResult<Json<Vec<StoredScenario>>> {
    let owner = Rut::parse(&rut)?;
    let store = state.store.read().await;
    Ok(Json(store.list(&owner, state.tables.history_limit)?))
}

/// `POST /scenarios/{rut}` → 201 + the stored scenario
pub async fn save_scenario(
    State(state): State<Arc<AppState>>,
    Path(rut): Path<String>,
    Json(body): Json<SaveScenarioRequest>,
) -> ApiResult<(StatusCode, Json<StoredScenario>)> {
    let owner = Rut::parse(&rut)?;
    let household = body.household.into_household(&state.tables, None)?;
    let scenario = household.snapshot(body.name, Utc::now());

    let mut store = state.store.write().await;
    let stored = store.save(&owner, &scenario)?;
    debug!("api: saved scenario {} for {owner}", stored.id);
    Ok((StatusCode::CREATED, Json(stored)))
}

/// `DELETE /scenarios/{rut}/{id}` → 204, or 404 for an unknown id
pub async fn delete_scenario(
    State(state): State<Arc<AppState>>,
    Path((rut, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let owner = Rut::parse(&rut)?;
    let mut store = state.store.write().await;
    store.delete(&owner, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /regions/{code}/average` → 200 + mean monthly kWh across owners
pub async fn get_region_average(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<RegionAverageResponse>> {
    let region: RegionCode = code.parse()?;
    let store = state.store.read().await;
    Ok(Json(RegionAverageResponse {
        region,
        average_kwh: store.regional_average_kwh(region)?,
    }))
}
