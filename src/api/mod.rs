//! REST API over the calculator tables and a scenario store.
//!
//! - `GET /catalog`, `GET /regions`: the loaded tables
//! - `POST /estimate`: totals and ranking for a household body
//! - `GET /compare`: efficiency comparison of two catalog appliances
//! - `GET|POST /scenarios/{rut}`, `DELETE /scenarios/{rut}/{id}`: saved scenarios
//! - `GET /regions/{code}/average`: mean monthly kWh of saved scenarios

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use tokio::sync::RwLock;

use crate::config::Tables;
use crate::scenario::MemoryStore;

pub use types::{
    CompareQuery, ErrorResponse, EstimateQuery, RegionAverageResponse, RegionResponse,
    SaveScenarioRequest,
};

/// Application state shared across request handlers.
///
/// Tables are read-only; the scenario store sits behind an async lock.
pub struct AppState {
    pub tables: Tables,
    pub store: RwLock<MemoryStore>,
}

impl AppState {
    pub fn new(tables: Tables, store: MemoryStore) -> Self {
        Self {
            tables,
            store: RwLock::new(store),
        }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared tables and scenario store
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/catalog", get(handlers::get_catalog))
        .route("/regions", get(handlers::get_regions))
        .route("/regions/{code}/average", get(handlers::get_region_average))
        .route("/estimate", post(handlers::post_estimate))
        .route("/compare", get(handlers::get_compare))
        .route(
            "/scenarios/{rut}",
            get(handlers::list_scenarios).post(handlers::save_scenario),
        )
        .route("/scenarios/{rut}/{id}", delete(handlers::delete_scenario))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Arguments
///
/// * `state` - Shared tables and scenario store
/// * `addr` - Socket address to bind to
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
