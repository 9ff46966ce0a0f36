//! HTTP API surface
//!
//! Routes, handlers, and the response envelopes for error paths. Handlers
//! stay thin: they pull the current dataset from the cache and delegate to
//! the query pipeline, translating the one possible failure (no dataset has
//! ever been fetched) into an HTTP error body.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use crate::cache::DatasetCache;
use crate::data::FetchError;
use crate::query::{self, QueryParams};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct ApiState {
    cache: Arc<DatasetCache>,
}

impl ApiState {
    /// Creates new API state over a dataset cache
    pub fn new(cache: Arc<DatasetCache>) -> Self {
        Self { cache }
    }
}

/// Creates the API router with permissive CORS on every response
pub fn create_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/carbon-intensity", get(carbon_intensity))
        .route("/api/countries", get(countries))
        .route("/api/docs", get(docs))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

/// Main query endpoint: filter, search, sort, and paginate the dataset
async fn carbon_intensity(
    State(state): State<ApiState>,
    Query(params): Query<QueryParams>,
) -> Response {
    match state.cache.current().await {
        Ok(dataset) => {
            let envelope = query::process(&dataset.records, &params);
            (StatusCode::OK, Json(envelope)).into_response()
        }
        Err(err) => internal_error("Failed to fetch carbon intensity data", &err),
    }
}

/// Distinct non-empty country names across the unfiltered dataset
async fn countries(State(state): State<ApiState>) -> Response {
    match state.cache.current().await {
        Ok(dataset) => {
            let countries = query::distinct_countries(&dataset.records);
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "total": countries.len(),
                    "countries": countries,
                })),
            )
                .into_response()
        }
        Err(err) => internal_error("Failed to fetch country list", &err),
    }
}

/// Health check: degraded (503) until a dataset has been fetched at least once
async fn health(State(state): State<ApiState>) -> Response {
    match state.cache.current().await {
        Ok(dataset) => (
            StatusCode::OK,
            Json(json!({
                "status": "OK",
                "timestamp": Utc::now(),
                "total_records": dataset.records.len(),
                "last_updated": dataset.fetched_at,
            })),
        )
            .into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "ERROR",
                "timestamp": Utc::now(),
                "total_records": 0,
                "last_updated": null,
                "message": err.to_string(),
            })),
        )
            .into_response(),
    }
}

/// Machine-readable description of the query parameters
async fn docs() -> Response {
    (StatusCode::OK, Json(docs_payload())).into_response()
}

/// Static index of endpoints with example queries
async fn index() -> Response {
    (StatusCode::OK, Json(index_payload())).into_response()
}

/// Builds the 500 envelope: generic message plus the underlying error text
fn internal_error(message: &str, err: &FetchError) -> Response {
    error!(error = %err, "{message}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": message,
            "message": err.to_string(),
        })),
    )
        .into_response()
}

fn docs_payload() -> serde_json::Value {
    json!({
        "endpoint": "/api/carbon-intensity",
        "description": "Carbon intensity by country, filterable via query parameters",
        "parameters": {
            "country": "Comma-separated country names, case-insensitive substring match",
            "country_code": "Comma-separated country codes, exact match (e.g. DE,FR)",
            "min_intensity": "Inclusive lower bound on carbon intensity (gCO2/kWh)",
            "max_intensity": "Inclusive upper bound on carbon intensity (gCO2/kWh)",
            "search": "Case-insensitive substring search over country names",
            "sort": "Field to sort by (e.g. carbon_intensity, country)",
            "order": "Sort direction: asc (default) or desc",
            "page": "Page number, 1-based (default 1)",
            "limit": "Records per page (default: all)"
        }
    })
}

fn index_payload() -> serde_json::Value {
    json!({
        "name": "Carbon Intensity API",
        "endpoints": {
            "data": "/api/carbon-intensity",
            "countries": "/api/countries",
            "docs": "/api/docs",
            "health": "/health"
        },
        "examples": [
            "/api/carbon-intensity?country=Germany",
            "/api/carbon-intensity?country_code=DE,FR",
            "/api/carbon-intensity?min_intensity=100&max_intensity=300",
            "/api/carbon-intensity?sort=carbon_intensity&order=desc&page=1&limit=10"
        ]
    })
}
