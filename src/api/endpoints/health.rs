//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store_ok: bool,
    pub version: &'static str,
}

/// `GET /api/health` — liveness plus a store-reachability probe.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let store_ok = ctx.core.open_db().is_ok();

    Ok(Json(HealthResponse {
        status: "ok",
        store_ok,
        version: crate::config::APP_VERSION,
    }))
}
