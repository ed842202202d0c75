//! Handlers for the external-dns webhook endpoints.
use axum::{
    Extension, Json,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::Value;
use tracing::debug;

use crate::SharedState;
use crate::endpoint::Changes;
use crate::error::AppError;

pub const WEBHOOK_CONTENT_TYPE: &str = "application/external.dns.webhook+json;version=1";

// GET /
pub async fn negotiate(Extension(state): Extension<SharedState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, WEBHOOK_CONTENT_TYPE)],
        Json(state.provider.domain_filter().to_dto()),
    )
}

// GET /records
pub async fn get_records(
    Extension(state): Extension<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let endpoints = state.provider.records().await?;
    debug!(count = endpoints.len(), "serving records");
    Ok(([(header::CONTENT_TYPE, WEBHOOK_CONTENT_TYPE)], Json(endpoints)))
}

// POST /records
pub async fn apply_changes(
    Extension(state): Extension<SharedState>,
    Json(changes): Json<Changes>,
) -> Result<StatusCode, AppError> {
    if changes.is_empty() {
        debug!("received empty changeset");
    }
    state.provider.apply_changes(&changes).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /adjustendpoints
// Passed through untyped so fields and record types we do not model survive.
pub async fn adjust_endpoints(Json(endpoints): Json<Vec<Value>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, WEBHOOK_CONTENT_TYPE)], Json(endpoints))
}

// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}
