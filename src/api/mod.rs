pub mod webhook;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use crate::SharedState;

/// Routes of the external-dns webhook protocol.
pub fn create_router(state: SharedState) -> Router {
    use crate::api::webhook;

    Router::new()
        .route("/", get(webhook::negotiate))
        .route(
            "/records",
            get(webhook::get_records).post(webhook::apply_changes),
        )
        .route("/adjustendpoints", post(webhook::adjust_endpoints))
        .route("/healthz", get(webhook::healthz))
        .layer(Extension(state))
}
