// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failures talking to the DNS provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("credential rejected ({status}): {body}")]
    Auth { status: u16, body: String },

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode {context} response")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not fetch records from zone '{zone}'")]
    Zone {
        zone: String,
        #[source]
        source: Box<ProviderError>,
    },
}

impl ProviderError {
    /// Classify a non-success HTTP response.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => ProviderError::Auth { status, body },
            _ => ProviderError::Status { status, body },
        }
    }

    pub fn decode(context: &'static str, source: serde_json::Error) -> Self {
        ProviderError::Decode { context, source }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponseBody {
    pub error: String,
}

/// Errors surfaced by the webhook endpoints.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("provider unavailable: {0}")]
    Provider(#[from] ProviderError),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Provider(err) => {
                tracing::error!(error = %err, "provider call failed");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".into(),
                )
            }
        };

        let body = Json(ErrorResponseBody { error: msg });
        (status, body).into_response()
    }
}
