//! Error types for the Observer HTTP layer.
//!
//! [`ObserverError`] converts into a JSON error response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use garden_metrics::RegistryError;

/// Errors that can occur while serving a request.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The metrics registry failed to render.
    #[error("metrics error: {source}")]
    Metrics {
        /// The underlying registry error.
        #[from]
        source: RegistryError,
    },
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Metrics { source } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to render metrics: {source}"),
            ),
        };

        tracing::error!(error = %self, "Request failed");

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
