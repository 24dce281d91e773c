//! HTTP endpoint handlers for the Observer server.
//!
//! All handlers read from the metrics registry via the shared [`AppState`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Redirect to `/ui` |
//! | `GET` | `/ui` | Display page polling the snapshot endpoint |
//! | `GET` | `/metrics` | Pull-format text exposition of all instruments |
//! | `GET` | `/api/garden-metrics` | JSON snapshot of the garden instruments |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect};
use garden_metrics::EXPOSITION_CONTENT_TYPE;
use garden_types::MetricsSnapshot;

use crate::error::ObserverError;
use crate::state::AppState;

/// Display page markup; polls `/api/garden-metrics` every two seconds.
const UI_PAGE: &str = include_str!("../assets/ui.html");

/// Redirect the root path to the display page.
pub async fn index() -> Redirect {
    Redirect::to("/ui")
}

/// Serve the display page.
pub async fn ui() -> Html<&'static str> {
    Html(UI_PAGE)
}

/// Render every registered instrument in the pull-format text exposition.
///
/// # Errors
///
/// Returns [`ObserverError::Metrics`] if the registry fails to encode.
pub async fn metrics(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let body = state.registry().render_exposition()?;
    Ok(([(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], body))
}

/// Return the current values of the seven garden instruments.
pub async fn garden_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.instruments.snapshot())
}
