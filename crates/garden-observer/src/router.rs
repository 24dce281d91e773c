//! Axum router construction for the Observer server.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- redirect to `/ui`
/// - `GET /ui` -- display page
/// - `GET /metrics` -- text exposition for scraping
/// - `GET /api/garden-metrics` -- JSON snapshot
///
/// CORS allows any origin so dashboards hosted elsewhere can poll the
/// snapshot endpoint.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/ui", get(handlers::ui))
        .route("/metrics", get(handlers::metrics))
        .route("/api/garden-metrics", get(handlers::garden_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
