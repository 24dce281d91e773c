//! Shared application state for the Observer server.

use garden_metrics::{GardenInstruments, MetricsRegistry};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor. Holds handles only; the registry owns the values.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The garden instruments and, through them, the full registry.
    pub instruments: GardenInstruments,
}

impl AppState {
    /// Create application state serving `instruments`.
    pub const fn new(instruments: GardenInstruments) -> Self {
        Self { instruments }
    }

    /// The registry backing the exposition endpoint.
    pub const fn registry(&self) -> &MetricsRegistry {
        self.instruments.registry()
    }
}
