//! Shared type definitions for the Garden telemetry simulator.
//!
//! This crate is the single source of truth for the types that cross crate
//! boundaries: the simulated environment state, and the JSON shapes served
//! by the observer's snapshot endpoint.
//!
//! # Modules
//!
//! - [`environment`] -- Environment state, pump state, and field ranges
//! - [`metrics`] -- Metric kinds, samples, and the JSON snapshot payload

pub mod environment;
pub mod metrics;

// Re-export all public types at crate root for convenience.
pub use environment::{
    AIR_TEMPERATURE_RANGE, EnvironmentState, LIGHT_LEVEL_RANGE, PumpState, Range,
    SOIL_MOISTURE_RANGE, TANK_LEVEL_RANGE,
};
pub use metrics::{MetricKind, MetricSample, MetricsSnapshot};
