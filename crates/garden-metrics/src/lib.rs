//! Metrics registry and exporter for the Garden telemetry simulator.
//!
//! The registry owns every metric instrument for the lifetime of the
//! process. The simulator writes through opaque handles; two read paths
//! pull current values on demand:
//!
//! - the pull-format text exposition of every registered instrument
//!   (including process-level defaults), and
//! - a JSON-ready snapshot limited to the fixed garden allow-list.
//!
//! # Modules
//!
//! - [`error`] -- [`RegistryError`] for registration and update failures.
//! - [`registry`] -- [`MetricsRegistry`], [`GaugeHandle`], [`CounterHandle`].
//! - [`garden`] -- [`GardenInstruments`], the seven fixed garden metrics.

pub mod error;
pub mod garden;
pub mod registry;

pub use error::RegistryError;
pub use garden::{GARDEN_METRIC_NAMES, GardenInstruments};
pub use registry::{
    CounterHandle, EXPOSITION_CONTENT_TYPE, GaugeHandle, MetricsRegistry, PublishGuard,
};
