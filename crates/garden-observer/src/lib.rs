//! Observer HTTP server for the Garden telemetry simulator.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Exposition endpoint** (`/metrics`) with the pull-format text of every
//!   registered instrument, for the time-series database to scrape
//! - **Snapshot endpoint** (`/api/garden-metrics`) with the JSON values of
//!   the seven garden instruments
//! - **Display page** (`/ui`) that polls the snapshot endpoint, and a
//!   redirect from `/` to it
//!
//! # Architecture
//!
//! Handlers only read from the metrics registry held in [`AppState`]. The
//! simulator writes into the same registry from its own task, so serving a
//! request never waits on more than one step's publish.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, spawn_observer};
pub use state::AppState;
