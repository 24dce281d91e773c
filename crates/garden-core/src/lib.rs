//! Environment simulator and tick cycle for the Garden telemetry simulator.
//!
//! This crate owns the mutable environment state and advances it once per
//! tick, applying the pump control policy and alert detection in the same
//! step, then pushing the results into the metrics registry.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter and the daylight cycle derived from it.
//! - [`config`] -- Configuration loading from `garden-config.yaml`.
//! - [`constants`] -- Fixed tuning constants of the environment model.
//! - [`noise`] -- [`NoiseSource`] trait and its random, zero, and scripted
//!   implementations.
//! - [`runner`] -- The single-flight periodic tick loop.
//! - [`simulator`] -- [`Simulator`] and its per-tick `step`.
//!
//! [`NoiseSource`]: noise::NoiseSource
//! [`Simulator`]: simulator::Simulator

pub mod clock;
pub mod config;
pub mod constants;
pub mod noise;
pub mod runner;
pub mod simulator;
