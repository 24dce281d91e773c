//! Engine binary for the Garden telemetry simulator.
//!
//! Wires the environment simulator, the metrics registry, and the observer
//! HTTP server together, then runs the tick loop until Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `garden-config.yaml` (optional)
//! 2. Initialize structured logging (tracing)
//! 3. Create the metrics registry and register the garden instruments
//! 4. Create the simulator with its noise source
//! 5. Start the observer HTTP server
//! 6. Install the Ctrl-C shutdown handler
//! 7. Run the tick loop
//! 8. Log the result

mod error;
mod logging_callback;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use garden_core::config::GardenConfig;
use garden_core::noise::{NoiseSource, RandomNoise};
use garden_core::runner;
use garden_core::simulator::Simulator;
use garden_metrics::{GardenInstruments, MetricsRegistry};
use garden_observer::{AppState, ServerConfig};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::logging_callback::LoggingCallback;

/// Path of the optional configuration file, relative to the working directory.
const CONFIG_PATH: &str = "garden-config.yaml";

/// Namespace for the process-level default instruments.
const PROCESS_NAMESPACE: &str = "garden";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any startup step fails. Once the tick loop is
/// running the process only exits on Ctrl-C.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = GardenConfig::load_or_default(Path::new(CONFIG_PATH))
        .map_err(EngineError::from)?;

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("garden-engine starting");
    info!(
        host = config.server.host,
        port = config.server.port,
        tick_interval_ms = config.simulation.tick_interval_ms,
        seed = ?config.simulation.seed,
        "Configuration loaded"
    );

    // 3. Metrics registry and instruments.
    let registry = MetricsRegistry::new();
    registry
        .register_process_collector(PROCESS_NAMESPACE)
        .map_err(EngineError::from)?;
    let instruments = GardenInstruments::register(&registry).map_err(EngineError::from)?;
    info!(
        instruments = registry.instrument_names().len(),
        "Metrics registry initialized"
    );

    // 4. Simulator.
    let noise: Box<dyn NoiseSource> = match config.simulation.seed {
        Some(seed) => Box::new(RandomNoise::seeded(seed)),
        None => Box::new(RandomNoise::from_entropy()),
    };
    let simulator = Simulator::new(noise, instruments.clone());
    info!(state = ?simulator.state(), "Simulator initialized");

    // 5. Observer HTTP server.
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let app_state = Arc::new(AppState::new(instruments));
    let _observer_handle = garden_observer::spawn_observer(&server_config, app_state)
        .await
        .map_err(EngineError::from)?;
    info!(
        host = server_config.host,
        port = server_config.port,
        "Observer server started"
    );

    // 6. Shutdown on Ctrl-C.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => warn!(error = %EngineError::from(e), "Ctrl-C handler failed, stopping"),
        }
        // Receiver gone means the loop already stopped.
        let _ = shutdown_tx.send(true);
    });

    // 7. Run the tick loop.
    let interval = Duration::from_millis(config.simulation.tick_interval_ms);
    let mut callback = LoggingCallback::new();
    let (_simulator, summary) =
        runner::run_simulation(simulator, interval, shutdown_rx, &mut callback).await;

    // 8. Log the result.
    runner::log_simulation_end(&summary);

    Ok(())
}
