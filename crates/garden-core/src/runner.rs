//! Periodic tick loop driving the simulator.
//!
//! [`run_simulation`] owns the [`Simulator`] for the duration of the run and
//! calls [`Simulator::step`] once per interval until the shutdown signal
//! fires. Steps never overlap: the loop awaits nothing while a step runs,
//! and if a step overruns the interval the missed ticks are skipped rather
//! than replayed in a burst.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::info;

use crate::simulator::{Simulator, TickSummary};

/// Result of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Number of steps executed during this run.
    pub total_ticks: u64,
    /// The last tick summary, if any step completed.
    pub final_summary: Option<TickSummary>,
}

/// Callback invoked after each step completes.
pub trait TickCallback: Send {
    /// Called with the summary of the step that just ran.
    fn on_tick(&mut self, summary: &TickSummary);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary) {}
}

/// Run the tick loop until `shutdown` carries `true` or its sender is dropped.
///
/// The first step runs one `interval` after the call, then once per
/// `interval`. The simulator is returned alongside the summary so callers
/// can inspect the final state.
pub async fn run_simulation(
    mut simulator: Simulator,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
    callback: &mut dyn TickCallback,
) -> (Simulator, RunSummary) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut summary = RunSummary {
        total_ticks: 0,
        final_summary: None,
    };

    info!(
        interval_ms = interval.as_millis(),
        "Simulation starting"
    );

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            _ = ticker.tick() => {
                let tick = simulator.step();
                summary.total_ticks = summary.total_ticks.saturating_add(1);
                callback.on_tick(&tick);
                summary.final_summary = Some(tick);
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    // Sender dropped: nobody can ask us to stop any more.
                    break;
                }
            }
        }
    }

    info!(total_ticks = summary.total_ticks, "Simulation stopped");
    (simulator, summary)
}

/// Log the end of a run.
pub fn log_simulation_end(summary: &RunSummary) {
    info!(total_ticks = summary.total_ticks, "Simulation ended");

    if let Some(ref last) = summary.final_summary {
        info!(
            tick = last.tick,
            soil_moisture = last.state.soil_moisture,
            tank_level = last.state.tank_level,
            pump = ?last.state.pump,
            "Final tick summary"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use garden_metrics::{GardenInstruments, MetricsRegistry};

    use super::*;
    use crate::noise::ZeroNoise;

    fn make_simulator() -> Simulator {
        let instruments = GardenInstruments::register(&MetricsRegistry::new()).unwrap();
        Simulator::new(Box::new(ZeroNoise), instruments)
    }

    struct CountCallback {
        ticks: Vec<u64>,
    }

    impl TickCallback for CountCallback {
        fn on_tick(&mut self, summary: &TickSummary) {
            self.ticks.push(summary.tick);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_interval_until_shutdown() {
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut cb = CountCallback { ticks: Vec::new() };
            let (sim, summary) =
                run_simulation(make_simulator(), Duration::from_secs(1), rx, &mut cb).await;
            (sim, summary, cb.ticks)
        });

        time::sleep(Duration::from_millis(3500)).await;
        tx.send(true).unwrap();

        let (sim, summary, ticks) = handle.await.unwrap();
        assert_eq!(summary.total_ticks, 3);
        assert_eq!(ticks, vec![1, 2, 3]);
        assert_eq!(sim.tick(), 3);
        assert_eq!(summary.final_summary.map(|s| s.tick), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn no_step_before_first_interval() {
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            run_simulation(make_simulator(), Duration::from_secs(1), rx, &mut NoOpCallback).await
        });

        time::sleep(Duration::from_millis(500)).await;
        tx.send(true).unwrap();

        let (sim, summary) = handle.await.unwrap();
        assert_eq!(summary.total_ticks, 0);
        assert!(summary.final_summary.is_none());
        assert_eq!(sim.tick(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn pre_set_shutdown_runs_nothing() {
        let (_tx, rx) = watch::channel(true);
        let (_sim, summary) =
            run_simulation(make_simulator(), Duration::from_millis(10), rx, &mut NoOpCallback)
                .await;
        assert_eq!(summary.total_ticks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_sender_stops_the_loop() {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let (_sim, summary) =
            run_simulation(make_simulator(), Duration::from_secs(1), rx, &mut NoOpCallback).await;
        assert_eq!(summary.total_ticks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn steps_publish_into_the_registry() {
        let registry = MetricsRegistry::new();
        let instruments = GardenInstruments::register(&registry).unwrap();
        let simulator = Simulator::new(Box::new(ZeroNoise), instruments);

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            run_simulation(simulator, Duration::from_millis(100), rx, &mut NoOpCallback).await
        });

        time::sleep(Duration::from_millis(250)).await;
        tx.send(true).unwrap();
        let (_sim, summary) = handle.await.unwrap();

        assert_eq!(summary.total_ticks, 2);
        let snapshot = registry.snapshot(&garden_metrics::GARDEN_METRIC_NAMES);
        assert!(snapshot.metrics.iter().all(|m| m.value.is_some()));
    }
}
