//! Tick callback that reports simulator activity through `tracing`.

use garden_core::runner::TickCallback;
use garden_core::simulator::TickSummary;
use tracing::{debug, info, warn};

/// Logs every tick at `debug`, pump starts at `info`, and alerts at `warn`.
#[derive(Debug, Default)]
pub struct LoggingCallback {
    /// Whether the previous tick ended in an alert; used to log only the
    /// first tick of an alert streak at `warn`.
    alerting: bool,
}

impl LoggingCallback {
    /// Create a callback with no alert streak in progress.
    pub const fn new() -> Self {
        Self { alerting: false }
    }
}

impl TickCallback for LoggingCallback {
    fn on_tick(&mut self, summary: &TickSummary) {
        let state = &summary.state;
        debug!(
            tick = summary.tick,
            daylight = summary.daylight,
            soil_moisture = state.soil_moisture,
            air_temperature = state.air_temperature,
            light_level = state.light_level,
            tank_level = state.tank_level,
            pump = ?state.pump,
            "Tick complete"
        );

        if summary.pump_started {
            info!(
                tick = summary.tick,
                soil_moisture = state.soil_moisture,
                tank_level = state.tank_level,
                "Pump started"
            );
        }

        match summary.alert {
            Some(cause) if !self.alerting => {
                warn!(
                    tick = summary.tick,
                    low_tank = cause.low_tank,
                    cold = cause.cold,
                    hot = cause.hot,
                    tank_level = state.tank_level,
                    air_temperature = state.air_temperature,
                    "Alert raised"
                );
                self.alerting = true;
            }
            Some(_) => {}
            None => {
                if self.alerting {
                    info!(tick = summary.tick, "Alert cleared");
                }
                self.alerting = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use garden_core::simulator::AlertCause;
    use garden_types::EnvironmentState;

    use super::*;

    fn summary(tick: u64, alert: Option<AlertCause>) -> TickSummary {
        TickSummary {
            tick,
            daylight: 0.5,
            state: EnvironmentState::initial(),
            pump_started: false,
            alert,
        }
    }

    #[test]
    fn tracks_alert_streaks() {
        let cause = AlertCause {
            low_tank: true,
            cold: false,
            hot: false,
        };
        let mut cb = LoggingCallback::new();
        cb.on_tick(&summary(1, Some(cause)));
        assert!(cb.alerting);
        cb.on_tick(&summary(2, Some(cause)));
        assert!(cb.alerting);
        cb.on_tick(&summary(3, None));
        assert!(!cb.alerting);
    }
}
