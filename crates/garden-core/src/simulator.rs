//! The environment simulator and its per-tick step.
//!
//! Each call to [`Simulator::step`] runs these phases in order, reading only
//! pre-step values unless stated otherwise:
//!
//! 1. **Clock** -- advance the tick counter and derive the daylight factor.
//! 2. **Light** -- `100 + d * 900` plus up to 20 lux of noise.
//! 3. **Temperature** -- `18 + d * 10` plus up to 1 degree of noise.
//! 4. **Soil** -- random walk of up to 1.5 percent.
//! 5. **Pump** -- runs iff the walked moisture is below 30 and the pre-step
//!    tank is above 10. Running adds 6 percent moisture and draws 1.2
//!    percent from the tank; idle lets the tank drift by up to 0.2 percent.
//! 6. **Edge** -- count a pump cycle on the off-to-on transition only.
//! 7. **Alert** -- count one alert if the post-step tank is below 10 or the
//!    post-step temperature is below 15 or above 32.
//! 8. **Publish** -- push post-step values into the gauges.
//!
//! Noise is drawn in the order light, temperature, soil, and (only when the
//! pump is idle) tank. Every field is clamped into its documented range on
//! write, so the step has no failure modes.

use garden_metrics::GardenInstruments;
use garden_types::{
    AIR_TEMPERATURE_RANGE, EnvironmentState, LIGHT_LEVEL_RANGE, PumpState, SOIL_MOISTURE_RANGE,
    TANK_LEVEL_RANGE,
};
use tracing::warn;

use crate::clock::SimulationClock;
use crate::constants::{
    ALERT_TANK_LOW, ALERT_TEMPERATURE_HIGH, ALERT_TEMPERATURE_LOW, IDLE_TANK_NOISE, LIGHT_BASE,
    LIGHT_NOISE, LIGHT_SPAN, PUMP_MOISTURE_BOOST, PUMP_MOISTURE_THRESHOLD, PUMP_TANK_DRAW,
    PUMP_TANK_THRESHOLD, SOIL_NOISE, TEMPERATURE_BASE, TEMPERATURE_NOISE, TEMPERATURE_SPAN,
};
use crate::noise::NoiseSource;

/// Which alert conditions held at the end of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertCause {
    /// Tank level below the low-water threshold.
    pub low_tank: bool,
    /// Air temperature below the cold threshold.
    pub cold: bool,
    /// Air temperature above the hot threshold.
    pub hot: bool,
}

impl AlertCause {
    /// Evaluate the alert conditions on a post-step state.
    ///
    /// Returns `None` when no condition holds.
    pub fn evaluate(state: &EnvironmentState) -> Option<Self> {
        let cause = Self {
            low_tank: state.tank_level < ALERT_TANK_LOW,
            cold: state.air_temperature < ALERT_TEMPERATURE_LOW,
            hot: state.air_temperature > ALERT_TEMPERATURE_HIGH,
        };
        (cause.low_tank || cause.cold || cause.hot).then_some(cause)
    }
}

/// Summary of a single step's execution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Daylight factor used for this tick.
    pub daylight: f64,
    /// Environment state at the end of the tick.
    pub state: EnvironmentState,
    /// Whether the pump switched on during this tick.
    pub pump_started: bool,
    /// Alert conditions raised this tick, if any.
    pub alert: Option<AlertCause>,
}

/// The pump control policy.
///
/// `moisture` is the soil moisture after this tick's random walk; `tank` is
/// the tank level before the step. Both thresholds are strict.
pub fn pump_should_run(moisture: f64, tank: f64) -> bool {
    moisture < PUMP_MOISTURE_THRESHOLD && tank > PUMP_TANK_THRESHOLD
}

/// Owns the environment state and advances it one tick at a time.
///
/// The simulator is driven through `&mut self`, so at most one step can be
/// in flight. Readers never touch it; they observe its output through the
/// metrics registry.
pub struct Simulator {
    state: EnvironmentState,
    clock: SimulationClock,
    noise: Box<dyn NoiseSource>,
    instruments: GardenInstruments,
}

impl Simulator {
    /// Create a simulator starting from [`EnvironmentState::initial`].
    pub fn new(noise: Box<dyn NoiseSource>, instruments: GardenInstruments) -> Self {
        Self::with_state(EnvironmentState::initial(), noise, instruments)
    }

    /// Create a simulator from an explicit starting state.
    ///
    /// Fields outside their ranges are clamped.
    pub fn with_state(
        state: EnvironmentState,
        noise: Box<dyn NoiseSource>,
        instruments: GardenInstruments,
    ) -> Self {
        Self {
            state: clamp_state(state),
            clock: SimulationClock::new(),
            noise,
            instruments,
        }
    }

    /// The current environment state.
    pub const fn state(&self) -> &EnvironmentState {
        &self.state
    }

    /// The current tick number.
    pub const fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// The instruments this simulator publishes into.
    pub const fn instruments(&self) -> &GardenInstruments {
        &self.instruments
    }

    /// Advance the environment by one tick and publish the new values.
    pub fn step(&mut self) -> TickSummary {
        let previous = self.state;

        let tick = self.clock.advance();
        let daylight = self.clock.daylight();

        let light_level = LIGHT_LEVEL_RANGE
            .clamp(daylight.mul_add(LIGHT_SPAN, LIGHT_BASE) + self.noise.uniform(LIGHT_NOISE));
        let air_temperature = AIR_TEMPERATURE_RANGE.clamp(
            daylight.mul_add(TEMPERATURE_SPAN, TEMPERATURE_BASE)
                + self.noise.uniform(TEMPERATURE_NOISE),
        );
        let mut soil_moisture =
            SOIL_MOISTURE_RANGE.clamp(previous.soil_moisture + self.noise.uniform(SOIL_NOISE));

        let pump = PumpState::from(pump_should_run(soil_moisture, previous.tank_level));
        let tank_level = if pump.is_on() {
            soil_moisture = SOIL_MOISTURE_RANGE.clamp(soil_moisture + PUMP_MOISTURE_BOOST);
            TANK_LEVEL_RANGE.clamp(previous.tank_level - PUMP_TANK_DRAW)
        } else {
            TANK_LEVEL_RANGE.clamp(previous.tank_level + self.noise.uniform(IDLE_TANK_NOISE))
        };

        let pump_started = pump.is_on() && !previous.pump.is_on();

        self.state = EnvironmentState {
            soil_moisture,
            air_temperature,
            light_level,
            tank_level,
            pump,
        };
        debug_assert!(self.state.is_within_bounds(), "state out of range: {:?}", self.state);

        let alert = AlertCause::evaluate(&self.state);
        self.publish(pump_started, alert.is_some());

        TickSummary {
            tick,
            daylight,
            state: self.state,
            pump_started,
            alert,
        }
    }

    /// Push counters and gauges as one batch so readers see the whole step.
    fn publish(&self, pump_started: bool, alert: bool) {
        let instruments = &self.instruments;
        let _batch = instruments.registry().publish();

        if pump_started {
            instruments.pump_cycles.inc();
        }
        if alert {
            instruments.alerts.inc();
        }

        let gauges = [
            (&instruments.soil_moisture, self.state.soil_moisture),
            (&instruments.air_temperature, self.state.air_temperature),
            (&instruments.light_level, self.state.light_level),
            (&instruments.tank_level, self.state.tank_level),
            (&instruments.pump_on, self.state.pump.as_gauge()),
        ];
        for (gauge, value) in gauges {
            if let Err(e) = gauge.set(value) {
                warn!(error = %e, "gauge update rejected");
            }
        }
    }

    #[cfg(test)]
    fn force_levels(&mut self, soil_moisture: f64, tank_level: f64) {
        self.state.soil_moisture = soil_moisture;
        self.state.tank_level = tank_level;
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("state", &self.state)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

fn clamp_state(state: EnvironmentState) -> EnvironmentState {
    EnvironmentState {
        soil_moisture: SOIL_MOISTURE_RANGE.clamp(state.soil_moisture),
        air_temperature: AIR_TEMPERATURE_RANGE.clamp(state.air_temperature),
        light_level: LIGHT_LEVEL_RANGE.clamp(state.light_level),
        tank_level: TANK_LEVEL_RANGE.clamp(state.tank_level),
        pump: state.pump,
    }
}
