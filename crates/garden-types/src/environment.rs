//! Simulated environment state and the closed ranges each field lives in.
//!
//! Every field of [`EnvironmentState`] has a documented range. The simulator
//! clamps into these ranges on every write, so a state produced by a step
//! always satisfies [`EnvironmentState::is_within_bounds`].

use serde::{Deserialize, Serialize};

/// Soil moisture range, in percent.
pub const SOIL_MOISTURE_RANGE: Range = Range::new(5.0, 95.0);

/// Air temperature range, in degrees Celsius.
pub const AIR_TEMPERATURE_RANGE: Range = Range::new(14.0, 35.0);

/// Light level range, in lux.
pub const LIGHT_LEVEL_RANGE: Range = Range::new(50.0, 1200.0);

/// Water tank level range, in percent full.
pub const TANK_LEVEL_RANGE: Range = Range::new(0.0, 100.0);

/// A closed interval `[min, max]` that a state field is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
}

impl Range {
    /// Create a new range. `min` must not exceed `max`.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `value` into the range.
    ///
    /// Uses `max`/`min` rather than [`f64::clamp`] so a NaN input collapses
    /// to the lower bound instead of propagating.
    pub fn clamp(self, value: f64) -> f64 {
        self.min.max(value).min(self.max)
    }

    /// Whether `value` lies inside the range (bounds included).
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Running state of the irrigation pump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PumpState {
    /// The pump is idle.
    #[default]
    Off,
    /// The pump is delivering water.
    On,
}

impl PumpState {
    /// Whether the pump is running.
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// The value pushed into the `garden_pump_on` gauge: `1.0` on, `0.0` off.
    pub const fn as_gauge(self) -> f64 {
        match self {
            Self::Off => 0.0,
            Self::On => 1.0,
        }
    }
}

impl From<bool> for PumpState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// The simulated irrigation environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentState {
    /// Soil moisture percentage, within [`SOIL_MOISTURE_RANGE`].
    pub soil_moisture: f64,
    /// Air temperature in Celsius, within [`AIR_TEMPERATURE_RANGE`].
    pub air_temperature: f64,
    /// Light level in lux, within [`LIGHT_LEVEL_RANGE`].
    pub light_level: f64,
    /// Water tank level percentage, within [`TANK_LEVEL_RANGE`].
    pub tank_level: f64,
    /// Whether the pump ran during the last step.
    pub pump: PumpState,
}

impl EnvironmentState {
    /// The state a freshly started garden begins in.
    pub const fn initial() -> Self {
        Self {
            soil_moisture: 55.0,
            air_temperature: 22.0,
            light_level: 300.0,
            tank_level: 80.0,
            pump: PumpState::Off,
        }
    }

    /// Whether every field lies inside its documented range.
    pub fn is_within_bounds(&self) -> bool {
        SOIL_MOISTURE_RANGE.contains(self.soil_moisture)
            && AIR_TEMPERATURE_RANGE.contains(self.air_temperature)
            && LIGHT_LEVEL_RANGE.contains(self.light_level)
            && TANK_LEVEL_RANGE.contains(self.tank_level)
    }
}

impl Default for EnvironmentState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_respects_bounds() {
        assert!((SOIL_MOISTURE_RANGE.clamp(120.0) - 95.0).abs() < f64::EPSILON);
        assert!((SOIL_MOISTURE_RANGE.clamp(-3.0) - 5.0).abs() < f64::EPSILON);
        assert!((SOIL_MOISTURE_RANGE.clamp(40.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clamp_collapses_nan_to_lower_bound() {
        let clamped = TANK_LEVEL_RANGE.clamp(f64::NAN);
        assert!(TANK_LEVEL_RANGE.contains(clamped));
    }

    #[test]
    fn contains_includes_endpoints() {
        assert!(LIGHT_LEVEL_RANGE.contains(50.0));
        assert!(LIGHT_LEVEL_RANGE.contains(1200.0));
        assert!(!LIGHT_LEVEL_RANGE.contains(1200.01));
    }

    #[test]
    fn initial_state_is_within_bounds() {
        let state = EnvironmentState::initial();
        assert!(state.is_within_bounds());
        assert_eq!(state.pump, PumpState::Off);
    }

    #[test]
    fn out_of_range_state_is_detected() {
        let state = EnvironmentState {
            air_temperature: 36.0,
            ..EnvironmentState::initial()
        };
        assert!(!state.is_within_bounds());
    }

    #[test]
    fn pump_state_gauge_values() {
        assert!(PumpState::Off.as_gauge().abs() < f64::EPSILON);
        assert!((PumpState::On.as_gauge() - 1.0).abs() < f64::EPSILON);
        assert_eq!(PumpState::from(true), PumpState::On);
        assert!(!PumpState::from(false).is_on());
    }

    #[test]
    fn pump_state_serializes_lowercase() {
        let json = serde_json::to_string(&PumpState::On).unwrap_or_default();
        assert_eq!(json, "\"on\"");
    }
}
