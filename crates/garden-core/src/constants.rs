//! Tuning constants of the environment model.
//!
//! The values are chosen to look plausible on a dashboard. They are fixed
//! at compile time and not exposed through configuration.

/// Ticks per half period of the daylight sine wave. With one tick per
/// second a full day/night cycle takes six minutes.
pub const DAYLIGHT_PERIOD_TICKS: f64 = 180.0;

/// Light level with no daylight, in lux.
pub const LIGHT_BASE: f64 = 100.0;
/// Light added at full daylight, in lux.
pub const LIGHT_SPAN: f64 = 900.0;
/// Magnitude of the uniform light noise, in lux.
pub const LIGHT_NOISE: f64 = 20.0;

/// Air temperature with no daylight, in Celsius.
pub const TEMPERATURE_BASE: f64 = 18.0;
/// Temperature added at full daylight, in Celsius.
pub const TEMPERATURE_SPAN: f64 = 10.0;
/// Magnitude of the uniform temperature noise, in Celsius.
pub const TEMPERATURE_NOISE: f64 = 1.0;

/// Magnitude of the soil moisture random walk per tick, in percent.
pub const SOIL_NOISE: f64 = 1.5;

/// The pump runs while soil moisture is strictly below this percentage.
pub const PUMP_MOISTURE_THRESHOLD: f64 = 30.0;
/// The pump only runs while the tank is strictly above this percentage.
pub const PUMP_TANK_THRESHOLD: f64 = 10.0;
/// Moisture added by one tick of pumping, in percent.
pub const PUMP_MOISTURE_BOOST: f64 = 6.0;
/// Tank level consumed by one tick of pumping, in percent.
pub const PUMP_TANK_DRAW: f64 = 1.2;
/// Magnitude of the tank level drift while the pump is idle, in percent.
pub const IDLE_TANK_NOISE: f64 = 0.2;

/// A tank level strictly below this percentage raises an alert.
pub const ALERT_TANK_LOW: f64 = 10.0;
/// A temperature strictly below this raises an alert, in Celsius.
pub const ALERT_TEMPERATURE_LOW: f64 = 15.0;
/// A temperature strictly above this raises an alert, in Celsius.
pub const ALERT_TEMPERATURE_HIGH: f64 = 32.0;

/// Default real-time interval between ticks, in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
