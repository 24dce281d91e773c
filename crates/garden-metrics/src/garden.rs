//! The seven fixed garden instruments and their snapshot allow-list.

use garden_types::MetricsSnapshot;

use crate::error::RegistryError;
use crate::registry::{CounterHandle, GaugeHandle, MetricsRegistry};

/// Soil moisture gauge name.
pub const SOIL_MOISTURE: &str = "garden_soil_moisture_percent";
/// Air temperature gauge name.
pub const AIR_TEMPERATURE: &str = "garden_air_temperature_celsius";
/// Light level gauge name.
pub const LIGHT_LEVEL: &str = "garden_light_lux";
/// Tank level gauge name.
pub const TANK_LEVEL: &str = "garden_tank_level_percent";
/// Pump state gauge name.
pub const PUMP_ON: &str = "garden_pump_on";
/// Pump cycle counter name.
pub const PUMP_CYCLES: &str = "garden_pump_cycles_total";
/// Alert counter name.
pub const ALERTS: &str = "garden_alerts_total";

/// Names included in a garden snapshot, in registration order.
pub const GARDEN_METRIC_NAMES: [&str; 7] = [
    SOIL_MOISTURE,
    AIR_TEMPERATURE,
    LIGHT_LEVEL,
    TANK_LEVEL,
    PUMP_ON,
    PUMP_CYCLES,
    ALERTS,
];

/// Handles to the garden instruments, plus the registry that owns them.
#[derive(Debug, Clone)]
pub struct GardenInstruments {
    registry: MetricsRegistry,
    /// Soil moisture percentage.
    pub soil_moisture: GaugeHandle,
    /// Air temperature in Celsius.
    pub air_temperature: GaugeHandle,
    /// Light level in lux.
    pub light_level: GaugeHandle,
    /// Water tank level percentage.
    pub tank_level: GaugeHandle,
    /// Pump state, `1` running and `0` idle.
    pub pump_on: GaugeHandle,
    /// Number of times the pump switched on.
    pub pump_cycles: CounterHandle,
    /// Number of steps that ended in an alert condition.
    pub alerts: CounterHandle,
}

impl GardenInstruments {
    /// Register all seven instruments on `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if any garden name is already
    /// registered, which means the garden was registered twice.
    pub fn register(registry: &MetricsRegistry) -> Result<Self, RegistryError> {
        Ok(Self {
            soil_moisture: registry
                .register_gauge(SOIL_MOISTURE, "Simulated soil moisture percentage")?,
            air_temperature: registry
                .register_gauge(AIR_TEMPERATURE, "Simulated air temperature in Celsius")?,
            light_level: registry.register_gauge(LIGHT_LEVEL, "Simulated light level in lux")?,
            tank_level: registry
                .register_gauge(TANK_LEVEL, "Simulated water tank level percentage")?,
            pump_on: registry.register_gauge(PUMP_ON, "Pump running state (1 on, 0 off)")?,
            pump_cycles: registry.register_counter(PUMP_CYCLES, "Total pump cycles")?,
            alerts: registry.register_counter(
                ALERTS,
                "Total alert events (low tank or extreme temps)",
            )?,
            registry: registry.clone(),
        })
    }

    /// The registry these instruments live in.
    pub const fn registry(&self) -> &MetricsRegistry {
        &self.registry
    }

    /// Snapshot of exactly the garden instruments.
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.registry.snapshot(&GARDEN_METRIC_NAMES)
    }

    /// Full text exposition of the registry, garden and process metrics alike.
    ///
    /// # Errors
    ///
    /// Propagates [`MetricsRegistry::render_exposition`] failures.
    pub fn render_exposition(&self) -> Result<String, RegistryError> {
        self.registry.render_exposition()
    }
}
