//! Tick counter and the daylight cycle derived from it.
//!
//! The tick number is the only stored temporal state. Daylight is computed
//! from it on demand, never stored independently.

use std::f64::consts::PI;

use crate::constants::DAYLIGHT_PERIOD_TICKS;

/// Simulation clock tracking the number of completed ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationClock {
    /// Current tick number (starts at 0, incremented at the start of each step).
    tick: u64,
}

impl SimulationClock {
    /// Create a clock at tick 0.
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// Create a clock at an arbitrary tick (useful for tests).
    pub const fn at(tick: u64) -> Self {
        Self { tick }
    }

    /// Advance the clock by one tick and return the new tick number.
    ///
    /// Wraps at `u64::MAX`; at one tick per second that is far beyond any
    /// process lifetime.
    pub const fn advance(&mut self) -> u64 {
        self.tick = self.tick.wrapping_add(1);
        self.tick
    }

    /// The current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Daylight factor in `[0, 1]` for the current tick.
    pub fn daylight(&self) -> f64 {
        daylight_at(self.tick)
    }
}

/// Daylight factor in `[0, 1]` at `tick`: `sin(tick / 180 * PI) * 0.5 + 0.5`.
pub fn daylight_at(tick: u64) -> f64 {
    // Precision loss past 2^53 ticks is irrelevant for a smooth sine input.
    #[allow(clippy::cast_precision_loss)]
    let ticks = tick as f64;
    (ticks / DAYLIGHT_PERIOD_TICKS * PI).sin().mul_add(0.5, 0.5)
}
