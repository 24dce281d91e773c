//! Uniform noise sources feeding the environment model.
//!
//! The simulator never calls a global random function. It draws every
//! perturbation from a [`NoiseSource`] supplied at construction, so tests
//! can substitute [`ZeroNoise`] or [`ScriptedNoise`] for [`RandomNoise`].

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A source of uniform noise.
pub trait NoiseSource: Send {
    /// Draw a value uniformly from `[-magnitude, magnitude]`.
    fn uniform(&mut self, magnitude: f64) -> f64;
}

/// Pseudo-random noise backed by a small, fast generator.
#[derive(Debug, Clone)]
pub struct RandomNoise {
    rng: SmallRng,
}

impl RandomNoise {
    /// Create a noise source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Create a reproducible noise source from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for RandomNoise {
    fn uniform(&mut self, magnitude: f64) -> f64 {
        let unit: f64 = self.rng.random();
        unit.mul_add(2.0, -1.0) * magnitude
    }
}

/// Noise that is always zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroNoise;

impl NoiseSource for ZeroNoise {
    fn uniform(&mut self, _magnitude: f64) -> f64 {
        0.0
    }
}

/// Replays a fixed sequence of draws, then yields zero.
///
/// Each scripted value is a unit draw in `[-1, 1]` and is scaled by the
/// requested magnitude, so a script reads the same regardless of which
/// field consumes it. Values outside `[-1, 1]` are clamped.
#[derive(Debug, Clone, Default)]
pub struct ScriptedNoise {
    draws: VecDeque<f64>,
}

impl ScriptedNoise {
    /// Create a script from unit draws in consumption order.
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    /// Number of scripted draws not yet consumed.
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl NoiseSource for ScriptedNoise {
    fn uniform(&mut self, magnitude: f64) -> f64 {
        self.draws
            .pop_front()
            .map_or(0.0, |unit| unit.clamp(-1.0, 1.0) * magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_noise_stays_within_magnitude() {
        let mut noise = RandomNoise::seeded(7);
        for _ in 0..10_000 {
            let value = noise.uniform(1.5);
            assert!((-1.5..=1.5).contains(&value), "drew {value}");
        }
    }

    #[test]
    fn random_noise_is_reproducible() {
        let mut a = RandomNoise::seeded(42);
        let mut b = RandomNoise::seeded(42);
        for _ in 0..100 {
            assert!((a.uniform(20.0) - b.uniform(20.0)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn random_noise_covers_both_signs() {
        let mut noise = RandomNoise::seeded(3);
        let draws: Vec<f64> = (0..1000).map(|_| noise.uniform(1.0)).collect();
        assert!(draws.iter().any(|v| *v < 0.0));
        assert!(draws.iter().any(|v| *v > 0.0));
    }

    #[test]
    fn zero_noise_is_zero() {
        let mut noise = ZeroNoise;
        assert!(noise.uniform(20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn scripted_noise_scales_then_falls_back_to_zero() {
        let mut noise = ScriptedNoise::new([1.0, -0.5, 3.0]);
        assert!((noise.uniform(20.0) - 20.0).abs() < f64::EPSILON);
        assert!((noise.uniform(2.0) + 1.0).abs() < f64::EPSILON);
        assert!((noise.uniform(0.2) - 0.2).abs() < f64::EPSILON);
        assert_eq!(noise.remaining(), 0);
        assert!(noise.uniform(1.5).abs() < f64::EPSILON);
    }
}
