//! # Height Field
//!
//! Continuous elevation function over the infinite (x, z) plane.
//!
//! Two independent noise channels are combined:
//! - **Biome**: sampled at a coarse scale, mapped to [0, 1], and used to
//!   pick a local amplitude between `min_amplitude` and `max_amplitude`
//! - **Detail**: sampled at the base scale and at 4x and 10x that scale;
//!   only the base term is multiplied by the biome amplitude
//!
//! Everything below zero is cut off, which leaves flat basins where the
//! noise dips.

use serde::{Deserialize, Serialize};

use crate::noise::{SimplexNoise, WorldSeed};

/// Tuning for `HeightField`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightFieldParams {
    /// Frequency of the biome channel.
    pub biome_scale: f64,
    /// Frequency of the base detail octave.
    pub base_scale: f64,
    /// Amplitude where the biome value is 0.
    pub min_amplitude: f64,
    /// Amplitude where the biome value is 1.
    pub max_amplitude: f64,
    /// Frequency multiplier of the middle octave.
    pub detail_multiplier: f64,
    /// Weight of the middle octave.
    pub detail_weight: f64,
    /// Frequency multiplier of the fine octave.
    pub fine_multiplier: f64,
    /// Weight of the fine octave.
    pub fine_weight: f64,
}

impl Default for HeightFieldParams {
    fn default() -> Self {
        Self {
            biome_scale: 0.005,
            base_scale: 0.02,
            min_amplitude: 5.0,
            max_amplitude: 40.0,
            detail_multiplier: 4.0,
            detail_weight: 2.0,
            fine_multiplier: 10.0,
            fine_weight: 0.5,
        }
    }
}

/// Deterministic terrain elevation function.
pub struct HeightField {
    biome_noise: SimplexNoise,
    detail_noise: SimplexNoise,
    params: HeightFieldParams,
}

impl HeightField {
    /// Seed channel for the biome generator.
    const BIOME_CHANNEL: u64 = 1;
    /// Seed channel for the detail generator.
    const DETAIL_CHANNEL: u64 = 2;

    /// Creates a height field with default tuning.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self::with_params(seed, HeightFieldParams::default())
    }

    /// Creates a height field with explicit tuning.
    #[must_use]
    pub fn with_params(seed: WorldSeed, params: HeightFieldParams) -> Self {
        Self {
            biome_noise: SimplexNoise::new(seed.derive(Self::BIOME_CHANNEL)),
            detail_noise: SimplexNoise::new(seed.derive(Self::DETAIL_CHANNEL)),
            params,
        }
    }

    /// Active tuning.
    #[must_use]
    pub const fn params(&self) -> &HeightFieldParams {
        &self.params
    }

    /// Biome value in [0, 1] at `(x, z)`.
    #[must_use]
    pub fn biome_value(&self, x: f64, z: f64) -> f64 {
        let s = self.params.biome_scale;
        self.biome_noise.sample_unit(x * s, z * s)
    }

    /// Amplitude for a biome value.
    #[inline]
    #[must_use]
    pub fn amplitude(&self, biome: f64) -> f64 {
        let p = &self.params;
        p.min_amplitude + (p.max_amplitude - p.min_amplitude) * biome
    }

    /// Elevation at `(x, z)`, never negative.
    #[must_use]
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        let p = &self.params;
        let amplitude = self.amplitude(self.biome_value(x, z));

        let xs = x * p.base_scale;
        let zs = z * p.base_scale;
        let base = self.detail_noise.sample(xs, zs) * amplitude;
        let detail = self
            .detail_noise
            .sample(xs * p.detail_multiplier, zs * p.detail_multiplier)
            * p.detail_weight;
        let fine = self
            .detail_noise
            .sample(xs * p.fine_multiplier, zs * p.fine_multiplier)
            * p.fine_weight;

        (base + detail + fine).max(0.0)
    }

    /// `sample` narrowed to the grid's precision.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample_f32(&self, x: f32, z: f32) -> f32 {
        self.sample(f64::from(x), f64::from(z)) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_repeatable() {
        let field = HeightField::new(WorldSeed::new(99));
        for i in 0..200 {
            let x = f64::from(i) * 3.7 - 250.0;
            let z = f64::from(i) * -2.1 + 120.0;
            assert_eq!(field.sample(x, z), field.sample(x, z));
        }
    }

    #[test]
    fn test_never_negative() {
        let field = HeightField::new(WorldSeed::new(3));
        for i in 0..5_000 {
            let x = f64::from(i % 100) * 5.0 - 250.0;
            let z = f64::from(i / 100) * 10.0 - 250.0;
            assert!(field.sample(x, z) >= 0.0);
        }
    }

    #[test]
    fn test_bounded_by_amplitude_budget() {
        let field = HeightField::new(WorldSeed::new(3));
        let p = field.params();
        let ceiling = p.max_amplitude + p.detail_weight + p.fine_weight;
        for i in 0..5_000 {
            let x = f64::from(i) * 0.9;
            let z = f64::from(i) * 1.3;
            assert!(field.sample(x, z) <= ceiling);
        }
    }

    #[test]
    fn test_amplitude_interpolates() {
        let field = HeightField::new(WorldSeed::default());
        assert!((field.amplitude(0.0) - 5.0).abs() < 1e-12);
        assert!((field.amplitude(1.0) - 40.0).abs() < 1e-12);
        assert!((field.amplitude(0.5) - 22.5).abs() < 1e-12);
    }

    #[test]
    fn test_channels_are_independent() {
        let field = HeightField::new(WorldSeed::new(11));
        let x = 37.25;
        let z = -81.5;
        let biome_raw = field.biome_noise.sample(x, z);
        let detail_raw = field.detail_noise.sample(x, z);
        assert_ne!(biome_raw, detail_raw);
    }

    #[test]
    fn test_flat_params_give_floor() {
        let params = HeightFieldParams {
            min_amplitude: 0.0,
            max_amplitude: 0.0,
            detail_weight: 0.0,
            fine_weight: 0.0,
            ..HeightFieldParams::default()
        };
        let field = HeightField::with_params(WorldSeed::new(5), params);
        assert_eq!(field.sample(12.0, 34.0), 0.0);
    }
}
