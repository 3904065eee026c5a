//! The legacy 3D base terrain noise: two limit noises selected by a main noise.
//!
//! Java reference: `BlendedNoise`

use serde::{Deserialize, Serialize};

use crate::math::clamped_lerp;
use crate::noise::perlin_noise::{OctaveError, wrap};
use crate::noise::PerlinNoise;
use crate::random::Random;

/// Scale applied to the configured xz/y scales before sampling.
const BASE_SCALE: f64 = 684.412;

/// Shape parameters of a blended noise. Stored unseeded in the density graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendedNoiseConfig {
    /// Horizontal scale.
    pub xz_scale: f64,
    /// Vertical scale.
    pub y_scale: f64,
    /// Horizontal divisor for the main noise.
    pub xz_factor: f64,
    /// Vertical divisor for the main noise.
    pub y_factor: f64,
    /// Multiplier of the y-snapping grid.
    pub smear_scale_multiplier: f64,
}

/// A seeded blended noise.
#[derive(Debug, Clone)]
pub struct BlendedNoise {
    min_limit_noise: PerlinNoise,
    max_limit_noise: PerlinNoise,
    main_noise: PerlinNoise,
    xz_multiplier: f64,
    y_multiplier: f64,
    config: BlendedNoiseConfig,
    max_value: f64,
}

impl BlendedNoise {
    /// Seed the three octave stacks sequentially from `random`.
    ///
    /// # Errors
    /// Never fails for the fixed octave ranges used here; the error is the
    /// legacy octave initializer's.
    pub fn new<R: Random + ?Sized>(random: &mut R, config: BlendedNoiseConfig) -> Result<Self, OctaveError> {
        let limit = [1.0; 16];
        let main = [1.0; 8];
        let min_limit_noise = PerlinNoise::create_legacy(random, -15, &limit)?;
        let max_limit_noise = PerlinNoise::create_legacy(random, -15, &limit)?;
        let main_noise = PerlinNoise::create_legacy(random, -7, &main)?;
        let xz_multiplier = BASE_SCALE * config.xz_scale;
        let y_multiplier = BASE_SCALE * config.y_scale;
        let max_value = min_limit_noise.max_broken_value(y_multiplier);
        Ok(Self {
            min_limit_noise,
            max_limit_noise,
            main_noise,
            xz_multiplier,
            y_multiplier,
            config,
            max_value,
        })
    }

    /// Sample at a block position.
    #[must_use]
    #[allow(clippy::similar_names)]
    pub fn compute(&self, block_x: i32, block_y: i32, block_z: i32) -> f64 {
        let x = f64::from(block_x) * self.xz_multiplier;
        let y = f64::from(block_y) * self.y_multiplier;
        let z = f64::from(block_z) * self.xz_multiplier;
        let main_x = x / self.config.xz_factor;
        let main_y = y / self.config.y_factor;
        let main_z = z / self.config.xz_factor;
        let smear = self.y_multiplier * self.config.smear_scale_multiplier;
        let main_smear = smear / self.config.y_factor;

        let mut main = 0.0;
        let mut scale = 1.0;
        for octave in 0..8 {
            if let Some(noise) = self.main_noise.get_octave_noise(octave) {
                main += noise.noise_with_y_scale(
                    wrap(main_x * scale),
                    wrap(main_y * scale),
                    wrap(main_z * scale),
                    main_smear * scale,
                    main_y * scale,
                ) / scale;
            }
            scale /= 2.0;
        }

        let selector = (main / 10.0 + 1.0) / 2.0;
        let only_max = selector >= 1.0;
        let only_min = selector <= 0.0;

        let mut min_value = 0.0;
        let mut max_value = 0.0;
        scale = 1.0;
        for octave in 0..16 {
            let wx = wrap(x * scale);
            let wy = wrap(y * scale);
            let wz = wrap(z * scale);
            let y_scale = smear * scale;
            if !only_max && let Some(noise) = self.min_limit_noise.get_octave_noise(octave) {
                min_value += noise.noise_with_y_scale(wx, wy, wz, y_scale, y * scale) / scale;
            }
            if !only_min && let Some(noise) = self.max_limit_noise.get_octave_noise(octave) {
                max_value += noise.noise_with_y_scale(wx, wy, wz, y_scale, y * scale) / scale;
            }
            scale /= 2.0;
        }

        clamped_lerp(min_value / 512.0, max_value / 512.0, selector) / 128.0
    }

    /// Upper bound of the absolute output.
    #[inline]
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }
}
