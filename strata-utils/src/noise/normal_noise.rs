//! Double Perlin noise, normalized to a roughly unit deviation.
//!
//! Java reference: `NormalNoise`

use crate::noise::perlin_noise::OctaveError;
use crate::noise::{NoiseParameters, PerlinNoise};
use crate::random::Random;

/// Scale applied to the second sampler's coordinates.
#[allow(clippy::unreadable_literal)]
pub const INPUT_FACTOR: f64 = 1.0181268882175227;

/// Target deviation (1/6) the value factor normalizes to.
#[allow(clippy::unreadable_literal)]
const TARGET_DEVIATION: f64 = 0.16666666666666666;

/// Two [`PerlinNoise`] samplers at slightly different scales, summed and normalized.
#[derive(Debug, Clone)]
pub struct NormalNoise {
    first: PerlinNoise,
    second: PerlinNoise,
    value_factor: f64,
    max_value: f64,
}

impl NormalNoise {
    /// Build both samplers with the new octave initialization.
    #[must_use]
    pub fn create<R: Random + ?Sized>(random: &mut R, parameters: &NoiseParameters) -> Self {
        let first = PerlinNoise::create(random, parameters.first_octave, &parameters.amplitudes);
        let second = PerlinNoise::create(random, parameters.first_octave, &parameters.amplitudes);
        Self::from_samplers(first, second, &parameters.amplitudes)
    }

    /// Build both samplers with the legacy octave initialization, as the nether
    /// climate noises of legacy dimensions are.
    ///
    /// # Errors
    /// Fails for parameters with positive octaves.
    pub fn create_legacy_nether_biome<R: Random + ?Sized>(
        random: &mut R,
        parameters: &NoiseParameters,
    ) -> Result<Self, OctaveError> {
        let first = PerlinNoise::create_legacy(random, parameters.first_octave, &parameters.amplitudes)?;
        let second = PerlinNoise::create_legacy(random, parameters.first_octave, &parameters.amplitudes)?;
        Ok(Self::from_samplers(first, second, &parameters.amplitudes))
    }

    fn from_samplers(first: PerlinNoise, second: PerlinNoise, amplitudes: &[f64]) -> Self {
        let mut lowest = usize::MAX;
        let mut highest = 0usize;
        for (i, _) in amplitudes.iter().enumerate().filter(|(_, a)| **a != 0.0) {
            lowest = lowest.min(i);
            highest = highest.max(i);
        }
        // All-zero amplitudes leave the span at zero width.
        let span = highest.saturating_sub(lowest) as i32;
        let value_factor = TARGET_DEVIATION / expected_deviation(span);
        let max_value = (first.max_value() + second.max_value()) * value_factor;
        Self {
            first,
            second,
            value_factor,
            max_value,
        }
    }

    /// Sample at a point.
    #[inline]
    #[must_use]
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        let first = self.first.get_value(x, y, z);
        let second = self
            .second
            .get_value(x * INPUT_FACTOR, y * INPUT_FACTOR, z * INPUT_FACTOR);
        (first + second) * self.value_factor
    }

    /// Maximum absolute output.
    #[inline]
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }
}

#[inline]
fn expected_deviation(octave_span: i32) -> f64 {
    0.1 * (1.0 + 1.0 / f64::from(octave_span + 1))
}
