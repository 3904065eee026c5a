//! Octave-summed Perlin noise.
//!
//! Java reference: `PerlinNoise`

use thiserror::Error;

use crate::noise::ImprovedNoise;
use crate::random::{PositionalRandom, Random};

/// Coordinates are wrapped modulo 2^25 so far-out samples keep their precision.
const ROUND_OFF: f64 = 33_554_432.0;

/// Draws consumed by an absent legacy octave (3 doubles and 256 ints).
const SKIPPED_OCTAVE_DRAWS: u32 = 262;

/// Invalid octave configuration for the legacy initialization.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OctaveError {
    /// Octaves above zero cannot be seeded the legacy way.
    #[error("positive octaves are not supported by the legacy initialization (first octave {0})")]
    PositiveOctaves(i32),
}

/// Several [`ImprovedNoise`] octaves summed at halving amplitude and doubling frequency.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    /// Octaves from lowest to highest frequency; `None` where the amplitude is zero.
    noise_levels: Vec<Option<ImprovedNoise>>,
    amplitudes: Vec<f64>,
    lowest_freq_input_factor: f64,
    lowest_freq_value_factor: f64,
    max_value: f64,
}

impl PerlinNoise {
    /// New initialization: fork a positional factory off `random` and seed every
    /// octave from `"octave_{n}"`.
    #[must_use]
    pub fn create<R: Random + ?Sized>(random: &mut R, first_octave: i32, amplitudes: &[f64]) -> Self {
        let splitter = random.next_positional();
        let noise_levels = amplitudes
            .iter()
            .enumerate()
            .map(|(i, &amplitude)| {
                (amplitude != 0.0).then(|| {
                    let octave = first_octave + i as i32;
                    ImprovedNoise::new(&mut splitter.with_hash_of(&format!("octave_{octave}")))
                })
            })
            .collect();
        Self::from_levels(noise_levels, first_octave, amplitudes)
    }

    /// Legacy initialization: octaves are drawn sequentially from `random`,
    /// starting at octave zero and walking down, skipping 262 draws per absent
    /// octave.
    ///
    /// # Errors
    /// Fails when `first_octave + amplitudes.len() - 1 > 0`.
    pub fn create_legacy<R: Random + ?Sized>(
        random: &mut R,
        first_octave: i32,
        amplitudes: &[f64],
    ) -> Result<Self, OctaveError> {
        let octaves = amplitudes.len();
        let zero_octave = -first_octave;
        if zero_octave < octaves as i32 - 1 {
            return Err(OctaveError::PositiveOctaves(first_octave));
        }

        let mut noise_levels = vec![None; octaves];
        let zero = ImprovedNoise::new(random);
        if zero_octave >= 0 && (zero_octave as usize) < octaves && amplitudes[zero_octave as usize] != 0.0 {
            noise_levels[zero_octave as usize] = Some(zero);
        }
        for i in (0..zero_octave).rev() {
            let index = i as usize;
            if index < octaves && amplitudes[index] != 0.0 {
                noise_levels[index] = Some(ImprovedNoise::new(random));
            } else {
                random.consume_count(SKIPPED_OCTAVE_DRAWS);
            }
        }

        Ok(Self::from_levels(noise_levels, first_octave, amplitudes))
    }

    fn from_levels(noise_levels: Vec<Option<ImprovedNoise>>, first_octave: i32, amplitudes: &[f64]) -> Self {
        let octaves = amplitudes.len() as i32;
        let lowest_freq_input_factor = 2.0_f64.powi(first_octave);
        let lowest_freq_value_factor = 2.0_f64.powi(octaves - 1) / (2.0_f64.powi(octaves) - 1.0);
        let mut noise = Self {
            noise_levels,
            amplitudes: amplitudes.to_vec(),
            lowest_freq_input_factor,
            lowest_freq_value_factor,
            max_value: 0.0,
        };
        noise.max_value = noise.edge_value(2.0);
        noise
    }

    /// Sum of `amplitude * noise_value * value_factor` over present octaves.
    #[must_use]
    pub fn edge_value(&self, noise_value: f64) -> f64 {
        let mut value = 0.0;
        let mut value_factor = self.lowest_freq_value_factor;
        for (level, &amplitude) in self.noise_levels.iter().zip(&self.amplitudes) {
            if level.is_some() {
                value += amplitude * noise_value * value_factor;
            }
            value_factor /= 2.0;
        }
        value
    }

    /// Upper bound of the y-snapped samples taken by blended noise.
    #[must_use]
    pub fn max_broken_value(&self, y_multiplier: f64) -> f64 {
        self.edge_value(y_multiplier + 2.0)
    }

    /// Sample at a point.
    #[must_use]
    pub fn get_value(&self, x: f64, y: f64, z: f64) -> f64 {
        let mut value = 0.0;
        let mut input_factor = self.lowest_freq_input_factor;
        let mut value_factor = self.lowest_freq_value_factor;
        for (level, &amplitude) in self.noise_levels.iter().zip(&self.amplitudes) {
            if let Some(noise) = level {
                let sample = noise.noise(
                    wrap(x * input_factor),
                    wrap(y * input_factor),
                    wrap(z * input_factor),
                );
                value += amplitude * sample * value_factor;
            }
            input_factor *= 2.0;
            value_factor /= 2.0;
        }
        value
    }

    /// Octave `i` counted from the highest frequency.
    #[must_use]
    pub fn get_octave_noise(&self, i: usize) -> Option<&ImprovedNoise> {
        let index = self.noise_levels.len().checked_sub(1 + i)?;
        self.noise_levels[index].as_ref()
    }

    /// Maximum absolute output.
    #[inline]
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }
}

/// Wrap a coordinate into `[-2^24, 2^24)`.
#[inline]
#[must_use]
pub fn wrap(x: f64) -> f64 {
    x - (x / ROUND_OFF + 0.5).floor() * ROUND_OFF
}
