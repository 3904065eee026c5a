//! Noise generation primitives matching vanilla Minecraft's noise system.
//!
//! - [`ImprovedNoise`] - single octave Perlin noise
//! - [`PerlinNoise`] - octave sums, with the new and the legacy seeding
//! - [`NormalNoise`] - double Perlin noise, the sampler behind every named noise
//! - [`BlendedNoise`] - legacy 3D base terrain noise
//! - [`SimplexNoise`] and [`EndIslands`] - the end island field

use serde::{Deserialize, Serialize};

mod blended_noise;
mod end_islands;
mod improved_noise;
mod normal_noise;
pub mod perlin_noise;
mod simplex_noise;

pub use blended_noise::{BlendedNoise, BlendedNoiseConfig};
pub use end_islands::EndIslands;
pub use improved_noise::ImprovedNoise;
pub use normal_noise::{INPUT_FACTOR, NormalNoise};
pub use perlin_noise::{OctaveError, PerlinNoise};
pub use simplex_noise::SimplexNoise;

/// Octave layout of a named noise.
///
/// Java reference: `NormalNoise.NoiseParameters`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseParameters {
    /// Octave of the first amplitude; negative octaves are lower frequency.
    #[serde(rename = "firstOctave")]
    pub first_octave: i32,
    /// Amplitude per octave, starting at `first_octave`.
    pub amplitudes: Vec<f64>,
}

impl NoiseParameters {
    /// Create a parameter set.
    #[must_use]
    pub const fn new(first_octave: i32, amplitudes: Vec<f64>) -> Self {
        Self {
            first_octave,
            amplitudes,
        }
    }
}
