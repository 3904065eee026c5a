//! Climate fields read from a seeded router.
//!
//! The six climate slots are sampled at quart positions and quantized to the same
//! fixed point as spawn target parameters.

mod sampler;
mod types;

pub use sampler::ClimateSampler;
pub use types::{Parameter, ParameterPoint, TargetPoint};

/// Fixed-point scale of quantized climate values: `1.0` becomes `10_000`.
pub const QUANTIZATION_FACTOR: f32 = 10_000.0;

/// Quantize a climate value. The value is narrowed to `f32` before scaling and
/// the product truncates toward zero.
///
/// Java reference: `Climate.quantizeCoord(float)`
#[inline]
#[must_use]
pub fn quantize_coord(coord: f64) -> i64 {
    ((coord as f32) * QUANTIZATION_FACTOR) as i64
}
