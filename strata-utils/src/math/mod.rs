//! Float helpers with vanilla rounding behavior.
pub mod noise_math;

pub use noise_math::{clamp, clamped_lerp, clamped_map, floor, floor_div, lerp, lerp_f32, smoothstep};
