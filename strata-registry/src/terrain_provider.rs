//! Terrain shaping splines for the overworld family.
//!
//! The three splines map continentalness, erosion and weirdness onto the terrain
//! offset, the vertical squash factor and the peak jaggedness. Amplified worlds pass
//! every constant through a transform that exaggerates height.
//!
//! Java reference: `TerrainProvider`

use strata_utils::density::{CubicSpline, GraphError, NodeId, SplineBuilder};
use strata_utils::math::lerp_f32;

const DEEP_OCEAN_CONTINENTALNESS: f32 = -0.7;

type Transform = fn(f32) -> f32;

fn identity(value: f32) -> f32 {
    value
}

fn amplified_offset(value: f32) -> f32 {
    if value < 0.0 { value } else { value * 2.0 }
}

fn amplified_factor(value: f32) -> f32 {
    1.25 - 6.25 / (value + 5.0)
}

fn amplified_jaggedness(value: f32) -> f32 {
    value * 2.0
}

/// Coordinate nodes the terrain splines read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplineInputs {
    /// Continentalness.
    pub continents: NodeId,
    /// Erosion.
    pub erosion: NodeId,
    /// Raw weirdness.
    pub ridges: NodeId,
    /// Weirdness folded into peaks and valleys.
    pub ridges_folded: NodeId,
}

/// Fold weirdness into the peaks-and-valleys value.
#[must_use]
pub fn peaks_and_valleys(weirdness: f32) -> f32 {
    -((weirdness.abs() - 0.666_666_7).abs() - 0.333_333_34) * 3.0
}

/// Terrain height offset.
///
/// # Errors
/// Only fails if a point table is out of order.
pub fn overworld_offset(inputs: &SplineInputs, amplified: bool) -> Result<CubicSpline, GraphError> {
    let transform: Transform = if amplified { amplified_offset } else { identity };
    let coast = erosion_offset(inputs, -0.15, 0.0, 0.0, 0.1, 0.0, -0.03, false, false, transform)?;
    let near_inland = erosion_offset(inputs, -0.1, 0.03, 0.1, 0.1, 0.01, -0.03, false, false, transform)?;
    let mid_inland = erosion_offset(inputs, -0.1, 0.03, 0.1, 0.7, 0.01, -0.03, true, true, transform)?;
    let far_inland = erosion_offset(inputs, -0.05, 0.03, 0.1, 1.0, 0.01, 0.01, true, true, transform)?;

    SplineBuilder::with_transform(inputs.continents, transform)
        .add_point(-1.1, 0.044)?
        .add_point(-1.02, -0.2222)?
        .add_point(-0.51, -0.2222)?
        .add_point(-0.44, -0.12)?
        .add_point(-0.18, -0.12)?
        .add_spline(-0.16, coast.clone())?
        .add_spline(-0.15, coast)?
        .add_spline(-0.1, near_inland)?
        .add_spline(0.25, mid_inland)?
        .add_spline(1.0, far_inland)?
        .build()
}

/// Vertical squash factor.
///
/// # Errors
/// Only fails if a point table is out of order.
pub fn overworld_factor(inputs: &SplineInputs, amplified: bool) -> Result<CubicSpline, GraphError> {
    let transform: Transform = if amplified { amplified_factor } else { identity };
    SplineBuilder::new(inputs.continents)
        .add_point(-0.19, 3.95)?
        .add_spline(-0.15, erosion_factor(inputs, 6.25, true, identity)?)?
        .add_spline(-0.1, erosion_factor(inputs, 5.47, true, transform)?)?
        .add_spline(0.03, erosion_factor(inputs, 5.08, true, transform)?)?
        .add_spline(0.06, erosion_factor(inputs, 4.69, false, transform)?)?
        .build()
}

/// Peak jaggedness.
///
/// # Errors
/// Only fails if a point table is out of order.
pub fn overworld_jaggedness(inputs: &SplineInputs, amplified: bool) -> Result<CubicSpline, GraphError> {
    let transform: Transform = if amplified { amplified_jaggedness } else { identity };
    SplineBuilder::with_transform(inputs.continents, transform)
        .add_point(-0.11, 0.0)?
        .add_spline(0.03, erosion_jaggedness(inputs, 1.0, 0.5, 0.0, 0.0, transform)?)?
        .add_spline(0.65, erosion_jaggedness(inputs, 1.0, 1.0, 1.0, 0.0, transform)?)?
        .build()
}

fn erosion_jaggedness(
    inputs: &SplineInputs,
    high_peak: f32,
    low_peak: f32,
    high_mid: f32,
    low_mid: f32,
    transform: Transform,
) -> Result<CubicSpline, GraphError> {
    let high = ridge_jaggedness(inputs, high_peak, high_mid, transform)?;
    let low = ridge_jaggedness(inputs, low_peak, low_mid, transform)?;
    SplineBuilder::with_transform(inputs.erosion, transform)
        .add_spline(-1.0, high)?
        .add_spline(-0.78, low.clone())?
        .add_spline(-0.5775, low)?
        .add_point(-0.375, 0.0)?
        .build()
}

fn ridge_jaggedness(
    inputs: &SplineInputs,
    peak: f32,
    mid: f32,
    transform: Transform,
) -> Result<CubicSpline, GraphError> {
    let low = peaks_and_valleys(0.4);
    let high = peaks_and_valleys(0.566_666_66);
    let between = (low + high) / 2.0;

    let mut builder = SplineBuilder::with_transform(inputs.ridges_folded, transform);
    builder.add_point(low, 0.0)?;
    if mid > 0.0 {
        builder.add_spline(between, weirdness_jaggedness(inputs, mid, transform)?)?;
    } else {
        builder.add_point(between, 0.0)?;
    }
    if peak > 0.0 {
        builder.add_spline(1.0, weirdness_jaggedness(inputs, peak, transform)?)?;
    } else {
        builder.add_point(1.0, 0.0)?;
    }
    builder.build()
}

fn weirdness_jaggedness(inputs: &SplineInputs, magnitude: f32, transform: Transform) -> Result<CubicSpline, GraphError> {
    SplineBuilder::with_transform(inputs.ridges, transform)
        .add_point(-0.01, 0.63 * magnitude)?
        .add_point(0.01, 0.3 * magnitude)?
        .build()
}

fn erosion_factor(
    inputs: &SplineInputs,
    value: f32,
    higher_values: bool,
    transform: Transform,
) -> Result<CubicSpline, GraphError> {
    let base = SplineBuilder::with_transform(inputs.ridges, transform)
        .add_point(-0.2, 6.3)?
        .add_point(0.2, value)?
        .build()?;
    let dip = SplineBuilder::with_transform(inputs.ridges, transform)
        .add_point(-0.05, 6.3)?
        .add_point(0.05, 2.67)?
        .build()?;
    let rise = SplineBuilder::with_transform(inputs.ridges, transform)
        .add_point(-0.05, 2.67)?
        .add_point(0.05, 6.3)?
        .build()?;

    let mut builder = SplineBuilder::with_transform(inputs.erosion, transform);
    builder
        .add_spline(-0.6, base.clone())?
        .add_spline(-0.5, dip)?
        .add_spline(-0.35, base.clone())?
        .add_spline(-0.25, base.clone())?
        .add_spline(-0.1, rise)?
        .add_spline(0.03, base.clone())?;

    if higher_values {
        let ridge = SplineBuilder::with_transform(inputs.ridges, transform)
            .add_point(0.0, value)?
            .add_point(0.1, 0.625)?
            .build()?;
        let folded = SplineBuilder::with_transform(inputs.ridges_folded, transform)
            .add_point(-0.9, value)?
            .add_spline(-0.69, ridge)?
            .build()?;
        builder
            .add_point(0.35, value)?
            .add_spline(0.45, folded.clone())?
            .add_spline(0.55, folded)?
            .add_point(0.62, value)?;
    } else {
        let valleys = SplineBuilder::with_transform(inputs.ridges_folded, transform)
            .add_spline(-0.7, base.clone())?
            .add_point(-0.15, 1.37)?
            .build()?;
        let peaks = SplineBuilder::with_transform(inputs.ridges_folded, transform)
            .add_spline(0.45, base)?
            .add_point(0.7, 1.56)?
            .build()?;
        builder
            .add_spline(0.05, peaks.clone())?
            .add_spline(0.4, peaks)?
            .add_spline(0.45, valleys.clone())?
            .add_spline(0.55, valleys)?
            .add_point(0.58, value)?;
    }
    builder.build()
}

fn slope(from_value: f32, to_value: f32, from: f32, to: f32) -> f32 {
    (to_value - from_value) / (to - from)
}

fn mountain_continentalness(weirdness: f32, ridge_factor: f32, threshold: f32) -> f32 {
    let k = 1.0 - (1.0 - ridge_factor) * 0.5;
    let l = 0.5 * (1.0 - ridge_factor);
    let n = (weirdness + 1.17) * 0.460_829_47 * k - l;
    if weirdness < threshold {
        n.max(-0.2222)
    } else {
        n.max(0.0)
    }
}

fn mountain_zero_point(ridge_factor: f32) -> f32 {
    let k = 1.0 - (1.0 - ridge_factor) * 0.5;
    let l = 0.5 * (1.0 - ridge_factor);
    l / (0.460_829_47 * k) - 1.17
}

fn mountain_ridge(
    inputs: &SplineInputs,
    ridge_factor: f32,
    plateau: bool,
    transform: Transform,
) -> Result<CubicSpline, GraphError> {
    let mut builder = SplineBuilder::with_transform(inputs.ridges_folded, transform);
    let low = mountain_continentalness(-1.0, ridge_factor, DEEP_OCEAN_CONTINENTALNESS);
    let high = mountain_continentalness(1.0, ridge_factor, DEEP_OCEAN_CONTINENTALNESS);
    let zero = mountain_zero_point(ridge_factor);

    if -0.65 < zero && zero < 1.0 {
        let at_065 = mountain_continentalness(-0.65, ridge_factor, DEEP_OCEAN_CONTINENTALNESS);
        let at_075 = mountain_continentalness(-0.75, ridge_factor, DEEP_OCEAN_CONTINENTALNESS);
        builder
            .add_point_with_derivative(-1.0, low, slope(low, at_075, -1.0, -0.75))?
            .add_point(-0.75, at_075)?
            .add_point(-0.65, at_065)?;
        let at_zero = mountain_continentalness(zero, ridge_factor, DEEP_OCEAN_CONTINENTALNESS);
        let rising = slope(at_zero, high, zero, 1.0);
        builder
            .add_point(zero - 0.01, at_zero)?
            .add_point_with_derivative(zero, at_zero, rising)?
            .add_point_with_derivative(1.0, high, rising)?;
    } else {
        let rising = slope(low, high, -1.0, 1.0);
        if plateau {
            builder
                .add_point(-1.0, low.max(0.2))?
                .add_point_with_derivative(0.0, lerp_f32(0.5, low, high), rising)?;
        } else {
            builder.add_point_with_derivative(-1.0, low, rising)?;
        }
        builder.add_point_with_derivative(1.0, high, rising)?;
    }
    builder.build()
}

#[allow(clippy::too_many_arguments, clippy::many_single_char_names)]
fn erosion_offset(
    inputs: &SplineInputs,
    f: f32,
    g: f32,
    h: f32,
    i: f32,
    j: f32,
    k: f32,
    extended: bool,
    plateau: bool,
    transform: Transform,
) -> Result<CubicSpline, GraphError> {
    let s1 = mountain_ridge(inputs, lerp_f32(i, 0.6, 1.5), plateau, transform)?;
    let s2 = mountain_ridge(inputs, lerp_f32(i, 0.6, 1.0), plateau, transform)?;
    let s3 = mountain_ridge(inputs, i, plateau, transform)?;
    let s4 = ridge(inputs, f - 0.15, 0.5 * i, 0.5 * i, 0.5 * i, 0.6 * i, 0.5, transform)?;
    let s5 = ridge(inputs, f, j * i, g * i, 0.5 * i, 0.6 * i, 0.5, transform)?;
    let s6 = ridge(inputs, f, j, j, g, h, 0.5, transform)?;
    let s7 = s6.clone();
    let s8 = SplineBuilder::with_transform(inputs.ridges_folded, transform)
        .add_point(-1.0, f)?
        .add_spline(-0.4, s6.clone())?
        .add_point(0.0, h + 0.07)?
        .build()?;
    let s9 = ridge(inputs, -0.02, k, k, g, h, 0.0, transform)?;

    let mut builder = SplineBuilder::with_transform(inputs.erosion, transform);
    builder
        .add_spline(-0.85, s1)?
        .add_spline(-0.7, s2)?
        .add_spline(-0.4, s3)?
        .add_spline(-0.35, s4)?
        .add_spline(-0.1, s5)?
        .add_spline(0.2, s6)?;
    if extended {
        builder
            .add_spline(0.4, s7.clone())?
            .add_spline(0.45, s8.clone())?
            .add_spline(0.55, s8)?
            .add_spline(0.58, s7)?;
    }
    builder.add_spline(0.7, s9)?;
    builder.build()
}

#[allow(clippy::too_many_arguments)]
fn ridge(
    inputs: &SplineInputs,
    valley: f32,
    low: f32,
    mid: f32,
    high: f32,
    peak: f32,
    min_slope: f32,
    transform: Transform,
) -> Result<CubicSpline, GraphError> {
    let l = (0.5 * (low - valley)).max(min_slope);
    let m = 5.0 * (mid - low);
    SplineBuilder::with_transform(inputs.ridges_folded, transform)
        .add_point_with_derivative(-1.0, valley, l)?
        .add_point_with_derivative(-0.4, low, l.min(m))?
        .add_point_with_derivative(0.0, mid, m)?
        .add_point_with_derivative(0.4, high, 2.0 * (high - mid))?
        .add_point_with_derivative(1.0, peak, 0.7 * (peak - high))?
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_utils::density::GraphBuilder;

    fn inputs() -> SplineInputs {
        let mut b = GraphBuilder::new();
        SplineInputs {
            continents: b.constant(0.0),
            erosion: b.constant(1.0),
            ridges: b.constant(2.0),
            ridges_folded: b.constant(3.0),
        }
    }

    fn eval(spline: &CubicSpline, continents: f32, erosion: f32, ridges: f32) -> f32 {
        let nodes = inputs();
        let folded = peaks_and_valleys(ridges);
        spline.apply(&mut |id: NodeId| {
            if id == nodes.continents {
                continents
            } else if id == nodes.erosion {
                erosion
            } else if id == nodes.ridges {
                ridges
            } else {
                folded
            }
        })
    }

    #[test]
    fn test_peaks_and_valleys() {
        assert!((peaks_and_valleys(0.4) - 0.2).abs() < 1e-5);
        assert!((peaks_and_valleys(0.566_666_66) - 0.7).abs() < 1e-5);
        assert!((peaks_and_valleys(0.0) + 1.0).abs() < 1e-5);
        assert!((peaks_and_valleys(-0.666_666_7) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_mountain_zero_point() {
        for factor in [0.2_f32, 0.5, 0.9] {
            let zero = mountain_zero_point(factor);
            assert!(mountain_continentalness(zero, factor, -0.7).abs() < 1e-5);
        }
    }

    #[test]
    fn test_deep_ocean_offset() {
        let normal = overworld_offset(&inputs(), false).unwrap();
        let amplified = overworld_offset(&inputs(), true).unwrap();
        assert!((eval(&normal, -1.1, 0.0, 0.0) - 0.044).abs() < 1e-6);
        assert!((eval(&normal, -0.8, 0.3, 0.5) + 0.2222).abs() < 1e-6);
        // Positive constants double when amplified, negative ones do not.
        assert!((eval(&amplified, -1.1, 0.0, 0.0) - 0.088).abs() < 1e-6);
        assert!((eval(&amplified, -0.8, 0.3, 0.5) + 0.2222).abs() < 1e-6);
    }

    #[test]
    fn test_factor_in_ocean() {
        let normal = overworld_factor(&inputs(), false).unwrap();
        let amplified = overworld_factor(&inputs(), true).unwrap();
        assert!((eval(&normal, -0.5, 0.0, 0.0) - 3.95).abs() < 1e-6);
        assert!((eval(&amplified, -0.5, 0.0, 0.0) - 3.95).abs() < 1e-6);
        // Inland at the low-erosion plateau the value is the erosion factor ramp over
        // weirdness: 6.3 at ridges -0.2.
        assert!((eval(&normal, 0.06, -0.6, -0.2) - 6.3).abs() < 1e-5);
        let transformed = 1.25 - 6.25 / (6.3 + 5.0);
        assert!((eval(&amplified, 0.06, -0.6, -0.2) - transformed).abs() < 1e-5);
    }

    #[test]
    fn test_jaggedness_only_on_peaks() {
        let normal = overworld_jaggedness(&inputs(), false).unwrap();
        let amplified = overworld_jaggedness(&inputs(), true).unwrap();
        assert!(eval(&normal, -0.5, -1.0, 0.65).abs() < 1e-6);
        assert!(eval(&normal, 0.65, 0.0, 0.65).abs() < 1e-6);
        // Far inland, low erosion, on a peak with negative weirdness: 0.63 * 1.
        let peak = -0.666_666_7;
        assert!((eval(&normal, 0.65, -1.0, peak) - 0.63).abs() < 1e-5);
        assert!((eval(&amplified, 0.65, -1.0, peak) - 1.26).abs() < 1e-5);
    }
}
