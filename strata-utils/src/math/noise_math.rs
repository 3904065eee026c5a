//! Scalar helpers shared by the noises and the density evaluator. Each one
//! reproduces the float behavior of its `Mth` counterpart.

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3` used between Perlin lattice points.
///
/// Java reference: `Mth.smoothstep(double)`
#[inline]
#[must_use]
pub fn smoothstep(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Largest integer not above `v`, saturating at the `i32` bounds.
///
/// Java reference: `Mth.floor(double)`
#[inline]
#[must_use]
pub fn floor(v: f64) -> i32 {
    let truncated = v as i32;
    if v < f64::from(truncated) {
        truncated - 1
    } else {
        truncated
    }
}

/// `a + alpha * (b - a)`.
#[inline]
#[must_use]
pub fn lerp(alpha: f64, a: f64, b: f64) -> f64 {
    a + alpha * (b - a)
}

/// Single precision [`lerp`], for splines.
#[inline]
#[must_use]
pub fn lerp_f32(alpha: f32, a: f32, b: f32) -> f32 {
    a + alpha * (b - a)
}

/// [`lerp`] with `factor` held to `[0, 1]`.
///
/// Java reference: `Mth.clampedLerp(double, double, double)`
#[inline]
#[must_use]
pub fn clamped_lerp(min: f64, max: f64, factor: f64) -> f64 {
    if factor < 0.0 {
        min
    } else if factor > 1.0 {
        max
    } else {
        lerp(factor, min, max)
    }
}

/// `value` held to `[min, max]`. Unlike [`f64::clamp`] this never panics on an
/// inverted range; `min` wins.
#[inline]
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Map `value` from `[from_min, from_max]` onto `[to_min, to_max]`, clamping outside.
///
/// A zero-width source range is a step: `to_min` below `from_min`, `to_max` at or
/// above it.
///
/// Java reference: `Mth.clampedMap(double, double, double, double, double)`
#[inline]
#[must_use]
#[allow(clippy::float_cmp)]
pub fn clamped_map(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64) -> f64 {
    if from_min == from_max {
        return if value < from_min { to_min } else { to_max };
    }
    clamped_lerp(to_min, to_max, (value - from_min) / (from_max - from_min))
}

/// Integer division rounding toward negative infinity.
///
/// Java reference: `Math.floorDiv(int, int)`
#[inline]
#[must_use]
pub const fn floor_div(a: i32, b: i32) -> i32 {
    a.div_euclid(b) - if b < 0 && a.rem_euclid(b) != 0 { 1 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_rounds_down() {
        for (v, expected) in [(1.5, 1), (1.0, 1), (0.0, 0), (-0.5, -1), (-1.0, -1), (-1.5, -2)] {
            assert_eq!(floor(v), expected, "floor({v})");
        }
    }

    #[test]
    fn test_fade_curve() {
        assert!(smoothstep(0.0).abs() < 1e-12);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-12);
        assert!((smoothstep(1.0) - 1.0).abs() < 1e-12);
        assert!((smoothstep(0.25) - 0.103_515_625).abs() < 1e-12);
    }

    #[test]
    fn test_clamped_map() {
        assert!((clamped_map(-100.0, -64.0, 320.0, 1.0, -1.0) - 1.0).abs() < 1e-10);
        assert!((clamped_map(400.0, -64.0, 320.0, 1.0, -1.0) + 1.0).abs() < 1e-10);
        assert!(clamped_map(128.0, -64.0, 320.0, 1.0, -1.0).abs() < 1e-10);
        assert!((clamped_map(9.0, 10.0, 10.0, 2.0, 3.0) - 2.0).abs() < 1e-10);
        assert!((clamped_map(10.0, 10.0, 10.0, 2.0, 3.0) - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_clamp_inverted_range() {
        assert!((clamp(5.0, 1.0, 0.0) - 1.0).abs() < f64::EPSILON);
        assert!((clamp(-5.0, -1.0, 1.0) + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_floor_div() {
        assert_eq!(floor_div(-64, 8), -8);
        assert_eq!(floor_div(-65, 8), -9);
        assert_eq!(floor_div(7, 8), 0);
        assert_eq!(floor_div(-1, 4), -1);
        assert_eq!(floor_div(5, -2), -3);
    }
}
