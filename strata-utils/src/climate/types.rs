//! Quantized climate points and parameter ranges.

use serde::{Deserialize, Serialize};

use super::QUANTIZATION_FACTOR;

/// The six climate values sampled at one position, quantized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct TargetPoint {
    pub temperature: i64,
    /// Read from the router's vegetation slot.
    pub humidity: i64,
    pub continentalness: i64,
    pub erosion: i64,
    pub depth: i64,
    /// Read from the router's ridges slot.
    pub weirdness: i64,
}

impl TargetPoint {
    /// A point from already quantized values.
    #[must_use]
    pub const fn new(
        temperature: i64,
        humidity: i64,
        continentalness: i64,
        erosion: i64,
        depth: i64,
        weirdness: i64,
    ) -> Self {
        Self {
            temperature,
            humidity,
            continentalness,
            erosion,
            depth,
            weirdness,
        }
    }
}

/// An inclusive quantized range of one climate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    /// Lower bound.
    pub min: i64,
    /// Upper bound.
    pub max: i64,
}

impl Parameter {
    /// `[-1, 1]`.
    pub const FULL: Self = Self::new(-10_000, 10_000);

    /// A range from quantized bounds.
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// The single value `value`.
    #[must_use]
    pub fn point(value: f32) -> Self {
        Self::span(value, value)
    }

    /// The range `[min, max]`, quantized.
    ///
    /// Java reference: `Climate.Parameter.span(float, float)`
    #[must_use]
    pub fn span(min: f32, max: f32) -> Self {
        debug_assert!(min <= max, "min > max: {min} > {max}");
        Self::new((min * QUANTIZATION_FACTOR) as i64, (max * QUANTIZATION_FACTOR) as i64)
    }

    /// How far `target` lies outside the range; zero inside it.
    #[inline]
    #[must_use]
    pub const fn distance(&self, target: i64) -> i64 {
        if target > self.max {
            target - self.max
        } else if target < self.min {
            self.min - target
        } else {
            0
        }
    }
}

/// Ranges for all six climate values plus an offset, as used by spawn targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ParameterPoint {
    pub temperature: Parameter,
    pub humidity: Parameter,
    pub continentalness: Parameter,
    pub erosion: Parameter,
    pub depth: Parameter,
    pub weirdness: Parameter,
    /// Quantized offset added to every distance.
    pub offset: i64,
}

impl ParameterPoint {
    /// A point from its ranges and quantized offset.
    #[must_use]
    pub const fn new(
        temperature: Parameter,
        humidity: Parameter,
        continentalness: Parameter,
        erosion: Parameter,
        depth: Parameter,
        weirdness: Parameter,
        offset: i64,
    ) -> Self {
        Self {
            temperature,
            humidity,
            continentalness,
            erosion,
            depth,
            weirdness,
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_outside_range() {
        let range = Parameter::span(-0.5, 0.5);
        assert_eq!(range, Parameter::new(-5_000, 5_000));
        assert_eq!(range.distance(0), 0);
        assert_eq!(range.distance(5_000), 0);
        assert_eq!(range.distance(6_000), 1_000);
        assert_eq!(range.distance(-7_500), 2_500);
        assert_eq!(Parameter::span(-1.0, 1.0), Parameter::FULL);
        assert_eq!(Parameter::point(0.25), Parameter::new(2_500, 2_500));
    }

    #[test]
    fn test_parameter_point_json() {
        let point = ParameterPoint::new(
            Parameter::FULL,
            Parameter::FULL,
            Parameter::span(-0.11, 1.0),
            Parameter::FULL,
            Parameter::point(0.0),
            Parameter::span(0.16, 1.0),
            0,
        );
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json["continentalness"]["min"], -1_100);
        assert_eq!(json["weirdness"]["min"], 1_600);
        let back: ParameterPoint = serde_json::from_value(json).unwrap();
        assert_eq!(back, point);
    }
}
