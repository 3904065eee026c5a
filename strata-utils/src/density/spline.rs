//! Cubic Hermite splines over density function coordinates.
//!
//! Java reference: `CubicSpline`

use serde::{Deserialize, Serialize};

use crate::density::types::{GraphError, NodeId};
use crate::math::lerp_f32;

/// A spline: either a constant, or Hermite segments over a coordinate node whose
/// point values may themselves be splines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CubicSpline {
    /// A constant value.
    Constant(f32),
    /// Piecewise cubic segments over `coordinate`.
    Multipoint {
        /// Node whose value selects the segment.
        coordinate: NodeId,
        /// Points with strictly ascending locations.
        points: Vec<SplinePoint>,
    },
}

/// A point in a cubic spline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplinePoint {
    /// The location (input value) of this point.
    pub location: f32,
    /// The value or nested spline at this point.
    pub value: CubicSpline,
    /// The derivative at this point.
    pub derivative: f32,
}

impl CubicSpline {
    /// Evaluate with `coordinate` supplying the value of each coordinate node.
    pub fn apply<F: FnMut(NodeId) -> f32>(&self, coordinate: &mut F) -> f32 {
        let (coordinate_id, points) = match self {
            Self::Constant(v) => return *v,
            Self::Multipoint { coordinate, points } => (*coordinate, points),
        };
        let Some(last) = points.len().checked_sub(1) else {
            return 0.0;
        };

        let f = coordinate(coordinate_id);
        // Index of the last point not above `f`, or `None` below the first point.
        // A NaN `f` compares above every point and lands on the last one.
        #[allow(clippy::neg_cmp_op_on_partial_ord)]
        let start = points.partition_point(|p| !(f < p.location)).checked_sub(1);
        let Some(i) = start else {
            return linear_extend(f, &points[0], points[0].value.apply(coordinate));
        };
        if i == last {
            return linear_extend(f, &points[last], points[last].value.apply(coordinate));
        }

        let lower = &points[i];
        let upper = &points[i + 1];
        let width = upper.location - lower.location;
        let t = (f - lower.location) / width;
        let y1 = lower.value.apply(coordinate);
        let y2 = upper.value.apply(coordinate);
        let dy = y2 - y1;
        let p = lower.derivative * width - dy;
        let q = -upper.derivative * width + dy;
        lerp_f32(t, y1, y2) + t * (1.0 - t) * lerp_f32(t, p, q)
    }

    /// Call `f` for every coordinate node, nested splines included.
    pub fn for_each_coordinate(&self, f: &mut impl FnMut(NodeId)) {
        if let Self::Multipoint { coordinate, points } = self {
            f(*coordinate);
            for point in points {
                point.value.for_each_coordinate(f);
            }
        }
    }
}

#[inline]
fn linear_extend(f: f32, point: &SplinePoint, value: f32) -> f32 {
    if point.derivative == 0.0 {
        value
    } else {
        value + point.derivative * (f - point.location)
    }
}

/// Builds a [`CubicSpline::Multipoint`], rejecting out-of-order points.
///
/// Java reference: `CubicSpline.Builder`
#[derive(Debug, Clone)]
pub struct SplineBuilder {
    coordinate: NodeId,
    transform: fn(f32) -> f32,
    points: Vec<SplinePoint>,
}

impl SplineBuilder {
    /// A builder over `coordinate` with constant values taken as-is.
    #[must_use]
    pub fn new(coordinate: NodeId) -> Self {
        Self::with_transform(coordinate, |v| v)
    }

    /// A builder over `coordinate` that passes every constant value through `transform`.
    #[must_use]
    pub const fn with_transform(coordinate: NodeId, transform: fn(f32) -> f32) -> Self {
        Self {
            coordinate,
            transform,
            points: Vec::new(),
        }
    }

    /// Add a constant point with zero derivative.
    ///
    /// # Errors
    /// Returns [`GraphError::SplineOrder`] unless `location` is above the previous point.
    pub fn add_point(&mut self, location: f32, value: f32) -> Result<&mut Self, GraphError> {
        self.add_point_with_derivative(location, value, 0.0)
    }

    /// Add a constant point.
    ///
    /// # Errors
    /// Returns [`GraphError::SplineOrder`] unless `location` is above the previous point.
    pub fn add_point_with_derivative(
        &mut self,
        location: f32,
        value: f32,
        derivative: f32,
    ) -> Result<&mut Self, GraphError> {
        let value = CubicSpline::Constant((self.transform)(value));
        self.push(location, value, derivative)
    }

    /// Add a nested spline with zero derivative. Nested values are not transformed.
    ///
    /// # Errors
    /// Returns [`GraphError::SplineOrder`] unless `location` is above the previous point.
    pub fn add_spline(&mut self, location: f32, spline: CubicSpline) -> Result<&mut Self, GraphError> {
        self.push(location, spline, 0.0)
    }

    fn push(&mut self, location: f32, value: CubicSpline, derivative: f32) -> Result<&mut Self, GraphError> {
        if let Some(previous) = self.points.last()
            && location <= previous.location
        {
            return Err(GraphError::SplineOrder {
                previous: previous.location,
                location,
            });
        }
        self.points.push(SplinePoint {
            location,
            value,
            derivative,
        });
        Ok(self)
    }

    /// Finish the spline, leaving the builder empty.
    ///
    /// # Errors
    /// Returns [`GraphError::EmptySpline`] when no point was added.
    pub fn build(&mut self) -> Result<CubicSpline, GraphError> {
        if self.points.is_empty() {
            return Err(GraphError::EmptySpline);
        }
        Ok(CubicSpline::Multipoint {
            coordinate: self.coordinate,
            points: std::mem::take(&mut self.points),
        })
    }
}
