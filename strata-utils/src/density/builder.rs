//! Arena builder for density graphs.
//!
//! The helpers mirror the static constructors of vanilla's `DensityFunctions`. Named
//! functions (`minecraft:shift_x`, `minecraft:overworld/continents` ...) are built once
//! per graph through [`GraphBuilder::named`] and shared by id afterwards.

use rustc_hash::FxHashMap;

use crate::Identifier;
use crate::density::spline::CubicSpline;
use crate::density::types::{DensityGraph, DensityNode, GraphError, NodeId, RarityValueMapper};
use crate::noise::BlendedNoiseConfig;

/// One end of a [`GraphBuilder::slide`]: the density is pulled toward `target` over
/// the blocks between `start` and `end`, counted inward from the world edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideEdge {
    /// Distance from the edge where the pull begins.
    pub start: i32,
    /// Distance from the edge where the target is fully reached.
    pub end: i32,
    /// Density at the edge.
    pub target: f64,
}

impl SlideEdge {
    /// Create a slide edge.
    #[must_use]
    pub const fn new(start: i32, end: i32, target: f64) -> Self {
        Self { start, end, target }
    }
}

/// Builds a [`DensityGraph`] bottom-up.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<DensityNode>,
    named: FxHashMap<Identifier, NodeId>,
}

impl GraphBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. Its inputs must come from this builder.
    pub fn push(&mut self, node: DensityNode) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        debug_assert!({
            let mut ok = true;
            node.for_each_input(|input| ok &= input.index() < id.index());
            ok
        });
        self.nodes.push(node);
        id
    }

    /// The node behind `id`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &DensityNode {
        &self.nodes[id.index()]
    }

    /// Number of nodes so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node was pushed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return the function registered under `key`, building and registering it first
    /// if needed.
    pub fn named(&mut self, key: Identifier, build: impl FnOnce(&mut Self) -> NodeId) -> NodeId {
        if let Some(id) = self.named.get(&key) {
            return *id;
        }
        let id = build(self);
        self.named.insert(key, id);
        id
    }

    /// Fallible form of [`named`](Self::named). Nothing is registered on error.
    ///
    /// # Errors
    /// Propagates the error of `build`.
    pub fn try_named<E>(
        &mut self,
        key: Identifier,
        build: impl FnOnce(&mut Self) -> Result<NodeId, E>,
    ) -> Result<NodeId, E> {
        if let Some(id) = self.named.get(&key) {
            return Ok(*id);
        }
        let id = build(self)?;
        self.named.insert(key, id);
        Ok(id)
    }

    /// Register an existing node under `key`, replacing any previous entry.
    pub fn register(&mut self, key: Identifier, id: NodeId) -> NodeId {
        self.named.insert(key, id);
        id
    }

    /// The function registered under `key`.
    ///
    /// # Errors
    /// Returns [`GraphError::MissingFunction`] if nothing is registered under `key`.
    pub fn require(&self, key: &Identifier) -> Result<NodeId, GraphError> {
        self.named
            .get(key)
            .copied()
            .ok_or_else(|| GraphError::MissingFunction(key.clone()))
    }

    /// Finish the graph.
    #[must_use]
    pub fn finish(self) -> DensityGraph {
        DensityGraph::from_nodes(self.nodes)
    }

    /// A constant.
    pub fn constant(&mut self, value: f64) -> NodeId {
        self.push(DensityNode::Constant(value))
    }

    /// The shared zero constant.
    pub fn zero(&mut self) -> NodeId {
        self.named(Identifier::vanilla_static("zero"), |b| b.constant(0.0))
    }

    /// A clamped linear ramp on y.
    pub fn y_clamped_gradient(&mut self, from_y: i32, to_y: i32, from_value: f64, to_value: f64) -> NodeId {
        self.push(DensityNode::YClampedGradient {
            from_y,
            to_y,
            from_value,
            to_value,
        })
    }

    /// A named noise sampled at `(x * xz_scale, y * y_scale, z * xz_scale)`.
    pub fn noise(&mut self, noise: Identifier, xz_scale: f64, y_scale: f64) -> NodeId {
        self.push(DensityNode::Noise {
            noise,
            xz_scale,
            y_scale,
        })
    }

    /// A noise remapped from `[-1, 1]` onto `[from, to]`.
    pub fn mapped_noise(&mut self, noise: Identifier, xz_scale: f64, y_scale: f64, from: f64, to: f64) -> NodeId {
        let mid = self.constant((from + to) * 0.5);
        let half = self.constant((to - from) * 0.5);
        let sample = self.noise(noise, xz_scale, y_scale);
        let scaled = self.mul(half, sample);
        self.add(mid, scaled)
    }

    /// `noise(x/4, 0, z/4) * 4`
    pub fn shift_a(&mut self, noise: Identifier) -> NodeId {
        self.push(DensityNode::ShiftA { noise })
    }

    /// `noise(z/4, x/4, 0) * 4`
    pub fn shift_b(&mut self, noise: Identifier) -> NodeId {
        self.push(DensityNode::ShiftB { noise })
    }

    /// `noise(x/4, y/4, z/4) * 4`
    pub fn shift(&mut self, noise: Identifier) -> NodeId {
        self.push(DensityNode::Shift { noise })
    }

    /// A noise shifted horizontally by two inputs, sampled at y = 0.
    pub fn shifted_noise_2d(&mut self, shift_x: NodeId, shift_z: NodeId, xz_scale: f64, noise: Identifier) -> NodeId {
        let zero = self.zero();
        self.push(DensityNode::ShiftedNoise {
            shift_x,
            shift_y: zero,
            shift_z,
            xz_scale,
            y_scale: 0.0,
            noise,
        })
    }

    /// The legacy 3D base noise.
    pub fn blended_noise(&mut self, config: BlendedNoiseConfig) -> NodeId {
        self.push(DensityNode::BlendedNoise(config))
    }

    /// A noise sampled at coordinates divided by a rarity quantized from `input`.
    pub fn weird_scaled_sampler(&mut self, input: NodeId, noise: Identifier, mapper: RarityValueMapper) -> NodeId {
        self.push(DensityNode::WeirdScaledSampler { input, noise, mapper })
    }

    /// The end islands height field.
    pub fn end_islands(&mut self) -> NodeId {
        self.push(DensityNode::EndIslands)
    }

    /// `a + b`
    pub fn add(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.push(DensityNode::Add(a, b))
    }

    /// `a + value`
    pub fn add_const(&mut self, a: NodeId, value: f64) -> NodeId {
        let c = self.constant(value);
        self.add(a, c)
    }

    /// `a * b`, skipping `b` where `a` is zero.
    pub fn mul(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.push(DensityNode::Mul(a, b))
    }

    /// `a * value`
    pub fn mul_const(&mut self, a: NodeId, value: f64) -> NodeId {
        let c = self.constant(value);
        self.mul(a, c)
    }

    /// `min(a, b)`
    pub fn min(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.push(DensityNode::Min(a, b))
    }

    /// `max(a, b)`
    pub fn max(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.push(DensityNode::Max(a, b))
    }

    /// `|a|`
    pub fn abs(&mut self, a: NodeId) -> NodeId {
        self.push(DensityNode::Abs(a))
    }

    /// `a²`
    pub fn square(&mut self, a: NodeId) -> NodeId {
        self.push(DensityNode::Square(a))
    }

    /// `a³`
    pub fn cube(&mut self, a: NodeId) -> NodeId {
        self.push(DensityNode::Cube(a))
    }

    /// Negative values halved.
    pub fn half_negative(&mut self, a: NodeId) -> NodeId {
        self.push(DensityNode::HalfNegative(a))
    }

    /// Negative values quartered.
    pub fn quarter_negative(&mut self, a: NodeId) -> NodeId {
        self.push(DensityNode::QuarterNegative(a))
    }

    /// Soft clamp into `[-11/24, 11/24]`.
    pub fn squeeze(&mut self, a: NodeId) -> NodeId {
        self.push(DensityNode::Squeeze(a))
    }

    /// Clamp into `[min, max]`.
    pub fn clamp(&mut self, input: NodeId, min: f64, max: f64) -> NodeId {
        self.push(DensityNode::Clamp { input, min, max })
    }

    /// `when_in_range` where `input` lies in `[min_inclusive, max_exclusive)`,
    /// `when_out_of_range` elsewhere.
    pub fn range_choice(
        &mut self,
        input: NodeId,
        min_inclusive: f64,
        max_exclusive: f64,
        when_in_range: NodeId,
        when_out_of_range: NodeId,
    ) -> NodeId {
        self.push(DensityNode::RangeChoice {
            input,
            min_inclusive,
            max_exclusive,
            when_in_range,
            when_out_of_range,
        })
    }

    /// A spline node.
    pub fn spline(&mut self, spline: CubicSpline) -> NodeId {
        self.push(DensityNode::Spline(spline))
    }

    /// Interpolate `a` over noise cells.
    pub fn interpolated(&mut self, a: NodeId) -> NodeId {
        self.push(DensityNode::Interpolated(a))
    }

    /// Memoize `a` per column.
    pub fn flat_cache(&mut self, a: NodeId) -> NodeId {
        self.push(DensityNode::FlatCache(a))
    }

    /// Memoize `a` per column.
    pub fn cache_2d(&mut self, a: NodeId) -> NodeId {
        self.push(DensityNode::Cache2D(a))
    }

    /// Memoize `a` per position.
    pub fn cache_once(&mut self, a: NodeId) -> NodeId {
        self.push(DensityNode::CacheOnce(a))
    }

    /// Blending alpha.
    pub fn blend_alpha(&mut self) -> NodeId {
        self.push(DensityNode::BlendAlpha)
    }

    /// Blending offset.
    pub fn blend_offset(&mut self) -> NodeId {
        self.push(DensityNode::BlendOffset)
    }

    /// Density passed through the blender.
    pub fn blend_density(&mut self, a: NodeId) -> NodeId {
        self.push(DensityNode::BlendDensity(a))
    }

    /// `a + t * (b - a)`. A non-constant `a` caches `t` once per position.
    pub fn lerp(&mut self, t: NodeId, a: NodeId, b: NodeId) -> NodeId {
        if let Some(value) = self.node(a).as_constant() {
            return self.lerp_const(t, value, b);
        }
        let cached = self.cache_once(t);
        let negated = self.mul_const(cached, -1.0);
        let inverse = self.add_const(negated, 1.0);
        let left = self.mul(a, inverse);
        let right = self.mul(b, cached);
        self.add(left, right)
    }

    /// `a + t * (b - a)` for a constant `a`.
    pub fn lerp_const(&mut self, t: NodeId, a: f64, b: NodeId) -> NodeId {
        let shifted = self.add_const(b, -a);
        let scaled = self.mul(t, shifted);
        self.add_const(scaled, a)
    }

    /// Pull `input` toward the edge targets near the top and bottom of a world of
    /// `height` blocks starting at `min_y`.
    pub fn slide(&mut self, input: NodeId, min_y: i32, height: i32, top: SlideEdge, bottom: SlideEdge) -> NodeId {
        let top_y = min_y + height;
        let top_ramp = self.y_clamped_gradient(top_y - top.start, top_y - top.end, 1.0, 0.0);
        let slid = self.lerp_const(top_ramp, top.target, input);
        let bottom_ramp = self.y_clamped_gradient(min_y + bottom.start, min_y + bottom.end, 0.0, 1.0);
        self.lerp_const(bottom_ramp, bottom.target, slid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_builds_once() {
        let mut builder = GraphBuilder::new();
        let key = Identifier::vanilla_static("test/shared");
        let mut calls = 0;
        let a = builder.named(key.clone(), |b| {
            calls += 1;
            b.constant(1.0)
        });
        let b = builder.named(key.clone(), |b| {
            calls += 1;
            b.constant(2.0)
        });
        assert_eq!(a, b);
        assert_eq!(calls, 1);
        assert_eq!(builder.require(&key), Ok(a));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_try_named_does_not_register_failures() {
        let mut builder = GraphBuilder::new();
        let key = Identifier::vanilla_static("test/failing");
        let result: Result<NodeId, GraphError> = builder.try_named(key.clone(), |_| Err(GraphError::EmptySpline));
        assert!(result.is_err());
        assert_eq!(builder.require(&key), Err(GraphError::MissingFunction(key)));
    }

    #[test]
    fn test_zero_is_shared() {
        let mut builder = GraphBuilder::new();
        let a = builder.zero();
        let b = builder.zero();
        assert_eq!(a, b);
        assert_eq!(builder.node(a).as_constant(), Some(0.0));
    }

    #[test]
    fn test_lerp_shapes() {
        let mut builder = GraphBuilder::new();
        let t = builder.blend_alpha();
        let a = builder.constant(3.0);
        let b = builder.blend_offset();
        let before = builder.len();
        builder.lerp(t, a, b);
        // Constant `a`: add(mul(t, add(b, -a)), a) without a cache.
        assert_eq!(builder.len() - before, 5);
        assert!(!builder.nodes[before..].iter().any(|n| matches!(n, DensityNode::CacheOnce(_))));

        let before = builder.len();
        builder.lerp(t, b, a);
        assert!(builder.nodes[before..].iter().any(|n| matches!(n, DensityNode::CacheOnce(_))));
    }

    #[test]
    fn test_finished_graph_is_valid() {
        let mut builder = GraphBuilder::new();
        let y = builder.y_clamped_gradient(-64, 320, 1.0, -1.0);
        let noise = builder.noise(Identifier::vanilla_static("test"), 1.0, 1.0);
        let sum = builder.add(y, noise);
        builder.slide(sum, -64, 384, SlideEdge::new(80, 64, -0.078125), SlideEdge::new(0, 24, 0.1171875));
        let graph = builder.finish();
        assert!(graph.validate().is_ok());
    }
}
