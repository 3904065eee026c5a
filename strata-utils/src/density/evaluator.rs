//! Density function evaluator matching vanilla Minecraft's density function evaluation.
//!
//! A [`DensityEvaluator`] pairs an immutable [`DensityGraph`] with the seeded noise
//! instances of its nodes. It is shared freely between threads; all per-pass state
//! lives in an [`EvalCache`] owned by the caller.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::density::types::{CellSize, DensityContext, DensityGraph, DensityNode, GraphError, NodeId};
use crate::math::{clamp, clamped_map, floor_div, lerp};
use crate::noise::{BlendedNoise, EndIslands, NormalNoise};

/// Blending weights for one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendingOutput {
    /// Weight of freshly generated terrain; 1 means no blending.
    pub alpha: f64,
    /// Height offset applied to blended terrain.
    pub offset: f64,
}

/// Blends new terrain into pre-existing chunks along their border.
///
/// Java reference: `Blender`
pub trait Blender: Send + Sync {
    /// Alpha and offset at a block column.
    fn blend_offset_and_factor(&self, x: i32, z: i32) -> BlendingOutput;

    /// Adjust a density at a position.
    fn blend_density(&self, ctx: &DensityContext, density: f64) -> f64;
}

/// The blender used away from old chunks: full alpha, no offset, density unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyBlender;

impl Blender for EmptyBlender {
    fn blend_offset_and_factor(&self, _x: i32, _z: i32) -> BlendingOutput {
        BlendingOutput {
            alpha: 1.0,
            offset: 0.0,
        }
    }

    fn blend_density(&self, _ctx: &DensityContext, density: f64) -> f64 {
        density
    }
}

/// Per-pass evaluation state: memo tables and the active blender.
///
/// Create one per chunk or per evaluation batch and pass it to
/// [`DensityEvaluator::value`]. Never share one between threads.
///
/// Every memo holds one entry per caching node, for the last position, column or
/// cell that node saw, so a cache reused across a whole region stays small.
pub struct EvalCache {
    /// `CacheOnce`: last position and value.
    once: FxHashMap<NodeId, (DensityContext, f64)>,
    /// `FlatCache` and `Cache2D`: last column and value.
    flat: FxHashMap<NodeId, (i32, i32, f64)>,
    /// `Interpolated`: corners of the last cell.
    corners: FxHashMap<NodeId, CellCorners>,
    blender: Box<dyn Blender>,
}

/// Input values at the eight corners of one cell, indexed `dx | dy << 1 | dz << 2`.
#[derive(Debug, Clone, Copy)]
struct CellCorners {
    origin: (i32, i32, i32),
    values: [f64; 8],
}

impl EvalCache {
    /// Create a new empty evaluation cache with no blending.
    #[must_use]
    pub fn new() -> Self {
        Self::with_blender(Box::new(EmptyBlender))
    }

    /// Create a new empty evaluation cache blending through `blender`.
    #[must_use]
    pub fn with_blender(blender: Box<dyn Blender>) -> Self {
        Self {
            once: FxHashMap::default(),
            flat: FxHashMap::default(),
            corners: FxHashMap::default(),
            blender,
        }
    }

    /// Forget every memoized value, keeping the blender.
    pub fn clear(&mut self) {
        self.once.clear();
        self.flat.clear();
        self.corners.clear();
    }
}

impl Default for EvalCache {
    fn default() -> Self {
        Self::new()
    }
}

/// The seeded instance behind a graph node.
#[derive(Debug, Clone, Default)]
pub enum NodeSampler {
    /// The node samples nothing.
    #[default]
    None,
    /// A named noise.
    Noise(Arc<NormalNoise>),
    /// The legacy 3D base noise.
    Blended(Arc<BlendedNoise>),
    /// The end islands field.
    EndIslands(Arc<EndIslands>),
}

impl NodeSampler {
    /// Whether this sampler can back `node`.
    #[must_use]
    pub const fn serves(&self, node: &DensityNode) -> bool {
        match node {
            DensityNode::BlendedNoise(_) => matches!(self, Self::Blended(_)),
            DensityNode::EndIslands => matches!(self, Self::EndIslands(_)),
            _ if node.needs_sampler() => matches!(self, Self::Noise(_)),
            _ => matches!(self, Self::None),
        }
    }
}

impl DensityNode {
    /// Whether evaluating this node needs a seeded [`NodeSampler`].
    #[must_use]
    pub const fn needs_sampler(&self) -> bool {
        matches!(
            self,
            Self::Noise { .. }
                | Self::ShiftA { .. }
                | Self::ShiftB { .. }
                | Self::Shift { .. }
                | Self::ShiftedNoise { .. }
                | Self::WeirdScaledSampler { .. }
                | Self::BlendedNoise(_)
                | Self::EndIslands
        )
    }
}

/// Evaluator for density graphs.
///
/// Holds the instantiated noise generators, one slot per graph node.
#[derive(Debug, Clone)]
pub struct DensityEvaluator {
    graph: Arc<DensityGraph>,
    samplers: Vec<NodeSampler>,
    cell: CellSize,
}

impl DensityEvaluator {
    /// Seed a graph. `instantiate` is called once for every node that samples noise.
    ///
    /// # Errors
    /// Propagates the first error of `instantiate`, and fails with
    /// [`GraphError::UnseededNode`] when it returns a sampler that cannot serve
    /// the node.
    pub fn new<E: From<GraphError>>(
        graph: Arc<DensityGraph>,
        cell: CellSize,
        mut instantiate: impl FnMut(&DensityNode) -> Result<NodeSampler, E>,
    ) -> Result<Self, E> {
        let samplers = graph
            .iter()
            .map(|(id, node)| {
                if !node.needs_sampler() {
                    return Ok(NodeSampler::None);
                }
                let sampler = instantiate(node)?;
                if sampler.serves(node) {
                    Ok(sampler)
                } else {
                    Err(GraphError::UnseededNode(id.index()).into())
                }
            })
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self { graph, samplers, cell })
    }

    /// The evaluated graph.
    #[must_use]
    pub fn graph(&self) -> &DensityGraph {
        &self.graph
    }

    /// Size of the cells `Interpolated` nodes sample on.
    #[must_use]
    pub const fn cell_size(&self) -> CellSize {
        self.cell
    }

    /// Evaluate `node` at a block position.
    #[must_use]
    pub fn value_at(&self, node: NodeId, x: i32, y: i32, z: i32, cache: &mut EvalCache) -> f64 {
        self.value(node, &DensityContext::new(x, y, z), cache)
    }

    /// The noise of a sampling node. Always present: [`Self::new`] rejects graphs
    /// with unseeded nodes.
    #[inline]
    fn noise(&self, node: NodeId) -> Option<&NormalNoise> {
        let noise = match &self.samplers[node.index()] {
            NodeSampler::Noise(noise) => Some(noise.as_ref()),
            _ => None,
        };
        debug_assert!(noise.is_some(), "node {} has no noise", node.index());
        noise
    }

    /// Evaluate `node` at `ctx`.
    #[must_use]
    #[allow(clippy::too_many_lines, clippy::float_cmp)]
    pub fn value(&self, node: NodeId, ctx: &DensityContext, cache: &mut EvalCache) -> f64 {
        match self.graph.node(node) {
            DensityNode::Constant(v) => *v,

            DensityNode::YClampedGradient {
                from_y,
                to_y,
                from_value,
                to_value,
            } => clamped_map(
                f64::from(ctx.y),
                f64::from(*from_y),
                f64::from(*to_y),
                *from_value,
                *to_value,
            ),

            DensityNode::Noise { xz_scale, y_scale, .. } => self.noise(node).map_or(0.0, |noise| {
                noise.get_value(
                    f64::from(ctx.x) * xz_scale,
                    f64::from(ctx.y) * y_scale,
                    f64::from(ctx.z) * xz_scale,
                )
            }),

            DensityNode::ShiftedNoise {
                shift_x,
                shift_y,
                shift_z,
                xz_scale,
                y_scale,
                ..
            } => {
                // Scale first, then add shift (shift is NOT scaled by xz_scale)
                let dx = self.value(*shift_x, ctx, cache);
                let dy = self.value(*shift_y, ctx, cache);
                let dz = self.value(*shift_z, ctx, cache);
                self.noise(node).map_or(0.0, |noise| {
                    noise.get_value(
                        f64::from(ctx.x) * xz_scale + dx,
                        f64::from(ctx.y) * y_scale + dy,
                        f64::from(ctx.z) * xz_scale + dz,
                    )
                })
            }

            DensityNode::ShiftA { .. } => self.noise(node).map_or(0.0, |noise| {
                noise.get_value(f64::from(ctx.x) * 0.25, 0.0, f64::from(ctx.z) * 0.25) * 4.0
            }),

            DensityNode::ShiftB { .. } => self.noise(node).map_or(0.0, |noise| {
                noise.get_value(f64::from(ctx.z) * 0.25, f64::from(ctx.x) * 0.25, 0.0) * 4.0
            }),

            DensityNode::Shift { .. } => self.noise(node).map_or(0.0, |noise| {
                noise.get_value(
                    f64::from(ctx.x) * 0.25,
                    f64::from(ctx.y) * 0.25,
                    f64::from(ctx.z) * 0.25,
                ) * 4.0
            }),

            DensityNode::BlendedNoise(_) => match &self.samplers[node.index()] {
                NodeSampler::Blended(noise) => noise.compute(ctx.x, ctx.y, ctx.z),
                _ => 0.0,
            },

            DensityNode::WeirdScaledSampler { input, mapper, .. } => {
                let rarity = mapper.get_values(self.value(*input, ctx, cache));
                self.noise(node).map_or(0.0, |noise| {
                    rarity
                        * noise
                            .get_value(
                                f64::from(ctx.x) / rarity,
                                f64::from(ctx.y) / rarity,
                                f64::from(ctx.z) / rarity,
                            )
                            .abs()
                })
            }

            DensityNode::EndIslands => match &self.samplers[node.index()] {
                NodeSampler::EndIslands(islands) => islands.compute(ctx.x, ctx.z),
                _ => 0.0,
            },

            DensityNode::Add(a, b) => self.value(*a, ctx, cache) + self.value(*b, ctx, cache),

            DensityNode::Mul(a, b) => {
                let v = self.value(*a, ctx, cache);
                if v == 0.0 { 0.0 } else { v * self.value(*b, ctx, cache) }
            }

            DensityNode::Min(a, b) => self.value(*a, ctx, cache).min(self.value(*b, ctx, cache)),

            DensityNode::Max(a, b) => self.value(*a, ctx, cache).max(self.value(*b, ctx, cache)),

            DensityNode::Abs(f) => self.value(*f, ctx, cache).abs(),

            DensityNode::Square(f) => {
                let v = self.value(*f, ctx, cache);
                v * v
            }

            DensityNode::Cube(f) => {
                let v = self.value(*f, ctx, cache);
                v * v * v
            }

            DensityNode::HalfNegative(f) => {
                let v = self.value(*f, ctx, cache);
                if v > 0.0 { v } else { v * 0.5 }
            }

            DensityNode::QuarterNegative(f) => {
                let v = self.value(*f, ctx, cache);
                if v > 0.0 { v } else { v * 0.25 }
            }

            DensityNode::Squeeze(f) => {
                let c = clamp(self.value(*f, ctx, cache), -1.0, 1.0);
                c / 2.0 - c * c * c / 24.0
            }

            DensityNode::Clamp { input, min, max } => clamp(self.value(*input, ctx, cache), *min, *max),

            DensityNode::RangeChoice {
                input,
                min_inclusive,
                max_exclusive,
                when_in_range,
                when_out_of_range,
            } => {
                let v = self.value(*input, ctx, cache);
                if v >= *min_inclusive && v < *max_exclusive {
                    self.value(*when_in_range, ctx, cache)
                } else {
                    self.value(*when_out_of_range, ctx, cache)
                }
            }

            DensityNode::Spline(spline) => f64::from(spline.apply(&mut |coordinate| {
                self.value(coordinate, ctx, cache) as f32
            })),

            DensityNode::Interpolated(f) => self.interpolate(node, *f, ctx, cache),

            // Cache the last (x, y, z) → value per node.
            DensityNode::CacheOnce(f) => {
                if let Some(&(at, val)) = cache.once.get(&node)
                    && at == *ctx
                {
                    return val;
                }
                let val = self.value(*f, ctx, cache);
                cache.once.insert(node, (*ctx, val));
                val
            }

            // Cache the last (x, z) column per node, ignoring y.
            DensityNode::FlatCache(f) | DensityNode::Cache2D(f) => {
                if let Some(&(x, z, val)) = cache.flat.get(&node)
                    && x == ctx.x
                    && z == ctx.z
                {
                    return val;
                }
                let val = self.value(*f, ctx, cache);
                cache.flat.insert(node, (ctx.x, ctx.z, val));
                val
            }

            DensityNode::BlendAlpha => cache.blender.blend_offset_and_factor(ctx.x, ctx.z).alpha,

            DensityNode::BlendOffset => cache.blender.blend_offset_and_factor(ctx.x, ctx.z).offset,

            DensityNode::BlendDensity(f) => {
                let density = self.value(*f, ctx, cache);
                cache.blender.blend_density(ctx, density)
            }
        }
    }

    /// Trilinear interpolation of `input` between the eight corners of the cell
    /// containing `ctx`, lerping along y, then x, then z.
    fn interpolate(&self, node: NodeId, input: NodeId, ctx: &DensityContext, cache: &mut EvalCache) -> f64 {
        let CellSize { width, height } = self.cell;
        let origin = (
            floor_div(ctx.x, width) * width,
            floor_div(ctx.y, height) * height,
            floor_div(ctx.z, width) * width,
        );
        let cached = cache.corners.get(&node).filter(|cell| cell.origin == origin).map(|cell| cell.values);
        let values = match cached {
            Some(values) => values,
            None => {
                let (x0, y0, z0) = origin;
                let mut values = [0.0; 8];
                for (i, value) in values.iter_mut().enumerate() {
                    let (dx, dy, dz) = ((i & 1) as i32, ((i >> 1) & 1) as i32, (i >> 2) as i32);
                    let corner = DensityContext::new(x0 + dx * width, y0 + dy * height, z0 + dz * width);
                    *value = self.value(input, &corner, cache);
                }
                cache.corners.insert(node, CellCorners { origin, values });
                values
            }
        };

        let [c000, c100, c010, c110, c001, c101, c011, c111] = values;
        let fx = f64::from(ctx.x - origin.0) / f64::from(width);
        let fy = f64::from(ctx.y - origin.1) / f64::from(height);
        let fz = f64::from(ctx.z - origin.2) / f64::from(width);

        let x0z0 = lerp(fy, c000, c010);
        let x1z0 = lerp(fy, c100, c110);
        let x0z1 = lerp(fy, c001, c011);
        let x1z1 = lerp(fy, c101, c111);
        let z0 = lerp(fx, x0z0, x1z0);
        let z1 = lerp(fx, x0z1, x1z1);
        lerp(fz, z0, z1)
    }
}
