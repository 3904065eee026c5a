//! Density function types matching vanilla Minecraft's `DensityFunctions.java`.
//!
//! Functions live in a flat arena ([`DensityGraph`]) and refer to their inputs by
//! [`NodeId`]. A node's inputs always sit at a lower index than the node itself, so
//! the graph is acyclic by construction and shared subexpressions are shared ids.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Identifier;
use crate::density::spline::CubicSpline;
use crate::noise::BlendedNoiseConfig;

/// Errors raised while building or validating a density graph.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    /// A node refers to an input that does not precede it in the arena.
    #[error("node {node} refers to node {child}, which does not precede it")]
    ForwardReference {
        /// Index of the offending node.
        node: usize,
        /// Index it refers to.
        child: usize,
    },
    /// Spline locations must be strictly ascending.
    #[error("spline point at {location} does not follow {previous}")]
    SplineOrder {
        /// Location of the previous point.
        previous: f32,
        /// Location of the rejected point.
        location: f32,
    },
    /// A multipoint spline needs at least one point.
    #[error("a multipoint spline needs at least one point")]
    EmptySpline,
    /// A router output points past the end of its graph.
    #[error("router output refers to node {index} of a graph with {len} nodes")]
    DanglingOutput {
        /// Index the output refers to.
        index: usize,
        /// Number of nodes in the graph.
        len: usize,
    },
    /// A named function was looked up before it was registered.
    #[error("density function `{0}` is not registered")]
    MissingFunction(Identifier),
    /// A noise-sampling node was given no sampler, or one of the wrong kind.
    #[error("node {0} samples noise but was not seeded")]
    UnseededNode(usize),
}

/// Handle to a node in a [`DensityGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Arena slot of this node.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

/// One density function. Inputs are referenced by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityNode {
    /// A constant value.
    Constant(f64),

    /// A Y-axis clamped gradient.
    ///
    /// Returns `from_value` at Y = `from_y`, `to_value` at Y = `to_y`,
    /// linearly interpolated between, clamped outside the range.
    YClampedGradient {
        /// Starting Y coordinate
        from_y: i32,
        /// Ending Y coordinate
        to_y: i32,
        /// Value at `from_y`
        from_value: f64,
        /// Value at `to_y`
        to_value: f64,
    },

    /// Sample a named noise at scaled block coordinates.
    Noise {
        /// Noise identifier
        noise: Identifier,
        /// XZ scale factor
        xz_scale: f64,
        /// Y scale factor
        y_scale: f64,
    },

    /// Sample a named noise at scaled coordinates offset by three shift inputs.
    ShiftedNoise {
        /// X coordinate shift
        shift_x: NodeId,
        /// Y coordinate shift
        shift_y: NodeId,
        /// Z coordinate shift
        shift_z: NodeId,
        /// XZ scale factor
        xz_scale: f64,
        /// Y scale factor
        y_scale: f64,
        /// Noise identifier
        noise: Identifier,
    },

    /// `noise(x/4, 0, z/4) * 4`
    ShiftA {
        /// Noise identifier
        noise: Identifier,
    },
    /// `noise(z/4, x/4, 0) * 4`
    ShiftB {
        /// Noise identifier
        noise: Identifier,
    },
    /// `noise(x/4, y/4, z/4) * 4`
    Shift {
        /// Noise identifier
        noise: Identifier,
    },

    /// The legacy 3D base terrain noise.
    BlendedNoise(BlendedNoiseConfig),

    /// Noise sampled at coordinates divided by a rarity chosen from `input`.
    WeirdScaledSampler {
        /// Rarity input
        input: NodeId,
        /// Noise identifier
        noise: Identifier,
        /// Rarity quantization
        mapper: RarityValueMapper,
    },

    /// End islands height field.
    EndIslands,

    /// Add two density functions.
    Add(NodeId, NodeId),
    /// Multiply two density functions. The second is skipped when the first is zero.
    Mul(NodeId, NodeId),
    /// Take the minimum of two density functions.
    Min(NodeId, NodeId),
    /// Take the maximum of two density functions.
    Max(NodeId, NodeId),

    /// Absolute value.
    Abs(NodeId),
    /// Square the value.
    Square(NodeId),
    /// Cube the value.
    Cube(NodeId),
    /// Half negative: if v > 0 then v else v * 0.5
    HalfNegative(NodeId),
    /// Quarter negative: if v > 0 then v else v * 0.25
    QuarterNegative(NodeId),
    /// Squeeze: clamp(-1, 1) then apply c/2 - c³/24
    Squeeze(NodeId),

    /// Clamp the value to a range.
    Clamp {
        /// Input density function
        input: NodeId,
        /// Minimum value
        min: f64,
        /// Maximum value
        max: f64,
    },

    /// Choose between two functions based on input range.
    RangeChoice {
        /// Input density function
        input: NodeId,
        /// Minimum inclusive bound
        min_inclusive: f64,
        /// Maximum exclusive bound
        max_exclusive: f64,
        /// Function to use when in range
        when_in_range: NodeId,
        /// Function to use when out of range
        when_out_of_range: NodeId,
    },

    /// Cubic spline evaluation.
    Spline(CubicSpline),

    /// Trilinear interpolation between the corners of the enclosing noise cell.
    Interpolated(NodeId),
    /// Memoized per column for one pass.
    FlatCache(NodeId),
    /// Memoized per column for one pass.
    #[serde(rename = "cache_2d")]
    Cache2D(NodeId),
    /// Memoized per position for one pass.
    CacheOnce(NodeId),

    /// Blending alpha from the active [`Blender`](crate::density::Blender).
    BlendAlpha,
    /// Blending offset from the active [`Blender`](crate::density::Blender).
    BlendOffset,
    /// Density passed through the active [`Blender`](crate::density::Blender).
    BlendDensity(NodeId),
}

impl DensityNode {
    /// Call `f` for every input of this node, spline coordinates included.
    pub fn for_each_input(&self, mut f: impl FnMut(NodeId)) {
        match self {
            Self::Constant(_)
            | Self::YClampedGradient { .. }
            | Self::Noise { .. }
            | Self::ShiftA { .. }
            | Self::ShiftB { .. }
            | Self::Shift { .. }
            | Self::BlendedNoise(_)
            | Self::EndIslands
            | Self::BlendAlpha
            | Self::BlendOffset => {}
            Self::ShiftedNoise {
                shift_x,
                shift_y,
                shift_z,
                ..
            } => {
                f(*shift_x);
                f(*shift_y);
                f(*shift_z);
            }
            Self::Add(a, b) | Self::Mul(a, b) | Self::Min(a, b) | Self::Max(a, b) => {
                f(*a);
                f(*b);
            }
            Self::WeirdScaledSampler { input: a, .. }
            | Self::Clamp { input: a, .. }
            | Self::Abs(a)
            | Self::Square(a)
            | Self::Cube(a)
            | Self::HalfNegative(a)
            | Self::QuarterNegative(a)
            | Self::Squeeze(a)
            | Self::Interpolated(a)
            | Self::FlatCache(a)
            | Self::Cache2D(a)
            | Self::CacheOnce(a)
            | Self::BlendDensity(a) => f(*a),
            Self::RangeChoice {
                input,
                when_in_range,
                when_out_of_range,
                ..
            } => {
                f(*input);
                f(*when_in_range);
                f(*when_out_of_range);
            }
            Self::Spline(spline) => spline.for_each_coordinate(&mut f),
        }
    }

    /// The value of a constant node.
    #[must_use]
    pub const fn as_constant(&self) -> Option<f64> {
        match self {
            Self::Constant(v) => Some(*v),
            _ => None,
        }
    }
}

/// An immutable arena of density functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DensityGraph {
    nodes: Vec<DensityNode>,
}

impl DensityGraph {
    pub(crate) const fn from_nodes(nodes: Vec<DensityNode>) -> Self {
        Self { nodes }
    }

    /// The node behind `id`.
    ///
    /// # Panics
    /// Panics if `id` was not issued for this graph.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &DensityNode {
        &self.nodes[id.index()]
    }

    /// Every node with its id, inputs first.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DensityNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::from_index(i), node))
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check that every input precedes the node that reads it. Decoded graphs must
    /// pass this before they are evaluated.
    ///
    /// # Errors
    /// Returns [`GraphError::ForwardReference`] for the first offending input.
    pub fn validate(&self) -> Result<(), GraphError> {
        for (node, density) in self.nodes.iter().enumerate() {
            let mut error = None;
            density.for_each_input(|input| {
                if error.is_none() && input.index() >= node {
                    error = Some(GraphError::ForwardReference {
                        node,
                        child: input.index(),
                    });
                }
            });
            if let Some(err) = error {
                return Err(err);
            }
        }
        Ok(())
    }

    /// Whether `id` refers to a node of this graph.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }
}

/// Rarity value mapper for cave generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RarityValueMapper {
    /// Mapper type `"type_1"` for tunnels.
    #[serde(rename = "type_1")]
    Tunnels,
    /// Mapper type `"type_2"` for caves.
    #[serde(rename = "type_2")]
    Caves,
}

impl RarityValueMapper {
    /// Get the scaling factor for this mapper based on rarity value.
    ///
    /// From vanilla NoiseRouterData.QuantizedSpaghettiRarity.
    #[must_use]
    pub fn get_values(&self, rarity: f64) -> f64 {
        match self {
            // getSpaghettiRarity3D
            Self::Tunnels => {
                if rarity < -0.5 {
                    0.75
                } else if rarity < 0.0 {
                    1.0
                } else if rarity < 0.5 {
                    1.5
                } else {
                    2.0
                }
            }
            // getSpaghettiRarity2D
            Self::Caves => {
                if rarity < -0.75 {
                    0.5
                } else if rarity < -0.5 {
                    0.75
                } else if rarity < 0.5 {
                    1.0
                } else if rarity < 0.75 {
                    2.0
                } else {
                    3.0
                }
            }
        }
    }

    /// Largest factor this mapper can return.
    #[must_use]
    pub const fn max_rarity(&self) -> f64 {
        match self {
            Self::Tunnels => 2.0,
            Self::Caves => 3.0,
        }
    }
}

/// Context for evaluating density functions at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityContext {
    /// X coordinate (block position)
    pub x: i32,
    /// Y coordinate (block position)
    pub y: i32,
    /// Z coordinate (block position)
    pub z: i32,
}

impl DensityContext {
    /// Create a new density context.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Block dimensions of one noise cell, the grid `Interpolated` nodes sample on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    /// Horizontal size in blocks.
    pub width: i32,
    /// Vertical size in blocks.
    pub height: i32,
}

impl CellSize {
    /// A cell of `width` × `height` blocks. Non-positive sizes collapse to one block.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width: if width > 0 { width } else { 1 },
            height: if height > 0 { height } else { 1 },
        }
    }
}

/// The fifteen outputs of a noise router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouterSlot {
    /// Aquifer barrier
    Barrier,
    /// Aquifer fluid level floodedness
    FluidLevelFloodedness,
    /// Aquifer fluid level spread
    FluidLevelSpread,
    /// Aquifer lava
    Lava,
    /// Climate temperature
    Temperature,
    /// Climate vegetation (humidity)
    Vegetation,
    /// Climate continentalness
    Continents,
    /// Climate erosion
    Erosion,
    /// Climate depth
    Depth,
    /// Climate ridges (weirdness)
    Ridges,
    /// Terrain density before caves and jaggedness
    InitialDensityWithoutJaggedness,
    /// Final terrain density
    FinalDensity,
    /// Ore vein toggle
    VeinToggle,
    /// Ore vein ridged
    VeinRidged,
    /// Ore vein gap
    VeinGap,
}

impl RouterSlot {
    /// Every slot, in router order.
    pub const ALL: [Self; 15] = [
        Self::Barrier,
        Self::FluidLevelFloodedness,
        Self::FluidLevelSpread,
        Self::Lava,
        Self::Temperature,
        Self::Vegetation,
        Self::Continents,
        Self::Erosion,
        Self::Depth,
        Self::Ridges,
        Self::InitialDensityWithoutJaggedness,
        Self::FinalDensity,
        Self::VeinToggle,
        Self::VeinRidged,
        Self::VeinGap,
    ];
}

/// A noise router: one graph and the fifteen outputs read by world generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseRouter {
    /// Arena all outputs point into.
    pub graph: Arc<DensityGraph>,
    /// Barrier noise for aquifers
    pub barrier: NodeId,
    /// Fluid level floodedness
    pub fluid_level_floodedness: NodeId,
    /// Fluid level spread
    pub fluid_level_spread: NodeId,
    /// Lava noise
    pub lava: NodeId,
    /// Temperature (for biome selection)
    pub temperature: NodeId,
    /// Vegetation/humidity (for biome selection)
    pub vegetation: NodeId,
    /// Continentalness (for biome selection)
    pub continents: NodeId,
    /// Erosion (for biome selection)
    pub erosion: NodeId,
    /// Depth (for biome selection)
    pub depth: NodeId,
    /// Ridges/weirdness (for biome selection)
    pub ridges: NodeId,
    /// Terrain density before caves and jaggedness (for aquifers and surface height)
    pub initial_density_without_jaggedness: NodeId,
    /// Final density (for terrain generation)
    pub final_density: NodeId,
    /// Vein toggle
    pub vein_toggle: NodeId,
    /// Vein ridged
    pub vein_ridged: NodeId,
    /// Vein gap
    pub vein_gap: NodeId,
}

impl NoiseRouter {
    /// The node behind a slot.
    #[must_use]
    pub const fn node(&self, slot: RouterSlot) -> NodeId {
        match slot {
            RouterSlot::Barrier => self.barrier,
            RouterSlot::FluidLevelFloodedness => self.fluid_level_floodedness,
            RouterSlot::FluidLevelSpread => self.fluid_level_spread,
            RouterSlot::Lava => self.lava,
            RouterSlot::Temperature => self.temperature,
            RouterSlot::Vegetation => self.vegetation,
            RouterSlot::Continents => self.continents,
            RouterSlot::Erosion => self.erosion,
            RouterSlot::Depth => self.depth,
            RouterSlot::Ridges => self.ridges,
            RouterSlot::InitialDensityWithoutJaggedness => self.initial_density_without_jaggedness,
            RouterSlot::FinalDensity => self.final_density,
            RouterSlot::VeinToggle => self.vein_toggle,
            RouterSlot::VeinRidged => self.vein_ridged,
            RouterSlot::VeinGap => self.vein_gap,
        }
    }

    /// Validate the graph and check that every slot points into it.
    ///
    /// # Errors
    /// Returns the first [`GraphError`] found.
    pub fn validate(&self) -> Result<(), GraphError> {
        self.graph.validate()?;
        let len = self.graph.len();
        match RouterSlot::ALL
            .iter()
            .map(|slot| self.node(*slot))
            .find(|id| !self.graph.contains(*id))
        {
            Some(id) => Err(GraphError::DanglingOutput {
                index: id.index(),
                len,
            }),
            None => Ok(()),
        }
    }
}
