//! Density function system for world generation.
//!
//! Density functions form a DAG that is evaluated at each position to determine terrain
//! shape, biome climate values, and other world features. Graphs are stored as flat
//! arenas and built with [`GraphBuilder`].
//!
//! # Key Types
//!
//! - [`DensityNode`] - The density function enum with all operation types
//! - [`DensityGraph`] - Arena of nodes addressed by [`NodeId`]
//! - [`DensityEvaluator`] - Evaluates a graph with its seeded noise generators
//! - [`EvalCache`] - Per-pass memo tables and the active [`Blender`]
//! - [`NoiseRouter`] - The fifteen outputs read by world generation
//! - [`CubicSpline`] - Cubic spline interpolation for smooth terrain transitions

mod builder;
mod evaluator;
mod spline;
mod types;

pub use builder::{GraphBuilder, SlideEdge};
pub use evaluator::{Blender, BlendingOutput, DensityEvaluator, EmptyBlender, EvalCache, NodeSampler};
pub use spline::{CubicSpline, SplineBuilder, SplinePoint};
pub use types::{
    CellSize, DensityContext, DensityGraph, DensityNode, GraphError, NodeId, NoiseRouter,
    RarityValueMapper, RouterSlot,
};
