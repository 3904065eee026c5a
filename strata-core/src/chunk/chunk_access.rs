//! Services world generation consumes from the chunk pipeline.
//!
//! Blocks and biomes are opaque handles owned by the host's registries; this crate
//! only resolves them by name and compares them.

use strata_utils::Identifier;
use strata_utils::climate::ClimateSampler;
use strata_utils::density::EvalCache;

/// Resolves block names to block state handles.
pub trait BlockLookup {
    /// Default state handle.
    type Block: Copy + Eq;

    /// The default state of the block named `id`.
    fn block(&self, id: &Identifier) -> Option<Self::Block>;
}

/// Resolves biome names to biome handles.
pub trait BiomeLookup {
    /// Biome handle.
    type Biome: Copy + Eq;

    /// The biome named `id`.
    fn biome(&self, id: &Identifier) -> Option<Self::Biome>;
}

/// A chunk being generated. Block positions are local to the chunk horizontally
/// (`0..16`) and absolute vertically.
pub trait ChunkAccess {
    /// Block state handle.
    type Block: Copy + Eq;
    /// Biome handle.
    type Biome: Copy + Eq;

    /// Whether the chunk is an old chunk being extended below y 0.
    fn is_upgrading(&self) -> bool;

    /// The stored biome at a quart position.
    fn noise_biome(&self, quart_x: i32, quart_y: i32, quart_z: i32) -> Self::Biome;

    /// Block state at a position.
    fn block_state(&self, x: i32, y: i32, z: i32) -> Self::Block;

    /// Replace the block state at a position.
    fn set_block_state(&mut self, x: i32, y: i32, z: i32, state: Self::Block);

    /// Lowest y world generation writes to.
    fn generation_min_y(&self) -> i32;

    /// Highest y world generation writes to, inclusive.
    fn generation_max_y(&self) -> i32;
}

/// Picks the biome of a quart position.
///
/// Java reference: `BiomeResolver`
pub trait BiomeResolver<B> {
    /// The biome at a quart position.
    fn noise_biome(&self, quart_x: i32, quart_y: i32, quart_z: i32, sampler: &ClimateSampler, cache: &mut EvalCache) -> B;
}

impl<B, F> BiomeResolver<B> for F
where
    F: Fn(i32, i32, i32, &ClimateSampler, &mut EvalCache) -> B,
{
    fn noise_biome(&self, quart_x: i32, quart_y: i32, quart_z: i32, sampler: &ClimateSampler, cache: &mut EvalCache) -> B {
        self(quart_x, quart_y, quart_z, sampler, cache)
    }
}
