//! Chunk-facing pieces of world generation: generation stages, the services a chunk
//! pipeline provides, and the below-zero upgrade of old chunks.

pub mod below_zero_retrogen;
pub mod chunk_access;
pub mod chunk_status;

pub use below_zero_retrogen::{BelowZeroRetrogen, RetainedBiomes, RetrogenBlocks, RetrogenTag};
pub use chunk_access::{BiomeLookup, BiomeResolver, BlockLookup, ChunkAccess};
pub use chunk_status::ChunkStatus;
