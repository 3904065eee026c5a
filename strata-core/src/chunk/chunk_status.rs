//! Chunk generation stages.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A chunk generation stage, in generation order.
///
/// Java reference: `ChunkStatus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChunkStatus {
    /// Allocated, nothing generated.
    Empty,
    /// Structure starts placed.
    StructureStarts,
    /// Neighbouring structure references collected.
    StructureReferences,
    /// Biomes sampled.
    Biomes,
    /// Terrain shape filled from the noise router.
    Noise,
    /// Surface rules applied.
    Surface,
    /// Carvers applied.
    Carvers,
    /// Features decorated.
    Features,
    /// Light sources collected.
    InitializeLight,
    /// Light propagated.
    Light,
    /// Initial mobs spawned.
    Spawn,
    /// Fully generated.
    Full,
}

/// Unknown status name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown chunk status `{0}`")]
pub struct UnknownChunkStatus(pub String);

impl ChunkStatus {
    /// Every status in generation order.
    pub const ALL: [Self; 12] = [
        Self::Empty,
        Self::StructureStarts,
        Self::StructureReferences,
        Self::Biomes,
        Self::Noise,
        Self::Surface,
        Self::Carvers,
        Self::Features,
        Self::InitializeLight,
        Self::Light,
        Self::Spawn,
        Self::Full,
    ];

    /// Position in generation order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this stage is `other` or comes after it.
    #[must_use]
    pub fn is_or_after(self, other: Self) -> bool {
        self >= other
    }

    /// Lowercase name used in saved chunks.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::StructureStarts => "structure_starts",
            Self::StructureReferences => "structure_references",
            Self::Biomes => "biomes",
            Self::Noise => "noise",
            Self::Surface => "surface",
            Self::Carvers => "carvers",
            Self::Features => "features",
            Self::InitializeLight => "initialize_light",
            Self::Light => "light",
            Self::Spawn => "spawn",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for ChunkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChunkStatus {
    type Err = UnknownChunkStatus;

    /// Parses a status name with or without the `minecraft:` namespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("minecraft:").unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|status| status.name() == name)
            .ok_or_else(|| UnknownChunkStatus(s.to_owned()))
    }
}
