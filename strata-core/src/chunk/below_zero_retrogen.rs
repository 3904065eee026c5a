//! Bookkeeping for chunks saved before the world extended below y 0.
//!
//! Java reference: `BelowZeroRetrogen`

use serde::{Deserialize, Serialize};
use strata_registry::RegistryError;
use strata_utils::Identifier;
use strata_utils::climate::ClimateSampler;
use strata_utils::density::EvalCache;

use super::chunk_access::{BiomeLookup, BiomeResolver, BlockLookup, ChunkAccess};
use super::chunk_status::ChunkStatus;

/// Lowest y of the band added below old chunks.
pub const UPGRADE_MIN_Y: i32 = -64;
/// Height of the band added below old chunks.
pub const UPGRADE_HEIGHT: i32 = 64;

const BLOCK_REGISTRY: &str = "block";
const BIOME_REGISTRY: &str = "worldgen/biome";

/// Biomes the upgrade keeps when they generate in the new band.
pub const RETAINED_BIOMES: [Identifier; 3] = [
    Identifier::vanilla_static("lush_caves"),
    Identifier::vanilla_static("dripstone_caves"),
    Identifier::vanilla_static("deep_dark"),
];

/// Saved form of [`BelowZeroRetrogen`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrogenTag {
    /// Status name the upgrade generates the new band up to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_status: Option<String>,
    /// Columns without bedrock in the old chunk, as bitset words.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_bedrock: Option<Vec<i64>>,
}

/// Upgrade state of one old chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BelowZeroRetrogen {
    target_status: ChunkStatus,
    missing_bedrock: [u64; 4],
}

/// Block states the upgrade writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrogenBlocks<B> {
    /// The old world floor.
    pub bedrock: B,
    /// What the old floor turns into.
    pub deepslate: B,
    /// Fill for bedrock holes.
    pub air: B,
}

impl<B: Copy + Eq> RetrogenBlocks<B> {
    /// Look up the blocks once.
    ///
    /// # Errors
    /// Returns [`RegistryError::MissingEntry`] for an unregistered block.
    pub fn resolve<L: BlockLookup<Block = B>>(lookup: &L) -> Result<Self, RegistryError> {
        let get = |path: &'static str| {
            let id = Identifier::vanilla_static(path);
            lookup
                .block(&id)
                .ok_or_else(|| RegistryError::missing(BLOCK_REGISTRY, id))
        };
        Ok(Self {
            bedrock: get("bedrock")?,
            deepslate: get("deepslate")?,
            air: get("air")?,
        })
    }
}

/// Resolved [`RETAINED_BIOMES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetainedBiomes<B> {
    biomes: [B; 3],
}

impl<B: Copy + Eq> RetainedBiomes<B> {
    /// Look up the retained biomes once.
    ///
    /// # Errors
    /// Returns [`RegistryError::MissingEntry`] for an unregistered biome.
    pub fn resolve<L: BiomeLookup<Biome = B>>(lookup: &L) -> Result<Self, RegistryError> {
        let get = |id: &Identifier| {
            lookup
                .biome(id)
                .ok_or_else(|| RegistryError::missing(BIOME_REGISTRY, id.clone()))
        };
        let [lush, dripstone, deep_dark] = &RETAINED_BIOMES;
        Ok(Self {
            biomes: [get(lush)?, get(dripstone)?, get(deep_dark)?],
        })
    }

    /// Whether `biome` survives the upgrade.
    #[must_use]
    pub fn contains(&self, biome: B) -> bool {
        self.biomes.contains(&biome)
    }
}

impl BelowZeroRetrogen {
    /// Upgrade state targeting `target_status`, or `None` for [`ChunkStatus::Empty`].
    #[must_use]
    pub fn new(target_status: ChunkStatus, missing_bedrock: [u64; 4]) -> Option<Self> {
        (target_status != ChunkStatus::Empty).then_some(Self {
            target_status,
            missing_bedrock,
        })
    }

    /// Parse saved upgrade state. Absent, `empty`, unknown and malformed data all
    /// mean the chunk needs no upgrade.
    #[must_use]
    pub fn read(tag: &RetrogenTag) -> Option<Self> {
        let name = tag.target_status.as_deref()?;
        let target_status = match name.parse::<ChunkStatus>() {
            Ok(status) => status,
            Err(err) => {
                log::warn!("Ignoring below zero retrogen data: {err}");
                return None;
            }
        };

        let mut missing_bedrock = [0u64; 4];
        if let Some(words) = &tag.missing_bedrock {
            if words.len() > missing_bedrock.len() {
                log::warn!(
                    "Ignoring below zero retrogen data: {} bedrock words, expected at most 4",
                    words.len()
                );
                return None;
            }
            for (slot, word) in missing_bedrock.iter_mut().zip(words) {
                *slot = *word as u64;
            }
        }
        Self::new(target_status, missing_bedrock)
    }

    /// Parse saved upgrade state from untyped JSON. A field of the wrong type is
    /// logged and the chunk is treated as not upgrading.
    #[must_use]
    pub fn read_value(value: &serde_json::Value) -> Option<Self> {
        match RetrogenTag::deserialize(value) {
            Ok(tag) => Self::read(&tag),
            Err(err) => {
                log::error!("Failed to parse below zero retrogen data: {err}");
                None
            }
        }
    }

    /// Saved form. Trailing empty words are dropped and an empty set is omitted.
    #[must_use]
    pub fn write(&self) -> RetrogenTag {
        let used = self.missing_bedrock.iter().rposition(|&word| word != 0).map_or(0, |i| i + 1);
        let missing_bedrock = (used > 0).then(|| self.missing_bedrock[..used].iter().map(|&word| word as i64).collect());
        RetrogenTag {
            target_status: Some(self.target_status.name().to_owned()),
            missing_bedrock,
        }
    }

    /// Status the new band is generated up to.
    #[must_use]
    pub const fn target_status(&self) -> ChunkStatus {
        self.target_status
    }

    /// Whether any column of the old chunk lacked bedrock.
    #[must_use]
    pub fn has_bedrock_holes(&self) -> bool {
        self.missing_bedrock.iter().any(|&word| word != 0)
    }

    /// Whether the column at `x, z` lacked bedrock. Only the low four bits of each
    /// coordinate are used.
    #[must_use]
    pub const fn has_bedrock_hole(&self, x: i32, z: i32) -> bool {
        let bit = ((z & 15) * 16 + (x & 15)) as usize;
        self.missing_bedrock[bit / 64] & (1 << (bit % 64)) != 0
    }

    /// Turn the old bedrock floor, y 0 to 4, into deepslate.
    pub fn replace_old_bedrock<C: ChunkAccess>(chunk: &mut C, blocks: &RetrogenBlocks<C::Block>) {
        for x in 0..16 {
            for z in 0..16 {
                for y in 0..=4 {
                    if chunk.block_state(x, y, z) == blocks.bedrock {
                        chunk.set_block_state(x, y, z, blocks.deepslate);
                    }
                }
            }
        }
    }

    /// Clear every column that lacked bedrock to air, top to bottom.
    pub fn apply_bedrock_mask<C: ChunkAccess>(&self, chunk: &mut C, blocks: &RetrogenBlocks<C::Block>) {
        let (min_y, max_y) = (chunk.generation_min_y(), chunk.generation_max_y());
        for x in 0..16 {
            for z in 0..16 {
                if self.has_bedrock_hole(x, z) {
                    for y in min_y..=max_y {
                        chunk.set_block_state(x, y, z, blocks.air);
                    }
                }
            }
        }
    }

    /// Wrap `resolver` so an upgrading chunk keeps its stored biomes, except where
    /// a retained biome generates.
    pub fn biome_resolver<'a, R, C>(
        resolver: R,
        chunk: &'a C,
        retained: &'a RetainedBiomes<C::Biome>,
    ) -> RetrogenBiomeResolver<'a, R, C>
    where
        R: BiomeResolver<C::Biome>,
        C: ChunkAccess,
    {
        RetrogenBiomeResolver {
            upgrading: chunk.is_upgrading(),
            resolver,
            chunk,
            retained,
        }
    }
}

/// See [`BelowZeroRetrogen::biome_resolver`].
pub struct RetrogenBiomeResolver<'a, R, C: ChunkAccess> {
    upgrading: bool,
    resolver: R,
    chunk: &'a C,
    retained: &'a RetainedBiomes<C::Biome>,
}

impl<R, C> BiomeResolver<C::Biome> for RetrogenBiomeResolver<'_, R, C>
where
    R: BiomeResolver<C::Biome>,
    C: ChunkAccess,
{
    fn noise_biome(
        &self,
        quart_x: i32,
        quart_y: i32,
        quart_z: i32,
        sampler: &ClimateSampler,
        cache: &mut EvalCache,
    ) -> C::Biome {
        let biome = self.resolver.noise_biome(quart_x, quart_y, quart_z, sampler, cache);
        if !self.upgrading || self.retained.contains(biome) {
            biome
        } else {
            self.chunk.noise_biome(quart_x, 0, quart_z)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rustc_hash::FxHashMap;
    use strata_registry::noise_router_data;
    use strata_utils::density::{CellSize, DensityEvaluator, GraphError, NodeSampler};

    use super::*;

    const AIR: u8 = 0;
    const BEDROCK: u8 = 1;
    const DEEPSLATE: u8 = 2;
    const STONE: u8 = 3;

    const PLAINS: u8 = 10;
    const LUSH_CAVES: u8 = 11;
    const DESERT: u8 = 12;

    const BLOCKS: RetrogenBlocks<u8> = RetrogenBlocks {
        bedrock: BEDROCK,
        deepslate: DEEPSLATE,
        air: AIR,
    };

    struct Registry;

    impl BlockLookup for Registry {
        type Block = u8;

        fn block(&self, id: &Identifier) -> Option<u8> {
            match id.path.as_ref() {
                "air" => Some(AIR),
                "bedrock" => Some(BEDROCK),
                "deepslate" => Some(DEEPSLATE),
                _ => None,
            }
        }
    }

    impl BiomeLookup for Registry {
        type Biome = u8;

        fn biome(&self, id: &Identifier) -> Option<u8> {
            match id.path.as_ref() {
                "lush_caves" => Some(LUSH_CAVES),
                "dripstone_caves" => Some(13),
                "deep_dark" => Some(14),
                _ => None,
            }
        }
    }

    struct EmptyRegistry;

    impl BlockLookup for EmptyRegistry {
        type Block = u8;

        fn block(&self, _: &Identifier) -> Option<u8> {
            None
        }
    }

    struct TestChunk {
        upgrading: bool,
        blocks: FxHashMap<(i32, i32, i32), u8>,
    }

    impl TestChunk {
        fn new(upgrading: bool) -> Self {
            Self {
                upgrading,
                blocks: FxHashMap::default(),
            }
        }
    }

    impl ChunkAccess for TestChunk {
        type Block = u8;
        type Biome = u8;

        fn is_upgrading(&self) -> bool {
            self.upgrading
        }

        fn noise_biome(&self, _: i32, _: i32, _: i32) -> u8 {
            PLAINS
        }

        fn block_state(&self, x: i32, y: i32, z: i32) -> u8 {
            self.blocks.get(&(x, y, z)).copied().unwrap_or(STONE)
        }

        fn set_block_state(&mut self, x: i32, y: i32, z: i32, state: u8) {
            self.blocks.insert((x, y, z), state);
        }

        fn generation_min_y(&self) -> i32 {
            UPGRADE_MIN_Y
        }

        fn generation_max_y(&self) -> i32 {
            UPGRADE_MIN_Y + UPGRADE_HEIGHT - 1
        }
    }

    fn tag(status: &str, words: Option<Vec<i64>>) -> RetrogenTag {
        RetrogenTag {
            target_status: Some(status.to_owned()),
            missing_bedrock: words,
        }
    }

    #[test]
    fn test_read() {
        let retrogen = BelowZeroRetrogen::read(&tag("minecraft:carvers", None)).unwrap();
        assert_eq!(retrogen.target_status(), ChunkStatus::Carvers);
        assert!(!retrogen.has_bedrock_holes());

        assert_eq!(BelowZeroRetrogen::read(&RetrogenTag::default()), None);
        assert_eq!(BelowZeroRetrogen::read(&tag("empty", None)), None);
        assert_eq!(BelowZeroRetrogen::read(&tag("not_a_status", None)), None);
        assert_eq!(BelowZeroRetrogen::read(&tag("noise", Some(vec![0; 5]))), None);
    }

    #[test]
    fn test_read_value_rejects_wrong_types() {
        let value = serde_json::json!({"target_status": 5, "missing_bedrock": [1]});
        assert_eq!(BelowZeroRetrogen::read_value(&value), None);
        let value = serde_json::json!({"target_status": "surface", "missing_bedrock": "none"});
        assert_eq!(BelowZeroRetrogen::read_value(&value), None);
        assert_eq!(BelowZeroRetrogen::read_value(&serde_json::json!([1, 2])), None);

        let value = serde_json::json!({"target_status": "surface", "missing_bedrock": [1]});
        let retrogen = BelowZeroRetrogen::read_value(&value).unwrap();
        assert_eq!(retrogen.target_status(), ChunkStatus::Surface);
        assert!(retrogen.has_bedrock_hole(0, 0));
        assert_eq!(BelowZeroRetrogen::read_value(&serde_json::json!({})), None);
    }

    #[test]
    fn test_bedrock_hole_bits() {
        // Column (3, 7) is bit 7 * 16 + 3 = 115: word 1, bit 51.
        let retrogen = BelowZeroRetrogen::read(&tag("surface", Some(vec![0, 1 << 51]))).unwrap();
        assert!(retrogen.has_bedrock_holes());
        assert!(retrogen.has_bedrock_hole(3, 7));
        assert!(retrogen.has_bedrock_hole(19, -9));
        assert!(!retrogen.has_bedrock_hole(7, 3));

        let last = BelowZeroRetrogen::read(&tag("surface", Some(vec![0, 0, 0, i64::MIN]))).unwrap();
        assert!(last.has_bedrock_hole(15, 15));
    }

    #[test]
    fn test_write() {
        let retrogen = BelowZeroRetrogen::new(ChunkStatus::Features, [0, 1 << 51, 0, 0]).unwrap();
        let saved = retrogen.write();
        assert_eq!(saved, tag("features", Some(vec![0, 1 << 51])));
        assert_eq!(BelowZeroRetrogen::read(&saved), Some(retrogen));

        let solid = BelowZeroRetrogen::new(ChunkStatus::Full, [0; 4]).unwrap();
        assert_eq!(solid.write().missing_bedrock, None);
        let json = serde_json::to_string(&solid.write()).unwrap();
        assert_eq!(json, r#"{"target_status":"full"}"#);

        assert_eq!(BelowZeroRetrogen::new(ChunkStatus::Empty, [0; 4]), None);
    }

    #[test]
    fn test_replace_old_bedrock() {
        let mut chunk = TestChunk::new(true);
        for y in -1..=5 {
            chunk.set_block_state(4, y, 9, BEDROCK);
        }
        BelowZeroRetrogen::replace_old_bedrock(&mut chunk, &BLOCKS);
        assert_eq!(chunk.block_state(4, -1, 9), BEDROCK);
        for y in 0..=4 {
            assert_eq!(chunk.block_state(4, y, 9), DEEPSLATE);
        }
        assert_eq!(chunk.block_state(4, 5, 9), BEDROCK);
        assert_eq!(chunk.block_state(5, 0, 9), STONE);
    }

    #[test]
    fn test_apply_bedrock_mask() {
        let retrogen = BelowZeroRetrogen::new(ChunkStatus::Noise, [0, 1 << 51, 0, 0]).unwrap();
        let mut chunk = TestChunk::new(true);
        retrogen.apply_bedrock_mask(&mut chunk, &BLOCKS);
        assert_eq!(chunk.block_state(3, UPGRADE_MIN_Y, 7), AIR);
        assert_eq!(chunk.block_state(3, -1, 7), AIR);
        assert_eq!(chunk.block_state(3, 0, 7), STONE);
        assert_eq!(chunk.block_state(7, -10, 3), STONE);
        assert_eq!(chunk.blocks.len(), UPGRADE_HEIGHT as usize);
    }

    #[test]
    fn test_biome_resolver() {
        let retained = RetainedBiomes::resolve(&Registry).unwrap();
        let router = noise_router_data::none();
        let evaluator: Result<_, GraphError> =
            DensityEvaluator::new(Arc::clone(&router.graph), CellSize::new(1, 1), |_| Ok(NodeSampler::None));
        let sampler = ClimateSampler::new(Arc::new(evaluator.unwrap()), &router);
        let mut cache = EvalCache::new();
        let resolver = |_: i32, y: i32, _: i32, _: &ClimateSampler, _: &mut EvalCache| {
            if y < 0 { LUSH_CAVES } else { DESERT }
        };

        let upgrading = TestChunk::new(true);
        let wrapped = BelowZeroRetrogen::biome_resolver(resolver, &upgrading, &retained);
        assert_eq!(wrapped.noise_biome(0, -4, 0, &sampler, &mut cache), LUSH_CAVES);
        assert_eq!(wrapped.noise_biome(0, 4, 0, &sampler, &mut cache), PLAINS);

        let fresh = TestChunk::new(false);
        let wrapped = BelowZeroRetrogen::biome_resolver(resolver, &fresh, &retained);
        assert_eq!(wrapped.noise_biome(0, 4, 0, &sampler, &mut cache), DESERT);
    }

    #[test]
    fn test_resolve_blocks() {
        assert_eq!(RetrogenBlocks::resolve(&Registry).unwrap(), BLOCKS);
        let err = RetrogenBlocks::resolve(&EmptyRegistry).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingEntry { registry: "block", ref id } if id.path == "bedrock"
        ));
    }
}
