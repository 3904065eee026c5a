//! Seeding a noise router for a world.
//!
//! Java reference: `RandomState`

use std::sync::Arc;

use anyhow::Context;
use rustc_hash::FxHashMap;
use strata_registry::noise_parameters::keys as noises;
use strata_registry::{NoiseGeneratorSettings, RegistryError, WorldGenContext};
use strata_utils::Identifier;
use strata_utils::climate::ClimateSampler;
use strata_utils::density::{DensityEvaluator, DensityNode, EvalCache, NodeSampler, NoiseRouter, RouterSlot};
use strata_utils::noise::{BlendedNoise, EndIslands, NoiseParameters, NormalNoise};
use strata_utils::random::legacy_random::LegacyRandom;
use strata_utils::random::xoroshiro::Xoroshiro;
use strata_utils::random::{PositionalRandom, Random, RandomSplitter};

/// A noise router bound to a world seed, with the positional factories the rest of
/// world generation draws from.
#[derive(Debug, Clone)]
pub struct RandomState {
    seed: u64,
    random: RandomSplitter,
    aquifer_random: RandomSplitter,
    ore_random: RandomSplitter,
    router: NoiseRouter,
    evaluator: Arc<DensityEvaluator>,
    sampler: ClimateSampler,
    noises: FxHashMap<Identifier, Arc<NormalNoise>>,
}

/// The noise a node samples, if any.
fn sampled_noise(node: &DensityNode) -> Option<&Identifier> {
    match node {
        DensityNode::Noise { noise, .. }
        | DensityNode::ShiftA { noise }
        | DensityNode::ShiftB { noise }
        | DensityNode::Shift { noise }
        | DensityNode::ShiftedNoise { noise, .. }
        | DensityNode::WeirdScaledSampler { noise, .. } => Some(noise),
        _ => None,
    }
}

/// Seeds each noise once, however many nodes sample it.
struct NoiseWiring<'a> {
    seed: u64,
    legacy: bool,
    random: &'a RandomSplitter,
    context: &'a WorldGenContext,
    noises: FxHashMap<Identifier, Arc<NormalNoise>>,
}

impl NoiseWiring<'_> {
    fn noise(&mut self, key: &Identifier) -> anyhow::Result<Arc<NormalNoise>> {
        if let Some(noise) = self.noises.get(key) {
            return Ok(Arc::clone(noise));
        }
        let noise = Arc::new(self.create(key)?);
        self.noises.insert(key.clone(), Arc::clone(&noise));
        Ok(noise)
    }

    fn create(&self, key: &Identifier) -> anyhow::Result<NormalNoise> {
        if self.legacy {
            let nether_biome = NoiseParameters::new(-7, vec![1.0, 1.0]);
            if *key == noises::TEMPERATURE {
                let mut random = LegacyRandom::from_seed(self.seed);
                return Ok(NormalNoise::create_legacy_nether_biome(&mut random, &nether_biome)?);
            }
            if *key == noises::VEGETATION {
                let mut random = LegacyRandom::from_seed(self.seed.wrapping_add(1));
                return Ok(NormalNoise::create_legacy_nether_biome(&mut random, &nether_biome)?);
            }
            if *key == noises::SHIFT {
                let mut random = self.random.with_hash_of(&key.to_string());
                return Ok(NormalNoise::create(&mut random, &NoiseParameters::new(0, vec![0.0])));
            }
        }
        let parameters = self.context.noise(key)?;
        let mut random = self.random.with_hash_of(&key.to_string());
        Ok(NormalNoise::create(&mut random, parameters))
    }

    fn sampler(&mut self, node: &DensityNode) -> anyhow::Result<NodeSampler> {
        if let Some(key) = sampled_noise(node) {
            return Ok(NodeSampler::Noise(self.noise(key)?));
        }
        match node {
            DensityNode::BlendedNoise(config) => {
                let noise = if self.legacy {
                    BlendedNoise::new(&mut LegacyRandom::from_seed(self.seed), *config)?
                } else {
                    BlendedNoise::new(&mut self.random.with_hash_of("minecraft:terrain"), *config)?
                };
                Ok(NodeSampler::Blended(Arc::new(noise)))
            }
            DensityNode::EndIslands => Ok(NodeSampler::EndIslands(Arc::new(EndIslands::new(self.seed)))),
            _ => Ok(NodeSampler::None),
        }
    }
}

impl RandomState {
    /// Seed the router of `settings` for `seed`.
    ///
    /// # Errors
    /// Fails if the router samples a noise `context` does not register
    /// ([`RegistryError::MissingEntry`]).
    pub fn new(settings: &NoiseGeneratorSettings, context: &WorldGenContext, seed: u64) -> anyhow::Result<Self> {
        let legacy = settings.use_legacy_random_source;
        let random = if legacy {
            LegacyRandom::from_seed(seed).next_positional()
        } else {
            Xoroshiro::from_seed(seed).next_positional()
        };
        let aquifer_random = random.with_hash_of("minecraft:aquifer").next_positional();
        let ore_random = random.with_hash_of("minecraft:ore").next_positional();

        let router = settings.noise_router.clone();
        let mut wiring = NoiseWiring {
            seed,
            legacy,
            random: &random,
            context,
            noises: FxHashMap::default(),
        };
        let evaluator = DensityEvaluator::new(
            Arc::clone(&router.graph),
            settings.noise_settings.cell_size(),
            |node| {
                wiring
                    .sampler(node)
                    .with_context(|| format!("failed to seed density node {node:?}"))
            },
        )?;
        let noises = wiring.noises;
        let evaluator = Arc::new(evaluator);
        let sampler = ClimateSampler::new(Arc::clone(&evaluator), &router);
        log::debug!(
            "Seeded noise router with {} nodes and {} noises (legacy random: {legacy})",
            router.graph.len(),
            noises.len()
        );

        Ok(Self {
            seed,
            random,
            aquifer_random,
            ore_random,
            router,
            evaluator,
            sampler,
            noises,
        })
    }

    /// The world seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The base positional factory.
    #[must_use]
    pub const fn random(&self) -> &RandomSplitter {
        &self.random
    }

    /// Positional factory for aquifers.
    #[must_use]
    pub const fn aquifer_random(&self) -> &RandomSplitter {
        &self.aquifer_random
    }

    /// Positional factory for ore veins.
    #[must_use]
    pub const fn ore_random(&self) -> &RandomSplitter {
        &self.ore_random
    }

    /// The unseeded router.
    #[must_use]
    pub const fn router(&self) -> &NoiseRouter {
        &self.router
    }

    /// The seeded evaluator.
    #[must_use]
    pub fn evaluator(&self) -> &DensityEvaluator {
        &self.evaluator
    }

    /// Climate sampler over the router's climate outputs.
    #[must_use]
    pub const fn sampler(&self) -> &ClimateSampler {
        &self.sampler
    }

    /// The seeded noise the router samples under `key`.
    #[must_use]
    pub fn noise(&self, key: &Identifier) -> Option<&NormalNoise> {
        self.noises.get(key).map(Arc::as_ref)
    }

    /// Evaluate a router output at a block position.
    #[must_use]
    pub fn value(&self, slot: RouterSlot, x: i32, y: i32, z: i32, cache: &mut EvalCache) -> f64 {
        self.evaluator.value_at(self.router.node(slot), x, y, z, cache)
    }

    /// Seed the generator settings registered under `key`.
    ///
    /// # Errors
    /// Fails if `key` is not registered or seeding fails.
    pub fn for_preset(context: &WorldGenContext, key: &Identifier, seed: u64) -> anyhow::Result<Self> {
        let settings = context
            .settings(key)
            .with_context(|| format!("no generator settings for {key}"))?;
        Self::new(settings, context, seed)
    }
}

/// Whether `err` is a missing registry entry.
#[must_use]
pub fn is_missing_entry(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| matches!(cause.downcast_ref::<RegistryError>(), Some(RegistryError::MissingEntry { .. })))
}

#[cfg(test)]
mod tests {
    use strata_registry::noise_settings::keys;

    use super::*;

    fn vanilla() -> WorldGenContext {
        WorldGenContext::vanilla().unwrap()
    }

    #[test]
    fn test_same_seed_same_values() {
        let context = vanilla();
        let a = RandomState::for_preset(&context, &keys::OVERWORLD, 42).unwrap();
        let b = RandomState::for_preset(&context, &keys::OVERWORLD, 42).unwrap();
        let mut cache_a = EvalCache::new();
        let mut cache_b = EvalCache::new();
        for slot in RouterSlot::ALL {
            for (x, y, z) in [(0, 0, 0), (123, 64, -456), (-1000, -50, 2000)] {
                let va = a.value(slot, x, y, z, &mut cache_a);
                let vb = b.value(slot, x, y, z, &mut cache_b);
                assert_eq!(va.to_bits(), vb.to_bits(), "{slot:?} at {x} {y} {z}");
                assert!(va.is_finite());
            }
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let context = vanilla();
        let a = RandomState::for_preset(&context, &keys::OVERWORLD, 1).unwrap();
        let b = RandomState::for_preset(&context, &keys::OVERWORLD, 2).unwrap();
        let mut cache = EvalCache::new();
        let differs = (0..16).any(|i| {
            let va = a.value(RouterSlot::Continents, i * 64, 0, 0, &mut cache);
            let vb = b.value(RouterSlot::Continents, i * 64, 0, 0, &mut cache);
            va != vb
        });
        assert!(differs);
    }

    #[test]
    fn test_legacy_presets_use_nether_biome_noises() {
        let context = vanilla();
        let nether = RandomState::for_preset(&context, &keys::NETHER, 7).unwrap();
        assert!(matches!(nether.random(), RandomSplitter::Legacy(_)));
        let overworld = RandomState::for_preset(&context, &keys::OVERWORLD, 7).unwrap();
        assert!(matches!(overworld.random(), RandomSplitter::Xoroshiro(_)));

        // The legacy temperature noise is seeded from the world seed directly.
        let mut random = LegacyRandom::from_seed(7);
        let expected = NormalNoise::create_legacy_nether_biome(
            &mut random,
            &NoiseParameters::new(-7, vec![1.0, 1.0]),
        )
        .unwrap();
        let actual = nether.noise(&noises::TEMPERATURE).unwrap();
        for (x, z) in [(0.0, 0.0), (10.5, -3.25), (1000.0, 77.0)] {
            assert_eq!(actual.get_value(x, 0.0, z).to_bits(), expected.get_value(x, 0.0, z).to_bits());
        }
    }

    #[test]
    fn test_missing_noise_fails() {
        let mut context = WorldGenContext::new();
        context
            .register_settings(keys::OVERWORLD, NoiseGeneratorSettings::overworld().unwrap())
            .unwrap();
        let err = RandomState::for_preset(&context, &keys::OVERWORLD, 0).unwrap_err();
        assert!(is_missing_entry(&err), "{err:?}");

        let err = RandomState::for_preset(&context, &keys::END, 0).unwrap_err();
        assert!(is_missing_entry(&err));
    }

    #[test]
    fn test_dummy_is_zero_everywhere() {
        let state = RandomState::new(&NoiseGeneratorSettings::dummy(), &WorldGenContext::new(), 99).unwrap();
        let mut cache = EvalCache::new();
        for slot in RouterSlot::ALL {
            assert!(state.value(slot, 17, 80, -3, &mut cache).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_named_factories_are_distinct() {
        let state = RandomState::for_preset(&vanilla(), &keys::OVERWORLD, 5).unwrap();
        assert_ne!(state.random(), state.aquifer_random());
        assert_ne!(state.aquifer_random(), state.ore_random());
        assert_eq!(state.seed(), 5);
    }
}
