//! Generator settings presets.
//!
//! A [`NoiseGeneratorSettings`] binds a noise router to the constants of a dimension:
//! its vertical bounds, the blocks it is made of and the random algorithm that seeds
//! it. The JSON form follows the `worldgen/noise_settings` layout of data packs.
//!
//! Java reference: `NoiseGeneratorSettings`, `NoiseSettings`

use serde::{Deserialize, Serialize};
use strata_utils::Identifier;
use strata_utils::climate::{Parameter, ParameterPoint};
use strata_utils::density::{CellSize, GraphError, NoiseRouter};

use crate::error::RegistryError;
use crate::noise_router_data;

/// Lowest y a dimension may reach.
pub const MIN_Y: i32 = -2032;
/// Exclusive upper limit of `min_y + height`.
pub const MAX_Y_EXCLUSIVE: i32 = 2032;
/// Largest dimension height.
pub const Y_SIZE: i32 = 4064;

/// Keys of the vanilla presets.
pub mod keys {
    #![allow(missing_docs)]
    use strata_utils::Identifier;

    pub const OVERWORLD: Identifier = Identifier::vanilla_static("overworld");
    pub const LARGE_BIOMES: Identifier = Identifier::vanilla_static("large_biomes");
    pub const AMPLIFIED: Identifier = Identifier::vanilla_static("amplified");
    pub const NETHER: Identifier = Identifier::vanilla_static("nether");
    pub const END: Identifier = Identifier::vanilla_static("end");
    pub const CAVES: Identifier = Identifier::vanilla_static("caves");
    pub const FLOATING_ISLANDS: Identifier = Identifier::vanilla_static("floating_islands");
}

/// Vertical bounds and noise cell sizes of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoiseSettings {
    /// Lowest block y.
    pub min_y: i32,
    /// Number of block layers.
    pub height: i32,
    /// Horizontal cell size in quarts.
    #[serde(rename = "size_horizontal")]
    pub noise_size_horizontal: i32,
    /// Vertical cell size in quarts.
    #[serde(rename = "size_vertical")]
    pub noise_size_vertical: i32,
}

impl NoiseSettings {
    /// Overworld and its variants.
    pub const OVERWORLD: Self = Self::new_unchecked(-64, 384, 1, 2);
    /// The nether.
    pub const NETHER: Self = Self::new_unchecked(0, 128, 1, 2);
    /// The end.
    pub const END: Self = Self::new_unchecked(0, 128, 2, 1);
    /// Single-biome caves.
    pub const CAVES: Self = Self::new_unchecked(-64, 192, 1, 2);
    /// Floating islands.
    pub const FLOATING_ISLANDS: Self = Self::new_unchecked(0, 256, 2, 1);

    const fn new_unchecked(min_y: i32, height: i32, noise_size_horizontal: i32, noise_size_vertical: i32) -> Self {
        Self {
            min_y,
            height,
            noise_size_horizontal,
            noise_size_vertical,
        }
    }

    /// Create validated settings.
    ///
    /// # Errors
    /// See [`validate`](Self::validate).
    pub fn new(
        min_y: i32,
        height: i32,
        noise_size_horizontal: i32,
        noise_size_vertical: i32,
    ) -> Result<Self, RegistryError> {
        let settings = Self::new_unchecked(min_y, height, noise_size_horizontal, noise_size_vertical);
        settings.validate()?;
        Ok(settings)
    }

    /// Check the bounds against the world limits.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidNoiseSettings`] when the bounds are not
    /// multiples of 16, leave `[-2032, 2032)`, or a cell size is outside `1..=4`.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |message: String| Err(RegistryError::InvalidNoiseSettings(message));
        if self.min_y < MIN_Y {
            return invalid(format!("min_y {} is below {MIN_Y}", self.min_y));
        }
        if self.height <= 0 || self.height > Y_SIZE {
            return invalid(format!("height {} is outside 1..={Y_SIZE}", self.height));
        }
        if self.min_y + self.height > MAX_Y_EXCLUSIVE {
            return invalid(format!(
                "min_y + height cannot be higher than {MAX_Y_EXCLUSIVE}, got {}",
                self.min_y + self.height
            ));
        }
        if self.height % 16 != 0 {
            return invalid(format!("height {} has to be a multiple of 16", self.height));
        }
        if self.min_y % 16 != 0 {
            return invalid(format!("min_y {} has to be a multiple of 16", self.min_y));
        }
        for (name, size) in [
            ("size_horizontal", self.noise_size_horizontal),
            ("size_vertical", self.noise_size_vertical),
        ] {
            if !(1..=4).contains(&size) {
                return invalid(format!("{name} {size} is outside 1..=4"));
            }
        }
        Ok(())
    }

    /// Block width of a noise cell.
    #[must_use]
    pub const fn cell_width(&self) -> i32 {
        self.noise_size_horizontal * 4
    }

    /// Block height of a noise cell.
    #[must_use]
    pub const fn cell_height(&self) -> i32 {
        self.noise_size_vertical * 4
    }

    /// Cell size used by interpolated nodes.
    #[must_use]
    pub const fn cell_size(&self) -> CellSize {
        CellSize::new(self.cell_width(), self.cell_height())
    }

    /// Highest block y, exclusive.
    #[must_use]
    pub const fn max_y(&self) -> i32 {
        self.min_y + self.height
    }
}

/// Named surface rule set a preset paints its terrain with. Resolved by the surface
/// builder, which lives outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceRuleSet(pub Identifier);

impl SurfaceRuleSet {
    /// Grass, sand, badlands and the deepslate transition.
    pub const OVERWORLD: Self = Self(Identifier::vanilla_static("overworld"));
    /// Netherrack, soul sand valleys and the bedrock roof.
    pub const NETHER: Self = Self(Identifier::vanilla_static("nether"));
    /// End stone everywhere.
    pub const END: Self = Self(Identifier::vanilla_static("end"));
    /// Overworld rules with a bedrock roof and floor.
    pub const CAVES: Self = Self(Identifier::vanilla_static("overworld_like/caves"));
    /// Overworld rules without bedrock.
    pub const FLOATING_ISLANDS: Self = Self(Identifier::vanilla_static("overworld_like/floating_islands"));
    /// No surface at all.
    pub const AIR: Self = Self(Identifier::vanilla_static("air"));
}

/// A dimension's noise generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct NoiseGeneratorSettings {
    /// Vertical bounds and cell sizes.
    #[serde(rename = "noise")]
    pub noise_settings: NoiseSettings,
    /// Block that fills solid density.
    pub default_block: Identifier,
    /// Fluid that fills air below sea level.
    pub default_fluid: Identifier,
    /// Density outputs.
    pub noise_router: NoiseRouter,
    /// Surface rule set.
    pub surface_rule: SurfaceRuleSet,
    /// Climate points a spawn position is searched around.
    pub spawn_target: Vec<ParameterPoint>,
    /// Fluid surface height.
    pub sea_level: i32,
    /// Skip mob spawning during generation.
    pub disable_mob_generation: bool,
    /// Generate aquifers instead of a flat sea.
    pub aquifers_enabled: bool,
    /// Generate large ore veins.
    pub ore_veins_enabled: bool,
    /// Seed from the 48-bit legacy random instead of xoroshiro.
    #[serde(rename = "legacy_random_source")]
    pub use_legacy_random_source: bool,
}

/// The two inland spawn points of the overworld family: any climate inland at the
/// surface, off the peaks-and-valleys midline.
fn overworld_spawn_target() -> Vec<ParameterPoint> {
    let surface = Parameter::point(0.0);
    let inland = Parameter::span(-0.11, 1.0);
    [Parameter::span(-1.0, -0.16), Parameter::span(0.16, 1.0)]
        .into_iter()
        .map(|weirdness| {
            ParameterPoint::new(
                Parameter::FULL,
                Parameter::FULL,
                inland,
                Parameter::FULL,
                surface,
                weirdness,
                0,
            )
        })
        .collect()
}

impl NoiseGeneratorSettings {
    fn overworld_like(noise_router: NoiseRouter) -> Self {
        Self {
            noise_settings: NoiseSettings::OVERWORLD,
            default_block: Identifier::vanilla_static("stone"),
            default_fluid: Identifier::vanilla_static("water"),
            noise_router,
            surface_rule: SurfaceRuleSet::OVERWORLD,
            spawn_target: overworld_spawn_target(),
            sea_level: 63,
            disable_mob_generation: false,
            aquifers_enabled: true,
            ore_veins_enabled: true,
            use_legacy_random_source: false,
        }
    }

    /// The default overworld.
    ///
    /// # Errors
    /// Fails only if router assembly fails.
    pub fn overworld() -> Result<Self, GraphError> {
        Ok(Self::overworld_like(noise_router_data::overworld(false, false)?))
    }

    /// The overworld with four times larger biomes.
    ///
    /// # Errors
    /// Fails only if router assembly fails.
    pub fn large_biomes() -> Result<Self, GraphError> {
        Ok(Self::overworld_like(noise_router_data::overworld(true, false)?))
    }

    /// The overworld with exaggerated terrain height.
    ///
    /// # Errors
    /// Fails only if router assembly fails.
    pub fn amplified() -> Result<Self, GraphError> {
        Ok(Self::overworld_like(noise_router_data::overworld(false, true)?))
    }

    /// The nether.
    ///
    /// # Errors
    /// Fails only if router assembly fails.
    pub fn nether() -> Result<Self, GraphError> {
        Ok(Self {
            noise_settings: NoiseSettings::NETHER,
            default_block: Identifier::vanilla_static("netherrack"),
            default_fluid: Identifier::vanilla_static("lava"),
            noise_router: noise_router_data::nether()?,
            surface_rule: SurfaceRuleSet::NETHER,
            spawn_target: Vec::new(),
            sea_level: 32,
            disable_mob_generation: false,
            aquifers_enabled: false,
            ore_veins_enabled: false,
            use_legacy_random_source: true,
        })
    }

    /// The end.
    ///
    /// # Errors
    /// Fails only if router assembly fails.
    pub fn end() -> Result<Self, GraphError> {
        Ok(Self {
            noise_settings: NoiseSettings::END,
            default_block: Identifier::vanilla_static("end_stone"),
            default_fluid: Identifier::vanilla_static("air"),
            noise_router: noise_router_data::end()?,
            surface_rule: SurfaceRuleSet::END,
            spawn_target: Vec::new(),
            sea_level: 0,
            disable_mob_generation: true,
            aquifers_enabled: false,
            ore_veins_enabled: false,
            use_legacy_random_source: true,
        })
    }

    /// Single-biome caves.
    ///
    /// # Errors
    /// Fails only if router assembly fails.
    pub fn caves() -> Result<Self, GraphError> {
        Ok(Self {
            noise_settings: NoiseSettings::CAVES,
            default_block: Identifier::vanilla_static("stone"),
            default_fluid: Identifier::vanilla_static("water"),
            noise_router: noise_router_data::caves()?,
            surface_rule: SurfaceRuleSet::CAVES,
            spawn_target: Vec::new(),
            sea_level: 32,
            disable_mob_generation: false,
            aquifers_enabled: false,
            ore_veins_enabled: false,
            use_legacy_random_source: true,
        })
    }

    /// Floating islands.
    ///
    /// # Errors
    /// Fails only if router assembly fails.
    pub fn floating_islands() -> Result<Self, GraphError> {
        Ok(Self {
            noise_settings: NoiseSettings::FLOATING_ISLANDS,
            default_block: Identifier::vanilla_static("stone"),
            default_fluid: Identifier::vanilla_static("water"),
            noise_router: noise_router_data::floating_islands()?,
            surface_rule: SurfaceRuleSet::FLOATING_ISLANDS,
            spawn_target: Vec::new(),
            sea_level: -64,
            disable_mob_generation: false,
            aquifers_enabled: false,
            ore_veins_enabled: false,
            use_legacy_random_source: true,
        })
    }

    /// Settings that generate nothing: every router output is zero.
    #[must_use]
    pub fn dummy() -> Self {
        Self {
            noise_settings: NoiseSettings::OVERWORLD,
            default_block: Identifier::vanilla_static("stone"),
            default_fluid: Identifier::vanilla_static("air"),
            noise_router: noise_router_data::none(),
            surface_rule: SurfaceRuleSet::AIR,
            spawn_target: Vec::new(),
            sea_level: 63,
            disable_mob_generation: true,
            aquifers_enabled: false,
            ore_veins_enabled: false,
            use_legacy_random_source: false,
        }
    }

    /// Every registered vanilla preset with its key.
    ///
    /// # Errors
    /// Fails only if router assembly fails.
    pub fn vanilla_presets() -> Result<Vec<(Identifier, Self)>, GraphError> {
        Ok(vec![
            (keys::OVERWORLD, Self::overworld()?),
            (keys::LARGE_BIOMES, Self::large_biomes()?),
            (keys::AMPLIFIED, Self::amplified()?),
            (keys::NETHER, Self::nether()?),
            (keys::END, Self::end()?),
            (keys::CAVES, Self::caves()?),
            (keys::FLOATING_ISLANDS, Self::floating_islands()?),
        ])
    }

    /// Check the bounds and the router graph.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidNoiseSettings`] or [`RegistryError::InvalidGraph`].
    pub fn validate(&self) -> Result<(), RegistryError> {
        self.noise_settings.validate()?;
        self.noise_router.validate()?;
        Ok(())
    }

    /// Encode as JSON.
    ///
    /// # Errors
    /// Returns [`RegistryError::Codec`] if serialization fails.
    pub fn encode(&self) -> Result<String, RegistryError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode and validate JSON.
    ///
    /// # Errors
    /// Returns [`RegistryError::Codec`] for malformed JSON, otherwise the
    /// [`validate`](Self::validate) error.
    pub fn decode(json: &str) -> Result<Self, RegistryError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }
}
