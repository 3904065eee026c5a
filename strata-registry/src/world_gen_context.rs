//! The world generation registry.
//!
//! Holds the noise parameters and generator settings a world is created from. The
//! vanilla tables are filled in by [`WorldGenContext::vanilla`]; data packs may
//! replace or add entries afterwards.

use rustc_hash::FxHashMap;
use strata_utils::Identifier;
use strata_utils::noise::NoiseParameters;

use crate::error::RegistryError;
use crate::noise_parameters::vanilla_noise_parameters;
use crate::noise_settings::NoiseGeneratorSettings;

/// Registry name of noise parameters.
pub const NOISE_REGISTRY: &str = "worldgen/noise";
/// Registry name of generator settings.
pub const NOISE_SETTINGS_REGISTRY: &str = "worldgen/noise_settings";

/// Noise parameters and generator settings by key.
#[derive(Debug, Clone, Default)]
pub struct WorldGenContext {
    noises: FxHashMap<Identifier, NoiseParameters>,
    settings: FxHashMap<Identifier, NoiseGeneratorSettings>,
}

impl WorldGenContext {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The vanilla noises and the seven vanilla presets.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidGraph`] if a built-in router fails to assemble.
    pub fn vanilla() -> Result<Self, RegistryError> {
        let mut context = Self {
            noises: vanilla_noise_parameters(),
            settings: FxHashMap::default(),
        };
        for (key, settings) in NoiseGeneratorSettings::vanilla_presets()? {
            context.settings.insert(key, settings);
        }
        log::info!(
            "Loaded {} noise parameters and {} noise settings",
            context.noises.len(),
            context.settings.len()
        );
        Ok(context)
    }

    /// Register noise parameters, returning the entry they replace.
    pub fn register_noise(&mut self, key: Identifier, parameters: NoiseParameters) -> Option<NoiseParameters> {
        self.noises.insert(key, parameters)
    }

    /// Register validated generator settings, returning the entry they replace.
    ///
    /// # Errors
    /// Returns the [`NoiseGeneratorSettings::validate`] error; nothing is registered.
    pub fn register_settings(
        &mut self,
        key: Identifier,
        settings: NoiseGeneratorSettings,
    ) -> Result<Option<NoiseGeneratorSettings>, RegistryError> {
        settings.validate()?;
        Ok(self.settings.insert(key, settings))
    }

    /// Decode generator settings from a data pack JSON file and register them.
    ///
    /// # Errors
    /// Returns the [`NoiseGeneratorSettings::decode`] error; nothing is registered.
    pub fn load_settings_json(&mut self, key: Identifier, json: &str) -> Result<(), RegistryError> {
        let settings = NoiseGeneratorSettings::decode(json)?;
        log::debug!("Loaded noise settings {key}");
        self.settings.insert(key, settings);
        Ok(())
    }

    /// Noise parameters registered under `key`.
    ///
    /// # Errors
    /// Returns [`RegistryError::MissingEntry`] if nothing is registered under `key`.
    pub fn noise(&self, key: &Identifier) -> Result<&NoiseParameters, RegistryError> {
        self.noises
            .get(key)
            .ok_or_else(|| RegistryError::missing(NOISE_REGISTRY, key.clone()))
    }

    /// Generator settings registered under `key`.
    ///
    /// # Errors
    /// Returns [`RegistryError::MissingEntry`] if nothing is registered under `key`.
    pub fn settings(&self, key: &Identifier) -> Result<&NoiseGeneratorSettings, RegistryError> {
        self.settings
            .get(key)
            .ok_or_else(|| RegistryError::missing(NOISE_SETTINGS_REGISTRY, key.clone()))
    }

    /// Every registered noise key.
    pub fn noise_keys(&self) -> impl Iterator<Item = &Identifier> {
        self.noises.keys()
    }

    /// Every registered settings key.
    pub fn settings_keys(&self) -> impl Iterator<Item = &Identifier> {
        self.settings.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_parameters::keys as noises;
    use crate::noise_settings::keys;

    #[test]
    fn test_vanilla_context() {
        let context = WorldGenContext::vanilla().unwrap();
        assert_eq!(context.settings_keys().count(), 7);
        assert!(context.settings(&keys::OVERWORLD).is_ok());
        assert_eq!(context.noise(&noises::RIDGE).unwrap().first_octave, -7);
    }

    #[test]
    fn test_missing_entries() {
        let context = WorldGenContext::new();
        let err = context.noise(&noises::RIDGE).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingEntry { registry: NOISE_REGISTRY, ref id } if *id == noises::RIDGE
        ));
        assert_eq!(err.to_string(), "missing worldgen/noise entry `minecraft:ridge`");
        assert!(context.settings(&keys::NETHER).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut context = WorldGenContext::new();
        let custom = Identifier::new("pack", "flat_ridges");
        assert!(context.register_noise(custom.clone(), NoiseParameters::new(-4, vec![1.0])).is_none());
        let previous = context.register_noise(custom.clone(), NoiseParameters::new(-5, vec![1.0]));
        assert_eq!(previous.map(|p| p.first_octave), Some(-4));
        assert_eq!(context.noise(&custom).unwrap().first_octave, -5);

        let json = NoiseGeneratorSettings::dummy().encode().unwrap();
        let key = Identifier::new("pack", "void");
        context.load_settings_json(key.clone(), &json).unwrap();
        assert_eq!(context.settings(&key).unwrap(), &NoiseGeneratorSettings::dummy());

        let mut broken = NoiseGeneratorSettings::dummy();
        broken.noise_settings.height = 7;
        let broken_key = Identifier::new("pack", "broken");
        assert!(context.register_settings(broken_key.clone(), broken).is_err());
        assert!(context.settings(&broken_key).is_err());
    }
}
