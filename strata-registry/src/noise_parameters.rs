//! Vanilla noise parameters.
//!
//! Mirrors the `worldgen/noise/*.json` entries of the vanilla datapack that the noise
//! routers in this crate sample.

use rustc_hash::FxHashMap;
use strata_utils::Identifier;
use strata_utils::noise::NoiseParameters;

/// Keys of the vanilla noises.
pub mod keys {
    #![allow(missing_docs)]
    use strata_utils::Identifier;

    pub const TEMPERATURE: Identifier = Identifier::vanilla_static("temperature");
    pub const VEGETATION: Identifier = Identifier::vanilla_static("vegetation");
    pub const CONTINENTALNESS: Identifier = Identifier::vanilla_static("continentalness");
    pub const EROSION: Identifier = Identifier::vanilla_static("erosion");
    pub const TEMPERATURE_LARGE: Identifier = Identifier::vanilla_static("temperature_large");
    pub const VEGETATION_LARGE: Identifier = Identifier::vanilla_static("vegetation_large");
    pub const CONTINENTALNESS_LARGE: Identifier = Identifier::vanilla_static("continentalness_large");
    pub const EROSION_LARGE: Identifier = Identifier::vanilla_static("erosion_large");
    pub const RIDGE: Identifier = Identifier::vanilla_static("ridge");
    pub const SHIFT: Identifier = Identifier::vanilla_static("offset");
    pub const JAGGED: Identifier = Identifier::vanilla_static("jagged");
    pub const AQUIFER_BARRIER: Identifier = Identifier::vanilla_static("aquifer_barrier");
    pub const AQUIFER_FLUID_LEVEL_FLOODEDNESS: Identifier =
        Identifier::vanilla_static("aquifer_fluid_level_floodedness");
    pub const AQUIFER_LAVA: Identifier = Identifier::vanilla_static("aquifer_lava");
    pub const AQUIFER_FLUID_LEVEL_SPREAD: Identifier = Identifier::vanilla_static("aquifer_fluid_level_spread");
    pub const PILLAR: Identifier = Identifier::vanilla_static("pillar");
    pub const PILLAR_RARENESS: Identifier = Identifier::vanilla_static("pillar_rareness");
    pub const PILLAR_THICKNESS: Identifier = Identifier::vanilla_static("pillar_thickness");
    pub const SPAGHETTI_2D: Identifier = Identifier::vanilla_static("spaghetti_2d");
    pub const SPAGHETTI_2D_ELEVATION: Identifier = Identifier::vanilla_static("spaghetti_2d_elevation");
    pub const SPAGHETTI_2D_MODULATOR: Identifier = Identifier::vanilla_static("spaghetti_2d_modulator");
    pub const SPAGHETTI_2D_THICKNESS: Identifier = Identifier::vanilla_static("spaghetti_2d_thickness");
    pub const SPAGHETTI_3D_1: Identifier = Identifier::vanilla_static("spaghetti_3d_1");
    pub const SPAGHETTI_3D_2: Identifier = Identifier::vanilla_static("spaghetti_3d_2");
    pub const SPAGHETTI_3D_RARITY: Identifier = Identifier::vanilla_static("spaghetti_3d_rarity");
    pub const SPAGHETTI_3D_THICKNESS: Identifier = Identifier::vanilla_static("spaghetti_3d_thickness");
    pub const SPAGHETTI_ROUGHNESS: Identifier = Identifier::vanilla_static("spaghetti_roughness");
    pub const SPAGHETTI_ROUGHNESS_MODULATOR: Identifier =
        Identifier::vanilla_static("spaghetti_roughness_modulator");
    pub const CAVE_ENTRANCE: Identifier = Identifier::vanilla_static("cave_entrance");
    pub const CAVE_LAYER: Identifier = Identifier::vanilla_static("cave_layer");
    pub const CAVE_CHEESE: Identifier = Identifier::vanilla_static("cave_cheese");
    pub const ORE_VEININESS: Identifier = Identifier::vanilla_static("ore_veininess");
    pub const ORE_VEIN_A: Identifier = Identifier::vanilla_static("ore_vein_a");
    pub const ORE_VEIN_B: Identifier = Identifier::vanilla_static("ore_vein_b");
    pub const ORE_GAP: Identifier = Identifier::vanilla_static("ore_gap");
    pub const NOODLE: Identifier = Identifier::vanilla_static("noodle");
    pub const NOODLE_THICKNESS: Identifier = Identifier::vanilla_static("noodle_thickness");
    pub const NOODLE_RIDGE_A: Identifier = Identifier::vanilla_static("noodle_ridge_a");
    pub const NOODLE_RIDGE_B: Identifier = Identifier::vanilla_static("noodle_ridge_b");
}

static TEMPERATURE_AMPLITUDES: &[f64] = &[1.5, 0.0, 1.0, 0.0, 0.0, 0.0];
static VEGETATION_AMPLITUDES: &[f64] = &[1.0, 1.0, 0.0, 0.0, 0.0, 0.0];
static CONTINENTALNESS_AMPLITUDES: &[f64] = &[1.0, 1.0, 2.0, 2.0, 2.0, 1.0, 1.0, 1.0, 1.0];
static EROSION_AMPLITUDES: &[f64] = &[1.0, 1.0, 0.0, 1.0, 1.0];
static RIDGE_AMPLITUDES: &[f64] = &[1.0, 2.0, 1.0, 0.0, 0.0, 0.0];
static OFFSET_AMPLITUDES: &[f64] = &[1.0, 1.0, 1.0, 0.0];
static JAGGED_AMPLITUDES: &[f64] = &[1.0; 16];
static SINGLE_AMPLITUDE: &[f64] = &[1.0];
static PILLAR_AMPLITUDES: &[f64] = &[1.0, 1.0];
static CAVE_ENTRANCE_AMPLITUDES: &[f64] = &[0.4, 0.5, 1.0];
static CAVE_CHEESE_AMPLITUDES: &[f64] = &[0.5, 1.0, 2.0, 1.0, 2.0, 1.0, 0.0, 2.0, 0.0];

/// Every vanilla noise sampled by the built-in noise routers.
///
/// Returns a map keyed by namespaced noise ID (e.g., `minecraft:temperature`).
#[must_use]
pub fn vanilla_noise_parameters() -> FxHashMap<Identifier, NoiseParameters> {
    let entries: [(Identifier, i32, &[f64]); 39] = [
        (keys::TEMPERATURE, -10, TEMPERATURE_AMPLITUDES),
        (keys::VEGETATION, -8, VEGETATION_AMPLITUDES),
        (keys::CONTINENTALNESS, -9, CONTINENTALNESS_AMPLITUDES),
        (keys::EROSION, -9, EROSION_AMPLITUDES),
        (keys::TEMPERATURE_LARGE, -12, TEMPERATURE_AMPLITUDES),
        (keys::VEGETATION_LARGE, -10, VEGETATION_AMPLITUDES),
        (keys::CONTINENTALNESS_LARGE, -11, CONTINENTALNESS_AMPLITUDES),
        (keys::EROSION_LARGE, -11, EROSION_AMPLITUDES),
        (keys::RIDGE, -7, RIDGE_AMPLITUDES),
        (keys::SHIFT, -3, OFFSET_AMPLITUDES),
        (keys::JAGGED, -16, JAGGED_AMPLITUDES),
        (keys::AQUIFER_BARRIER, -3, SINGLE_AMPLITUDE),
        (keys::AQUIFER_FLUID_LEVEL_FLOODEDNESS, -7, SINGLE_AMPLITUDE),
        (keys::AQUIFER_LAVA, -1, SINGLE_AMPLITUDE),
        (keys::AQUIFER_FLUID_LEVEL_SPREAD, -5, SINGLE_AMPLITUDE),
        (keys::PILLAR, -7, PILLAR_AMPLITUDES),
        (keys::PILLAR_RARENESS, -8, SINGLE_AMPLITUDE),
        (keys::PILLAR_THICKNESS, -8, SINGLE_AMPLITUDE),
        (keys::SPAGHETTI_2D, -7, SINGLE_AMPLITUDE),
        (keys::SPAGHETTI_2D_ELEVATION, -8, SINGLE_AMPLITUDE),
        (keys::SPAGHETTI_2D_MODULATOR, -11, SINGLE_AMPLITUDE),
        (keys::SPAGHETTI_2D_THICKNESS, -11, SINGLE_AMPLITUDE),
        (keys::SPAGHETTI_3D_1, -7, SINGLE_AMPLITUDE),
        (keys::SPAGHETTI_3D_2, -7, SINGLE_AMPLITUDE),
        (keys::SPAGHETTI_3D_RARITY, -11, SINGLE_AMPLITUDE),
        (keys::SPAGHETTI_3D_THICKNESS, -8, SINGLE_AMPLITUDE),
        (keys::SPAGHETTI_ROUGHNESS, -5, SINGLE_AMPLITUDE),
        (keys::SPAGHETTI_ROUGHNESS_MODULATOR, -8, SINGLE_AMPLITUDE),
        (keys::CAVE_ENTRANCE, -7, CAVE_ENTRANCE_AMPLITUDES),
        (keys::CAVE_LAYER, -8, SINGLE_AMPLITUDE),
        (keys::CAVE_CHEESE, -8, CAVE_CHEESE_AMPLITUDES),
        (keys::ORE_VEININESS, -8, SINGLE_AMPLITUDE),
        (keys::ORE_VEIN_A, -7, SINGLE_AMPLITUDE),
        (keys::ORE_VEIN_B, -7, SINGLE_AMPLITUDE),
        (keys::ORE_GAP, -5, SINGLE_AMPLITUDE),
        (keys::NOODLE, -8, SINGLE_AMPLITUDE),
        (keys::NOODLE_THICKNESS, -8, SINGLE_AMPLITUDE),
        (keys::NOODLE_RIDGE_A, -7, SINGLE_AMPLITUDE),
        (keys::NOODLE_RIDGE_B, -7, SINGLE_AMPLITUDE),
    ];
    entries
        .into_iter()
        .map(|(key, first_octave, amplitudes)| (key, NoiseParameters::new(first_octave, amplitudes.to_vec())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_variants_are_two_octaves_lower() {
        let params = vanilla_noise_parameters();
        for (normal, large) in [
            (keys::TEMPERATURE, keys::TEMPERATURE_LARGE),
            (keys::VEGETATION, keys::VEGETATION_LARGE),
            (keys::CONTINENTALNESS, keys::CONTINENTALNESS_LARGE),
            (keys::EROSION, keys::EROSION_LARGE),
        ] {
            let normal = &params[&normal];
            let large = &params[&large];
            assert_eq!(large.first_octave, normal.first_octave - 2);
            assert_eq!(large.amplitudes, normal.amplitudes);
        }
    }

    #[test]
    fn test_shift_noise_key() {
        let params = vanilla_noise_parameters();
        assert_eq!(keys::SHIFT.to_string(), "minecraft:offset");
        assert_eq!(params[&keys::SHIFT].first_octave, -3);
        assert_eq!(params[&keys::JAGGED].amplitudes.len(), 16);
    }

    #[test]
    fn test_datapack_json_shape() {
        let json = r#"{"firstOctave": -7, "amplitudes": [1.0, 1.0]}"#;
        let parsed: NoiseParameters = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, vanilla_noise_parameters()[&keys::PILLAR]);
    }
}
