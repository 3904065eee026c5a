//! Vanilla world generation data: noise parameters, terrain splines, noise routers
//! and generator settings presets.

pub mod error;
pub mod noise_parameters;
pub mod noise_router_data;
pub mod noise_settings;
pub mod terrain_provider;
pub mod world_gen_context;

pub use error::RegistryError;
pub use noise_settings::{NoiseGeneratorSettings, NoiseSettings, SurfaceRuleSet};
pub use world_gen_context::WorldGenContext;
