//! Vanilla noise router assembly.
//!
//! Every router is built into its own [`DensityGraph`](strata_utils::density::DensityGraph).
//! Functions that vanilla registers under a name (`minecraft:shift_x`,
//! `minecraft:overworld/sloped_cheese`, `minecraft:caves/entrances` ...) are
//! registered in the [`GraphBuilder`] the first time a router needs them and shared
//! by id afterwards.
//!
//! Java reference: `NoiseRouterData`

use std::sync::Arc;

use strata_utils::Identifier;
use strata_utils::density::{
    GraphBuilder, GraphError, NodeId, NoiseRouter, RarityValueMapper, SlideEdge,
};
use strata_utils::noise::BlendedNoiseConfig;

use crate::noise_parameters::keys as noises;
use crate::terrain_provider::{self, SplineInputs};

/// Keys of the registered density functions.
pub mod keys {
    #![allow(missing_docs)]
    use strata_utils::Identifier;

    pub const ZERO: Identifier = Identifier::vanilla_static("zero");
    pub const Y: Identifier = Identifier::vanilla_static("y");
    pub const SHIFT_X: Identifier = Identifier::vanilla_static("shift_x");
    pub const SHIFT_Z: Identifier = Identifier::vanilla_static("shift_z");
    pub const BASE_3D_NOISE_OVERWORLD: Identifier = Identifier::vanilla_static("overworld/base_3d_noise");
    pub const BASE_3D_NOISE_NETHER: Identifier = Identifier::vanilla_static("nether/base_3d_noise");
    pub const BASE_3D_NOISE_END: Identifier = Identifier::vanilla_static("end/base_3d_noise");
    pub const CONTINENTS: Identifier = Identifier::vanilla_static("overworld/continents");
    pub const EROSION: Identifier = Identifier::vanilla_static("overworld/erosion");
    pub const RIDGES: Identifier = Identifier::vanilla_static("overworld/ridges");
    pub const RIDGES_FOLDED: Identifier = Identifier::vanilla_static("overworld/ridges_folded");
    pub const OFFSET: Identifier = Identifier::vanilla_static("overworld/offset");
    pub const FACTOR: Identifier = Identifier::vanilla_static("overworld/factor");
    pub const JAGGEDNESS: Identifier = Identifier::vanilla_static("overworld/jaggedness");
    pub const DEPTH: Identifier = Identifier::vanilla_static("overworld/depth");
    pub const SLOPED_CHEESE: Identifier = Identifier::vanilla_static("overworld/sloped_cheese");
    pub const CONTINENTS_LARGE: Identifier = Identifier::vanilla_static("overworld_large_biomes/continents");
    pub const EROSION_LARGE: Identifier = Identifier::vanilla_static("overworld_large_biomes/erosion");
    pub const OFFSET_LARGE: Identifier = Identifier::vanilla_static("overworld_large_biomes/offset");
    pub const FACTOR_LARGE: Identifier = Identifier::vanilla_static("overworld_large_biomes/factor");
    pub const JAGGEDNESS_LARGE: Identifier = Identifier::vanilla_static("overworld_large_biomes/jaggedness");
    pub const DEPTH_LARGE: Identifier = Identifier::vanilla_static("overworld_large_biomes/depth");
    pub const SLOPED_CHEESE_LARGE: Identifier = Identifier::vanilla_static("overworld_large_biomes/sloped_cheese");
    pub const OFFSET_AMPLIFIED: Identifier = Identifier::vanilla_static("overworld_amplified/offset");
    pub const FACTOR_AMPLIFIED: Identifier = Identifier::vanilla_static("overworld_amplified/factor");
    pub const JAGGEDNESS_AMPLIFIED: Identifier = Identifier::vanilla_static("overworld_amplified/jaggedness");
    pub const DEPTH_AMPLIFIED: Identifier = Identifier::vanilla_static("overworld_amplified/depth");
    pub const SLOPED_CHEESE_AMPLIFIED: Identifier = Identifier::vanilla_static("overworld_amplified/sloped_cheese");
    pub const SLOPED_CHEESE_END: Identifier = Identifier::vanilla_static("end/sloped_cheese");
    pub const SPAGHETTI_ROUGHNESS_FUNCTION: Identifier =
        Identifier::vanilla_static("caves/spaghetti_roughness_function");
    pub const SPAGHETTI_2D_THICKNESS_MODULATOR: Identifier =
        Identifier::vanilla_static("caves/spaghetti_2d_thickness_modulator");
    pub const SPAGHETTI_2D: Identifier = Identifier::vanilla_static("caves/spaghetti_2d");
    pub const ENTRANCES: Identifier = Identifier::vanilla_static("caves/entrances");
    pub const NOODLE: Identifier = Identifier::vanilla_static("caves/noodle");
    pub const PILLARS: Identifier = Identifier::vanilla_static("caves/pillars");
}

const ORE_VEIN_MIN_Y: i32 = -60;
const ORE_VEIN_MAX_Y: i32 = 50;
const NOODLE_MIN_Y: i32 = -60;
const NOODLE_MAX_Y: i32 = 320;
const GLOBAL_OFFSET: f32 = -0.503_75;
const BLENDING_FACTOR: f64 = 10.0;
const INITIAL_DENSITY_OFFSET: f64 = -0.703_125;
const SURFACE_DENSITY_THRESHOLD: f64 = 1.5625;

/// Named terrain functions of one overworld flavor.
#[derive(Debug, Clone, Copy)]
struct Terrain {
    continents: NodeId,
    erosion: NodeId,
    factor: NodeId,
    depth: NodeId,
    sloped_cheese: NodeId,
}

fn y(b: &mut GraphBuilder) -> NodeId {
    b.named(keys::Y, |b| b.y_clamped_gradient(-4064, 4062, -4064.0, 4062.0))
}

fn shift_x(b: &mut GraphBuilder) -> NodeId {
    b.named(keys::SHIFT_X, |b| {
        let shift = b.shift_a(noises::SHIFT);
        let cached = b.cache_2d(shift);
        b.flat_cache(cached)
    })
}

fn shift_z(b: &mut GraphBuilder) -> NodeId {
    b.named(keys::SHIFT_Z, |b| {
        let shift = b.shift_b(noises::SHIFT);
        let cached = b.cache_2d(shift);
        b.flat_cache(cached)
    })
}

fn base_3d(
    b: &mut GraphBuilder,
    key: Identifier,
    xz_scale: f64,
    y_scale: f64,
    xz_factor: f64,
    y_factor: f64,
    smear_scale_multiplier: f64,
) -> NodeId {
    b.named(key, |b| {
        b.blended_noise(BlendedNoiseConfig {
            xz_scale,
            y_scale,
            xz_factor,
            y_factor,
            smear_scale_multiplier,
        })
    })
}

fn base_3d_overworld(b: &mut GraphBuilder) -> NodeId {
    base_3d(b, keys::BASE_3D_NOISE_OVERWORLD, 0.25, 0.125, 80.0, 160.0, 8.0)
}

fn base_3d_nether(b: &mut GraphBuilder) -> NodeId {
    base_3d(b, keys::BASE_3D_NOISE_NETHER, 0.25, 0.375, 80.0, 60.0, 8.0)
}

fn base_3d_end(b: &mut GraphBuilder) -> NodeId {
    base_3d(b, keys::BASE_3D_NOISE_END, 0.25, 0.25, 80.0, 160.0, 4.0)
}

/// A climate noise shifted by `shift_x` / `shift_z` and cached per column.
fn climate(b: &mut GraphBuilder, key: Identifier, noise: Identifier) -> NodeId {
    b.named(key, |b| {
        let x = shift_x(b);
        let z = shift_z(b);
        let shifted = b.shifted_noise_2d(x, z, 0.25, noise);
        b.flat_cache(shifted)
    })
}

fn peaks_and_valleys(b: &mut GraphBuilder, weirdness: NodeId) -> NodeId {
    let abs = b.abs(weirdness);
    let centered = b.add_const(abs, -0.666_666_666_666_666_6);
    let folded = b.abs(centered);
    let shifted = b.add_const(folded, -0.333_333_333_333_333_3);
    b.mul_const(shifted, -3.0)
}

fn noise_gradient_density(b: &mut GraphBuilder, factor: NodeId, depth: NodeId) -> NodeId {
    let product = b.mul(depth, factor);
    let quartered = b.quarter_negative(product);
    let four = b.constant(4.0);
    b.mul(four, quartered)
}

fn spline_with_blending(b: &mut GraphBuilder, spline: NodeId, blend: NodeId) -> NodeId {
    let alpha = b.blend_alpha();
    let lerped = b.lerp(alpha, blend, spline);
    let cached = b.cache_2d(lerped);
    b.flat_cache(cached)
}

/// Interpolated `input` between `min_y` and `max_y` inclusive, `fallback` elsewhere.
fn y_limited_interpolatable(b: &mut GraphBuilder, input: NodeId, min_y: i32, max_y: i32, fallback: f64) -> NodeId {
    let y = y(b);
    let fallback = b.constant(fallback);
    let limited = b.range_choice(y, f64::from(min_y), f64::from(max_y + 1), input, fallback);
    b.interpolated(limited)
}

fn post_process(b: &mut GraphBuilder, density: NodeId) -> NodeId {
    let blended = b.blend_density(density);
    let interpolated = b.interpolated(blended);
    let scaled = b.mul_const(interpolated, 0.64);
    b.squeeze(scaled)
}

fn slide_overworld(b: &mut GraphBuilder, density: NodeId, amplified: bool) -> NodeId {
    let top = if amplified {
        SlideEdge::new(16, 0, -0.078_125)
    } else {
        SlideEdge::new(80, 64, -0.078_125)
    };
    let bottom = SlideEdge::new(0, 24, if amplified { 0.4 } else { 0.117_187_5 });
    b.slide(density, -64, 384, top, bottom)
}

fn slide_nether_like(b: &mut GraphBuilder, min_y: i32, height: i32) -> NodeId {
    let base = base_3d_nether(b);
    b.slide(base, min_y, height, SlideEdge::new(24, 0, 0.9375), SlideEdge::new(-8, 24, 2.5))
}

fn slide_end_like(b: &mut GraphBuilder, density: NodeId, min_y: i32, height: i32) -> NodeId {
    b.slide(
        density,
        min_y,
        height,
        SlideEdge::new(72, -184, -23.4375),
        SlideEdge::new(4, 32, -0.234_375),
    )
}

fn slide_end(b: &mut GraphBuilder, density: NodeId) -> NodeId {
    slide_end_like(b, density, 0, 128)
}

fn terrain(b: &mut GraphBuilder, large_biomes: bool, amplified: bool) -> Result<Terrain, GraphError> {
    let (continents_key, erosion_key, continentalness, erosion_noise) = if large_biomes {
        (
            keys::CONTINENTS_LARGE,
            keys::EROSION_LARGE,
            noises::CONTINENTALNESS_LARGE,
            noises::EROSION_LARGE,
        )
    } else {
        (keys::CONTINENTS, keys::EROSION, noises::CONTINENTALNESS, noises::EROSION)
    };
    let [offset_key, factor_key, jaggedness_key, depth_key, sloped_key] = if large_biomes {
        [
            keys::OFFSET_LARGE,
            keys::FACTOR_LARGE,
            keys::JAGGEDNESS_LARGE,
            keys::DEPTH_LARGE,
            keys::SLOPED_CHEESE_LARGE,
        ]
    } else if amplified {
        [
            keys::OFFSET_AMPLIFIED,
            keys::FACTOR_AMPLIFIED,
            keys::JAGGEDNESS_AMPLIFIED,
            keys::DEPTH_AMPLIFIED,
            keys::SLOPED_CHEESE_AMPLIFIED,
        ]
    } else {
        [
            keys::OFFSET,
            keys::FACTOR,
            keys::JAGGEDNESS,
            keys::DEPTH,
            keys::SLOPED_CHEESE,
        ]
    };

    let continents = climate(b, continents_key, continentalness);
    let erosion = climate(b, erosion_key, erosion_noise);
    let ridges = climate(b, keys::RIDGES, noises::RIDGE);
    let ridges_folded = b.named(keys::RIDGES_FOLDED, |b| peaks_and_valleys(b, ridges));
    let inputs = SplineInputs {
        continents,
        erosion,
        ridges,
        ridges_folded,
    };

    let offset = b.try_named(offset_key, |b| {
        let spline = b.spline(terrain_provider::overworld_offset(&inputs, amplified)?);
        let shifted = b.add_const(spline, f64::from(GLOBAL_OFFSET));
        let blend = b.blend_offset();
        Ok::<_, GraphError>(spline_with_blending(b, shifted, blend))
    })?;
    let factor = b.try_named(factor_key, |b| {
        let spline = b.spline(terrain_provider::overworld_factor(&inputs, amplified)?);
        let blend = b.constant(BLENDING_FACTOR);
        Ok::<_, GraphError>(spline_with_blending(b, spline, blend))
    })?;
    let depth = b.named(depth_key, |b| {
        let gradient = b.y_clamped_gradient(-64, 320, 1.5, -1.5);
        b.add(gradient, offset)
    });
    let jaggedness = b.try_named(jaggedness_key, |b| {
        let spline = b.spline(terrain_provider::overworld_jaggedness(&inputs, amplified)?);
        let blend = b.zero();
        Ok::<_, GraphError>(spline_with_blending(b, spline, blend))
    })?;
    let sloped_cheese = b.named(sloped_key, |b| {
        let noise = b.noise(noises::JAGGED, 1500.0, 0.0);
        let half = b.half_negative(noise);
        let jagged = b.mul(jaggedness, half);
        let jagged_depth = b.add(depth, jagged);
        let sloped = noise_gradient_density(b, factor, jagged_depth);
        let base = base_3d_overworld(b);
        b.add(sloped, base)
    });

    Ok(Terrain {
        continents,
        erosion,
        factor,
        depth,
        sloped_cheese,
    })
}

fn spaghetti_roughness_function(b: &mut GraphBuilder) -> NodeId {
    b.named(keys::SPAGHETTI_ROUGHNESS_FUNCTION, |b| {
        let roughness = b.noise(noises::SPAGHETTI_ROUGHNESS, 1.0, 1.0);
        let modulator = b.mapped_noise(noises::SPAGHETTI_ROUGHNESS_MODULATOR, 1.0, 1.0, 0.0, -0.1);
        let abs = b.abs(roughness);
        let shifted = b.add_const(abs, -0.4);
        let product = b.mul(modulator, shifted);
        b.cache_once(product)
    })
}

fn spaghetti_2d_thickness_modulator(b: &mut GraphBuilder) -> NodeId {
    b.named(keys::SPAGHETTI_2D_THICKNESS_MODULATOR, |b| {
        let mapped = b.mapped_noise(noises::SPAGHETTI_2D_THICKNESS, 2.0, 1.0, -0.6, -1.3);
        b.cache_once(mapped)
    })
}

fn spaghetti_2d(b: &mut GraphBuilder) -> NodeId {
    b.named(keys::SPAGHETTI_2D, |b| {
        let modulator = b.noise(noises::SPAGHETTI_2D_MODULATOR, 2.0, 1.0);
        let sampler = b.weird_scaled_sampler(modulator, noises::SPAGHETTI_2D, RarityValueMapper::Caves);
        let elevation = b.mapped_noise(noises::SPAGHETTI_2D_ELEVATION, 1.0, 0.0, -8.0, 8.0);
        let thickness = spaghetti_2d_thickness_modulator(b);
        let gradient = b.y_clamped_gradient(-64, 320, 8.0, -40.0);
        let height = b.add(elevation, gradient);
        let distance = b.abs(height);
        let ring = b.add(distance, thickness);
        let cubed = b.cube(ring);
        let thickness_offset = b.mul_const(thickness, 0.083);
        let tunnel = b.add(sampler, thickness_offset);
        let merged = b.max(tunnel, cubed);
        b.clamp(merged, -1.0, 1.0)
    })
}

fn entrances(b: &mut GraphBuilder) -> NodeId {
    b.named(keys::ENTRANCES, |b| {
        let rarity_noise = b.noise(noises::SPAGHETTI_3D_RARITY, 2.0, 1.0);
        let rarity = b.cache_once(rarity_noise);
        let thickness = b.mapped_noise(noises::SPAGHETTI_3D_THICKNESS, 1.0, 1.0, -0.065, -0.088);
        let first = b.weird_scaled_sampler(rarity, noises::SPAGHETTI_3D_1, RarityValueMapper::Tunnels);
        let second = b.weird_scaled_sampler(rarity, noises::SPAGHETTI_3D_2, RarityValueMapper::Tunnels);
        let tunnels = b.max(first, second);
        let thick = b.add(tunnels, thickness);
        let spaghetti_3d = b.clamp(thick, -1.0, 1.0);
        let roughness = spaghetti_roughness_function(b);
        let entrance = b.noise(noises::CAVE_ENTRANCE, 0.75, 0.5);
        let raised = b.add_const(entrance, 0.37);
        let gradient = b.y_clamped_gradient(-10, 30, 0.3, 0.0);
        let surface = b.add(raised, gradient);
        let rough_tunnels = b.add(roughness, spaghetti_3d);
        let min = b.min(surface, rough_tunnels);
        b.cache_once(min)
    })
}

fn noodle(b: &mut GraphBuilder) -> NodeId {
    b.named(keys::NOODLE, |b| {
        let toggle_noise = b.noise(noises::NOODLE, 1.0, 1.0);
        let toggle = y_limited_interpolatable(b, toggle_noise, NOODLE_MIN_Y, NOODLE_MAX_Y, -1.0);
        let thickness_noise = b.mapped_noise(noises::NOODLE_THICKNESS, 1.0, 1.0, -0.05, -0.1);
        let thickness = y_limited_interpolatable(b, thickness_noise, NOODLE_MIN_Y, NOODLE_MAX_Y, 0.0);
        let scale = 2.666_666_666_666_666_5;
        let ridge_a_noise = b.noise(noises::NOODLE_RIDGE_A, scale, scale);
        let ridge_a = y_limited_interpolatable(b, ridge_a_noise, NOODLE_MIN_Y, NOODLE_MAX_Y, 0.0);
        let ridge_b_noise = b.noise(noises::NOODLE_RIDGE_B, scale, scale);
        let ridge_b = y_limited_interpolatable(b, ridge_b_noise, NOODLE_MIN_Y, NOODLE_MAX_Y, 0.0);
        let abs_a = b.abs(ridge_a);
        let abs_b = b.abs(ridge_b);
        let ridge = b.max(abs_a, abs_b);
        let one_half = b.constant(1.5);
        let ridges = b.mul(one_half, ridge);
        let solid = b.constant(64.0);
        let noodles = b.add(thickness, ridges);
        b.range_choice(toggle, -1_000_000.0, 0.0, solid, noodles)
    })
}

fn pillars(b: &mut GraphBuilder) -> NodeId {
    b.named(keys::PILLARS, |b| {
        let pillar = b.noise(noises::PILLAR, 25.0, 0.3);
        let rareness = b.mapped_noise(noises::PILLAR_RARENESS, 1.0, 1.0, 0.0, -2.0);
        let thickness = b.mapped_noise(noises::PILLAR_THICKNESS, 1.0, 1.0, 0.0, 1.1);
        let doubled = b.mul_const(pillar, 2.0);
        let rare = b.add(doubled, rareness);
        let cubed = b.cube(thickness);
        let product = b.mul(rare, cubed);
        b.cache_once(product)
    })
}

fn underground(b: &mut GraphBuilder, sloped_cheese: NodeId) -> NodeId {
    let spaghetti = spaghetti_2d(b);
    let roughness = spaghetti_roughness_function(b);
    let layer = b.noise(noises::CAVE_LAYER, 1.0, 8.0);
    let layer_squared = b.square(layer);
    let four = b.constant(4.0);
    let layered = b.mul(four, layer_squared);
    let cheese_noise = b.noise(noises::CAVE_CHEESE, 1.0, 0.666_666_666_666_666_6);
    let cheese_base = b.constant(0.27);
    let cheese_raised = b.add(cheese_base, cheese_noise);
    let cheese_clamped = b.clamp(cheese_raised, -1.0, 1.0);
    let slope_factor = b.constant(-0.64);
    let slope_scaled = b.mul(slope_factor, sloped_cheese);
    let slope_base = b.constant(1.5);
    let slope_raised = b.add(slope_base, slope_scaled);
    let slope_clamped = b.clamp(slope_raised, 0.0, 0.5);
    let cheese = b.add(cheese_clamped, slope_clamped);
    let caves = b.add(layered, cheese);
    let entrances = entrances(b);
    let without_entrances = b.min(caves, entrances);
    let spaghetti_rough = b.add(spaghetti, roughness);
    let carved = b.min(without_entrances, spaghetti_rough);
    let pillars = pillars(b);
    let never = b.constant(-1_000_000.0);
    let pillar_choice = b.range_choice(pillars, -1_000_000.0, 0.03, never, pillars);
    b.max(carved, pillar_choice)
}

fn router(b: GraphBuilder, slots: [NodeId; 15]) -> Result<NoiseRouter, GraphError> {
    let [
        barrier,
        fluid_level_floodedness,
        fluid_level_spread,
        lava,
        temperature,
        vegetation,
        continents,
        erosion,
        depth,
        ridges,
        initial_density_without_jaggedness,
        final_density,
        vein_toggle,
        vein_ridged,
        vein_gap,
    ] = slots;
    let router = NoiseRouter {
        graph: Arc::new(b.finish()),
        barrier,
        fluid_level_floodedness,
        fluid_level_spread,
        lava,
        temperature,
        vegetation,
        continents,
        erosion,
        depth,
        ridges,
        initial_density_without_jaggedness,
        final_density,
        vein_toggle,
        vein_ridged,
        vein_gap,
    };
    router.validate()?;
    Ok(router)
}

/// The overworld router, optionally with large biomes or amplified terrain.
///
/// # Errors
/// Returns a [`GraphError`] if a terrain spline is malformed.
pub fn overworld(large_biomes: bool, amplified: bool) -> Result<NoiseRouter, GraphError> {
    let mut b = GraphBuilder::new();
    let barrier = b.noise(noises::AQUIFER_BARRIER, 1.0, 0.5);
    let floodedness = b.noise(noises::AQUIFER_FLUID_LEVEL_FLOODEDNESS, 1.0, 0.67);
    let spread = b.noise(noises::AQUIFER_FLUID_LEVEL_SPREAD, 1.0, 0.714_285_714_285_714_3);
    let lava = b.noise(noises::AQUIFER_LAVA, 1.0, 1.0);
    let x = shift_x(&mut b);
    let z = shift_z(&mut b);
    let (temperature_noise, vegetation_noise) = if large_biomes {
        (noises::TEMPERATURE_LARGE, noises::VEGETATION_LARGE)
    } else {
        (noises::TEMPERATURE, noises::VEGETATION)
    };
    let temperature = b.shifted_noise_2d(x, z, 0.25, temperature_noise);
    let vegetation = b.shifted_noise_2d(x, z, 0.25, vegetation_noise);

    let terrain = terrain(&mut b, large_biomes, amplified)?;
    let ridges = b.require(&keys::RIDGES)?;

    let factor_column = b.cache_2d(terrain.factor);
    let initial = noise_gradient_density(&mut b, factor_column, terrain.depth);
    let initial_offset = b.add_const(initial, INITIAL_DENSITY_OFFSET);
    let initial_clamped = b.clamp(initial_offset, -64.0, 64.0);
    let initial_density = slide_overworld(&mut b, initial_clamped, amplified);

    let sloped = terrain.sloped_cheese;
    let entrances = entrances(&mut b);
    let entrance_scaled = b.mul_const(entrances, 5.0);
    let surface_caves = b.min(sloped, entrance_scaled);
    let underground = underground(&mut b, sloped);
    let caves = b.range_choice(sloped, -1_000_000.0, SURFACE_DENSITY_THRESHOLD, surface_caves, underground);
    let slid = slide_overworld(&mut b, caves, amplified);
    let processed = post_process(&mut b, slid);
    let noodle = noodle(&mut b);
    let final_density = b.min(processed, noodle);

    let veininess = b.noise(noises::ORE_VEININESS, 1.5, 1.5);
    let vein_toggle = y_limited_interpolatable(&mut b, veininess, ORE_VEIN_MIN_Y, ORE_VEIN_MAX_Y, 0.0);
    let vein_a_noise = b.noise(noises::ORE_VEIN_A, 4.0, 4.0);
    let vein_a_limited = y_limited_interpolatable(&mut b, vein_a_noise, ORE_VEIN_MIN_Y, ORE_VEIN_MAX_Y, 0.0);
    let vein_a = b.abs(vein_a_limited);
    let vein_b_noise = b.noise(noises::ORE_VEIN_B, 4.0, 4.0);
    let vein_b_limited = y_limited_interpolatable(&mut b, vein_b_noise, ORE_VEIN_MIN_Y, ORE_VEIN_MAX_Y, 0.0);
    let vein_b = b.abs(vein_b_limited);
    let vein_max = b.max(vein_a, vein_b);
    let vein_ridged = b.add_const(vein_max, f64::from(-0.08_f32));
    let vein_gap = b.noise(noises::ORE_GAP, 1.0, 1.0);

    log::debug!(
        "built overworld noise router (large_biomes: {large_biomes}, amplified: {amplified}) with {} nodes",
        b.len()
    );
    router(
        b,
        [
            barrier,
            floodedness,
            spread,
            lava,
            temperature,
            vegetation,
            terrain.continents,
            terrain.erosion,
            terrain.depth,
            ridges,
            initial_density,
            final_density,
            vein_toggle,
            vein_ridged,
            vein_gap,
        ],
    )
}

/// A router with climate and final density only, for dimensions without modern caves.
fn no_new_caves(mut b: GraphBuilder, density: NodeId, name: &str) -> Result<NoiseRouter, GraphError> {
    let zero = b.zero();
    let x = shift_x(&mut b);
    let z = shift_z(&mut b);
    let temperature = b.shifted_noise_2d(x, z, 0.25, noises::TEMPERATURE);
    let vegetation = b.shifted_noise_2d(x, z, 0.25, noises::VEGETATION);
    let final_density = post_process(&mut b, density);
    log::debug!("built {name} noise router with {} nodes", b.len());
    router(
        b,
        [
            zero,
            zero,
            zero,
            zero,
            temperature,
            vegetation,
            zero,
            zero,
            zero,
            zero,
            zero,
            final_density,
            zero,
            zero,
            zero,
        ],
    )
}

/// The nether router.
///
/// # Errors
/// Returns a [`GraphError`] if the assembled graph is malformed.
pub fn nether() -> Result<NoiseRouter, GraphError> {
    let mut b = GraphBuilder::new();
    let density = slide_nether_like(&mut b, 0, 128);
    no_new_caves(b, density, "nether")
}

/// The single-biome caves router.
///
/// # Errors
/// Returns a [`GraphError`] if the assembled graph is malformed.
pub fn caves() -> Result<NoiseRouter, GraphError> {
    let mut b = GraphBuilder::new();
    let density = slide_nether_like(&mut b, -64, 192);
    no_new_caves(b, density, "caves")
}

/// The floating islands router.
///
/// # Errors
/// Returns a [`GraphError`] if the assembled graph is malformed.
pub fn floating_islands() -> Result<NoiseRouter, GraphError> {
    let mut b = GraphBuilder::new();
    let base = base_3d_end(&mut b);
    let density = slide_end_like(&mut b, base, 0, 256);
    no_new_caves(b, density, "floating_islands")
}

/// The end router.
///
/// # Errors
/// Returns a [`GraphError`] if the assembled graph is malformed.
pub fn end() -> Result<NoiseRouter, GraphError> {
    let mut b = GraphBuilder::new();
    let zero = b.zero();
    let islands_shape = b.end_islands();
    let islands = b.cache_2d(islands_shape);
    let initial_offset = b.add_const(islands, INITIAL_DENSITY_OFFSET);
    let initial_density = slide_end(&mut b, initial_offset);
    let sloped_cheese = b.named(keys::SLOPED_CHEESE_END, |b| {
        let shape = b.end_islands();
        let base = base_3d_end(b);
        b.add(shape, base)
    });
    let slid = slide_end(&mut b, sloped_cheese);
    let final_density = post_process(&mut b, slid);
    log::debug!("built end noise router with {} nodes", b.len());
    router(
        b,
        [
            zero,
            zero,
            zero,
            zero,
            zero,
            zero,
            zero,
            islands,
            zero,
            zero,
            initial_density,
            final_density,
            zero,
            zero,
            zero,
        ],
    )
}

/// A router whose every output is zero.
#[must_use]
pub fn none() -> NoiseRouter {
    let mut b = GraphBuilder::new();
    let zero = b.zero();
    NoiseRouter {
        graph: Arc::new(b.finish()),
        barrier: zero,
        fluid_level_floodedness: zero,
        fluid_level_spread: zero,
        lava: zero,
        temperature: zero,
        vegetation: zero,
        continents: zero,
        erosion: zero,
        depth: zero,
        ridges: zero,
        initial_density_without_jaggedness: zero,
        final_density: zero,
        vein_toggle: zero,
        vein_ridged: zero,
        vein_gap: zero,
    }
}

#[cfg(test)]
mod tests {
    use strata_utils::density::{DensityNode, RouterSlot};

    use super::*;

    fn count(router: &NoiseRouter, pred: impl Fn(&DensityNode) -> bool) -> usize {
        router.graph.iter().filter(|(_, node)| pred(node)).count()
    }

    #[test]
    fn test_overworld_builds_and_validates() {
        for (large, amplified) in [(false, false), (true, false), (false, true)] {
            let router = overworld(large, amplified).unwrap();
            assert!(router.validate().is_ok());
            assert_ne!(router.final_density, router.initial_density_without_jaggedness);
        }
    }

    #[test]
    fn test_overworld_build_is_stable() {
        let a = overworld(false, false).unwrap();
        let b = overworld(false, false).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.graph.node(a.final_density), b.graph.node(b.final_density));
    }

    #[test]
    fn test_flavors_differ() {
        let normal = overworld(false, false).unwrap();
        let large = overworld(true, false).unwrap();
        let amplified = overworld(false, true).unwrap();
        assert_ne!(normal, large);
        assert_ne!(normal, amplified);
        let uses = |router: &NoiseRouter, id: &Identifier| {
            count(router, |node| matches!(node, DensityNode::ShiftedNoise { noise, .. } if noise == id))
        };
        assert_eq!(uses(&large, &noises::CONTINENTALNESS_LARGE), 1);
        assert_eq!(uses(&large, &noises::CONTINENTALNESS), 0);
        assert_eq!(uses(&amplified, &noises::CONTINENTALNESS), 1);
    }

    #[test]
    fn test_shared_functions_are_built_once() {
        let router = overworld(false, false).unwrap();
        assert_eq!(count(&router, |n| matches!(n, DensityNode::ShiftA { .. })), 1);
        assert_eq!(count(&router, |n| matches!(n, DensityNode::BlendedNoise(_))), 1);
        assert_eq!(count(&router, |n| matches!(n, DensityNode::Spline(_))), 3);
        let weird = count(&router, |n| matches!(n, DensityNode::WeirdScaledSampler { .. }));
        assert_eq!(weird, 3);
        // The shared zero and the y gradient exist once.
        let y = count(&router, |n| {
            matches!(n, DensityNode::YClampedGradient { from_y: -4064, to_y: 4062, .. })
        });
        assert_eq!(y, 1);
    }

    #[test]
    fn test_no_new_caves_routers() {
        for router in [nether().unwrap(), caves().unwrap(), floating_islands().unwrap()] {
            let zero = router.barrier;
            assert_eq!(router.graph.node(zero).as_constant(), Some(0.0));
            for slot in RouterSlot::ALL {
                let id = router.node(slot);
                match slot {
                    RouterSlot::Temperature | RouterSlot::Vegetation | RouterSlot::FinalDensity => {
                        assert_ne!(id, zero);
                    }
                    _ => assert_eq!(id, zero),
                }
            }
            assert!(matches!(router.graph.node(router.final_density), DensityNode::Squeeze(_)));
        }
    }

    #[test]
    fn test_end_router() {
        let router = end().unwrap();
        assert!(matches!(router.graph.node(router.erosion), DensityNode::Cache2D(_)));
        assert_eq!(router.graph.node(router.temperature).as_constant(), Some(0.0));
        assert_eq!(count(&router, |n| matches!(n, DensityNode::EndIslands)), 2);
    }

    #[test]
    fn test_none_router() {
        let router = none();
        assert_eq!(router.graph.len(), 1);
        for slot in RouterSlot::ALL {
            assert_eq!(router.node(slot), router.barrier);
        }
    }
}
