//! Height field of the outer end islands.
//!
//! Java reference: `DensityFunctions.EndIslandDensityFunction`

use crate::noise::SimplexNoise;
use crate::random::Random;
use crate::random::legacy_random::LegacyRandom;

/// Draws skipped before the island simplex noise is seeded.
const ISLAND_SEED_SKIP: u32 = 17_292;
/// Squared chunk distance within which only the central island exists.
const CENTER_ISLAND_DISTANCE_SQR: i64 = 4096;

/// Seeded end island sampler.
#[derive(Debug, Clone)]
pub struct EndIslands {
    island_noise: SimplexNoise,
}

impl EndIslands {
    /// Seed the island noise from the world seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut random = LegacyRandom::from_seed(seed);
        random.consume_count(ISLAND_SEED_SKIP);
        Self {
            island_noise: SimplexNoise::new(&mut random),
        }
    }

    /// Island height in `[-100, 80]` for a position in 8-block units.
    #[must_use]
    #[allow(clippy::similar_names)]
    pub fn height_value(&self, x: i32, z: i32) -> f32 {
        let chunk_x = x / 2;
        let chunk_z = z / 2;
        let offset_x = x % 2;
        let offset_z = z % 2;
        let distance_sqr = x.wrapping_mul(x).wrapping_add(z.wrapping_mul(z));
        let mut height = 100.0 - (distance_sqr as f32).sqrt() * 8.0;
        height = height.clamp(-100.0, 80.0);

        for dx in -12..=12 {
            for dz in -12..=12 {
                let cx = i64::from(chunk_x + dx);
                let cz = i64::from(chunk_z + dz);
                if cx * cx + cz * cz > CENTER_ISLAND_DISTANCE_SQR
                    && self.island_noise.get_value(cx as f64, cz as f64) < f64::from(-0.9_f32)
                {
                    let falloff = ((cx as f32).abs() * 3439.0 + (cz as f32).abs() * 147.0) % 13.0 + 9.0;
                    let px = (offset_x - dx * 2) as f32;
                    let pz = (offset_z - dz * 2) as f32;
                    let island = (100.0 - (px * px + pz * pz).sqrt() * falloff).clamp(-100.0, 80.0);
                    height = height.max(island);
                }
            }
        }

        height
    }

    /// Density at a block position, in `[-0.84375, 0.5625]`.
    #[must_use]
    pub fn compute(&self, block_x: i32, block_z: i32) -> f64 {
        (f64::from(self.height_value(block_x / 8, block_z / 8)) - 8.0) / 128.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_island_center() {
        let islands = EndIslands::new(0);
        // Height 80 at the origin gives (80 - 8) / 128.
        assert!((islands.compute(0, 0) - 0.5625).abs() < 1e-12);
    }

    #[test]
    fn test_range() {
        let islands = EndIslands::new(1234);
        for (x, z) in [(0, 0), (800, 0), (-4000, 2000), (10_000, 10_000), (123, -456)] {
            let v = islands.compute(x, z);
            assert!((-0.84375..=0.5625).contains(&v), "{v} out of range at ({x}, {z})");
        }
    }

    #[test]
    fn test_void_between_islands() {
        let islands = EndIslands::new(0);
        // Just outside the main island and well inside the 1024 block gap.
        assert!((islands.compute(800, 0) + 0.84375).abs() < 1e-12);
    }
}
