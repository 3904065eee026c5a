//! Climate sampler for evaluating climate at positions.

use std::sync::Arc;

use crate::density::{DensityEvaluator, EvalCache, NodeId, NoiseRouter};

use super::{TargetPoint, quantize_coord};

/// Climate sampler that evaluates the six climate outputs of a seeded router.
///
/// Matches vanilla's `Climate.Sampler`.
#[derive(Debug, Clone)]
pub struct ClimateSampler {
    evaluator: Arc<DensityEvaluator>,
    temperature: NodeId,
    humidity: NodeId,
    continentalness: NodeId,
    erosion: NodeId,
    depth: NodeId,
    weirdness: NodeId,
}

impl ClimateSampler {
    /// Sample the climate outputs of `router`, seeded in `evaluator`.
    #[must_use]
    pub const fn new(evaluator: Arc<DensityEvaluator>, router: &NoiseRouter) -> Self {
        Self {
            evaluator,
            temperature: router.temperature,
            humidity: router.vegetation,
            continentalness: router.continents,
            erosion: router.erosion,
            depth: router.depth,
            weirdness: router.ridges,
        }
    }

    /// Sample climate at a quart position (block / 4). Each slot is evaluated at the
    /// quart's lowest block corner and quantized through `f32`.
    #[must_use]
    pub fn sample(&self, quart_x: i32, quart_y: i32, quart_z: i32, cache: &mut EvalCache) -> TargetPoint {
        let (x, y, z) = (quart_x << 2, quart_y << 2, quart_z << 2);
        let mut at = |node| quantize_coord(self.evaluator.value_at(node, x, y, z, cache));

        let temperature = at(self.temperature);
        let humidity = at(self.humidity);
        let continentalness = at(self.continentalness);
        let erosion = at(self.erosion);
        let depth = at(self.depth);
        let weirdness = at(self.weirdness);

        TargetPoint::new(temperature, humidity, continentalness, erosion, depth, weirdness)
    }

    /// Sample climate at block coordinates, flooring them to quart positions.
    #[must_use]
    pub fn sample_block(&self, block_x: i32, block_y: i32, block_z: i32, cache: &mut EvalCache) -> TargetPoint {
        self.sample(block_x >> 2, block_y >> 2, block_z >> 2, cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::{CellSize, GraphBuilder, GraphError, NodeSampler};

    fn constant_router(values: [f64; 6]) -> (Arc<DensityEvaluator>, NoiseRouter) {
        let mut b = GraphBuilder::new();
        let zero = b.zero();
        let [t, h, c, e, d, w] = values.map(|v| b.constant(v));
        let graph = Arc::new(b.finish());
        let router = NoiseRouter {
            graph: Arc::clone(&graph),
            barrier: zero,
            fluid_level_floodedness: zero,
            fluid_level_spread: zero,
            lava: zero,
            temperature: t,
            vegetation: h,
            continents: c,
            erosion: e,
            depth: d,
            ridges: w,
            initial_density_without_jaggedness: zero,
            final_density: zero,
            vein_toggle: zero,
            vein_ridged: zero,
            vein_gap: zero,
        };
        let evaluator: Result<_, GraphError> = DensityEvaluator::new(graph, CellSize::new(4, 8), |_| Ok(NodeSampler::None));
        (Arc::new(evaluator.unwrap()), router)
    }

    #[test]
    fn test_all_zero_router() {
        let (evaluator, router) = constant_router([0.0; 6]);
        let sampler = ClimateSampler::new(evaluator, &router);
        let target = sampler.sample(0, 16, 0, &mut EvalCache::new());
        assert_eq!(target, TargetPoint::new(0, 0, 0, 0, 0, 0));
    }

    #[test]
    fn test_constant_sampler() {
        let (evaluator, router) = constant_router([0.5, -0.3, 0.0, 0.1, 0.0, 0.2]);
        let sampler = ClimateSampler::new(evaluator, &router);
        let target = sampler.sample(0, 16, 0, &mut EvalCache::new());
        assert_eq!(target.temperature, 5000);
        assert_eq!(target.humidity, -3000);
        assert_eq!(target.continentalness, 0);
        assert_eq!(target.erosion, 1000);
        assert_eq!(target.depth, 0);
        assert_eq!(target.weirdness, 2000);
    }

    #[test]
    fn test_block_sampling_uses_quart_of_position() {
        let mut b = GraphBuilder::new();
        let zero = b.zero();
        let depth = b.y_clamped_gradient(0, 100, 0.0, 1.0);
        let graph = Arc::new(b.finish());
        let router = NoiseRouter {
            graph: Arc::clone(&graph),
            barrier: zero,
            fluid_level_floodedness: zero,
            fluid_level_spread: zero,
            lava: zero,
            temperature: zero,
            vegetation: zero,
            continents: zero,
            erosion: zero,
            depth,
            ridges: zero,
            initial_density_without_jaggedness: zero,
            final_density: zero,
            vein_toggle: zero,
            vein_ridged: zero,
            vein_gap: zero,
        };
        let evaluator: Result<_, GraphError> = DensityEvaluator::new(graph, CellSize::new(4, 8), |_| Ok(NodeSampler::None));
        let sampler = ClimateSampler::new(Arc::new(evaluator.unwrap()), &router);
        let mut cache = EvalCache::new();
        // Quart y 10 is block y 40; blocks 40..=43 share it.
        assert_eq!(sampler.sample(0, 10, 0, &mut cache).depth, 4000);
        assert_eq!(sampler.sample_block(1, 43, 2, &mut cache).depth, 4000);
        assert_eq!(sampler.sample_block(1, 44, 2, &mut cache).depth, 4400);
    }
}
