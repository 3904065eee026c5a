#![allow(missing_docs)]
//! Benchmarks for seeding and evaluating noise routers.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use strata_core::worldgen::{EvalCache, RandomState};
use strata_registry::WorldGenContext;
use strata_registry::noise_settings::keys;
use strata_utils::density::RouterSlot;

const SEED: u64 = 12345;
const MIN_Y: i32 = -64;
const MAX_Y: i32 = 320;

fn bench_seeding(c: &mut Criterion) {
    let context = WorldGenContext::vanilla().expect("vanilla context");
    let mut group = c.benchmark_group("random_state_new");
    for key in [keys::OVERWORLD, keys::NETHER, keys::END] {
        group.bench_with_input(BenchmarkId::from_parameter(&key), &key, |b, key| {
            b.iter(|| RandomState::for_preset(&context, black_box(key), SEED).expect("seeded state"));
        });
    }
    group.finish();
}

fn bench_final_density(c: &mut Criterion) {
    let context = WorldGenContext::vanilla().expect("vanilla context");
    let state = RandomState::for_preset(&context, &keys::OVERWORLD, SEED).expect("seeded state");

    let mut group = c.benchmark_group("final_density_column");
    for (chunk_x, chunk_z) in [(0, 0), (100, 100), (1000, 1000)] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{chunk_x},{chunk_z}")),
            &(chunk_x, chunk_z),
            |b, &(chunk_x, chunk_z)| {
                let mut cache = EvalCache::new();
                b.iter(|| {
                    let mut sum = 0.0;
                    for y in (MIN_Y..MAX_Y).step_by(8) {
                        sum += state.value(RouterSlot::FinalDensity, chunk_x * 16, y, chunk_z * 16, &mut cache);
                    }
                    black_box(sum)
                });
            },
        );
    }
    group.finish();
}

fn bench_climate(c: &mut Criterion) {
    let context = WorldGenContext::vanilla().expect("vanilla context");
    let state = RandomState::for_preset(&context, &keys::OVERWORLD, SEED).expect("seeded state");
    c.bench_function("climate_sample_chunk", |b| {
        let mut cache = EvalCache::new();
        b.iter(|| {
            for x in 0..4 {
                for z in 0..4 {
                    black_box(state.sampler().sample(x, 16, z, &mut cache));
                }
            }
        });
    });
}

criterion_group!(benches, bench_seeding, bench_final_density, bench_climate);
criterion_main!(benches);
