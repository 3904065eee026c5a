//! World-facing layer of the strata world-shape engine: seeding noise routers for a
//! world and upgrading chunks saved before the world extended below y 0.

pub mod chunk;
pub mod worldgen;
