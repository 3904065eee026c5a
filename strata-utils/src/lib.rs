//! Leaf algorithms of the strata world-shape engine: deterministic random sources,
//! noise primitives, the density function arena and its evaluator, and climate
//! sampling.

pub mod climate;
pub mod density;
pub mod identifier;
pub mod math;
pub mod noise;
pub mod random;

pub use identifier::Identifier;
