//! World generation module.
//!
//! Binds the registry's noise routers to a world seed.

pub mod random_state;

pub use random_state::{RandomState, is_missing_entry};
pub use strata_utils::density::EvalCache;
