//! Registry errors.

use strata_utils::Identifier;
use strata_utils::density::GraphError;
use thiserror::Error;

/// Failure to look up, build or decode registry content.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A required entry is not registered.
    #[error("missing {registry} entry `{id}`")]
    MissingEntry {
        /// Registry that was searched, e.g. `worldgen/noise`.
        registry: &'static str,
        /// The requested key.
        id: Identifier,
    },
    /// Vertical bounds or cell sizes out of range.
    #[error("invalid noise settings: {0}")]
    InvalidNoiseSettings(String),
    /// A density graph or router refers to nodes it does not own.
    #[error(transparent)]
    InvalidGraph(#[from] GraphError),
    /// JSON encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl RegistryError {
    /// A missing entry in `registry`.
    #[must_use]
    pub const fn missing(registry: &'static str, id: Identifier) -> Self {
        Self::MissingEntry { registry, id }
    }
}
