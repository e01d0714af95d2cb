//! Autotile configuration
//!
//! Settings for resolving one terrain layer. Loadable from TOML or JSON.

use crate::matcher::FallbackPolicy;
use serde::{Deserialize, Serialize};
use wang_terrain_core::TerrainError;

/// How a layer is resolved: which wang set, what to do with unmatched cells,
/// and how variants are seeded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutotileConfig {
    /// Name of the wang set to match against
    pub wang_set: String,
    #[serde(default)]
    pub fallback: FallbackPolicy,
    /// Seed for variant selection; the same seed gives the same variants
    #[serde(default)]
    pub seed: u64,
    /// Worker threads per pass (`0` is treated as `1`)
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    1
}

impl Default for AutotileConfig {
    fn default() -> Self {
        Self {
            wang_set: String::new(),
            fallback: FallbackPolicy::Strict,
            seed: 0,
            workers: default_workers(),
        }
    }
}

impl AutotileConfig {
    pub fn new(wang_set: impl Into<String>) -> Self {
        Self {
            wang_set: wang_set.into(),
            ..Default::default()
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self, TerrainError> {
        toml::from_str(text).map_err(|e| TerrainError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, TerrainError> {
        toml::to_string(self).map_err(|e| TerrainError::Config(e.to_string()))
    }

    pub fn from_json_str(text: &str) -> Result<Self, TerrainError> {
        serde_json::from_str(text).map_err(|e| TerrainError::Config(e.to_string()))
    }
}
