//! Configuration types for the auto-router

use serde::{Deserialize, Serialize};

use crate::errors::RouterError;
use crate::types::DEFAULT_MAX_HOPS;

/// How candidate routes are explored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Best-first expansion with per-token domination pruning
    #[default]
    BestFirst,
    /// Enumerate and simulate every pool-simple path (small graphs only)
    Exhaustive,
}

/// Router configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Hop limit used when a request does not carry its own
    #[serde(default = "default_max_hops")]
    pub max_hops: u8,

    /// Slippage tolerance applied to quotes, in percent
    #[serde(default = "default_slippage_percent")]
    pub slippage_percent: f64,

    /// Search strategy
    #[serde(default)]
    pub strategy: SearchStrategy,

    /// Upper bound on enumerated paths for the exhaustive strategy
    #[serde(default = "default_exhaustive_path_limit")]
    pub exhaustive_path_limit: usize,

    /// Per-request timeout applied by async callers, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_max_hops() -> u8 {
    DEFAULT_MAX_HOPS
}

fn default_slippage_percent() -> f64 {
    1.0
}

fn default_exhaustive_path_limit() -> usize {
    10_000
}

fn default_timeout_ms() -> u64 {
    2_000
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_hops: default_max_hops(),
            slippage_percent: default_slippage_percent(),
            strategy: SearchStrategy::default(),
            exhaustive_path_limit: default_exhaustive_path_limit(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl RouterConfig {
    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), RouterError> {
        if self.max_hops == 0 {
            return Err(RouterError::Config("max_hops must be at least 1".into()));
        }
        if !(0.0..100.0).contains(&self.slippage_percent) {
            return Err(RouterError::Config(format!(
                "slippage_percent must be in [0, 100), got {}",
                self.slippage_percent
            )));
        }
        if self.exhaustive_path_limit == 0 {
            return Err(RouterError::Config(
                "exhaustive_path_limit must be positive".into(),
            ));
        }
        Ok(())
    }
}
