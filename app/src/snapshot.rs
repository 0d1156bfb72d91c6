//! Pool snapshot and configuration loading

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use amm::Pool;
use router_core::RouterConfig;

/// Snapshot file layout: `{ "pools": [...] }` or a bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Wrapped { pools: Vec<Pool> },
    Bare(Vec<Pool>),
}

pub fn parse_pools(json: &str) -> Result<Vec<Pool>> {
    let file: SnapshotFile = serde_json::from_str(json).context("Malformed pool snapshot")?;
    Ok(match file {
        SnapshotFile::Wrapped { pools } => pools,
        SnapshotFile::Bare(pools) => pools,
    })
}

pub fn load_pools(path: &Path) -> Result<Vec<Pool>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read pool snapshot {}", path.display()))?;
    let pools =
        parse_pools(&json).with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded {} pools from {}", pools.len(), path.display());
    Ok(pools)
}

/// Load the router configuration, falling back to defaults without a file
pub fn load_config(path: Option<&Path>) -> Result<RouterConfig> {
    let config = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => RouterConfig::default(),
    };
    config.validate()?;
    Ok(config)
}
