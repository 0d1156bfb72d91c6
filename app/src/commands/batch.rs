use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use amm::{Pool, RouteRequest, SwapMode};
use router_core::{Amount, RouterConfig, TokenId};

use super::run_blocking;
use crate::cli::BatchArgs;
use crate::snapshot::load_pools;

/// One entry of a request file; the hop limit falls back to the config
#[derive(Debug, Deserialize)]
pub struct RequestEntry {
    pub token_in: TokenId,
    pub token_out: TokenId,
    pub amount: Amount,
    #[serde(default = "default_mode")]
    pub mode: SwapMode,
    #[serde(default)]
    pub max_hops: Option<u8>,
}

fn default_mode() -> SwapMode {
    SwapMode::FixedInput
}

impl RequestEntry {
    pub fn into_request(self, config: &RouterConfig) -> RouteRequest {
        RouteRequest::new(self.token_in, self.token_out, self.amount, self.mode)
            .with_max_hops(self.max_hops.unwrap_or(config.max_hops))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RequestFile {
    Wrapped { requests: Vec<RequestEntry> },
    Bare(Vec<RequestEntry>),
}

pub fn parse_requests(json: &str, config: &RouterConfig) -> Result<Vec<RouteRequest>> {
    let file: RequestFile = serde_json::from_str(json).context("Malformed request file")?;
    let entries = match file {
        RequestFile::Wrapped { requests } => requests,
        RequestFile::Bare(requests) => requests,
    };
    Ok(entries
        .into_iter()
        .map(|entry| entry.into_request(config))
        .collect())
}

fn load_requests(path: &Path, config: &RouterConfig) -> Result<Vec<RouteRequest>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read requests {}", path.display()))?;
    parse_requests(&json, config).with_context(|| format!("Failed to parse {}", path.display()))
}

/// `batch` subcommand: one JSON result per request, in request order
pub async fn batch(args: &BatchArgs, base: &RouterConfig) -> Result<Vec<Value>> {
    let mut config = base.clone();
    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }
    config.validate()?;

    let pools = load_pools(&args.pools)?;
    let requests = load_requests(&args.requests, &config)?;
    tracing::info!("Routing {} requests", requests.len());

    route_all(Arc::new(pools), requests, config).await
}

/// Route every request in parallel; the deadline scales with the batch size
pub async fn route_all(
    pools: Arc<Vec<Pool>>,
    requests: Vec<RouteRequest>,
    config: RouterConfig,
) -> Result<Vec<Value>> {
    let timeout_ms = config
        .timeout_ms
        .saturating_mul(requests.len().max(1) as u64);
    let results = run_blocking(timeout_ms, move || {
        amm::find_routes_batch(&pools, &requests, &config)
    })
    .await?;

    let mut lines = Vec::with_capacity(results.len());
    for (index, result) in results.into_iter().enumerate() {
        let line = match result {
            Ok(outcome) => json!({ "index": index, "outcome": outcome }),
            Err(e) => {
                tracing::warn!("Request {} failed: {}", index, e);
                json!({
                    "index": index,
                    "error": { "code": e.error_code(), "message": e.to_string() }
                })
            }
        };
        lines.push(line);
    }
    Ok(lines)
}
