use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};

use amm::{Pool, RouteRequest};
use router_core::RouterConfig;

use super::run_blocking;
use crate::cli::RouteArgs;
use crate::snapshot::load_pools;

/// Apply per-command flags on top of the loaded configuration
pub fn route_config(base: &RouterConfig, args: &RouteArgs) -> Result<RouterConfig> {
    let mut config = base.clone();
    if let Some(max_hops) = args.max_hops {
        config.max_hops = max_hops;
    }
    if let Some(slippage) = args.slippage {
        config.slippage_percent = slippage;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }
    config.validate()?;
    Ok(config)
}

/// `route` subcommand: quote the best route for one swap
pub async fn route(args: &RouteArgs, base: &RouterConfig) -> Result<Value> {
    let config = route_config(base, args)?;
    let pools = load_pools(&args.pools)?;
    let request = RouteRequest::new(
        args.from.as_str(),
        args.to.as_str(),
        args.amount.clone(),
        args.mode.into(),
    )
    .with_max_hops(config.max_hops);

    quote(Arc::new(pools), request, config).await
}

/// Quote one request and render it as JSON
pub async fn quote(
    pools: Arc<Vec<Pool>>,
    request: RouteRequest,
    config: RouterConfig,
) -> Result<Value> {
    let timeout_ms = config.timeout_ms;
    let quoted = run_blocking(timeout_ms, move || {
        amm::quote_route(&pools, &request, &config)
    })
    .await??;

    match quoted {
        Some(quote) => {
            tracing::info!(
                "Route found: {} hops, {} in, {} out",
                quote.route.hop_count(),
                quote.route.input_amount,
                quote.route.output_amount
            );
            Ok(serde_json::to_value(&quote)?)
        }
        None => {
            tracing::info!("No route found");
            Ok(json!({ "status": "not_found" }))
        }
    }
}
