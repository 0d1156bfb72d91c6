//! Route Assembler
//!
//! Turns a winning search candidate into the `FinalRoute` handed to the
//! transaction builder, then checks every route invariant before returning.
//! A failure here means the search and the assembler disagree about a path,
//! so it is reported as `RouteAssemblyInvariantViolation` rather than as a
//! user-facing condition.

use std::collections::HashSet;

use router_core::{Amount, PoolId, Result, RouterError, TokenId};

use crate::calculator::{amount_in, amount_out};
use crate::graph::PoolGraph;
use crate::queue::RouteCandidate;
use crate::state::{FinalRoute, RouteRequest, SwapMode};

/// Build the final route from a search candidate.
///
/// Fixed-output candidates were grown backward from `token_out`, so their
/// pools and amounts are reversed into execution order first.
pub fn assemble(
    graph: &PoolGraph,
    request: &RouteRequest,
    candidate: RouteCandidate,
) -> Result<FinalRoute> {
    let RouteCandidate {
        mut path_so_far,
        mut amounts_so_far,
        ..
    } = candidate;

    if request.mode == SwapMode::FixedOutput {
        path_so_far.reverse();
        amounts_so_far.reverse();
    }

    finalize(graph, request, path_so_far, amounts_so_far)
}

/// Build a final route from pools and amounts already in execution order.
pub fn finalize(
    graph: &PoolGraph,
    request: &RouteRequest,
    pool_path: Vec<PoolId>,
    amounts: Vec<Amount>,
) -> Result<FinalRoute> {
    let token_path = match token_path(graph, &request.token_in, &pool_path) {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Route assembly failed: {}", e);
            return Err(e);
        }
    };

    let (input_amount, output_amount) = match (amounts.first(), amounts.last()) {
        (Some(first), Some(last)) => (first.clone(), last.clone()),
        _ => return Err(report("route carries no amounts".to_string())),
    };

    let route = FinalRoute {
        mode: request.mode,
        token_path,
        pool_path,
        intermediary_amounts: amounts,
        input_amount,
        output_amount,
    };

    validate_route(graph, request, &route)?;
    Ok(route)
}

/// Check a final route against the graph and the request it answers.
///
/// Violations are logged at `error` level.
pub fn validate_route(graph: &PoolGraph, request: &RouteRequest, route: &FinalRoute) -> Result<()> {
    check_route(graph, request, route).map_err(report)
}

fn report(reason: String) -> RouterError {
    tracing::error!("Route assembly invariant violated: {}", reason);
    RouterError::assembly(reason)
}

/// Walk each pool to its other token, starting from `token_in`
fn token_path(graph: &PoolGraph, token_in: &TokenId, pools: &[PoolId]) -> Result<Vec<TokenId>> {
    let mut tokens = Vec::with_capacity(pools.len() + 1);
    tokens.push(token_in.clone());

    for pool_id in pools {
        let current = tokens.last().cloned().unwrap_or_else(|| token_in.clone());
        let pool = graph
            .pool(pool_id)
            .ok_or_else(|| RouterError::assembly(format!("pool {} is not in the graph", pool_id)))?;
        let next = pool.other_token(&current).ok_or_else(|| {
            RouterError::assembly(format!("pool {} does not trade {}", pool_id, current))
        })?;
        tokens.push(next.clone());
    }

    Ok(tokens)
}

fn check_route(
    graph: &PoolGraph,
    request: &RouteRequest,
    route: &FinalRoute,
) -> std::result::Result<(), String> {
    let hops = route.pool_path.len();
    if hops == 0 {
        return Err("route has no pools".to_string());
    }
    if route.token_path.len() != hops + 1 || route.intermediary_amounts.len() != hops + 1 {
        return Err(format!(
            "{} pools, {} tokens, {} amounts",
            hops,
            route.token_path.len(),
            route.intermediary_amounts.len()
        ));
    }
    if route.mode != request.mode {
        return Err(format!("route mode {:?} != request mode {:?}", route.mode, request.mode));
    }

    if route.token_path.first() != Some(&request.token_in) {
        return Err(format!("route does not start at {}", request.token_in));
    }
    if route.token_path.last() != Some(&request.token_out) {
        return Err(format!("route does not end at {}", request.token_out));
    }

    let mut seen = HashSet::with_capacity(hops);
    for pool_id in &route.pool_path {
        if !seen.insert(pool_id) {
            return Err(format!("pool {} used twice", pool_id));
        }
    }

    let amounts = &route.intermediary_amounts;
    if route.input_amount != amounts[0] || route.output_amount != amounts[hops] {
        return Err("input/output amounts disagree with intermediary amounts".to_string());
    }
    let fixed_end = match request.mode {
        SwapMode::FixedInput => &amounts[0],
        SwapMode::FixedOutput => &amounts[hops],
    };
    if *fixed_end != request.amount {
        return Err(format!(
            "fixed amount is {}, request asked for {}",
            fixed_end, request.amount
        ));
    }
    if let Some(position) = amounts.iter().position(Amount::is_zero) {
        return Err(format!("zero amount at position {}", position));
    }

    for (i, pool_id) in route.pool_path.iter().enumerate() {
        let (from, to) = (&route.token_path[i], &route.token_path[i + 1]);
        let pool = graph
            .pool(pool_id)
            .ok_or_else(|| format!("pool {} is not in the graph", pool_id))?;
        if !pool.connects(from, to) {
            return Err(format!("pool {} does not connect {} and {}", pool_id, from, to));
        }

        let edge = graph.oriented(from, pool_id).map_err(|e| e.to_string())?;
        let replayed = match request.mode {
            SwapMode::FixedInput => {
                amount_out(&amounts[i], edge.reserve_in, edge.reserve_out, edge.fee)
                    .map(|out| out == amounts[i + 1])
            }
            SwapMode::FixedOutput => {
                amount_in(&amounts[i + 1], edge.reserve_in, edge.reserve_out, edge.fee)
                    .map(|required| required == amounts[i])
            }
        };
        match replayed {
            Ok(true) => {}
            Ok(false) => return Err(format!("hop {} through {} does not replay", i, pool_id)),
            Err(e) => return Err(format!("hop {} through {}: {}", i, pool_id, e)),
        }
    }

    Ok(())
}
