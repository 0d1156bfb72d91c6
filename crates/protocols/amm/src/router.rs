//! Auto-Router: Multi-Hop DEX Routing
//!
//! Finds the best swap path across constant-product pools for a fixed input
//! or a fixed output, through intermediate tokens up to a hop limit.
//!
//! Every call is stateless: the graph and queue live only for that call and
//! the pool snapshot is shared read-only, so batches run in parallel
//! without locks.

use std::collections::{HashSet, VecDeque};

use rayon::prelude::*;

use router_core::{Amount, PoolId, Result, RouterConfig, RouterError, SearchStrategy, TokenId};

use crate::assembler::{assemble, finalize};
use crate::calculator::{
    amount_in, amount_out, apply_slippage_ceil, apply_slippage_floor, route_price_impact_percent,
};
use crate::graph::PoolGraph;
use crate::search::{search, SearchOutcome};
use crate::state::{FinalRoute, Pool, RouteHop, RouteOutcome, RouteQuote, RouteRequest, SwapMode};

// ---------------------------------------------------------------------------
// Step 1: Route Finding
// ---------------------------------------------------------------------------

/// Find the best route for one request over a pool snapshot.
///
/// "No route" is `Ok(RouteOutcome::NotFound)`; errors are reserved for bad
/// requests, bad snapshots and internal defects.
pub fn find_route(
    pools: &[Pool],
    request: &RouteRequest,
    config: &RouterConfig,
) -> Result<RouteOutcome> {
    config.validate()?;
    let graph = PoolGraph::build(pools)?;
    route_on_graph(&graph, request, config)
}

/// Route a request over an already built graph.
///
/// The request is validated here, before any search work.
pub fn route_on_graph(
    graph: &PoolGraph,
    request: &RouteRequest,
    config: &RouterConfig,
) -> Result<RouteOutcome> {
    request.validate()?;
    tracing::debug!(
        "Routing {} {} -> {} ({:?}, max {} hops, {:?})",
        request.amount,
        request.token_in,
        request.token_out,
        request.mode,
        request.max_hops,
        config.strategy
    );

    match config.strategy {
        SearchStrategy::BestFirst => best_first_route(graph, request),
        SearchStrategy::Exhaustive => {
            exhaustive_route(graph, request, config.exhaustive_path_limit)
        }
    }
}

fn best_first_route(graph: &PoolGraph, request: &RouteRequest) -> Result<RouteOutcome> {
    let result = search(
        graph,
        &request.token_in,
        &request.token_out,
        &request.amount,
        request.mode,
        request.max_hops,
    )?;

    match result.outcome {
        SearchOutcome::Found(candidate) => {
            let route = assemble(graph, request, candidate)?;
            Ok(RouteOutcome::Found(route))
        }
        SearchOutcome::NotFound => Ok(RouteOutcome::NotFound),
    }
}

// ---------------------------------------------------------------------------
// Step 2: Exhaustive Enumeration
// ---------------------------------------------------------------------------

/// Find all pool-simple paths from `source` to `target`, up to `max_hops`.
///
/// BFS with visited-token tracking: no token is revisited and no pool is
/// used twice in a path. Stops once `limit` paths have been collected.
pub fn find_paths(
    graph: &PoolGraph,
    source: &TokenId,
    target: &TokenId,
    max_hops: usize,
    limit: usize,
) -> Vec<Vec<PoolId>> {
    let mut results: Vec<Vec<PoolId>> = Vec::new();

    type SearchState = (TokenId, Vec<PoolId>, HashSet<TokenId>);
    let mut queue: VecDeque<SearchState> = VecDeque::new();

    let mut initial_visited = HashSet::new();
    initial_visited.insert(source.clone());
    queue.push_back((source.clone(), Vec::new(), initial_visited));

    while let Some((current, path, visited)) = queue.pop_front() {
        for (neighbor, pool_id) in graph.neighbors(&current) {
            if path.contains(pool_id) {
                continue;
            }

            if neighbor == target {
                let mut complete_path = path.clone();
                complete_path.push(pool_id.clone());
                results.push(complete_path);
                if results.len() >= limit {
                    tracing::warn!(
                        "Path enumeration {} -> {} stopped at {} paths",
                        source,
                        target,
                        limit
                    );
                    return results;
                }
            } else if path.len() + 1 < max_hops && !visited.contains(neighbor) {
                let mut new_visited = visited.clone();
                new_visited.insert(neighbor.clone());
                let mut new_path = path.clone();
                new_path.push(pool_id.clone());
                queue.push_back((neighbor.clone(), new_path, new_visited));
            }
        }
    }

    results
}

/// Simulate a path in execution order.
///
/// Returns the amount at every token position, input first, or `None` when a
/// hop is dead (empty reserves, not enough liquidity, or a zero amount).
pub fn simulate_path(
    graph: &PoolGraph,
    token_in: &TokenId,
    path: &[PoolId],
    amount: &Amount,
    mode: SwapMode,
) -> Result<Option<Vec<Amount>>> {
    let mut tokens = Vec::with_capacity(path.len() + 1);
    tokens.push(token_in.clone());
    for pool_id in path {
        let from = &tokens[tokens.len() - 1];
        let next = graph.oriented(from, pool_id)?.token_out.clone();
        tokens.push(next);
    }

    match mode {
        SwapMode::FixedInput => {
            let mut amounts = Vec::with_capacity(path.len() + 1);
            amounts.push(amount.clone());
            for (i, pool_id) in path.iter().enumerate() {
                let edge = graph.oriented(&tokens[i], pool_id)?;
                match amount_out(&amounts[i], edge.reserve_in, edge.reserve_out, edge.fee) {
                    Ok(out) if !out.is_zero() => amounts.push(out),
                    _ => return Ok(None),
                }
            }
            Ok(Some(amounts))
        }
        SwapMode::FixedOutput => {
            let mut amounts = Vec::with_capacity(path.len() + 1);
            amounts.push(amount.clone());
            for (i, pool_id) in path.iter().enumerate().rev() {
                let edge = graph.oriented(&tokens[i], pool_id)?;
                let needed = &amounts[amounts.len() - 1];
                match amount_in(needed, edge.reserve_in, edge.reserve_out, edge.fee) {
                    Ok(required) if !required.is_zero() => amounts.push(required),
                    _ => return Ok(None),
                }
            }
            amounts.reverse();
            Ok(Some(amounts))
        }
    }
}

/// Enumerate every path and keep the best simulated one.
///
/// Ties on the optimized amount go to fewer hops, then to enumeration order.
fn exhaustive_route(
    graph: &PoolGraph,
    request: &RouteRequest,
    limit: usize,
) -> Result<RouteOutcome> {
    let paths = find_paths(
        graph,
        &request.token_in,
        &request.token_out,
        request.max_hops as usize,
        limit,
    );
    let priority = request.mode.priority();

    let mut best: Option<(Vec<PoolId>, Vec<Amount>)> = None;
    let mut dead = 0usize;
    for path in &paths {
        let simulated =
            simulate_path(graph, &request.token_in, path, &request.amount, request.mode)?;
        let amounts = match simulated {
            Some(amounts) => amounts,
            None => {
                dead += 1;
                continue;
            }
        };

        let improves = match &best {
            None => true,
            Some((best_path, best_amounts)) => {
                let (new_key, old_key) = match request.mode {
                    SwapMode::FixedInput => (amounts.last(), best_amounts.last()),
                    SwapMode::FixedOutput => (amounts.first(), best_amounts.first()),
                };
                match (new_key, old_key) {
                    (Some(new), Some(old)) => {
                        priority.is_better(new, old)
                            || (new == old && path.len() < best_path.len())
                    }
                    _ => false,
                }
            }
        };
        if improves {
            best = Some((path.clone(), amounts));
        }
    }

    tracing::debug!(
        "Exhaustive search {} -> {}: {} paths, {} dead",
        request.token_in,
        request.token_out,
        paths.len(),
        dead
    );

    match best {
        Some((path, amounts)) => Ok(RouteOutcome::Found(finalize(graph, request, path, amounts)?)),
        None => Ok(RouteOutcome::NotFound),
    }
}

// ---------------------------------------------------------------------------
// Step 3: Quoting
// ---------------------------------------------------------------------------

/// Find a route and quote it with per-hop detail and a slippage limit.
pub fn quote_route(
    pools: &[Pool],
    request: &RouteRequest,
    config: &RouterConfig,
) -> Result<Option<RouteQuote>> {
    config.validate()?;
    let graph = PoolGraph::build(pools)?;
    match route_on_graph(&graph, request, config)? {
        RouteOutcome::Found(route) => Ok(Some(make_route_quote(
            &graph,
            route,
            config.slippage_percent,
        )?)),
        RouteOutcome::NotFound => Ok(None),
    }
}

/// Create a `RouteQuote` from an assembled route with slippage applied.
///
/// The limit is the minimum output for fixed input (rounded down) and the
/// maximum input for fixed output (rounded up).
pub fn make_route_quote(
    graph: &PoolGraph,
    route: FinalRoute,
    slippage_percent: f64,
) -> Result<RouteQuote> {
    let positions = route.pool_path.len() + 1;
    if route.token_path.len() != positions || route.intermediary_amounts.len() != positions {
        tracing::error!(
            "Cannot quote route with {} pools, {} tokens and {} amounts",
            route.pool_path.len(),
            route.token_path.len(),
            route.intermediary_amounts.len()
        );
        return Err(RouterError::assembly(
            "route paths and amounts have mismatched lengths",
        ));
    }

    let mut hops = Vec::with_capacity(route.hop_count());
    for (i, pool_id) in route.pool_path.iter().enumerate() {
        let edge = graph.oriented(&route.token_path[i], pool_id)?;
        hops.push(RouteHop {
            pool_id: pool_id.clone(),
            token_in: edge.token_in.clone(),
            token_out: edge.token_out.clone(),
            amount_in: route.intermediary_amounts[i].clone(),
            amount_out: route.intermediary_amounts[i + 1].clone(),
            reserve_in: edge.reserve_in.clone(),
            reserve_out: edge.reserve_out.clone(),
            fee: *edge.fee,
        });
    }

    let reserves: Vec<(&Amount, &Amount)> = hops
        .iter()
        .map(|hop| (&hop.reserve_in, &hop.reserve_out))
        .collect();
    let price_impact_percent =
        route_price_impact_percent(&reserves, &route.input_amount, &route.output_amount);

    let limit_amount = match route.mode {
        SwapMode::FixedInput => apply_slippage_floor(&route.output_amount, slippage_percent),
        SwapMode::FixedOutput => apply_slippage_ceil(&route.input_amount, slippage_percent),
    };

    Ok(RouteQuote {
        route,
        hops,
        price_impact_percent,
        slippage_percent,
        limit_amount,
    })
}

// ---------------------------------------------------------------------------
// Step 4: Batch Routing
// ---------------------------------------------------------------------------

/// Route independent requests in parallel over one shared snapshot.
///
/// Each worker builds its own graph; results come back in request order.
pub fn find_routes_batch(
    pools: &[Pool],
    requests: &[RouteRequest],
    config: &RouterConfig,
) -> Vec<Result<RouteOutcome>> {
    tracing::debug!(
        "Routing batch of {} requests over {} pools",
        requests.len(),
        pools.len()
    );
    requests
        .par_iter()
        .map(|request| find_route(pools, request, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use router_core::FeeFraction;

    fn tokens(whole: u64) -> Amount {
        Amount::scaled(whole, 18)
    }

    fn fee(s: &str) -> FeeFraction {
        s.parse().unwrap()
    }

    fn make_pool(address: &str, a: &str, b: &str, reserve_a: u64, reserve_b: u64) -> Pool {
        Pool {
            address: PoolId::new(address),
            token_a: TokenId::new(a),
            token_b: TokenId::new(b),
            reserve_a: tokens(reserve_a),
            reserve_b: tokens(reserve_b),
            fee: fee("0.003"),
        }
    }

    fn pool_ids(ids: &[&str]) -> Vec<PoolId> {
        ids.iter().map(|id| PoolId::new(*id)).collect()
    }

    fn exhaustive() -> RouterConfig {
        RouterConfig {
            strategy: SearchStrategy::Exhaustive,
            ..RouterConfig::default()
        }
    }

    fn route(pools: &[Pool], request: &RouteRequest, config: &RouterConfig) -> FinalRoute {
        find_route(pools, request, config)
            .unwrap()
            .into_route()
            .expect("expected a route")
    }

    fn assert_consistent(pools: &[Pool], route: &FinalRoute) {
        assert_eq!(route.token_path.len(), route.pool_path.len() + 1);
        assert_eq!(route.intermediary_amounts.len(), route.pool_path.len() + 1);
        let unique: HashSet<&PoolId> = route.pool_path.iter().collect();
        assert_eq!(unique.len(), route.pool_path.len(), "pool reused");
        for (i, pool_id) in route.pool_path.iter().enumerate() {
            let pool = pools.iter().find(|p| p.address == *pool_id).unwrap();
            assert!(pool.connects(&route.token_path[i], &route.token_path[i + 1]));
        }
    }

    /// Direct X/Y plus a thinner X -> Z -> Y detour
    fn direct_vs_detour_pools() -> Vec<Pool> {
        vec![
            make_pool("direct", "X", "Y", 1_000, 1_000),
            make_pool("xz", "X", "Z", 1_000, 2_000),
            make_pool("zy", "Z", "Y", 2_000, 1_000),
        ]
    }

    /// X -> A -> B -> Y chain
    fn three_hop_chain_pools() -> Vec<Pool> {
        vec![
            make_pool("xa", "X", "A", 1_000, 1_000),
            make_pool("ab", "A", "B", 1_000, 1_000),
            make_pool("by", "B", "Y", 1_000, 1_000),
        ]
    }

    /// Two ways into M, the first one much worse
    fn lossy_entry_pools() -> Vec<Pool> {
        let mut lossy = make_pool("am", "A", "M", 3_000, 3_000);
        lossy.fee = fee("0.9");
        vec![
            make_pool("xa", "X", "A", 1_000, 3_000),
            lossy,
            make_pool("xb", "X", "B", 1_000, 1_000),
            make_pool("bm", "B", "M", 1_000, 1_000),
            make_pool("my", "M", "Y", 1_000, 1_000),
        ]
    }

    fn mesh_pools() -> Vec<Pool> {
        vec![
            make_pool("p1", "USDC", "WEGLD", 350_000, 10_000),
            make_pool("p2", "WEGLD", "MEX", 2_000, 900_000),
            make_pool("p3", "MEX", "USDC", 800_000, 30_000),
            make_pool("p4", "WEGLD", "RIDE", 5_000, 120_000),
            make_pool("p5", "RIDE", "USDC", 60_000, 90_000),
            make_pool("p6", "MEX", "RIDE", 400_000, 25_000),
            make_pool("p7", "USDC", "WEGLD", 70_000, 2_100),
        ]
    }

    // -- Routing --

    #[test]
    fn test_direct_pool_preferred() {
        let pools = direct_vs_detour_pools();
        let request =
            RouteRequest::new("X", "Y", tokens(10), SwapMode::FixedInput).with_max_hops(3);
        let found = route(&pools, &request, &RouterConfig::default());

        assert_eq!(found.pool_path, pool_ids(&["direct"]));
        assert_eq!(found.token_path, vec![TokenId::new("X"), TokenId::new("Y")]);

        let direct = amount_out(&tokens(10), &tokens(1_000), &tokens(1_000), &fee("0.003")).unwrap();
        assert_eq!(found.output_amount, direct);

        let detour = simulate_path(
            &PoolGraph::build(&pools).unwrap(),
            &TokenId::new("X"),
            &pool_ids(&["xz", "zy"]),
            &tokens(10),
            SwapMode::FixedInput,
        )
        .unwrap()
        .unwrap();
        assert!(detour[2] < direct);
    }

    #[test]
    fn test_multi_hop_required() {
        let pools = vec![
            make_pool("xz", "X", "Z", 1_000, 1_000),
            make_pool("zy", "Z", "Y", 1_000, 1_000),
        ];
        let request = RouteRequest::new("X", "Y", tokens(10), SwapMode::FixedInput);
        let found = route(&pools, &request, &RouterConfig::default());

        assert_eq!(found.pool_path, pool_ids(&["xz", "zy"]));
        assert_eq!(found.intermediary_amounts.len(), 3);

        let z = amount_out(&tokens(10), &tokens(1_000), &tokens(1_000), &fee("0.003")).unwrap();
        let y = amount_out(&z, &tokens(1_000), &tokens(1_000), &fee("0.003")).unwrap();
        assert_eq!(found.intermediary_amounts, vec![tokens(10), z, y.clone()]);
        assert_eq!(found.output_amount, y);
        assert_consistent(&pools, &found);
    }

    #[test]
    fn test_not_found_within_hops() {
        let pools = three_hop_chain_pools();
        for mode in [SwapMode::FixedInput, SwapMode::FixedOutput] {
            let request = RouteRequest::new("X", "Y", tokens(1), mode).with_max_hops(2);
            let outcome = find_route(&pools, &request, &RouterConfig::default()).unwrap();
            assert_eq!(outcome, RouteOutcome::NotFound);

            let request = request.with_max_hops(3);
            let found = route(&pools, &request, &RouterConfig::default());
            assert_eq!(found.hop_count(), 3);
        }
    }

    #[test]
    fn test_zero_liquidity_skipped() {
        let mut empty = make_pool("xy", "X", "Y", 1_000, 1_000);
        empty.reserve_b = Amount::zero();
        let pools = vec![empty];

        for mode in [SwapMode::FixedInput, SwapMode::FixedOutput] {
            let request = RouteRequest::new("X", "Y", tokens(10), mode);
            let outcome = find_route(&pools, &request, &RouterConfig::default()).unwrap();
            assert_eq!(outcome, RouteOutcome::NotFound);
            let outcome = find_route(&pools, &request, &exhaustive()).unwrap();
            assert_eq!(outcome, RouteOutcome::NotFound);
        }
    }

    #[test]
    fn test_dominated_candidate_never_expanded() {
        let pools = lossy_entry_pools();
        let graph = PoolGraph::build(&pools).unwrap();
        let result = search(
            &graph,
            &TokenId::new("X"),
            &TokenId::new("Y"),
            &tokens(10),
            SwapMode::FixedInput,
            4,
        )
        .unwrap();

        // The lossy candidate for M is evicted before it reaches the top
        assert_eq!(result.stats.pruned, 1);
        // X, A, B, M (once), Y
        assert_eq!(result.stats.popped, 5);

        let request = RouteRequest::new("X", "Y", tokens(10), SwapMode::FixedInput);
        let found = route(&pools, &request, &RouterConfig::default());
        assert_eq!(found.pool_path, pool_ids(&["xb", "bm", "my"]));
    }

    // -- Properties --

    #[test]
    fn test_search_is_idempotent() {
        let pools = mesh_pools();
        for mode in [SwapMode::FixedInput, SwapMode::FixedOutput] {
            let request = RouteRequest::new("USDC", "MEX", tokens(500), mode);
            let first = find_route(&pools, &request, &RouterConfig::default()).unwrap();
            let second = find_route(&pools, &request, &RouterConfig::default()).unwrap();
            assert!(first.is_found());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_equal_parallel_pools_first_listed_wins() {
        let pools = vec![
            make_pool("first", "X", "Y", 1_000, 1_000),
            make_pool("second", "Y", "X", 1_000, 1_000),
        ];
        let request = RouteRequest::new("X", "Y", tokens(10), SwapMode::FixedInput);
        assert_eq!(
            route(&pools, &request, &RouterConfig::default()).pool_path,
            pool_ids(&["first"])
        );

        let swapped: Vec<Pool> = pools.iter().rev().cloned().collect();
        assert_eq!(
            route(&swapped, &request, &RouterConfig::default()).pool_path,
            pool_ids(&["second"])
        );
    }

    #[test]
    fn test_routes_have_no_cycles_and_consistent_tokens() {
        let pools = mesh_pools();
        let tokens_list = ["USDC", "WEGLD", "MEX", "RIDE"];
        for from in tokens_list {
            for to in tokens_list {
                if from == to {
                    continue;
                }
                for mode in [SwapMode::FixedInput, SwapMode::FixedOutput] {
                    let request = RouteRequest::new(from, to, tokens(3), mode);
                    let found = route(&pools, &request, &RouterConfig::default());
                    assert_consistent(&pools, &found);
                }
            }
        }
    }

    #[test]
    fn test_fixed_output_replay_delivers_request() {
        let pools = mesh_pools();
        let graph = PoolGraph::build(&pools).unwrap();
        let request = RouteRequest::new("USDC", "RIDE", tokens(1_000), SwapMode::FixedOutput);
        let found = route(&pools, &request, &RouterConfig::default());

        assert_eq!(found.output_amount, tokens(1_000));
        let replayed = simulate_path(
            &graph,
            &request.token_in,
            &found.pool_path,
            &found.input_amount,
            SwapMode::FixedInput,
        )
        .unwrap()
        .unwrap();
        assert!(*replayed.last().unwrap() >= tokens(1_000));
    }

    #[test]
    fn test_fixed_output_beyond_reserves_not_found() {
        let pools = vec![make_pool("xy", "X", "Y", 1_000, 1_000)];
        let request = RouteRequest::new("X", "Y", tokens(1_000), SwapMode::FixedOutput);
        let outcome = find_route(&pools, &request, &RouterConfig::default()).unwrap();
        assert_eq!(outcome, RouteOutcome::NotFound);
    }

    #[test]
    fn test_unknown_token_not_found() {
        let pools = direct_vs_detour_pools();
        let request = RouteRequest::new("X", "NOPE", tokens(1), SwapMode::FixedInput);
        let outcome = find_route(&pools, &request, &RouterConfig::default()).unwrap();
        assert_eq!(outcome, RouteOutcome::NotFound);
    }

    #[test]
    fn test_invalid_requests_rejected() {
        let pools = direct_vs_detour_pools();
        let config = RouterConfig::default();

        let same = RouteRequest::new("X", "X", tokens(1), SwapMode::FixedInput);
        let zero = RouteRequest::new("X", "Y", Amount::zero(), SwapMode::FixedInput);
        let no_hops = RouteRequest::new("X", "Y", tokens(1), SwapMode::FixedOutput).with_max_hops(0);

        for request in [same, zero, no_hops] {
            let err = find_route(&pools, &request, &config).unwrap_err();
            assert_eq!(err.error_code(), "invalid_route_request");
        }
    }

    #[test]
    fn test_route_on_graph_validates_request() {
        let graph = PoolGraph::build(&[make_pool("xy", "X", "Y", 1_000, 1_000)]).unwrap();
        let same = RouteRequest::new("X", "X", tokens(1), SwapMode::FixedInput);
        let zero = RouteRequest::new("X", "Y", Amount::zero(), SwapMode::FixedOutput);

        for config in [RouterConfig::default(), exhaustive()] {
            for request in [&same, &zero] {
                let err = route_on_graph(&graph, request, &config).unwrap_err();
                assert_eq!(err.error_code(), "invalid_route_request");
            }
        }
    }

    #[test]
    fn test_bad_snapshot_surfaces_error() {
        let mut pools = direct_vs_detour_pools();
        pools.push(make_pool("xz", "X", "Y", 5, 5));
        let request = RouteRequest::new("X", "Y", tokens(1), SwapMode::FixedInput);
        let err = find_route(&pools, &request, &RouterConfig::default()).unwrap_err();
        assert_eq!(err.error_code(), "duplicate_pool_reference");
    }

    // -- Exhaustive strategy --

    #[test]
    fn test_find_paths_enumerates_simple_paths() {
        let graph = PoolGraph::build(&direct_vs_detour_pools()).unwrap();
        let paths = find_paths(&graph, &TokenId::new("X"), &TokenId::new("Y"), 3, 100);
        assert_eq!(paths, vec![pool_ids(&["direct"]), pool_ids(&["xz", "zy"])]);

        let one_hop = find_paths(&graph, &TokenId::new("X"), &TokenId::new("Y"), 1, 100);
        assert_eq!(one_hop, vec![pool_ids(&["direct"])]);
    }

    #[test]
    fn test_find_paths_respects_limit() {
        let graph = PoolGraph::build(&mesh_pools()).unwrap();
        let paths = find_paths(&graph, &TokenId::new("USDC"), &TokenId::new("MEX"), 4, 2);
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_exhaustive_agrees_with_best_first() {
        let cases: Vec<(Vec<Pool>, &str, &str)> = vec![
            (direct_vs_detour_pools(), "X", "Y"),
            (three_hop_chain_pools(), "X", "Y"),
            (lossy_entry_pools(), "X", "Y"),
            (
                vec![
                    make_pool("xz", "X", "Z", 1_000, 1_000),
                    make_pool("zy", "Z", "Y", 1_000, 1_000),
                ],
                "X",
                "Y",
            ),
        ];
        for (pools, from, to) in cases {
            for mode in [SwapMode::FixedInput, SwapMode::FixedOutput] {
                let request = RouteRequest::new(from, to, tokens(2), mode);
                let heuristic = find_route(&pools, &request, &RouterConfig::default()).unwrap();
                let full = find_route(&pools, &request, &exhaustive()).unwrap();
                assert_eq!(heuristic, full, "{} -> {} {:?}", from, to, mode);
            }
        }
    }

    #[test]
    fn test_exhaustive_ties_go_to_enumeration_order() {
        let pools = vec![
            make_pool("first", "X", "Y", 1_000, 1_000),
            make_pool("second", "X", "Y", 1_000, 1_000),
        ];
        let graph = PoolGraph::build(&pools).unwrap();
        let request = RouteRequest::new("X", "Y", tokens(1), SwapMode::FixedInput);

        let outcome = exhaustive_route(&graph, &request, 10).unwrap();
        assert_eq!(outcome.route().unwrap().pool_path, pool_ids(&["first"]));
    }

    #[test]
    fn test_exhaustive_honours_hop_limit() {
        let request = RouteRequest::new("X", "Y", tokens(1), SwapMode::FixedInput).with_max_hops(2);
        let outcome = find_route(&three_hop_chain_pools(), &request, &exhaustive()).unwrap();
        assert_eq!(outcome, RouteOutcome::NotFound);
    }

    // -- Quoting --

    #[test]
    fn test_quote_fixed_input_limit() {
        let pools = direct_vs_detour_pools();
        let request = RouteRequest::new("X", "Y", tokens(10), SwapMode::FixedInput);
        let config = RouterConfig {
            slippage_percent: 0.5,
            ..RouterConfig::default()
        };
        let quote = quote_route(&pools, &request, &config).unwrap().unwrap();

        assert_eq!(quote.hops.len(), 1);
        assert_eq!(quote.hops[0].reserve_in, tokens(1_000));
        assert_eq!(quote.hops[0].amount_out, quote.route.output_amount);
        assert_eq!(
            quote.limit_amount,
            apply_slippage_floor(&quote.route.output_amount, 0.5)
        );
        assert!(quote.limit_amount < quote.route.output_amount);
        assert!(quote.price_impact_percent > 0.0 && quote.price_impact_percent < 5.0);
    }

    #[test]
    fn test_quote_fixed_output_limit() {
        let pools = vec![
            make_pool("xz", "X", "Z", 1_000, 1_000),
            make_pool("zy", "Z", "Y", 1_000, 1_000),
        ];
        let request = RouteRequest::new("X", "Y", tokens(10), SwapMode::FixedOutput);
        let quote = quote_route(&pools, &request, &RouterConfig::default())
            .unwrap()
            .unwrap();

        assert_eq!(quote.hops.len(), 2);
        assert_eq!(quote.hops[0].token_in, TokenId::new("X"));
        assert_eq!(quote.hops[1].token_out, TokenId::new("Y"));
        assert_eq!(quote.hops[0].amount_out, quote.hops[1].amount_in);
        assert!(quote.limit_amount > quote.route.input_amount);
    }

    #[test]
    fn test_quote_rejects_mismatched_route() {
        let pools = direct_vs_detour_pools();
        let graph = PoolGraph::build(&pools).unwrap();
        let request = RouteRequest::new("X", "Y", tokens(10), SwapMode::FixedInput);
        let mut found = route(&pools, &request, &RouterConfig::default());
        found.intermediary_amounts.pop();

        let err = make_route_quote(&graph, found, 1.0).unwrap_err();
        assert_eq!(err.error_code(), "route_assembly_invariant_violation");
    }

    #[test]
    fn test_quote_not_found() {
        let request = RouteRequest::new("X", "Y", tokens(1), SwapMode::FixedInput);
        let quote = quote_route(
            &three_hop_chain_pools(),
            &request.with_max_hops(1),
            &RouterConfig::default(),
        )
        .unwrap();
        assert!(quote.is_none());
    }

    // -- Batch --

    #[test]
    fn test_batch_matches_sequential() {
        let pools = mesh_pools();
        let mut requests = Vec::new();
        for whole in [1u64, 10, 100, 1_000, 5_000] {
            requests.push(RouteRequest::new("USDC", "MEX", tokens(whole), SwapMode::FixedInput));
            requests.push(RouteRequest::new("MEX", "RIDE", tokens(whole), SwapMode::FixedOutput));
        }
        requests.push(RouteRequest::new("USDC", "USDC", tokens(1), SwapMode::FixedInput));

        let config = RouterConfig::default();
        let batch = find_routes_batch(&pools, &requests, &config);
        assert_eq!(batch.len(), requests.len());
        for (request, result) in requests.iter().zip(batch) {
            assert_eq!(result, find_route(&pools, request, &config));
        }
    }
}
