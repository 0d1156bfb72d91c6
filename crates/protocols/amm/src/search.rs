//! Path Search
//!
//! Best-first expansion of the pool graph. Fixed-input searches run forward
//! from `token_in`, carrying the output each hop would produce. Fixed-output
//! searches run backward from `token_out`, carrying the input each hop would
//! require. Each relaxed edge goes through `RouteQueue::eager_push`, so the
//! queue holds at most one live candidate per frontier token.
//!
//! This is not Dijkstra: AMM edge costs depend on the carried amount, so
//! domination pruning is a heuristic that trades a formal optimality
//! guarantee for bounded work on dense pool graphs.

use std::collections::HashMap;

use router_core::{Amount, Result, TokenId};

use crate::calculator::{amount_in, amount_out};
use crate::graph::PoolGraph;
use crate::queue::{RouteCandidate, RouteQueue};
use crate::state::SwapMode;

/// Counters collected during one search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidates taken off the queue
    pub popped: usize,
    /// Candidates accepted by `eager_push`
    pub pushed: usize,
    /// Candidates dropped because a queued one was at least as good
    pub rejected: usize,
    /// Queued candidates evicted by a better one
    pub pruned: usize,
    /// Candidates not expanded because they reached the hop limit
    pub discarded_by_hops: usize,
    /// Edges skipped for empty reserves, insufficient liquidity, or a zero amount
    pub dead_edges: usize,
}

/// Terminal state of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Winning candidate, in traversal orientation
    Found(RouteCandidate),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

/// Run the best-first search for one request.
///
/// The caller validates the request first. Per-edge numeric failures become
/// dead branches; only an inconsistent graph aborts the search.
pub fn search(
    graph: &PoolGraph,
    token_in: &TokenId,
    token_out: &TokenId,
    amount: &Amount,
    mode: SwapMode,
    max_hops: u8,
) -> Result<SearchResult> {
    let (origin, target) = match mode {
        SwapMode::FixedInput => (token_in, token_out),
        SwapMode::FixedOutput => (token_out, token_in),
    };
    let priority = mode.priority();
    let max_hops = max_hops as usize;

    let mut queue = RouteQueue::new(priority);
    let mut best_seen: HashMap<TokenId, Amount> = HashMap::new();
    let mut stats = SearchStats::default();

    queue.push(RouteCandidate::origin(origin.clone(), amount.clone()));
    best_seen.insert(origin.clone(), amount.clone());

    while let Some(current) = queue.pop() {
        stats.popped += 1;

        if current.frontier_token == *target {
            stats.pruned = queue.pruned();
            tracing::debug!(
                "Route {} -> {} found with {} hops ({:?})",
                token_in,
                token_out,
                current.hops(),
                stats
            );
            return Ok(SearchResult {
                outcome: SearchOutcome::Found(current),
                stats,
            });
        }

        if current.hops() >= max_hops {
            stats.discarded_by_hops += 1;
            continue;
        }

        for (neighbor, pool_id) in graph.neighbors(&current.frontier_token) {
            if current.uses_pool(pool_id) {
                continue;
            }

            // Backward search walks edges against the trade direction
            let trade_from = match mode {
                SwapMode::FixedInput => &current.frontier_token,
                SwapMode::FixedOutput => neighbor,
            };
            let edge = match graph.oriented(trade_from, pool_id) {
                Ok(edge) => edge,
                Err(e) => {
                    tracing::warn!(
                        "Pool {} cannot be oriented from {} during search: {}",
                        pool_id,
                        trade_from,
                        e
                    );
                    return Err(e);
                }
            };
            let relaxed = match mode {
                SwapMode::FixedInput => amount_out(
                    &current.carried_amount,
                    edge.reserve_in,
                    edge.reserve_out,
                    edge.fee,
                ),
                SwapMode::FixedOutput => amount_in(
                    &current.carried_amount,
                    edge.reserve_in,
                    edge.reserve_out,
                    edge.fee,
                ),
            };

            let next_amount = match relaxed {
                Ok(a) if !a.is_zero() => a,
                Ok(_) => {
                    tracing::trace!("Pool {} yields nothing, skipping", pool_id);
                    stats.dead_edges += 1;
                    continue;
                }
                Err(e) => {
                    let err = e.for_pool(pool_id);
                    if !err.is_edge_local() {
                        return Err(err);
                    }
                    tracing::trace!("Dead edge: {}", err);
                    stats.dead_edges += 1;
                    continue;
                }
            };

            let candidate_amount = next_amount.clone();
            let next = current.extend(neighbor.clone(), pool_id.clone(), next_amount);
            if queue.eager_push(next, best_seen.get(neighbor)) {
                stats.pushed += 1;
                let improves = best_seen
                    .get(neighbor)
                    .map_or(true, |best| priority.is_better(&candidate_amount, best));
                if improves {
                    best_seen.insert(neighbor.clone(), candidate_amount);
                }
            } else {
                tracing::trace!("Candidate via {} to {} dominated", pool_id, neighbor);
                stats.rejected += 1;
            }
        }
    }

    stats.pruned = queue.pruned();
    tracing::debug!(
        "No route {} -> {} within {} hops ({:?})",
        token_in,
        token_out,
        max_hops,
        stats
    );
    Ok(SearchResult {
        outcome: SearchOutcome::NotFound,
        stats,
    })
}
