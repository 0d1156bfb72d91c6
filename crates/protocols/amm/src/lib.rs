//! Constant-Product AMM Auto-Router
//!
//! This crate finds the best multi-hop swap path across constant-product
//! liquidity pools for a fixed input or a fixed output amount.

pub mod assembler;
pub mod calculator;
pub mod graph;
pub mod queue;
pub mod router;
pub mod search;
pub mod state;

// Re-exports
pub use assembler::{assemble, finalize, validate_route};
pub use calculator::{
    amount_in, amount_out, apply_slippage_ceil, apply_slippage_floor, route_price_impact_percent,
    SwapMathError,
};
pub use graph::{OrientedPool, PoolGraph};
pub use queue::{PriorityMode, RouteCandidate, RouteQueue};
pub use router::{
    find_paths, find_route, find_routes_batch, make_route_quote, quote_route, route_on_graph,
    simulate_path,
};
pub use search::{search, SearchOutcome, SearchResult, SearchStats};
pub use state::{FinalRoute, Pool, RouteHop, RouteOutcome, RouteQuote, RouteRequest, SwapMode};
