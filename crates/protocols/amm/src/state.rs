//! AMM Router State Types
//!
//! Data structures for pools, routing requests, and assembled routes.

use std::fmt;

use serde::{Deserialize, Serialize};

use router_core::{Amount, FeeFraction, PoolId, RouterError, TokenId, DEFAULT_MAX_HOPS};

use crate::queue::PriorityMode;

/// Constant-product pool snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Pool address (unique identifier)
    pub address: PoolId,
    pub token_a: TokenId,
    pub token_b: TokenId,
    pub reserve_a: Amount,
    pub reserve_b: Amount,
    /// Fraction of the input taken as fee (e.g. "0.003")
    pub fee: FeeFraction,
}

impl Pool {
    /// The token on the other side of the pool, if `token` is traded here
    pub fn other_token(&self, token: &TokenId) -> Option<&TokenId> {
        if *token == self.token_a {
            Some(&self.token_b)
        } else if *token == self.token_b {
            Some(&self.token_a)
        } else {
            None
        }
    }

    /// Whether this pool trades exactly the given pair (either order)
    pub fn connects(&self, x: &TokenId, y: &TokenId) -> bool {
        (self.token_a == *x && self.token_b == *y) || (self.token_a == *y && self.token_b == *x)
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pool {} | {}: {} | {}: {} | fee {}",
            self.address, self.token_a, self.reserve_a, self.token_b, self.reserve_b, self.fee
        )
    }
}

/// Which side of the swap is fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapMode {
    /// Input amount is fixed, output is maximized
    FixedInput,
    /// Output amount is fixed, input is minimized
    FixedOutput,
}

impl SwapMode {
    /// Queue ordering used by the search for this mode
    pub fn priority(&self) -> PriorityMode {
        match self {
            Self::FixedInput => PriorityMode::MaxOutput,
            Self::FixedOutput => PriorityMode::MinInput,
        }
    }
}

fn default_max_hops() -> u8 {
    DEFAULT_MAX_HOPS
}

/// Swap routing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub token_in: TokenId,
    pub token_out: TokenId,
    /// Input amount for fixed input, output amount for fixed output
    pub amount: Amount,
    pub mode: SwapMode,
    #[serde(default = "default_max_hops")]
    pub max_hops: u8,
}

impl RouteRequest {
    pub fn new(
        token_in: impl Into<TokenId>,
        token_out: impl Into<TokenId>,
        amount: Amount,
        mode: SwapMode,
    ) -> Self {
        Self {
            token_in: token_in.into(),
            token_out: token_out.into(),
            amount,
            mode,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    pub fn with_max_hops(mut self, max_hops: u8) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Reject requests that cannot describe a swap
    pub fn validate(&self) -> Result<(), RouterError> {
        if self.token_in == self.token_out {
            return Err(RouterError::invalid_request(format!(
                "token_in and token_out are both {}",
                self.token_in
            )));
        }
        if self.amount.is_zero() {
            return Err(RouterError::invalid_request("amount must be positive"));
        }
        if self.max_hops == 0 {
            return Err(RouterError::invalid_request("max_hops must be at least 1"));
        }
        Ok(())
    }
}

/// Assembled route handed to the transaction builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRoute {
    pub mode: SwapMode,
    /// Tokens from input to output, one more than pools
    pub token_path: Vec<TokenId>,
    /// Pools in execution order
    pub pool_path: Vec<PoolId>,
    /// Amount entering each token position, input first, output last
    pub intermediary_amounts: Vec<Amount>,
    pub input_amount: Amount,
    pub output_amount: Amount,
}

impl FinalRoute {
    pub fn hop_count(&self) -> usize {
        self.pool_path.len()
    }
}

/// Result of a routing call that did not fail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "route", rename_all = "snake_case")]
pub enum RouteOutcome {
    Found(FinalRoute),
    /// No path within the hop limit
    NotFound,
}

impl RouteOutcome {
    pub fn route(&self) -> Option<&FinalRoute> {
        match self {
            Self::Found(route) => Some(route),
            Self::NotFound => None,
        }
    }

    pub fn into_route(self) -> Option<FinalRoute> {
        match self {
            Self::Found(route) => Some(route),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// A single hop in a quoted route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteHop {
    pub pool_id: PoolId,
    pub token_in: TokenId,
    pub token_out: TokenId,
    pub amount_in: Amount,
    pub amount_out: Amount,
    pub reserve_in: Amount,
    pub reserve_out: Amount,
    pub fee: FeeFraction,
}

/// Quoted route with slippage-protected limit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteQuote {
    pub route: FinalRoute,
    pub hops: Vec<RouteHop>,
    /// End-to-end price impact (display only)
    pub price_impact_percent: f64,
    pub slippage_percent: f64,
    /// Minimum output (fixed input) or maximum input (fixed output)
    pub limit_amount: Amount,
}
