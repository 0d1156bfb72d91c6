//! Error types for the auto-router

use thiserror::Error;

/// Errors raised while validating a request, reading a pool snapshot,
/// simulating a swap, or assembling a route.
///
/// "No route" is not an error: it is reported as a normal outcome by the
/// router so callers can tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("Invalid route request: {reason}")]
    InvalidRouteRequest { reason: String },

    #[error("Invalid state for pool {pool}: {reason}")]
    InvalidPoolState { pool: String, reason: String },

    #[error("Token {token} is not traded by pool {pool}")]
    InconsistentPoolOrientation { pool: String, token: String },

    #[error("Pool {pool} supplied twice with different token pairs")]
    DuplicatePoolReference { pool: String },

    #[error("Insufficient liquidity in pool {pool}")]
    InsufficientLiquidity { pool: String },

    #[error("Route assembly invariant violated: {reason}")]
    RouteAssemblyInvariantViolation { reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors parsing amounts and fee fractions from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("Invalid amount '{0}': expected an unsigned integer")]
    InvalidAmount(String),

    #[error("Invalid fee '{value}': {reason}")]
    InvalidFee { value: String, reason: String },
}

/// Result type alias for router operations
pub type Result<T> = std::result::Result<T, RouterError>;

impl RouterError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRouteRequest {
            reason: reason.into(),
        }
    }

    pub fn invalid_pool(pool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPoolState {
            pool: pool.into(),
            reason: reason.into(),
        }
    }

    pub fn assembly(reason: impl Into<String>) -> Self {
        Self::RouteAssemblyInvariantViolation {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRouteRequest { .. } => "invalid_route_request",
            Self::InvalidPoolState { .. } => "invalid_pool_state",
            Self::InconsistentPoolOrientation { .. } => "inconsistent_pool_orientation",
            Self::DuplicatePoolReference { .. } => "duplicate_pool_reference",
            Self::InsufficientLiquidity { .. } => "insufficient_liquidity",
            Self::RouteAssemblyInvariantViolation { .. } => "route_assembly_invariant_violation",
            Self::Config(_) => "config",
        }
    }

    /// Whether this error can come from simulating a single pool edge.
    ///
    /// The search absorbs these as dead branches instead of failing the call.
    pub fn is_edge_local(&self) -> bool {
        matches!(
            self,
            Self::InsufficientLiquidity { .. } | Self::InvalidPoolState { .. }
        )
    }

    /// Whether this error indicates a defect in the router itself
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::RouteAssemblyInvariantViolation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = RouterError::invalid_request("same token");
        assert_eq!(err.error_code(), "invalid_route_request");
        assert!(!err.is_edge_local());

        let err = RouterError::InsufficientLiquidity {
            pool: "erd1pool".into(),
        };
        assert_eq!(err.error_code(), "insufficient_liquidity");
        assert!(err.is_edge_local());
    }

    #[test]
    fn test_internal_errors() {
        assert!(RouterError::assembly("length mismatch").is_internal());
        assert!(!RouterError::Config("bad".into()).is_internal());
    }

    #[test]
    fn test_error_display() {
        let err = RouterError::InconsistentPoolOrientation {
            pool: "erd1pool".into(),
            token: "MEX-455c57".into(),
        };
        assert_eq!(
            err.to_string(),
            "Token MEX-455c57 is not traded by pool erd1pool"
        );
    }
}
