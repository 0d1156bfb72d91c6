//! Pool Graph
//!
//! Adjacency list over tokens built once per routing request from an
//! immutable pool snapshot. Each pool contributes two directed entries
//! (A -> B and B -> A); parallel pools between the same pair stay separate
//! edges.

use std::collections::HashMap;

use router_core::{Amount, FeeFraction, PoolId, Result, RouterError, TokenId};

use crate::state::Pool;

/// A pool seen from one traversal direction
#[derive(Debug, Clone, Copy)]
pub struct OrientedPool<'a> {
    pub pool_id: &'a PoolId,
    pub token_in: &'a TokenId,
    pub token_out: &'a TokenId,
    pub reserve_in: &'a Amount,
    pub reserve_out: &'a Amount,
    pub fee: &'a FeeFraction,
}

/// Adjacency-list pool graph
#[derive(Debug, Clone, Default)]
pub struct PoolGraph {
    adjacency: HashMap<TokenId, Vec<(TokenId, PoolId)>>,
    pools: HashMap<PoolId, Pool>,
}

impl PoolGraph {
    /// Build the graph from a pool snapshot.
    ///
    /// A pool id repeated with the same token pair is ignored after its first
    /// occurrence. A pool id repeated with a different pair fails with
    /// `DuplicatePoolReference`; a pool trading a token against itself fails
    /// with `InvalidPoolState`. Empty reserves are accepted and surface as
    /// dead edges during the search.
    pub fn build(pools: &[Pool]) -> Result<Self> {
        let mut adjacency: HashMap<TokenId, Vec<(TokenId, PoolId)>> = HashMap::new();
        let mut by_id: HashMap<PoolId, Pool> = HashMap::with_capacity(pools.len());

        for pool in pools {
            if pool.token_a == pool.token_b {
                tracing::warn!("Pool {} trades {} against itself", pool.address, pool.token_a);
                return Err(RouterError::invalid_pool(
                    pool.address.as_str(),
                    format!("both sides are {}", pool.token_a),
                ));
            }

            if let Some(existing) = by_id.get(&pool.address) {
                if existing.connects(&pool.token_a, &pool.token_b) {
                    tracing::warn!("Pool {} listed twice in snapshot, keeping first", pool.address);
                    continue;
                }
                tracing::warn!(
                    "Pool {} listed as {}/{} and {}/{}",
                    pool.address,
                    existing.token_a,
                    existing.token_b,
                    pool.token_a,
                    pool.token_b
                );
                return Err(RouterError::DuplicatePoolReference {
                    pool: pool.address.to_string(),
                });
            }

            if pool.reserve_a.is_zero() || pool.reserve_b.is_zero() {
                tracing::debug!("Pool {} has an empty reserve", pool.address);
            }

            adjacency
                .entry(pool.token_a.clone())
                .or_default()
                .push((pool.token_b.clone(), pool.address.clone()));
            adjacency
                .entry(pool.token_b.clone())
                .or_default()
                .push((pool.token_a.clone(), pool.address.clone()));

            by_id.insert(pool.address.clone(), pool.clone());
        }

        tracing::debug!(
            "Built pool graph: {} pools, {} tokens",
            by_id.len(),
            adjacency.len()
        );

        Ok(Self {
            adjacency,
            pools: by_id,
        })
    }

    /// Directly reachable tokens and the pools connecting them.
    ///
    /// Unknown tokens have no neighbors.
    pub fn neighbors(&self, token: &TokenId) -> &[(TokenId, PoolId)] {
        self.adjacency
            .get(token)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resolve reserves relative to a swap entering the pool with `from`.
    pub fn oriented(&self, from: &TokenId, pool_id: &PoolId) -> Result<OrientedPool<'_>> {
        let inconsistent = || RouterError::InconsistentPoolOrientation {
            pool: pool_id.to_string(),
            token: from.to_string(),
        };
        let pool = self.pools.get(pool_id).ok_or_else(inconsistent)?;

        if *from == pool.token_a {
            Ok(OrientedPool {
                pool_id: &pool.address,
                token_in: &pool.token_a,
                token_out: &pool.token_b,
                reserve_in: &pool.reserve_a,
                reserve_out: &pool.reserve_b,
                fee: &pool.fee,
            })
        } else if *from == pool.token_b {
            Ok(OrientedPool {
                pool_id: &pool.address,
                token_in: &pool.token_b,
                token_out: &pool.token_a,
                reserve_in: &pool.reserve_b,
                reserve_out: &pool.reserve_a,
                fee: &pool.fee,
            })
        } else {
            Err(inconsistent())
        }
    }

    pub fn pool(&self, pool_id: &PoolId) -> Option<&Pool> {
        self.pools.get(pool_id)
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    pub fn token_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn contains_token(&self, token: &TokenId) -> bool {
        self.adjacency.contains_key(token)
    }
}
