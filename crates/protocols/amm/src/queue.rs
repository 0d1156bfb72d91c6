//! Route Priority Queue
//!
//! Array-backed binary heap of partial routes keyed by carried amount.
//! `MaxOutput` pops the largest carried amount first, `MinInput` the
//! smallest. Equal amounts pop in insertion order so repeated searches over
//! the same snapshot pick the same route.
//!
//! `eager_push` keeps at most one live candidate per frontier token: a new
//! candidate evicts strictly worse queued candidates for its token and is
//! dropped when a queued one is at least as good.

use serde::{Deserialize, Serialize};

use router_core::{Amount, PoolId, TokenId};

/// Queue ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityMode {
    /// Smallest carried amount first (fixed output, minimizing input)
    MinInput,
    /// Largest carried amount first (fixed input, maximizing output)
    MaxOutput,
}

impl PriorityMode {
    /// Whether `a` is strictly better than `b`
    pub fn is_better(&self, a: &Amount, b: &Amount) -> bool {
        match self {
            Self::MaxOutput => a > b,
            Self::MinInput => a < b,
        }
    }
}

/// Partial route from the search origin to `frontier_token`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCandidate {
    pub frontier_token: TokenId,
    pub carried_amount: Amount,
    /// Pools in traversal order
    pub path_so_far: Vec<PoolId>,
    /// Carried amount at each token position, origin first
    pub amounts_so_far: Vec<Amount>,
    seq: u64,
}

impl RouteCandidate {
    /// Candidate sitting on the search origin
    pub fn origin(token: TokenId, amount: Amount) -> Self {
        Self {
            frontier_token: token,
            carried_amount: amount.clone(),
            path_so_far: Vec::new(),
            amounts_so_far: vec![amount],
            seq: 0,
        }
    }

    /// Extend this candidate across one more pool
    pub fn extend(&self, next_token: TokenId, pool_id: PoolId, amount: Amount) -> Self {
        let mut path_so_far = Vec::with_capacity(self.path_so_far.len() + 1);
        path_so_far.extend_from_slice(&self.path_so_far);
        path_so_far.push(pool_id);

        let mut amounts_so_far = Vec::with_capacity(self.amounts_so_far.len() + 1);
        amounts_so_far.extend_from_slice(&self.amounts_so_far);
        amounts_so_far.push(amount.clone());

        Self {
            frontier_token: next_token,
            carried_amount: amount,
            path_so_far,
            amounts_so_far,
            seq: 0,
        }
    }

    pub fn hops(&self) -> usize {
        self.path_so_far.len()
    }

    pub fn uses_pool(&self, pool_id: &PoolId) -> bool {
        self.path_so_far.contains(pool_id)
    }
}

/// Binary heap of route candidates
#[derive(Debug, Clone)]
pub struct RouteQueue {
    mode: PriorityMode,
    heap: Vec<RouteCandidate>,
    next_seq: u64,
    pruned: usize,
}

impl RouteQueue {
    pub fn new(mode: PriorityMode) -> Self {
        Self {
            mode,
            heap: Vec::new(),
            next_seq: 0,
            pruned: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Queued candidates evicted by a better one so far
    pub fn pruned(&self) -> usize {
        self.pruned
    }

    /// Standard heap insert
    pub fn push(&mut self, mut item: RouteCandidate) {
        item.seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(item);
        let last = self.heap.len() - 1;
        self.swim(last);
    }

    /// Remove and return the highest-priority candidate
    pub fn pop(&mut self) -> Option<RouteCandidate> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let top = self.heap.pop();
        if !self.heap.is_empty() {
            self.sink(0);
        }
        top
    }

    /// Insert `item` unless a queued candidate for the same frontier token is
    /// at least as good. Strictly worse queued candidates for that token are
    /// removed.
    ///
    /// `current_best` is the best amount recorded for the token so far;
    /// `None` marks a first visit and skips the scan.
    pub fn eager_push(&mut self, item: RouteCandidate, current_best: Option<&Amount>) -> bool {
        if current_best.is_none() {
            self.push(item);
            return true;
        }

        let mut dominated: Vec<u64> = Vec::new();
        let mut rejected = false;
        for queued in self.heap.iter().rev() {
            if queued.frontier_token != item.frontier_token {
                continue;
            }
            if self
                .mode
                .is_better(&item.carried_amount, &queued.carried_amount)
            {
                dominated.push(queued.seq);
            } else {
                rejected = true;
                break;
            }
        }

        if !dominated.is_empty() {
            self.pruned += dominated.len();
            self.heap.retain(|c| !dominated.contains(&c.seq));
            self.heapify();
        }

        if rejected {
            return false;
        }
        self.push(item);
        true
    }

    /// `a` should pop before `b`
    fn higher_priority(&self, a: usize, b: usize) -> bool {
        let (a, b) = (&self.heap[a], &self.heap[b]);
        if self.mode.is_better(&a.carried_amount, &b.carried_amount) {
            return true;
        }
        a.carried_amount == b.carried_amount && a.seq < b.seq
    }

    fn swim(&mut self, mut k: usize) {
        while k > 0 {
            let parent = (k - 1) / 2;
            if !self.higher_priority(k, parent) {
                break;
            }
            self.heap.swap(k, parent);
            k = parent;
        }
    }

    fn sink(&mut self, mut k: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * k + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let child = if right < n && self.higher_priority(right, left) {
                right
            } else {
                left
            };
            if !self.higher_priority(child, k) {
                break;
            }
            self.heap.swap(k, child);
            k = child;
        }
    }

    fn heapify(&mut self) {
        for k in (0..self.heap.len() / 2).rev() {
            self.sink(k);
        }
    }
}
