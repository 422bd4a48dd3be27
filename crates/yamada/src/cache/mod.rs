//! Memoization cache keyed by canonical forms.
//!
//! Purpose
//! - Share invariants between isomorphic sub-diagrams of one recursion (and across
//!   calls on the same evaluator).
//!
//! Why this design
//! - Least-frequently-used eviction: small sub-diagrams recur constantly across
//!   branches while large ones rarely repeat. Ties go to the oldest entry.
//! - Keys above `max_key_size` arcs are never stored.
//! - No global instance: each evaluator owns (or shares through an `Arc`) its cache.
//!
//! Layout
//! - `memo.rs` (single-threaded `MemoCache`), `shared.rs` (`SharedCache` for parallel
//!   evaluation). Both report through `CacheStats`.

mod memo;
mod shared;

pub use memo::MemoCache;
pub use shared::SharedCache;

use std::collections::BTreeMap;
use std::hash::Hash;

use serde::Serialize;

use crate::canon::CanonicalForm;

/// Entry bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capacity {
    Unbounded,
    Bounded(usize),
}

/// Cache configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheCfg {
    pub capacity: Capacity,
    /// Keys with more arcs than this are not cached.
    pub max_key_size: usize,
}

impl Default for CacheCfg {
    fn default() -> Self {
        Self {
            capacity: Capacity::Bounded(1 << 16),
            max_key_size: 64,
        }
    }
}

impl CacheCfg {
    pub fn unbounded() -> Self {
        Self {
            capacity: Capacity::Unbounded,
            max_key_size: usize::MAX,
        }
    }
}

/// Something the cache can store values under.
pub trait CacheKey: Clone + Eq + Hash + Send + Sync + 'static {
    /// Compared against `CacheCfg::max_key_size`.
    fn key_size(&self) -> usize;
}

impl CacheKey for CanonicalForm {
    fn key_size(&self) -> usize {
        self.arc_count()
    }
}

/// Snapshot of cache counters for external reporting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    /// `None` when unbounded.
    pub capacity: Option<usize>,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    /// `put` calls refused (key too large or zero capacity).
    pub rejected: u64,
    /// Computations started while another worker held the same key.
    pub duplicates: u64,
    /// Key size -> number of stored entries.
    pub key_sizes: BTreeMap<usize, usize>,
    /// Usage count -> number of stored entries.
    pub usage: BTreeMap<u64, usize>,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
