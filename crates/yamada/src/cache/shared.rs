//! Mutex-guarded cache with in-flight key tracking for parallel evaluation.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use super::{CacheCfg, CacheKey, CacheStats, MemoCache};

/// Thread-safe wrapper around `MemoCache`.
///
/// A worker computing a key claims it first. A second worker asking for a claimed key
/// does not wait: inside a work-stealing pool the claimant may be suspended below it on
/// the same thread. It computes the value itself and the duplicate is counted, so
/// duplicated work per key is bounded by the number of workers.
#[derive(Debug)]
pub struct SharedCache<K, V> {
    inner: Mutex<MemoCache<K, V>>,
    in_flight: Mutex<HashSet<K>>,
    duplicates: AtomicU64,
}

impl<K: CacheKey, V: Clone> SharedCache<K, V> {
    pub fn new(cfg: CacheCfg) -> Self {
        Self {
            inner: Mutex::new(MemoCache::new(cfg)),
            in_flight: Mutex::new(HashSet::new()),
            duplicates: AtomicU64::new(0),
        }
    }

    // A panic while holding a lock leaves the map consistent; keep going.
    fn cache(&self) -> MutexGuard<'_, MemoCache<K, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flight(&self) -> MutexGuard<'_, HashSet<K>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.cache().get(key).cloned()
    }

    pub fn put(&self, key: K, value: V) -> bool {
        self.cache().put(key, value)
    }

    pub fn len(&self) -> usize {
        self.cache().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache().is_empty()
    }

    pub fn clear(&self) {
        self.cache().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.cache().stats();
        stats.duplicates = self.duplicates.load(Ordering::Relaxed);
        stats
    }

    /// Cached value, or `compute()` stored under `key`. Errors are not cached.
    ///
    /// Each call is one counted lookup: a hit or a miss, never both.
    pub fn get_or_compute<E, F>(&self, key: &K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        // Claim before looking: a holder stores its value before releasing, so a miss
        // after a successful claim is a real miss.
        let claim = Claim::new(self, key);
        if let Some(v) = self.get(key) {
            return Ok(v);
        }
        if !claim.owned {
            self.duplicates.fetch_add(1, Ordering::Relaxed);
            trace!(size = key.key_size(), "duplicate computation of in-flight key");
        }
        let value = compute()?;
        self.put(key.clone(), value.clone());
        drop(claim);
        Ok(value)
    }
}

/// Releases an owned claim on drop, including on error or unwind.
struct Claim<'a, K: CacheKey, V: Clone> {
    cache: &'a SharedCache<K, V>,
    key: &'a K,
    owned: bool,
}

impl<'a, K: CacheKey, V: Clone> Claim<'a, K, V> {
    fn new(cache: &'a SharedCache<K, V>, key: &'a K) -> Self {
        let owned = cache.flight().insert(key.clone());
        Self { cache, key, owned }
    }
}

impl<K: CacheKey, V: Clone> Drop for Claim<'_, K, V> {
    fn drop(&mut self) {
        if self.owned {
            self.cache.flight().remove(self.key);
        }
    }
}
