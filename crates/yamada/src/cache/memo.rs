//! Single-threaded LFU store.

use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use super::{CacheCfg, CacheKey, CacheStats, Capacity};

#[derive(Clone, Debug)]
struct Entry<V> {
    value: V,
    uses: u64,
    seq: u64,
}

/// Bounded map with usage counters.
///
/// `order` mirrors `map` keyed by `(uses, insertion seq)`, so its first element is the
/// eviction victim.
#[derive(Clone, Debug)]
pub struct MemoCache<K, V> {
    cfg: CacheCfg,
    map: HashMap<K, Entry<V>>,
    order: BTreeMap<(u64, u64), K>,
    next_seq: u64,
    hits: u64,
    misses: u64,
    inserts: u64,
    evictions: u64,
    rejected: u64,
}

impl<K: CacheKey, V> MemoCache<K, V> {
    pub fn new(cfg: CacheCfg) -> Self {
        Self {
            cfg,
            map: HashMap::new(),
            order: BTreeMap::new(),
            next_seq: 0,
            hits: 0,
            misses: 0,
            inserts: 0,
            evictions: 0,
            rejected: 0,
        }
    }

    #[inline]
    pub fn cfg(&self) -> CacheCfg {
        self.cfg
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Membership without touching the usage counter.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Stored value, counting one more use.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.map.get_mut(key) {
            Some(e) => {
                self.order.remove(&(e.uses, e.seq));
                e.uses += 1;
                self.order.insert((e.uses, e.seq), key.clone());
                self.hits += 1;
                Some(&e.value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a value. Returns `false` when the key is refused.
    ///
    /// Overwriting counts as a use. A new entry starts at one use and, at capacity,
    /// replaces the least used entry (oldest first among equals).
    pub fn put(&mut self, key: K, value: V) -> bool {
        if key.key_size() > self.cfg.max_key_size {
            self.rejected += 1;
            trace!(size = key.key_size(), "cache key over size threshold");
            return false;
        }
        if let Some(e) = self.map.get_mut(&key) {
            self.order.remove(&(e.uses, e.seq));
            e.uses += 1;
            e.value = value;
            self.order.insert((e.uses, e.seq), key);
            return true;
        }
        let cap = match self.cfg.capacity {
            Capacity::Unbounded => usize::MAX,
            Capacity::Bounded(n) => n,
        };
        if cap == 0 {
            self.rejected += 1;
            return false;
        }
        if self.map.len() >= cap {
            if let Some(((uses, _), victim)) = self.order.pop_first() {
                self.map.remove(&victim);
                self.evictions += 1;
                trace!(uses, size = victim.key_size(), "cache eviction");
            }
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert((1, seq), key.clone());
        self.map.insert(
            key,
            Entry {
                value,
                uses: 1,
                seq,
            },
        );
        self.inserts += 1;
        true
    }

    /// Drop all entries; counters keep running.
    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    /// Usage count of a stored key.
    pub fn uses(&self, key: &K) -> Option<u64> {
        self.map.get(key).map(|e| e.uses)
    }

    pub fn stats(&self) -> CacheStats {
        let mut key_sizes = BTreeMap::new();
        let mut usage = BTreeMap::new();
        for (k, e) in &self.map {
            *key_sizes.entry(k.key_size()).or_insert(0) += 1;
            *usage.entry(e.uses).or_insert(0) += 1;
        }
        CacheStats {
            entries: self.map.len(),
            capacity: match self.cfg.capacity {
                Capacity::Unbounded => None,
                Capacity::Bounded(n) => Some(n),
            },
            hits: self.hits,
            misses: self.misses,
            inserts: self.inserts,
            evictions: self.evictions,
            rejected: self.rejected,
            duplicates: 0,
            key_sizes,
            usage,
        }
    }
}

impl<K: CacheKey, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self::new(CacheCfg::default())
    }
}
