//! Bounded, time-stamped cache with content-hash invalidation.
//!
//! Eviction is first-in-first-out by insertion order: reading an entry does
//! not refresh it, and overwriting a live key keeps its original slot. A key
//! rewritten after it expired goes to the back like a fresh insert. This is
//! not an LRU.

use crate::config::{CacheConfig, Clock, SystemClock};
use crate::error::Result;
use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub key: String,
    pub value: Arc<V>,
    pub content_hash: String,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
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

/// The cache owns every stored value; readers get shared `Arc` snapshots.
#[derive(Debug)]
pub struct KeyedCache<V, C = SystemClock> {
    entries: IndexMap<String, CacheEntry<V>>,
    config: CacheConfig,
    clock: C,
    stats: CacheStats,
}

/// Key prefix naming one source. The length prefix keeps a source such as
/// `clip` from matching the keys of `clip|alt`.
pub(crate) fn source_prefix(source: &str) -> String {
    format!("{}:{source}|", source.len())
}

impl<V> KeyedCache<V> {
    pub fn create(config: CacheConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<V, C: Clock> KeyedCache<V, C> {
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            entries: IndexMap::new(),
            config,
            clock,
            stats: CacheStats::default(),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Look up `key`. Expired entries are dropped and read as absent.
    pub fn get(&mut self, key: &str) -> Option<Arc<V>> {
        if self.is_expired(key) {
            self.entries.shift_remove(key);
            self.stats.expirations += 1;
            self.stats.misses += 1;
            tracing::debug!(key = %key, "cache entry expired");
            return None;
        }
        match self.entries.get(key) {
            Some(entry) => {
                self.stats.hits += 1;
                Some(Arc::clone(&entry.value))
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Full entry for `key`, if present and not expired.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.live(key)
    }

    /// Store `value` under `key`. Past capacity, the oldest inserted entry goes.
    pub fn set(&mut self, key: impl Into<String>, value: V, content_hash: impl Into<String>) {
        let key = key.into();
        let entry = CacheEntry {
            key: key.clone(),
            value: Arc::new(value),
            content_hash: content_hash.into(),
            timestamp_ms: self.clock.now_ms(),
        };
        if self.is_expired(&key) {
            self.entries.shift_remove(&key);
            self.stats.expirations += 1;
        }
        self.entries.insert(key, entry);
        self.evict_over_capacity();
    }

    pub fn has(&self, key: &str) -> bool {
        self.live(key).is_some()
    }

    /// True if `key` is absent (or expired) or was stored with a different hash.
    pub fn needs_update(&self, key: &str, new_hash: &str) -> bool {
        self.live(key)
            .map_or(true, |entry| entry.content_hash != new_hash)
    }

    pub fn remove(&mut self, key: &str) -> Option<Arc<V>> {
        self.entries.shift_remove(key).map(|e| e.value)
    }

    /// Drop every entry whose key matches `pred`. Returns how many went.
    pub fn invalidate_where(&mut self, mut pred: impl FnMut(&str) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pred(key));
        before - self.entries.len()
    }

    /// Drop every expired entry. Returns how many went.
    pub fn purge_expired(&mut self) -> usize {
        let Some(max_age) = self.config.max_age_ms else {
            return 0;
        };
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.saturating_sub(e.timestamp_ms) <= max_age);
        let purged = before - self.entries.len();
        self.stats.expirations += purged as u64;
        purged
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Stored entries, expired ones included until they are read or purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Release every stored value and end the cache's lifetime.
    pub fn dispose(mut self) {
        tracing::debug!(
            entries = self.entries.len(),
            hits = self.stats.hits,
            misses = self.stats.misses,
            "cache disposed"
        );
        self.entries.clear();
    }

    fn live(&self, key: &str) -> Option<&CacheEntry<V>> {
        let entry = self.entries.get(key)?;
        if self.entry_expired(entry) {
            None
        } else {
            Some(entry)
        }
    }

    fn is_expired(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| self.entry_expired(entry))
    }

    fn entry_expired(&self, entry: &CacheEntry<V>) -> bool {
        match self.config.max_age_ms {
            Some(max_age) => self.clock.now_ms().saturating_sub(entry.timestamp_ms) > max_age,
            None => false,
        }
    }

    fn evict_over_capacity(&mut self) {
        let Some(capacity) = self.config.capacity else {
            return;
        };
        while self.entries.len() > capacity {
            if let Some((key, _)) = self.entries.shift_remove_index(0) {
                self.stats.evictions += 1;
                tracing::debug!(key = %key, capacity, "evicted oldest cache entry");
            }
        }
    }
}
