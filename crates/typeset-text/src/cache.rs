#![forbid(unsafe_code)]

//! Memoization of measurement results keyed by exact string content.
//!
//! Measuring text through a rendering backend is the expensive part of
//! wrapping; the wrapper asks for the same prefixes and characters over and
//! over. [`MeasurementCache`] stores each result under the exact string that
//! produced it so that repeated queries cost a hash lookup.
//!
//! # Policies
//!
//! | policy | storage | eviction |
//! |--------|---------|----------|
//! | [`CachePolicy::Unbounded`] | `FxHashMap` | none, grows until [`clear`](MeasurementCache::clear) |
//! | [`CachePolicy::Bounded`] | `LruCache` | least recently used |
//!
//! Unbounded is the default and matches short rendering sessions, where the
//! set of distinct strings is small. Long-lived processes that measure an
//! open-ended stream of text should pick a bound.
//!
//! # Invalidation
//!
//! Cached values are only valid for the font and style they were measured
//! with. Call [`clear`](MeasurementCache::clear) when either changes.
//!
//! # Example
//!
//! ```
//! use typeset_text::cache::MeasurementCache;
//!
//! let mut cache: MeasurementCache<usize> = MeasurementCache::new();
//! assert_eq!(cache.get_or_compute("hello", |s| s.len()), 5);
//! // Second lookup is served from the cache; the closure is not called.
//! assert_eq!(cache.get_or_compute("hello", |_| unreachable!()), 5);
//! assert_eq!(cache.stats().hits, 1);
//! ```

use std::fmt;
use std::num::NonZeroUsize;

use lru::LruCache;
use rustc_hash::FxHashMap;

use crate::measure::Dimensions;

/// Capacity policy for a [`MeasurementCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Keep every entry until the cache is cleared.
    #[default]
    Unbounded,
    /// Keep at most this many entries, evicting the least recently used.
    Bounded(NonZeroUsize),
}

impl CachePolicy {
    /// Bounded policy from a plain count; zero is clamped to one entry.
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self::Bounded(NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN))
    }

    /// Maximum number of entries, `None` when unbounded.
    #[must_use]
    pub fn capacity(self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::Bounded(n) => Some(n.get()),
        }
    }
}

/// Statistics about cache effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that invoked the compute function.
    pub misses: u64,
    /// Entries currently stored.
    pub size: usize,
    /// Maximum number of entries, `None` when unbounded.
    pub capacity: Option<usize>,
}

impl CacheStats {
    /// Hit rate as a fraction (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

enum Store<V> {
    Unbounded(FxHashMap<String, V>),
    Lru(LruCache<String, V>),
}

impl<V: Clone> Store<V> {
    fn for_policy(policy: CachePolicy) -> Self {
        match policy {
            CachePolicy::Unbounded => Self::Unbounded(FxHashMap::default()),
            CachePolicy::Bounded(cap) => Self::Lru(LruCache::new(cap)),
        }
    }

    fn lookup(&mut self, key: &str) -> Option<V> {
        match self {
            Self::Unbounded(map) => map.get(key).cloned(),
            Self::Lru(lru) => lru.get(key).cloned(),
        }
    }

    fn peek(&self, key: &str) -> Option<&V> {
        match self {
            Self::Unbounded(map) => map.get(key),
            Self::Lru(lru) => lru.peek(key),
        }
    }

    fn insert(&mut self, key: &str, value: V) {
        match self {
            Self::Unbounded(map) => {
                map.insert(key.to_owned(), value);
            }
            Self::Lru(lru) => {
                lru.put(key.to_owned(), value);
            }
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Unbounded(map) => map.len(),
            Self::Lru(lru) => lru.len(),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Unbounded(map) => map.clear(),
            Self::Lru(lru) => lru.clear(),
        }
    }
}

/// String-keyed memo table for measurement results.
///
/// Keys are compared by exact string equality. Values are compared with the
/// configured value equality only when an entry is [refreshed](Self::refresh).
///
/// The cache is not `Sync`; owners that measure from several threads must
/// synchronize externally.
pub struct MeasurementCache<V = Dimensions> {
    store: Store<V>,
    policy: CachePolicy,
    value_eq: fn(&V, &V) -> bool,
    hits: u64,
    misses: u64,
}

impl<V: Clone + PartialEq> MeasurementCache<V> {
    /// Create an unbounded cache.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(CachePolicy::Unbounded)
    }

    /// Create a cache with the given capacity policy.
    #[must_use]
    pub fn with_policy(policy: CachePolicy) -> Self {
        Self::with_value_eq(policy, <V as PartialEq>::eq)
    }
}

impl<V: Clone + PartialEq> Default for MeasurementCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> MeasurementCache<V> {
    /// Create a cache that compares values with `value_eq` on refresh.
    #[must_use]
    pub fn with_value_eq(policy: CachePolicy, value_eq: fn(&V, &V) -> bool) -> Self {
        Self {
            store: Store::for_policy(policy),
            policy,
            value_eq,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    pub fn get_or_compute<F>(&mut self, key: &str, compute: F) -> V
    where
        F: FnOnce(&str) -> V,
    {
        if let Some(value) = self.store.lookup(key) {
            self.hits += 1;
            return value;
        }

        self.misses += 1;
        tracing::trace!(key, "measurement cache miss");
        let value = compute(key);
        self.store.insert(key, value.clone());
        value
    }

    /// Recompute `key` and store the result.
    ///
    /// Returns `true` when the key was absent or the new value differs from
    /// the stored one under the value equality.
    pub fn refresh<F>(&mut self, key: &str, compute: F) -> bool
    where
        F: FnOnce(&str) -> V,
    {
        self.misses += 1;
        let value = compute(key);
        let changed = self
            .store
            .peek(key)
            .is_none_or(|old| !(self.value_eq)(old, &value));
        self.store.insert(key, value);
        changed
    }

    /// Whether `key` is currently cached. Does not touch recency.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.store.peek(key).is_some()
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Reset hit and miss counters.
    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.store.len(),
            capacity: self.policy.capacity(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    #[inline]
    #[must_use]
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }
}

impl<V> fmt::Debug for MeasurementCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = match &self.store {
            Store::Unbounded(map) => map.len(),
            Store::Lru(lru) => lru.len(),
        };
        f.debug_struct("MeasurementCache")
            .field("policy", &self.policy)
            .field("size", &size)
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}
