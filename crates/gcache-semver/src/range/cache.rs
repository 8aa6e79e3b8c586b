//! Bounded least-recently-used cache for parsed range segments

use std::hash::Hash;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use log::trace;

struct Entry<V> {
    value: V,
    inserted: Instant,
}

/// LRU cache with optional time-to-live
///
/// Entries are kept in recency order inside an `IndexMap`: the first entry
/// is the least recently used, the last the most recently used.
pub struct LruCache<K, V> {
    entries: IndexMap<K, Entry<V>>,
    capacity: usize,
    ttl: Option<Duration>,
}

impl<K: Hash + Eq, V: Clone> LruCache<K, V> {
    pub const DEFAULT_CAPACITY: usize = 1000;

    pub fn new(capacity: usize) -> Self {
        LruCache {
            entries: IndexMap::with_capacity(capacity.min(Self::DEFAULT_CAPACITY)),
            capacity,
            ttl: None,
        }
    }

    /// Entries older than `ttl` are treated as missing
    pub fn with_ttl(capacity: usize, ttl: Duration) -> Self {
        LruCache {
            ttl: Some(ttl),
            ..Self::new(capacity)
        }
    }

    /// Look up a key and mark it most recently used
    pub fn get(&mut self, key: &K) -> Option<V> {
        let index = self.entries.get_index_of(key)?;

        if let Some(ttl) = self.ttl {
            let expired = self
                .entries
                .get_index(index)
                .map_or(true, |(_, entry)| entry.inserted.elapsed() > ttl);
            if expired {
                self.entries.shift_remove_index(index);
                trace!("cache entry expired");
                return None;
            }
        }

        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        self.entries.get_index(last).map(|(_, entry)| entry.value.clone())
    }

    /// Insert or refresh a key, evicting the least recently used entry when full
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }

        self.entries.shift_remove(&key);
        if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
            trace!("cache full, evicted least recently used entry");
        }

        self.entries.insert(
            key,
            Entry {
                value,
                inserted: Instant::now(),
            },
        );
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.shift_remove(key).map(|entry| entry.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Hash + Eq, V: Clone> Default for LruCache<K, V> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
