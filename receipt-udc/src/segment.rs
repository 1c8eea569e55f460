//! One partition of the segmented cache
//!
//! An insertion-ordered map where the least-recently-used entry sits at one
//! end and the most-recently-used at the other. Capacity is enforced by the
//! owning cache, not here.

use lru::LruCache;
use std::hash::Hash;

pub struct Segment<K, V> {
    entries: LruCache<K, V>,
}

impl<K: Hash + Eq, V> Segment<K, V> {
    pub fn new() -> Self {
        Self {
            entries: LruCache::unbounded(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    /// Get a value and mark it most-recently-used
    pub fn touch(&mut self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.pop(key)
    }

    /// Insert at the most-recently-used end
    pub fn push_mru(&mut self, key: K, value: V) {
        self.entries.put(key, value);
    }

    /// Remove the least-recently-used entry
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        self.entries.pop_lru()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Entries from least- to most-recently-used
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().rev()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Hash + Eq, V> Default for Segment<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
