//! Segmented LRU (SLRU) cache
//!
//! Entries start in the probationary segment and move to the protected
//! segment on their second access. Protected overflow demotes back into
//! probationary; probationary overflow evicts and hands the evicted value
//! to the incoming key.
//!
//! Values are never reassigned by promotion or demotion, only by eviction.
//! That is what makes the cache usable as a slot table: an evicted value is
//! a device code that is about to be redefined.

use crate::allocator::ValueFactory;
use crate::error::{PrintError, PrintResult};
use crate::segment::Segment;
use serde::Serialize;
use std::hash::Hash;

/// Segmented LRU cache with hit/miss signalling
pub struct SlruCache<K, V, F> {
    factory: F,
    probationary: Segment<K, V>,
    protected: Segment<K, V>,
    prob_capacity: usize,
    prot_capacity: usize,
}

/// Copy of both partitions, each ordered from least- to most-recently-used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheSnapshot<K, V> {
    pub probationary: Vec<(K, V)>,
    pub protected: Vec<(K, V)>,
}

impl<K, V, F> SlruCache<K, V, F>
where
    K: Hash + Eq + Clone,
    V: Clone,
    F: ValueFactory<K, V>,
{
    /// Create a cache holding at most `total_capacity` entries, of which
    /// `prob_capacity` are probationary
    pub fn new(factory: F, total_capacity: usize, prob_capacity: usize) -> PrintResult<Self> {
        if total_capacity == 0 {
            return Err(PrintError::InvalidConfig(
                "Capacity must be larger than 0".to_string(),
            ));
        }
        if prob_capacity == 0 {
            return Err(PrintError::InvalidConfig(
                "Probationary capacity must be larger than 0".to_string(),
            ));
        }
        if prob_capacity >= total_capacity {
            return Err(PrintError::InvalidConfig(format!(
                "Probationary capacity {} must be lower than the total {}",
                prob_capacity, total_capacity
            )));
        }
        if let Some(available) = factory.capacity()
            && available != total_capacity
        {
            return Err(PrintError::InvalidConfig(format!(
                "Capacity {} does not match the {} values the factory can produce",
                total_capacity, available
            )));
        }

        Ok(Self {
            factory,
            probationary: Segment::new(),
            protected: Segment::new(),
            prob_capacity,
            prot_capacity: total_capacity - prob_capacity,
        })
    }

    /// Look up a key, assigning a value on a miss
    ///
    /// Returns the value and `true` for a hit, `false` for a miss.
    pub fn lookup(&mut self, key: K) -> (V, bool) {
        // Hit in protected
        if let Some(value) = self.protected.touch(&key) {
            return (value.clone(), true);
        }

        // Hit in probationary
        if let Some(value) = self.probationary.remove(&key) {
            self.promote(key, value.clone());
            return (value, true);
        }

        (self.insert_missed(key), false)
    }

    fn promote(&mut self, key: K, value: V) {
        if self.protected.len() >= self.prot_capacity
            && let Some((demoted_key, demoted_value)) = self.protected.pop_lru()
        {
            // The promoted key just left probationary, so this stays in bounds
            self.probationary.push_mru(demoted_key, demoted_value);
        }

        self.protected.push_mru(key, value);
    }

    fn insert_missed(&mut self, key: K) -> V {
        let value = if self.probationary.len() >= self.prob_capacity {
            match self.probationary.pop_lru() {
                Some((_, evicted)) => evicted,
                None => self.factory.create(&self.probationary, &self.protected),
            }
        } else {
            self.factory.create(&self.probationary, &self.protected)
        };

        self.probationary.push_mru(key, value.clone());
        value
    }

    /// Drop every entry from both segments
    pub fn clear(&mut self) {
        self.probationary.clear();
        self.protected.clear();
    }

    pub fn snapshot(&self) -> CacheSnapshot<K, V> {
        let copy = |segment: &Segment<K, V>| -> Vec<(K, V)> {
            segment
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        };
        CacheSnapshot {
            probationary: copy(&self.probationary),
            protected: copy(&self.protected),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.protected.contains(key) || self.probationary.contains(key)
    }

    pub fn len(&self) -> usize {
        self.probationary.len() + self.protected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.prob_capacity + self.prot_capacity
    }

    pub fn probationary_capacity(&self) -> usize {
        self.prob_capacity
    }

    pub fn protected_capacity(&self) -> usize {
        self.prot_capacity
    }

    pub fn probationary_len(&self) -> usize {
        self.probationary.len()
    }

    pub fn protected_len(&self) -> usize {
        self.protected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::SlotAllocator;

    fn cache(total: u8, prob: usize) -> SlruCache<char, u8, SlotAllocator> {
        let alloc = SlotAllocator::new(0x20, 0x20 + total - 1).unwrap();
        SlruCache::new(alloc, usize::from(total), prob).unwrap()
    }

    fn trace(cache: &mut SlruCache<char, u8, SlotAllocator>, keys: &str) -> Vec<(u8, bool)> {
        keys.chars().map(|k| cache.lookup(k)).collect()
    }

    #[test]
    fn test_invalid_capacities() {
        let alloc = SlotAllocator::new(0x20, 0x23).unwrap();
        for (total, prob) in [(0, 0), (4, 0), (4, 4), (4, 5)] {
            let result: PrintResult<SlruCache<char, u8, _>> = SlruCache::new(alloc, total, prob);
            assert!(
                matches!(result, Err(PrintError::InvalidConfig(_))),
                "({total}, {prob}) accepted"
            );
        }
    }

    #[test]
    fn test_capacity_must_match_range() {
        // Two codes cannot back ten entries
        let alloc = SlotAllocator::new(0x20, 0x21).unwrap();
        let result: PrintResult<SlruCache<char, u8, _>> = SlruCache::new(alloc, 10, 3);
        assert!(matches!(result, Err(PrintError::InvalidConfig(_))));

        // Nor can ten codes back two
        let alloc = SlotAllocator::new(0x20, 0x29).unwrap();
        let result: PrintResult<SlruCache<char, u8, _>> = SlruCache::new(alloc, 2, 1);
        assert!(matches!(result, Err(PrintError::InvalidConfig(_))));
    }

    #[test]
    fn test_hit_miss_trace() {
        let mut c = cache(4, 2);
        let got = trace(&mut c, "ABACDE");

        let hits: Vec<bool> = got.iter().map(|(_, hit)| *hit).collect();
        assert_eq!(hits, vec![false, false, true, false, false, false]);

        let codes: Vec<u8> = got.iter().map(|(code, _)| *code).collect();
        // A=0x20, B=0x21, A hit, C=0x22, D recycles B, E recycles C
        assert_eq!(codes, vec![0x20, 0x21, 0x20, 0x22, 0x21, 0x22]);

        let snap = c.snapshot();
        assert_eq!(snap.protected, vec![('A', 0x20)]);
        assert_eq!(snap.probationary, vec![('D', 0x21), ('E', 0x22)]);
    }

    #[test]
    fn test_eviction_recycles_lru_value() {
        let mut c = cache(4, 2);
        let (a, _) = c.lookup('a');
        let (_, _) = c.lookup('b');

        // Probationary is full, so 'c' takes 'a''s code
        let (code, hit) = c.lookup('c');
        assert!(!hit);
        assert_eq!(code, a);
        assert!(!c.contains(&'a'));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_promotion_demotes_protected_lru() {
        // One protected slot
        let mut c = cache(3, 2);
        let (a, _) = c.lookup('a');
        let (b, _) = c.lookup('b');
        c.lookup('a');
        assert_eq!(c.snapshot().protected, vec![('a', a)]);

        // Promoting 'b' pushes 'a' back to probationary with its code intact
        assert_eq!(c.lookup('b'), (b, true));
        let snap = c.snapshot();
        assert_eq!(snap.protected, vec![('b', b)]);
        assert_eq!(snap.probationary, vec![('a', a)]);
    }

    #[test]
    fn test_protected_hit_refreshes() {
        let mut c = cache(5, 2);
        for k in "xyxy".chars() {
            c.lookup(k);
        }
        assert_eq!(
            c.snapshot().protected.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            vec!['x', 'y']
        );

        c.lookup('x');
        assert_eq!(
            c.snapshot().protected.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            vec!['y', 'x']
        );
    }

    #[test]
    fn test_clear_reproduces_fresh_trace() {
        let keys = "ABACDEAFBGAHCD";
        let mut fresh = cache(4, 2);
        let expected = trace(&mut fresh, keys);

        let mut reused = cache(4, 2);
        trace(&mut reused, "QWERTYQW");
        reused.clear();
        assert!(reused.is_empty());
        assert_eq!(trace(&mut reused, keys), expected);
    }

    #[test]
    fn test_codes_stay_distinct() {
        let mut c = cache(6, 3);
        for k in "abcabdefgaehbicj".chars() {
            c.lookup(k);
            let snap = c.snapshot();
            let mut codes: Vec<u8> = snap
                .probationary
                .iter()
                .chain(snap.protected.iter())
                .map(|(_, v)| *v)
                .collect();
            let total = codes.len();
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), total);
        }
    }
}
