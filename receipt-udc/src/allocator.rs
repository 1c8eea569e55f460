//! Fresh device codes for cache misses

use crate::error::{PrintError, PrintResult};
use crate::segment::Segment;
use std::hash::Hash;

/// Produces the value for a new probationary entry
///
/// Only consulted when the probationary segment has room; a full segment
/// recycles its least-recently-used value instead.
pub trait ValueFactory<K, V> {
    fn create(&mut self, probationary: &Segment<K, V>, protected: &Segment<K, V>) -> V;

    /// Number of distinct values the factory can hand out, if bounded
    ///
    /// A bounded factory must cover exactly the cache's total capacity.
    fn capacity(&self) -> Option<usize> {
        None
    }
}

/// Hands out the lowest code in `first..=last` not held by either segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAllocator {
    first: u8,
    last: u8,
}

impl SlotAllocator {
    pub fn new(first: u8, last: u8) -> PrintResult<Self> {
        if first > last {
            return Err(PrintError::InvalidConfig(format!(
                "Empty code range: 0x{:02X}..=0x{:02X}",
                first, last
            )));
        }
        Ok(Self { first, last })
    }

    pub fn first(&self) -> u8 {
        self.first
    }

    pub fn last(&self) -> u8 {
        self.last
    }

    /// Number of codes in the range
    pub fn size(&self) -> usize {
        usize::from(self.last - self.first) + 1
    }

    pub fn contains(&self, code: u8) -> bool {
        (self.first..=self.last).contains(&code)
    }
}

impl<K: Hash + Eq> ValueFactory<K, u8> for SlotAllocator {
    fn create(&mut self, probationary: &Segment<K, u8>, protected: &Segment<K, u8>) -> u8 {
        let mut used = [false; 256];
        for &code in probationary.values().chain(protected.values()) {
            used[usize::from(code)] = true;
        }

        match (self.first..=self.last).find(|&code| !used[usize::from(code)]) {
            Some(code) => code,
            // Cache capacity equals the range size, so a non-full segment
            // always leaves a code free.
            None => panic!(
                "no free UDC code in 0x{:02X}..=0x{:02X}",
                self.first, self.last
            ),
        }
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.size())
    }
}
