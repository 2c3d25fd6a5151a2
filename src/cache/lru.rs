//! LRU Index Module
//!
//! Recency ordering of live keys, used only to pick eviction victims.

use std::collections::VecDeque;

// == LRU Index ==
/// Keys ordered by last use.
///
/// - Front = most recently used
/// - Back = least recently used, next to be evicted
///
/// Holds at most one entry per key. Never persisted.
#[derive(Debug, Default, Clone)]
pub struct LruIndex {
    order: VecDeque<String>,
}

impl LruIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Moves `key` to the front, inserting it if absent.
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    // == Seed ==
    /// Appends `key` behind every key already tracked.
    ///
    /// Used when rebuilding from persisted records, feeding keys newest first.
    pub fn push_oldest(&mut self, key: &str) {
        if !self.contains(key) {
            self.order.push_back(key.to_string());
        }
    }

    // == Remove ==
    /// Drops `key` if present.
    pub fn remove(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Pop Least Recent ==
    /// Removes and returns the eviction candidate.
    pub fn pop_least_recent(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    /// Keys in the order they would be evicted.
    pub fn eviction_order(&self) -> impl Iterator<Item = &str> {
        self.order.iter().rev().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
