//! Explicit, injectable caches. Purely additive: disabling, clearing, or
//! sharing them changes latency, never results.
//!
//! Three independent memos live here:
//!
//! - lowercase transforms, keyed by the original string, bounded;
//! - auto-detected field lists, keyed by [`CollectionTag`];
//! - inferred [`FieldStats`], keyed by ([`CollectionTag`], field set).
//!
//! The engine runs without any of this by default, so unit tests stay
//! deterministic with no cross-test bleed. There is no global state: a cache
//! is an object the caller (or engine) owns, with `stats` and `clear` as
//! methods on that object.
//!
//! Eviction for the lowercase memo is bounded-size-then-bulk: when the map
//! hits its cap, the oldest-inserted half is dropped in one sweep. Not LRU,
//! and not trying to be - correctness never depends on what the cache holds.

use crate::types::{CollectionTag, FieldStats};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Cap on memoized lowercase transforms before the bulk evict.
pub const DEFAULT_LOWERCASE_CAP: usize = 10_000;

/// Occupancy counts for the diagnostics boundary. Counts only, no contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub lowercase_entries: usize,
    pub field_list_entries: usize,
    pub field_stats_entries: usize,
}

/// Memoization shared across search calls.
///
/// Interior mutability behind mutexes, so one cache can serve concurrent
/// searches; a lost update under contention just means one extra
/// recomputation.
#[derive(Debug)]
pub struct SearchCache {
    lowercase_cap: usize,
    lowercase: Mutex<LowercaseMemo>,
    field_lists: Mutex<HashMap<CollectionTag, Vec<String>>>,
    field_stats: Mutex<HashMap<(CollectionTag, Vec<String>), Vec<FieldStats>>>,
}

impl SearchCache {
    /// A cache with the default lowercase cap.
    pub fn new() -> Self {
        Self::with_lowercase_cap(DEFAULT_LOWERCASE_CAP)
    }

    /// A cache whose lowercase memo evicts past `cap` entries.
    pub fn with_lowercase_cap(cap: usize) -> Self {
        Self {
            lowercase_cap: cap.max(2),
            lowercase: Mutex::new(LowercaseMemo::default()),
            field_lists: Mutex::new(HashMap::new()),
            field_stats: Mutex::new(HashMap::new()),
        }
    }

    /// The lowercase form of `text`, memoized.
    pub fn lowered(&self, text: &str) -> String {
        let mut memo = self.lowercase.lock();
        if let Some(hit) = memo.map.get(text) {
            return hit.clone();
        }
        if memo.map.len() >= self.lowercase_cap {
            memo.evict_oldest_half();
            debug!(
                remaining = memo.map.len(),
                "lowercase memo hit its cap, evicted oldest half"
            );
        }
        let lowered = text.to_lowercase();
        memo.map.insert(text.to_string(), lowered.clone());
        memo.order.push_back(text.to_string());
        lowered
    }

    /// The auto-detected field list for `tag`, computing it on first sight.
    pub fn field_list(&self, tag: CollectionTag, detect: impl FnOnce() -> Vec<String>) -> Vec<String> {
        let mut lists = self.field_lists.lock();
        lists.entry(tag).or_insert_with(detect).clone()
    }

    /// The inferred stats for (`tag`, `fields`), computing them on first sight.
    pub fn field_stats(
        &self,
        tag: CollectionTag,
        fields: &[String],
        estimate: impl FnOnce() -> Vec<FieldStats>,
    ) -> Vec<FieldStats> {
        let mut stats = self.field_stats.lock();
        stats
            .entry((tag, fields.to_vec()))
            .or_insert_with(estimate)
            .clone()
    }

    /// Current occupancy, for diagnostics. Non-blocking in spirit: takes
    /// each lock just long enough to read a length.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            lowercase_entries: self.lowercase.lock().map.len(),
            field_list_entries: self.field_lists.lock().len(),
            field_stats_entries: self.field_stats.lock().len(),
        }
    }

    /// Drop everything. Safe at any time; the next search just runs cold.
    pub fn clear(&self) {
        self.lowercase.lock().clear();
        self.field_lists.lock().clear();
        self.field_stats.lock().clear();
        debug!("search caches cleared");
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct LowercaseMemo {
    map: HashMap<String, String>,
    /// Insertion order, oldest at the front; drives the bulk evict.
    order: VecDeque<String>,
}

impl LowercaseMemo {
    fn evict_oldest_half(&mut self) {
        let evict = self.order.len() / 2;
        for key in self.order.drain(..evict) {
            self.map.remove(&key);
        }
    }

    fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }
}
