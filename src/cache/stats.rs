//! Clipboard Counters
//!
//! Lifetime lookup and eviction counters, plus the entry and byte gauges
//! copied in from the cache when a snapshot is taken.

use serde::Serialize;

/// Counters since startup and gauges as of the last snapshot.
///
/// `clear` on the cache resets the gauges but never the counters.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries pushed out by the byte or item budget
    pub evictions: u64,
    pub total_entries: usize,
    pub total_bytes: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of lookups that found their key; 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    // == Counters ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Gauges ==
    pub fn set_totals(&mut self, entries: usize, bytes: u64) {
        self.total_entries = entries;
        self.total_bytes = bytes;
    }
}
