//! Bounded Cache Module
//!
//! Text cache limited by both total bytes and item count, evicting least
//! recently used entries to stay within both budgets.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::entry::byte_len;
use crate::cache::{CacheEntry, CacheItem, CacheStats, RecencyList};
use crate::error::{AppError, Result};

// == Inner State ==
#[derive(Debug)]
struct Inner {
    /// Key to arena slot
    index: HashMap<String, usize>,
    /// Entries in recency order
    lru: RecencyList,
    /// Running sum of entry sizes
    current_size: u64,
    stats: CacheStats,
}

impl Inner {
    fn evict_oldest(&mut self) -> bool {
        match self.lru.pop_back() {
            Some(evicted) => {
                self.index.remove(&evicted.key);
                self.current_size -= evicted.size;
                self.stats.record_eviction();
                debug!(key = %evicted.key, size = evicted.size, "Evicted clipboard entry");
                true
            }
            None => false,
        }
    }
}

// == Bounded Cache ==
/// LRU cache with a byte budget and an item-count budget.
///
/// All operations take the internal lock, so concurrent callers observe a
/// single total order of mutations. `get` counts as a use and reorders entries.
#[derive(Debug)]
pub struct BoundedCache {
    inner: Mutex<Inner>,
    /// Maximum sum of entry sizes
    max_bytes: u64,
    /// Maximum number of entries
    max_items: usize,
}

impl BoundedCache {
    // == Constructor ==
    /// Creates an empty cache. An item budget of zero is treated as one.
    ///
    /// # Arguments
    /// * `max_bytes` - Byte budget across all entries
    /// * `max_items` - Item-count budget
    pub fn new(max_bytes: u64, max_items: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                index: HashMap::new(),
                lru: RecencyList::new(),
                current_size: 0,
                stats: CacheStats::new(),
            }),
            max_bytes,
            max_items: max_items.max(1),
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    // == Put ==
    /// Stores `value` under `key` and marks it most recently used.
    ///
    /// A value larger than the byte budget is rejected with `ItemTooLarge` and
    /// leaves the cache untouched. Otherwise least recently used entries are
    /// evicted until both budgets hold.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        let size = byte_len(&value);

        if size > self.max_bytes {
            return Err(AppError::ItemTooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        let mut inner = self.inner.lock();

        let existing = inner.index.get(&key).copied();
        if let Some(idx) = existing {
            let old = match inner.lru.get_mut(idx) {
                Some(entry) => entry.replace_value(value),
                None => return Err(AppError::Internal(format!("dangling slot for {key}"))),
            };
            inner.current_size = inner.current_size - old + size;
            inner.lru.move_to_front(idx);

            // A grown value can push the total over budget; the updated entry
            // sits at the head, so only older entries are evicted.
            while inner.current_size > self.max_bytes && inner.lru.len() > 1 {
                inner.evict_oldest();
            }
        } else {
            while inner.lru.len() >= self.max_items {
                if !inner.evict_oldest() {
                    break;
                }
            }
            while inner.current_size + size > self.max_bytes {
                if !inner.evict_oldest() {
                    break;
                }
            }

            let idx = inner.lru.push_front(CacheEntry::new(key.clone(), value));
            inner.index.insert(key, idx);
            inner.current_size += size;
        }

        Ok(())
    }

    // == Get ==
    /// Returns the value for `key`, marking it most recently used.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut inner = self.inner.lock();

        let slot = inner.index.get(key).copied();
        match slot {
            Some(idx) => {
                inner.lru.move_to_front(idx);
                inner.stats.record_hit();
                inner.lru.get(idx).map(|entry| entry.value.clone())
            }
            None => {
                inner.stats.record_miss();
                None
            }
        }
    }

    // == Delete ==
    /// Removes `key`, returning whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        let mut inner = self.inner.lock();

        let Some(idx) = inner.index.remove(key) else {
            return false;
        };
        if let Some(entry) = inner.lru.remove(idx) {
            inner.current_size -= entry.size;
        }
        true
    }

    // == Get All ==
    /// Snapshot of all entries, most recently used first.
    pub fn get_all(&self) -> Vec<CacheItem> {
        let inner = self.inner.lock();
        inner.lru.iter().map(CacheItem::from).collect()
    }

    /// Current total bytes held.
    pub fn size(&self) -> u64 {
        self.inner.lock().current_size
    }

    /// Current number of entries.
    pub fn count(&self) -> usize {
        self.inner.lock().lru.len()
    }

    // == Clear ==
    /// Removes every entry and resets aggregates.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.index.clear();
        inner.lru.clear();
        inner.current_size = 0;
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.set_totals(inner.lru.len(), inner.current_size);
        stats
    }

    /// Recomputes the byte total by walking every entry.
    #[cfg(test)]
    pub(crate) fn scanned_size(&self) -> u64 {
        self.inner.lock().lru.iter().map(|e| e.size).sum()
    }
}
