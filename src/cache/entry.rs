//! Cache Entry Module
//!
//! Defines the stored text entry and the snapshot item handed out by `get_all`.

use serde::Serialize;

// == Cache Entry ==
/// A single text value held by the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Caller-assigned identifier
    pub key: String,
    /// The stored text
    pub value: String,
    /// Byte length of `value`
    pub size: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry, measuring the value's UTF-8 byte length.
    pub fn new(key: String, value: String) -> Self {
        let size = byte_len(&value);
        Self { key, value, size }
    }

    /// Replaces the value in place, returning the previous size.
    pub fn replace_value(&mut self, value: String) -> u64 {
        let old = self.size;
        self.size = byte_len(&value);
        self.value = value;
        old
    }
}

// == Cache Item ==
/// Point-in-time copy of an entry, as returned by `BoundedCache::get_all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheItem {
    pub key: String,
    pub value: String,
    pub size: u64,
}

impl From<&CacheEntry> for CacheItem {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            key: entry.key.clone(),
            value: entry.value.clone(),
            size: entry.size,
        }
    }
}

/// Byte length of a text payload.
pub fn byte_len(value: &str) -> u64 {
    value.len() as u64
}
