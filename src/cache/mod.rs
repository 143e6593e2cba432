//! Cache Module
//!
//! In-memory clipboard for short text snippets, bounded by bytes and item count
//! with LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, CacheItem};
pub use lru::RecencyList;
pub use stats::CacheStats;
pub use store::BoundedCache;
