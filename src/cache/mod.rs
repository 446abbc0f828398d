//! Buffer Cache Module
//!
//! Block cache sitting between open files and the simulated disk.
//!
//! ## Responsibilities
//! - Serve repeated block reads without charging the clock
//! - Delegate misses to the disk and remember the result
//! - Evict the least recently used block when full
//!
//! ## Concurrency
//! The LRU map is guarded by a mutex that is released before a miss goes to
//! the disk. Two handles missing on the same block may both read it and
//! both pay for it; the second insert just replaces identical content.

mod buffer_cache;
mod lru;

pub use buffer_cache::{BufferCache, CacheStats};
pub use lru::LruCache;
