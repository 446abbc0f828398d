//! Buffer cache implementation
//!
//! LRU of blocks keyed by aligned address, fronting a `Disk`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::block::{Block, BlockAddr};
use crate::disk::Disk;

use super::LruCache;

/// Hit/miss counters for a buffer cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Blocks currently cached
    pub resident: usize,
}

/// LRU block cache over a simulated disk
pub struct BufferCache {
    disk: Arc<Disk>,
    lru: Mutex<LruCache<BlockAddr, Block>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl BufferCache {
    /// Create a cache holding at most `capacity` blocks
    pub fn new(disk: Arc<Disk>, capacity: usize) -> Self {
        Self {
            disk,
            lru: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Cached block at `addr`, promoted to most recently used
    pub fn get(&self, addr: BlockAddr) -> Option<Block> {
        self.lru.lock().get(&addr).cloned()
    }

    /// Store `block` at `addr`, evicting the coldest block if full
    pub fn set(&self, addr: BlockAddr, block: Block) {
        let evicted = self.lru.lock().insert(addr, block);
        if let Some((victim, _)) = evicted {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(%victim, incoming = %addr, "evicted block");
        }
    }

    /// Read the block at aligned `addr`, going to disk on a miss
    pub fn read_block(&self, addr: BlockAddr) -> Block {
        if let Some(block) = self.get(addr) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(%addr, "cache hit");
            return block;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let block = self.disk.read_block(addr);
        self.set(addr, block.clone());
        block
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn disk(&self) -> &Arc<Disk> {
        &self.disk
    }

    pub fn block_size(&self) -> u64 {
        self.disk.block_size()
    }

    pub fn capacity(&self) -> usize {
        self.lru.lock().capacity()
    }

    /// Whether `addr` is cached, without affecting recency
    pub fn contains(&self, addr: BlockAddr) -> bool {
        self.lru.lock().contains(&addr)
    }

    /// Cached addresses from most to least recently used
    pub fn resident_mru(&self) -> Vec<BlockAddr> {
        self.lru.lock().keys_mru()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            resident: self.lru.lock().len(),
        }
    }
}
