//! Simulated Disk
//!
//! Serves aligned block reads from a data generator and charges the node's
//! clock a fixed cost per block. Reads never fail and never sleep; the cost
//! is accounted, not waited out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::block::{Block, BlockAddr};
use crate::clock::Clock;
use crate::datagen::DataGenerator;

/// Timed, generated block device
pub struct Disk {
    /// Clock charged for every block read
    clock: Arc<Clock>,

    /// Produces block content from addresses
    generator: Box<dyn DataGenerator>,

    block_size: u64,

    /// 1 / IOPS
    block_cost: Duration,

    /// Blocks read since creation
    reads: AtomicU64,
}

impl Disk {
    pub fn new(
        clock: Arc<Clock>,
        generator: Box<dyn DataGenerator>,
        block_size: u64,
        block_cost: Duration,
    ) -> Self {
        Self {
            clock,
            generator,
            block_size,
            block_cost,
            reads: AtomicU64::new(0),
        }
    }

    /// Read the block starting at `addr`
    ///
    /// # Panics
    /// If `addr` is not block-aligned.
    pub fn read_block(&self, addr: BlockAddr) -> Block {
        assert!(
            addr.is_aligned(self.block_size),
            "unaligned disk read at {} (block size {})",
            addr,
            self.block_size
        );

        self.clock.add_time(self.block_cost);
        self.reads.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(%addr, "disk read");

        self.generator.generate(addr, self.block_size)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Simulated time charged per block read
    pub fn block_cost(&self) -> Duration {
        self.block_cost
    }

    /// Number of blocks read so far
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }
}
