//! Node Module
//!
//! One simulated sort-benchmark node: a clock, the disk that charges it, the
//! buffer cache in front of the disk, and the node's single data file.
//!
//! ## Call Chain
//! ```text
//!   File::read ──▶ BufferCache::read_block ──▶ Disk::read_block ──▶ Clock::add_time
//!                        (hit: stop here)
//! ```
//! Each component takes only its own lock, and calls only flow rightwards,
//! so no two locks are ever acquired in opposite orders.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::BufferCache;
use crate::clock::Clock;
use crate::config::Config;
use crate::datagen::{DataGenerator, UniformGenerator};
use crate::disk::Disk;
use crate::error::Result;
use crate::file::File;

/// A simulated storage node
pub struct Node {
    config: Config,

    /// Simulated time spent by this node
    clock: Arc<Clock>,

    disk: Arc<Disk>,

    cache: Arc<BufferCache>,

    /// The data file, until it is handed out by `open_file`
    data: Mutex<Option<File>>,
}

impl Node {
    /// Create a node whose data file holds uniformly keyed records
    pub fn new(config: Config) -> Result<Self> {
        let generator = UniformGenerator::new(config.record_size());
        Self::with_generator(config, Box::new(generator))
    }

    /// Create a node whose disk content comes from `generator`
    pub fn with_generator(config: Config, generator: Box<dyn DataGenerator>) -> Result<Self> {
        config.validate()?;

        let clock = Arc::new(Clock::new());
        let disk = Arc::new(Disk::new(
            Arc::clone(&clock),
            generator,
            config.block_size,
            config.block_cost(),
        ));
        let cache = Arc::new(BufferCache::new(Arc::clone(&disk), config.cache_capacity));
        let data = File::new(Arc::clone(&cache), config.file_size);

        tracing::info!(
            block_size = config.block_size,
            record_size = config.record_size(),
            records = config.record_count(),
            cache_blocks = config.cache_capacity,
            iops = config.iops,
            "node created"
        );

        Ok(Self {
            config,
            clock,
            disk,
            cache,
            data: Mutex::new(Some(data)),
        })
    }

    /// Hand out the node's data file
    ///
    /// # Panics
    /// If the data file has already been opened.
    pub fn open_file(&self) -> File {
        match self.data.lock().take() {
            Some(file) => file,
            None => panic!("data file opened twice; a node has exactly one handle"),
        }
    }

    /// Simulated time spent so far
    pub fn get_time(&self) -> Duration {
        self.clock.get_time()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clock(&self) -> &Arc<Clock> {
        &self.clock
    }

    pub fn disk(&self) -> &Arc<Disk> {
        &self.disk
    }

    pub fn cache(&self) -> &Arc<BufferCache> {
        &self.cache
    }
}
