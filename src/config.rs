//! Configuration for sortsim
//!
//! Centralized configuration with the sort-benchmark defaults.

use std::time::Duration;

use crate::datagen::encoded_key_len;
use crate::error::{Result, SimError};
use crate::record::RecordLayout;

/// 1 KiB
pub const KB: u64 = 1024;

/// Largest accepted block size; every block is materialized in memory
pub const MAX_BLOCK_SIZE: u64 = 64 * 1024 * KB;

/// Largest accepted data file size (256 TiB)
pub const MAX_FILE_SIZE: u64 = 1 << 48;

/// Main configuration for a simulated node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Disk Configuration
    // -------------------------------------------------------------------------
    /// Size of one disk transfer unit in bytes. Cache keys and disk
    /// addresses are always multiples of this.
    pub block_size: u64,

    /// Simulated disk operations per second; each block read costs 1/iops
    pub iops: u32,

    // -------------------------------------------------------------------------
    // Record Layout
    // -------------------------------------------------------------------------
    /// Bytes of key at the front of every record
    pub key_size: usize,

    /// Bytes of value following the key
    pub value_size: usize,

    // -------------------------------------------------------------------------
    // Buffer Cache Configuration
    // -------------------------------------------------------------------------
    /// Maximum number of blocks held by the LRU buffer cache
    pub cache_capacity: usize,

    // -------------------------------------------------------------------------
    // Data File Configuration
    // -------------------------------------------------------------------------
    /// Logical size of the node's data file in bytes
    pub file_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: 4 * KB,
            iops: 100,
            key_size: 10,
            value_size: 90,
            cache_capacity: 16,
            file_size: 1000 * 100, // 1000 records
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Bytes per record (key + value)
    pub fn record_size(&self) -> u64 {
        (self.key_size + self.value_size) as u64
    }

    /// Number of whole records in the data file
    pub fn record_count(&self) -> u64 {
        match self.record_size() {
            0 => 0,
            size => self.file_size / size,
        }
    }

    /// Number of blocks the data file touches
    pub fn block_count(&self) -> u64 {
        match self.block_size {
            0 => 0,
            size => self.file_size.div_ceil(size),
        }
    }

    /// Simulated time charged for one disk block read
    pub fn block_cost(&self) -> Duration {
        Duration::from_secs(1) / self.iops.max(1)
    }

    /// Key/value layout of records in the data file
    pub fn layout(&self) -> RecordLayout {
        RecordLayout::new(self.key_size, self.value_size)
    }

    /// Check that the configuration describes a usable node
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(SimError::Config("block_size must be non-zero".into()));
        }
        if self.block_size > MAX_BLOCK_SIZE {
            return Err(SimError::Config(format!(
                "block_size {} exceeds the maximum of {}",
                self.block_size, MAX_BLOCK_SIZE
            )));
        }
        if self.iops == 0 {
            return Err(SimError::Config("iops must be non-zero".into()));
        }
        if self.key_size == 0 {
            return Err(SimError::Config("key_size must be non-zero".into()));
        }
        if self.cache_capacity == 0 {
            return Err(SimError::Config("cache_capacity must be non-zero".into()));
        }

        if self.file_size > MAX_FILE_SIZE {
            return Err(SimError::Config(format!(
                "file_size {} exceeds the maximum of {}",
                self.file_size, MAX_FILE_SIZE
            )));
        }

        let record_size = self.record_size();
        if self.file_size % record_size != 0 {
            return Err(SimError::Config(format!(
                "file_size {} is not a multiple of the record size {}",
                self.file_size, record_size
            )));
        }

        if let Some(last) = self.file_size.checked_sub(record_size) {
            let needed = encoded_key_len(last);
            if needed > self.key_size {
                return Err(SimError::Config(format!(
                    "key_size {} cannot hold offset {} ({} bytes encoded)",
                    self.key_size, last, needed
                )));
            }
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the disk block size (in bytes)
    pub fn block_size(mut self, bytes: u64) -> Self {
        self.config.block_size = bytes;
        self
    }

    /// Set the simulated disk IOPS
    pub fn iops(mut self, iops: u32) -> Self {
        self.config.iops = iops;
        self
    }

    /// Set the record key size (in bytes)
    pub fn key_size(mut self, bytes: usize) -> Self {
        self.config.key_size = bytes;
        self
    }

    /// Set the record value size (in bytes)
    pub fn value_size(mut self, bytes: usize) -> Self {
        self.config.value_size = bytes;
        self
    }

    /// Set the buffer cache capacity (in blocks)
    pub fn cache_capacity(mut self, blocks: usize) -> Self {
        self.config.cache_capacity = blocks;
        self
    }

    /// Set the data file size (in bytes)
    pub fn file_size(mut self, bytes: u64) -> Self {
        self.config.file_size = bytes;
        self
    }

    /// Set the data file size as a number of records
    ///
    /// Uses the key and value sizes set so far, so call it last. A count
    /// whose byte size overflows saturates, and `validate` rejects it.
    pub fn records(mut self, count: u64) -> Self {
        self.config.file_size = count
            .checked_mul(self.config.record_size())
            .unwrap_or(u64::MAX);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
