//! Block addressing
//!
//! Addresses are byte offsets into the node's logical address space. A raw
//! address is a read target; an aligned one names a block on the disk and in
//! the buffer cache.

use std::fmt;

use bytes::Bytes;

/// Immutable block content, cheap to clone and share between cache and files
pub type Block = Bytes;

/// Byte offset into the logical address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BlockAddr(pub u64);

impl BlockAddr {
    /// Round down to the start of the containing block
    pub fn align(self, block_size: u64) -> Self {
        Self(self.0 / block_size * block_size)
    }

    /// Whether this address starts a block
    pub fn is_aligned(self, block_size: u64) -> bool {
        self.0 % block_size == 0
    }

    pub fn offset(self) -> u64 {
        self.0
    }
}

impl From<u64> for BlockAddr {
    fn from(offset: u64) -> Self {
        Self(offset)
    }
}

impl fmt::Display for BlockAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
