//! Synthetic block content
//!
//! The simulated disk stores nothing; every block is generated on demand from
//! its address. The data file is a sequence of fixed-size record cells, and
//! the key of the cell starting at byte offset `k` encodes a value derived
//! from `k` (for the uniform generator, `k` itself).
//!
//! ## Key Encoding
//! ```text
//! ┌─────────┬──────────────────────────────┬──────────────┐
//! │ Len (1) │ Offset, big-endian (Len B)   │ zero padding │
//! └─────────┴──────────────────────────────┴──────────────┘
//! ```
//! `Len` is the number of significant bytes of the offset (0 for offset 0).
//! Shorter encodings are smaller numbers and equal lengths compare
//! big-endian, so byte-wise key order equals numeric offset order.

use bytes::Bytes;

use crate::block::{Block, BlockAddr};

/// Longest possible encoded key: length byte + 8 offset bytes
pub const MAX_ENCODED_KEY_LEN: usize = 9;

/// Produces the content of one block from its aligned address
pub trait DataGenerator: Send + Sync {
    /// Generate `block_size` bytes for the block starting at `addr`
    fn generate(&self, addr: BlockAddr, block_size: u64) -> Block;
}

// =============================================================================
// Key Encoding
// =============================================================================

fn significant_bytes(value: u64) -> usize {
    (64 - value.leading_zeros() as usize).div_ceil(8)
}

/// Number of bytes `encode_offset_key` produces for `offset`
pub fn encoded_key_len(offset: u64) -> usize {
    1 + significant_bytes(offset)
}

fn encode_into(offset: u64) -> ([u8; MAX_ENCODED_KEY_LEN], usize) {
    let len = significant_bytes(offset);
    let mut buf = [0u8; MAX_ENCODED_KEY_LEN];
    buf[0] = len as u8;
    buf[1..=len].copy_from_slice(&offset.to_be_bytes()[8 - len..]);
    (buf, 1 + len)
}

/// Encode an offset as an order-preserving key prefix
pub fn encode_offset_key(offset: u64) -> Vec<u8> {
    let (buf, len) = encode_into(offset);
    buf[..len].to_vec()
}

/// Decode the offset stamped at the front of `key`
///
/// Returns `None` if the length byte is out of range or the key is too
/// short to hold the bytes it announces.
pub fn decode_offset_key(key: &[u8]) -> Option<u64> {
    let (&len, rest) = key.split_first()?;
    let len = len as usize;
    if len > 8 || rest.len() < len {
        return None;
    }
    Some(rest[..len].iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
}

// =============================================================================
// Cell Stamping
// =============================================================================

/// Render every record cell overlapping `[addr, addr + block_size)`.
///
/// Cells that began in an earlier block still contribute the tail of their
/// key, so a key straddling a block boundary reads back intact.
fn stamp_cells(
    addr: BlockAddr,
    block_size: u64,
    record_size: u64,
    key_for: impl Fn(u64) -> u64,
) -> Block {
    let start = addr.offset();
    let end = start.saturating_add(block_size);
    let mut block = vec![0u8; block_size as usize];

    let mut cell = start / record_size * record_size;
    while cell < end {
        let (key, len) = encode_into(key_for(cell));
        let lo = cell.max(start);
        let hi = cell.saturating_add(len as u64).min(end);
        if lo < hi {
            block[(lo - start) as usize..(hi - start) as usize]
                .copy_from_slice(&key[(lo - cell) as usize..(hi - cell) as usize]);
        }

        match cell.checked_add(record_size) {
            Some(next) => cell = next,
            None => break,
        }
    }

    Bytes::from(block)
}

// =============================================================================
// Generators
// =============================================================================

/// Every record's key is its own byte offset; all keys are distinct
#[derive(Debug, Clone, Copy)]
pub struct UniformGenerator {
    record_size: u64,
}

impl UniformGenerator {
    pub fn new(record_size: u64) -> Self {
        Self { record_size }
    }
}

impl DataGenerator for UniformGenerator {
    fn generate(&self, addr: BlockAddr, block_size: u64) -> Block {
        stamp_cells(addr, block_size, self.record_size, |cell| cell)
    }
}

/// Keys cycle through `distinct` record offsets, so every key repeats
/// once per `distinct` records.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateGenerator {
    record_size: u64,
    distinct: u64,
}

impl DuplicateGenerator {
    pub fn new(record_size: u64, distinct: u64) -> Self {
        Self {
            record_size,
            distinct: distinct.max(1),
        }
    }
}

impl DataGenerator for DuplicateGenerator {
    fn generate(&self, addr: BlockAddr, block_size: u64) -> Block {
        let record_size = self.record_size;
        let distinct = self.distinct;
        stamp_cells(addr, block_size, record_size, |cell| {
            (cell / record_size % distinct) * record_size
        })
    }
}
