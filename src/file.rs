//! File handles
//!
//! A `File` is a cursor over a logical byte stream of fixed size, backed by
//! the buffer cache. Reads of any size and offset are turned into
//! block-aligned cache reads; the blocks from the last fetch are kept as a
//! window so that consecutive small reads cost nothing extra.
//!
//! ## States
//! ```text
//!   fresh (pos 0) ──read──▶ mid-stream ──read──▶ pos == size
//!        ▲                                          │ read
//!        └──────────────── rewind ◀──── exhausted (EOF) ◀┘
//! ```

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;

use crate::block::BlockAddr;
use crate::cache::BufferCache;

/// Mutable per-handle state
#[derive(Debug, Default)]
struct Cursor {
    pos: u64,
    eof: bool,
    /// Concatenated blocks covering `[window_start, window_end)`
    window: Bytes,
    window_start: u64,
    window_end: u64,
}

impl Cursor {
    fn window_covers(&self, offset: u64, len: u64) -> bool {
        self.window_start <= offset && offset + len <= self.window_end
    }
}

/// Open handle on a node's data file
///
/// All operations take the handle's own lock, so concurrent callers sharing
/// one handle see a single, totally ordered cursor.
pub struct File {
    cache: Arc<BufferCache>,
    size: u64,
    cursor: Mutex<Cursor>,
}

impl File {
    pub fn new(cache: Arc<BufferCache>, size: u64) -> Self {
        Self {
            cache,
            size,
            cursor: Mutex::new(Cursor::default()),
        }
    }

    /// Read up to `size` bytes from the current position
    ///
    /// Returns fewer bytes only when the end of the file is reached. A read
    /// issued at the end returns an empty buffer and sets EOF.
    ///
    /// # Panics
    /// If `position + size` overflows `u64`.
    pub fn read(&self, size: u64) -> Bytes {
        let mut cursor = self.cursor.lock();

        if cursor.pos.checked_add(size).is_none() {
            panic!(
                "read of {} bytes at position {} wraps the file cursor",
                size, cursor.pos
            );
        }

        if cursor.pos == self.size {
            cursor.eof = true;
            return Bytes::new();
        }

        let len = size.min(self.size - cursor.pos);
        if !cursor.window_covers(cursor.pos, len) {
            self.fill_window(&mut cursor, len);
        }

        let start = (cursor.pos - cursor.window_start) as usize;
        let data = cursor.window.slice(start..start + len as usize);
        cursor.pos += len;
        data
    }

    /// Replace the window with the blocks covering `[pos, pos + len)`
    fn fill_window(&self, cursor: &mut Cursor, len: u64) {
        let block_size = self.cache.block_size();
        let first = BlockAddr(cursor.pos).align(block_size);
        let end = cursor.pos + len;

        let mut window = BytesMut::new();
        let mut addr = first;
        while addr.offset() < end {
            window.extend_from_slice(&self.cache.read_block(addr));
            addr = BlockAddr(addr.offset() + block_size);
        }

        tracing::trace!(start = %first, end = %addr, "file window refilled");

        cursor.window = window.freeze();
        cursor.window_start = first.offset();
        cursor.window_end = addr.offset();
    }

    /// Reset to the fresh state: position 0, EOF clear, no window
    ///
    /// Only the buffer cache carries over, so a re-read misses exactly the
    /// blocks the cache no longer holds.
    pub fn rewind(&self) {
        *self.cursor.lock() = Cursor::default();
    }

    /// Whether a read has hit the end of the file since the last rewind
    pub fn is_eof(&self) -> bool {
        self.cursor.lock().eof
    }

    pub fn position(&self) -> u64 {
        self.cursor.lock().pos
    }

    /// Logical size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }
}
