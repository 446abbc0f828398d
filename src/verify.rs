//! Stream verification
//!
//! Reads a node's data file once in a single read and again, rewound, in
//! record-sized reads. Both passes must yield the same bytes, and the
//! re-read must miss exactly the blocks the LRU cannot still hold:
//!
//! | File vs cache              | Re-read misses      |
//! |----------------------------|---------------------|
//! | more blocks than capacity  | same as first pass  |
//! | fits in the cache          | 0                   |

use crate::config::Config;
use crate::file::File;
use crate::node::Node;

/// CRC32 and length of one full pass over a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDigest {
    pub crc32: u32,
    pub len: u64,
}

impl StreamDigest {
    /// Rewind `file` and digest it to EOF in `chunk`-byte reads
    pub fn of(file: &File, chunk: u64) -> Self {
        let mut hasher = crc32fast::Hasher::new();
        let mut len = 0u64;

        file.rewind();
        loop {
            let bytes = file.read(chunk);
            if file.is_eof() {
                break;
            }
            len += bytes.len() as u64;
            hasher.update(&bytes);
        }

        Self {
            crc32: hasher.finalize(),
            len,
        }
    }
}

/// Outcome of a whole-file pass followed by a rewound, chunked re-read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub size: u64,
    pub whole: StreamDigest,
    pub chunked: StreamDigest,
    pub whole_misses: u64,
    pub chunked_misses: u64,
    pub expected_misses: u64,
}

impl VerifyReport {
    pub fn streams_match(&self) -> bool {
        self.whole == self.chunked && self.whole.len == self.size
    }

    pub fn misses_match(&self) -> bool {
        self.chunked_misses == self.expected_misses
    }

    pub fn is_ok(&self) -> bool {
        self.streams_match() && self.misses_match()
    }
}

/// Disk misses a rewound full re-read should take after a pass that missed
/// `first_pass` times
pub fn expected_reread_misses(config: &Config, first_pass: u64) -> u64 {
    if config.block_count() > config.cache_capacity as u64 {
        first_pass
    } else {
        0
    }
}

/// Run both passes over `file`, which must belong to `node`
pub fn verify_file(node: &Node, file: &File) -> VerifyReport {
    let size = file.size();

    let before = node.disk().reads();
    let whole = StreamDigest::of(file, size.max(1));
    let whole_misses = node.disk().reads() - before;

    let before = node.disk().reads();
    let chunked = StreamDigest::of(file, node.config().record_size());
    let chunked_misses = node.disk().reads() - before;

    let report = VerifyReport {
        size,
        whole,
        chunked,
        whole_misses,
        chunked_misses,
        expected_misses: expected_reread_misses(node.config(), whole_misses),
    };

    tracing::debug!(?report, "file verified");
    report
}
