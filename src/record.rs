//! Records
//!
//! A record is a fixed-size key followed by a fixed-size value. Records are
//! ordered by key bytes only (unsigned, lexicographic); values never take
//! part in comparisons.

use std::cmp::Ordering;

use bytes::Bytes;

use crate::error::{Result, SimError};

/// Key/value byte widths of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub key_size: usize,
    pub value_size: usize,
}

impl RecordLayout {
    pub fn new(key_size: usize, value_size: usize) -> Self {
        Self {
            key_size,
            value_size,
        }
    }

    pub fn record_size(&self) -> usize {
        self.key_size + self.value_size
    }
}

/// A decoded record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    key: Bytes,
    value: Bytes,
}

impl Record {
    /// Build a record from its parts
    pub fn new(key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Sentinel below every key: all zero bytes
    pub fn min(layout: RecordLayout) -> Self {
        Self::new(vec![0u8; layout.key_size], vec![0u8; layout.value_size])
    }

    /// Sentinel above every key: all 0xFF bytes
    pub fn max(layout: RecordLayout) -> Self {
        Self::new(vec![0xFFu8; layout.key_size], vec![0u8; layout.value_size])
    }

    /// Split exactly one record's worth of bytes into key and value
    ///
    /// The returned record shares `bytes`' storage.
    pub fn decode(bytes: &Bytes, layout: RecordLayout) -> Result<Self> {
        if bytes.len() != layout.record_size() {
            return Err(SimError::RecordSize {
                expected: layout.record_size(),
                actual: bytes.len(),
            });
        }

        Ok(Self {
            key: bytes.slice(..layout.key_size),
            value: bytes.slice(layout.key_size..),
        })
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Compare keys byte-wise
    pub fn compare(&self, other: &Record) -> Ordering {
        self.key[..].cmp(&other.key[..])
    }

    pub fn less_than(&self, other: &Record) -> bool {
        self.compare(other) == Ordering::Less
    }

    pub fn less_or_equal(&self, other: &Record) -> bool {
        self.compare(other) != Ordering::Greater
    }
}

/// A record together with its 1-based position in a forward scan
///
/// Position 0 never names a real record; it marks the sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOffset {
    pub record: Record,
    pub position: u64,
}

impl RecordOffset {
    pub fn new(record: Record, position: u64) -> Self {
        Self { record, position }
    }

    /// Starting cursor: MIN sentinel at position 0
    pub fn start(layout: RecordLayout) -> Self {
        Self::new(Record::min(layout), 0)
    }

    /// "No next record": MAX sentinel at position 0
    pub fn end(layout: RecordLayout) -> Self {
        Self::new(Record::max(layout), 0)
    }

    /// Whether this is the "no next record" result of a scan
    pub fn is_end(&self) -> bool {
        self.position == 0 && self.record.key().iter().all(|&b| b == 0xFF)
    }
}
