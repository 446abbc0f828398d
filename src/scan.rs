//! Linear "next record" scan
//!
//! One step of a duplicate-aware external sort: walk the whole file once and
//! pick the smallest record that comes after the previous result. No index
//! is kept between calls, so each step costs a full pass of I/O.

use std::cmp::Ordering;

use crate::error::Result;
use crate::file::File;
use crate::record::{Record, RecordLayout, RecordOffset};

/// Find the record following `after` in key order
///
/// A record qualifies if its key is greater than `after`'s, or equal to it
/// with a later scan position. Among qualifying records the smallest key
/// wins, and the earliest position wins among equal keys.
///
/// Reads from the file's current position; callers rewind first. Returns
/// the MAX sentinel at position 0 when nothing qualifies.
pub fn find_next(file: &File, after: &RecordOffset, layout: RecordLayout) -> Result<RecordOffset> {
    let record_size = layout.record_size() as u64;
    let mut best = RecordOffset::end(layout);

    for position in 1u64.. {
        let bytes = file.read(record_size);
        if file.is_eof() {
            break;
        }

        let next = Record::decode(&bytes, layout)?;
        if admits(&next, position, after, &best) {
            best = RecordOffset::new(next, position);
        }
    }

    tracing::debug!(
        position = best.position,
        end = best.is_end(),
        "scan found next record"
    );

    Ok(best)
}

fn admits(next: &Record, position: u64, after: &RecordOffset, best: &RecordOffset) -> bool {
    match next.compare(&after.record) {
        Ordering::Less => false,
        // Same key: only a duplicate further along the file is still due
        Ordering::Equal => position > after.position && next.less_than(&best.record),
        Ordering::Greater => next.less_than(&best.record),
    }
}
