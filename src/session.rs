//! Sort Session
//!
//! Drives a node through a sort by repeated linear scans: each step rewinds
//! the data file and finds the record after the last one returned. The
//! simulated time after each step is what the benchmark reports.

use std::time::Duration;

use crate::error::Result;
use crate::file::File;
use crate::node::Node;
use crate::record::{RecordLayout, RecordOffset};
use crate::scan::find_next;

/// Simulated time checkpoints of a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Clock reading once the data file is open
    pub startup: Duration,

    /// Clock reading after the first record was produced
    pub first_record: Option<Duration>,

    /// Clock reading after each step, in step order
    pub steps: Vec<Duration>,

    /// Clock reading once every record was produced, if the run got there
    pub all_records: Option<Duration>,
}

impl Metrics {
    /// Simulated time spent by step `i` alone
    pub fn step_cost(&self, i: usize) -> Option<Duration> {
        let end = *self.steps.get(i)?;
        let start = match i {
            0 => self.startup,
            _ => self.steps[i - 1],
        };
        Some(end - start)
    }
}

/// Sort by linear scan over one node's data file
pub struct LinearScanSort {
    node: Node,
    file: File,
    layout: RecordLayout,
    last: RecordOffset,
    exhausted: bool,
}

impl LinearScanSort {
    /// Open the node's data file and position the cursor before every record
    ///
    /// # Panics
    /// If the node's data file was already opened elsewhere.
    pub fn startup(node: Node) -> Self {
        let file = node.open_file();
        let layout = node.config().layout();
        Self {
            node,
            file,
            layout,
            last: RecordOffset::start(layout),
            exhausted: false,
        }
    }

    /// Produce the next record in key order, or `None` once all are out
    ///
    /// After the end has been reported no further I/O is issued.
    pub fn next_record(&mut self) -> Result<Option<RecordOffset>> {
        if self.exhausted {
            return Ok(None);
        }

        self.file.rewind();
        let next = find_next(&self.file, &self.last, self.layout)?;
        if next.is_end() {
            self.exhausted = true;
            return Ok(None);
        }

        self.last = next.clone();
        Ok(Some(next))
    }

    /// Step through at most `limit` records (all of them if `None`)
    pub fn run(&mut self, limit: Option<u64>) -> Result<Metrics> {
        let mut metrics = Metrics {
            startup: self.node.get_time(),
            ..Metrics::default()
        };

        let mut produced = 0u64;
        while limit.map_or(true, |n| produced < n) {
            let next = self.next_record()?;
            let now = self.node.get_time();
            match next {
                Some(_) => {
                    produced += 1;
                    metrics.steps.push(now);
                    metrics.first_record.get_or_insert(now);
                }
                None => {
                    metrics.all_records = Some(now);
                    break;
                }
            }
        }

        Ok(metrics)
    }

    /// Last record produced (the MIN sentinel before the first step)
    pub fn last(&self) -> &RecordOffset {
        &self.last
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn file(&self) -> &File {
        &self.file
    }
}
