//! # sortsim
//!
//! Storage layer of a single sort-benchmark node, simulated:
//! - A synthetic disk whose blocks are generated from their address and
//!   which charges a fixed simulated time per block read
//! - An LRU buffer cache in front of the disk
//! - File handles serving byte-range reads through the cache
//! - A duplicate-aware "next record" scan, the inner step of an external sort
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 LinearScanSort / find_next                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ read(record_size)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         File                                 │
//! │            (cursor, EOF, block-aligned window)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ read_block(aligned)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     BufferCache (LRU)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ miss
//!          ┌────────────▼────────────┐        ┌─────────────┐
//!          │          Disk           │───────▶│    Clock    │
//!          │  (DataGenerator, 1/IOPS)│        │ (simulated) │
//!          └─────────────────────────┘        └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod block;
pub mod clock;
pub mod datagen;
pub mod disk;
pub mod cache;
pub mod file;
pub mod record;
pub mod scan;
pub mod node;
pub mod session;
pub mod verify;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SimError, Result};
pub use config::Config;
pub use node::Node;
pub use file::File;
pub use record::{Record, RecordLayout, RecordOffset};
pub use scan::find_next;
pub use session::{LinearScanSort, Metrics};
pub use verify::{verify_file, VerifyReport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of sortsim
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
