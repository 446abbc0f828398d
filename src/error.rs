//! Error types for sortsim
//!
//! Only configuration and record decoding can fail recoverably. Contract
//! violations (opening the data file twice, a read size that would overflow
//! the file cursor) panic at the point of detection.

use thiserror::Error;

/// Result type alias using SimError
pub type Result<T> = std::result::Result<T, SimError>;

/// Unified error type for sortsim operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Record size mismatch: expected {expected} bytes, got {actual}")]
    RecordSize { expected: usize, actual: usize },
}
