//! Error types for the caching layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Store Error Enum ==
/// Unified error type for the caching layer.
///
/// Absence is never an error: a missing or expired entry is reported
/// through the normal return value of `get`, not through this enum.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing database file cannot be opened, read, or flushed
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A store's partition is present but not in the expected shape
    #[error("Partition corrupt: {0}")]
    PartitionCorrupt(String),
}

// == Result Type Alias ==
/// Convenience Result type for the caching layer.
pub type Result<T> = std::result::Result<T, StoreError>;
