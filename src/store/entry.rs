//! File Store Entry Module
//!
//! Defines the persisted entry shape with its last-write timestamp.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Lifetime;

// == File Entry ==
/// A single persisted entry: opaque value plus last-write timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// The stored value
    pub value: Value,
    /// Timestamp of the most recent write (RFC 3339 on disk)
    pub updated_at: DateTime<Utc>,
}

impl FileEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            updated_at: Utc::now(),
        }
    }

    // == Age ==
    /// Time elapsed since the last write.
    ///
    /// A timestamp in the future (clock adjustment between writes) reads
    /// as age zero.
    pub fn age(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.updated_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    // == Is Fresh ==
    /// Checks the entry against a store lifetime.
    pub fn is_fresh(&self, lifetime: Lifetime) -> bool {
        lifetime.is_fresh(self.age())
    }
}
