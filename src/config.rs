//! Configuration Module
//!
//! Lifetime and file store construction parameters.

use std::path::PathBuf;
use std::time::Duration;

/// Default relative path of the shared database file.
pub const DEFAULT_DATABASE_PATH: &str = ".kv_cache";

// == Lifetime ==
/// Maximum age an entry stays visible to reads.
///
/// Fixed per file store at construction time. `Unbounded` is the explicit
/// never-expires variant; no sentinel duration is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Entries never expire
    Unbounded,
    /// Entries expire once their age reaches the given duration
    Bounded(Duration),
}

impl Lifetime {
    // == Seconds ==
    /// Creates a bounded lifetime of `secs` seconds.
    pub fn seconds(secs: u64) -> Self {
        Lifetime::Bounded(Duration::from_secs(secs))
    }

    // == Is Fresh ==
    /// Checks whether an entry of the given age is still visible.
    ///
    /// The comparison is strict: an entry whose age has reached a bounded
    /// lifetime is already stale.
    pub fn is_fresh(&self, age: Duration) -> bool {
        match self {
            Lifetime::Unbounded => true,
            Lifetime::Bounded(limit) => age < *limit,
        }
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Lifetime::Unbounded
    }
}

// == File Store Config ==
/// Construction parameters for a file store.
///
/// Only honored by the first construction for a given store name; later
/// constructions return the already-registered store unchanged.
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    /// Path of the backing database file
    pub path: PathBuf,
    /// Entry lifetime applied on reads
    pub lifetime: Lifetime,
}

impl FileStoreConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backing database path.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the entry lifetime.
    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
            lifetime: Lifetime::Unbounded,
        }
    }
}
