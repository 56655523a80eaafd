//! File Store Module
//!
//! Durable TTL-aware key-value storage backed by a shared JSON database
//! file, one partition per store name.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::{FileStoreConfig, Lifetime};
use crate::error::{Result, StoreError};
use crate::store::entry::FileEntry;
use crate::store::Registry;

/// Registry of named file store handles.
static REGISTRY: OnceLock<Registry<FileStore>> = OnceLock::new();

fn registry() -> &'static Registry<FileStore> {
    REGISTRY.get_or_init(Registry::new)
}

/// All entries belonging to one named store.
type Partition = HashMap<String, FileEntry>;

// == Database ==
/// Scoped view of the shared database file.
///
/// Opened at the start of a store operation and dropped at the end;
/// mutations are written back with `flush` before the scope exits. Nothing
/// is held across operations, so the file is never tied up for longer than
/// a single call.
#[derive(Debug)]
struct Database {
    path: PathBuf,
    root: Map<String, Value>,
}

impl Database {
    // == Open ==
    /// Reads and parses the database file; a missing file reads as empty.
    fn open(path: &Path) -> Result<Self> {
        let root = match fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                StoreError::StorageUnavailable(format!(
                    "{} is not a store database: {}",
                    path.display(),
                    err
                ))
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => Map::new(),
            Err(err) => {
                return Err(StoreError::StorageUnavailable(format!(
                    "cannot open {}: {}",
                    path.display(),
                    err
                )))
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            root,
        })
    }

    // == Partition Access ==
    fn contains_partition(&self, name: &str) -> bool {
        self.root.contains_key(name)
    }

    /// Decodes the partition for `name`; a missing partition reads as empty.
    fn partition(&self, name: &str) -> Result<Partition> {
        match self.root.get(name) {
            Some(raw) => serde_json::from_value(raw.clone()).map_err(|err| {
                StoreError::PartitionCorrupt(format!(
                    "partition {:?} is not a key to timestamped-entry map: {}",
                    name, err
                ))
            }),
            None => Ok(Partition::new()),
        }
    }

    /// Replaces the partition for `name` in the in-memory view.
    fn put_partition(&mut self, name: &str, partition: &Partition) -> Result<()> {
        let raw = serde_json::to_value(partition).map_err(|err| {
            StoreError::StorageUnavailable(format!("cannot encode partition {:?}: {}", name, err))
        })?;
        self.root.insert(name.to_string(), raw);
        Ok(())
    }

    // == Flush ==
    /// Writes the whole document back to disk.
    ///
    /// The document goes to a temporary sibling first and is renamed over
    /// the database file, so a crash mid-write leaves the previous
    /// contents intact.
    fn flush(&self) -> Result<()> {
        let data = serde_json::to_vec_pretty(&self.root).map_err(|err| {
            StoreError::StorageUnavailable(format!("cannot encode database: {}", err))
        })?;

        let mut tmp = self.path.as_os_str().to_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, data).map_err(|err| {
            StoreError::StorageUnavailable(format!("cannot write {}: {}", tmp.display(), err))
        })?;
        fs::rename(&tmp, &self.path).map_err(|err| {
            StoreError::StorageUnavailable(format!(
                "cannot replace {}: {}",
                self.path.display(),
                err
            ))
        })?;

        debug!(path = %self.path.display(), "database flushed");
        Ok(())
    }
}

// == File Store ==
/// Durable key-value store with per-entry TTL visibility.
///
/// Each named store owns a partition inside a shared JSON database file.
/// Construction is routed through a process-wide registry: repeated
/// construction with the same name returns the already-registered store
/// and ignores the new configuration. Every `get` and `set` opens the
/// database, performs the operation, and releases it again; no handle is
/// held between calls.
///
/// Expired entries stay on disk; staleness only affects what `get`
/// returns.
#[derive(Debug, Clone)]
pub struct FileStore {
    inner: Arc<FileStoreInner>,
}

#[derive(Debug)]
struct FileStoreInner {
    name: String,
    path: PathBuf,
    lifetime: Lifetime,
}

impl FileStore {
    // == Constructors ==
    /// Returns the file store registered under `name` with the default
    /// configuration, creating it on first use.
    pub fn new(name: &str) -> Result<Self> {
        Self::with_config(name, FileStoreConfig::default())
    }

    /// Returns the file store registered under `name`, creating it with
    /// `config` on first use.
    ///
    /// When `name` is already registered the config is ignored and the
    /// store is returned as originally configured.
    pub fn with_config(name: &str, config: FileStoreConfig) -> Result<Self> {
        registry().get_or_try_create(name, || Self::open(name, config))
    }

    /// Opens the database and initializes this store's partition.
    ///
    /// An existing partition is left untouched, so reconstruction after a
    /// process restart does not clear previously persisted entries.
    fn open(name: &str, config: FileStoreConfig) -> Result<Self> {
        let mut db = Database::open(&config.path)?;
        if !db.contains_partition(name) {
            db.put_partition(name, &Partition::new())?;
            db.flush()?;
            debug!(store = name, path = %config.path.display(), "partition created");
        }

        Ok(Self {
            inner: Arc::new(FileStoreInner {
                name: name.to_string(),
                path: config.path,
                lifetime: config.lifetime,
            }),
        })
    }

    /// Name this store was registered under.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Lifetime applied to reads.
    pub fn lifetime(&self) -> Lifetime {
        self.inner.lifetime
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A hit requires the key to be present and the entry to be younger
    /// than the store lifetime. Everything else — key absent, entry stale —
    /// returns the empty result, an empty JSON object. A stored empty
    /// object is therefore indistinguishable from a miss. Stale entries
    /// are left on disk untouched; no write happens on the read path.
    pub fn get(&self, key: &str) -> Result<Value> {
        let db = Database::open(&self.inner.path)?;
        let partition = db.partition(&self.inner.name)?;

        match partition.get(key) {
            Some(entry) if entry.is_fresh(self.inner.lifetime) => {
                trace!(store = %self.inner.name, key, "hit");
                Ok(entry.value.clone())
            }
            Some(_) => {
                trace!(store = %self.inner.name, key, "stale");
                Ok(Self::empty())
            }
            None => {
                trace!(store = %self.inner.name, key, "miss");
                Ok(Self::empty())
            }
        }
    }

    // == Set ==
    /// Stores a value under `key`, stamping it with the current time.
    ///
    /// Overwrites any previous entry and refreshes its timestamp. The
    /// change is flushed to the database file before this call returns.
    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut db = Database::open(&self.inner.path)?;
        let mut partition = db.partition(&self.inner.name)?;

        partition.insert(key.to_string(), FileEntry::new(value));
        db.put_partition(&self.inner.name, &partition)?;
        db.flush()
    }

    // == Empty Result ==
    /// The result of a miss: an empty JSON object, not null.
    pub fn empty() -> Value {
        Value::Object(Map::new())
    }
}

// == PartialEq Implementation ==
/// Two handles are equal when they refer to the same registered instance.
impl PartialEq for FileStore {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for FileStore {}
