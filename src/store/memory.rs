//! Memory Store Module
//!
//! Volatile key-value storage for a single process run.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use serde_json::Value;

use crate::store::Registry;

/// Registry of named memory store handles.
static REGISTRY: OnceLock<Registry<MemoryStore>> = OnceLock::new();

/// Backing map shared by every memory store in the process.
static ENTRIES: OnceLock<RwLock<HashMap<String, Value>>> = OnceLock::new();

fn registry() -> &'static Registry<MemoryStore> {
    REGISTRY.get_or_init(Registry::new)
}

fn entries() -> &'static RwLock<HashMap<String, Value>> {
    ENTRIES.get_or_init(|| RwLock::new(HashMap::new()))
}

// == Memory Store ==
/// Volatile key-value store, shared for the lifetime of the process.
///
/// Construction is routed through a process-wide registry: repeated
/// construction with the same name returns a handle to the same instance.
/// The backing map is a single flat namespace shared across all named
/// instances — a key written through one store is visible through every
/// other, whatever its name. Entries never expire.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Debug)]
struct MemoryStoreInner {
    name: String,
}

impl MemoryStore {
    // == Constructor ==
    /// Returns the memory store registered under `name`, creating it on
    /// first use.
    pub fn new(name: &str) -> Self {
        registry().get_or_create(name, || Self {
            inner: Arc::new(MemoryStoreInner {
                name: name.to_string(),
            }),
        })
    }

    /// Name this store was registered under.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    // == Set ==
    /// Stores a value, overwriting any previous value for `key`.
    pub fn set(&self, key: &str, value: Value) {
        let mut entries = entries().write().expect("memory store lock poisoned");
        entries.insert(key.to_string(), value);
    }

    // == Get ==
    /// Returns the stored value, or `None` if the key was never set.
    pub fn get(&self, key: &str) -> Option<Value> {
        let entries = entries().read().expect("memory store lock poisoned");
        entries.get(key).cloned()
    }

    // == Keys ==
    /// Iterates over a snapshot of all keys in the shared backing map.
    ///
    /// The snapshot is taken when `keys` is called; restart the iteration
    /// by calling `keys` again.
    pub fn keys(&self) -> impl Iterator<Item = String> {
        let entries = entries().read().expect("memory store lock poisoned");
        entries.keys().cloned().collect::<Vec<_>>().into_iter()
    }
}

// == PartialEq Implementation ==
/// Two handles are equal when they refer to the same registered instance.
impl PartialEq for MemoryStore {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for MemoryStore {}
