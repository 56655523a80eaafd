//! Store Registry Module
//!
//! Deduplicates store construction by name, one registry per backend type.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

// == Registry ==
/// Process-wide map from store name to live instance.
///
/// Each backend owns one `Registry` in a static; `get_or_create` returns
/// the instance registered under a name, running the constructor only on
/// first use. Construction arguments captured by the closure are ignored
/// on every later call for the same name — callers asking for an existing
/// name get the instance as originally configured.
///
/// There is no removal: registered instances live as long as the process.
/// The mutex is held across construction, so concurrent calls for the
/// same name cannot construct twice.
#[derive(Debug)]
pub struct Registry<T> {
    instances: Mutex<HashMap<String, T>>,
}

impl<T: Clone> Registry<T> {
    // == Constructor ==
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
        }
    }

    // == Get Or Create ==
    /// Returns the instance registered under `name`, constructing and
    /// registering it first if absent.
    pub fn get_or_create<F>(&self, name: &str, construct: F) -> T
    where
        F: FnOnce() -> T,
    {
        let mut instances = self.lock();
        instances
            .entry(name.to_string())
            .or_insert_with(construct)
            .clone()
    }

    // == Get Or Try Create ==
    /// Fallible variant of `get_or_create`.
    ///
    /// A failed construction registers nothing, so the next call for the
    /// same name runs the constructor again.
    pub fn get_or_try_create<F, E>(&self, name: &str, construct: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut instances = self.lock();
        if let Some(existing) = instances.get(name) {
            return Ok(existing.clone());
        }

        let created = construct()?;
        instances.insert(name.to_string(), created.clone());
        Ok(created)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, T>> {
        self.instances.lock().expect("registry mutex poisoned")
    }
}

impl<T: Clone> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_registry_same_name_same_instance() {
        let registry: Registry<Arc<String>> = Registry::new();

        let first = registry.get_or_create("a", || Arc::new("one".to_string()));
        let second = registry.get_or_create("a", || Arc::new("two".to_string()));

        assert!(Arc::ptr_eq(&first, &second));
        // Later construction arguments are ignored
        assert_eq!(*second, "one");
    }

    #[test]
    fn test_registry_distinct_names_distinct_instances() {
        let registry: Registry<Arc<String>> = Registry::new();

        let first = registry.get_or_create("a", || Arc::new("one".to_string()));
        let second = registry.get_or_create("b", || Arc::new("two".to_string()));

        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_registry_failed_construction_not_registered() {
        let registry: Registry<Arc<String>> = Registry::new();

        let failed: Result<Arc<String>, &str> = registry.get_or_try_create("a", || Err("boom"));
        assert_eq!(failed.unwrap_err(), "boom");

        // The name stayed free, so the constructor runs again
        let created = registry
            .get_or_try_create("a", || Ok::<_, &str>(Arc::new("ok".to_string())))
            .unwrap();
        assert_eq!(*created, "ok");
    }

    #[test]
    fn test_registry_concurrent_construction_runs_once() {
        let registry: Arc<Registry<Arc<String>>> = Arc::new(Registry::new());
        let constructions = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let constructions = Arc::clone(&constructions);
                std::thread::spawn(move || {
                    registry.get_or_create("shared", move || {
                        constructions.fetch_add(1, Ordering::SeqCst);
                        Arc::new("value".to_string())
                    })
                })
            })
            .collect();

        let instances: Vec<Arc<String>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        for instance in &instances[1..] {
            assert!(Arc::ptr_eq(&instances[0], instance));
        }
    }
}
