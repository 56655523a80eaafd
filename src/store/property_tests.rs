//! Property-Based Tests for Store Module
//!
//! Uses proptest to verify correctness properties of the pure store core.

use proptest::prelude::*;
use serde_json::json;
use std::time::Duration;

use crate::config::Lifetime;
use crate::store::MemoryStore;

// == Strategies ==
/// Generates keys under a per-property prefix so parallel tests sharing
/// the process-wide backing map cannot collide.
fn key_strategy(prefix: &'static str) -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,24}".prop_map(move |s| format!("{}.{}", prefix, s))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // *For any* key-value pair written to a memory store, an immediate
    // read returns the value just written.
    #[test]
    fn prop_memory_read_your_write(
        key in key_strategy("prop_ryw"),
        value in "[a-zA-Z0-9 ]{0,64}",
    ) {
        let store = MemoryStore::new("prop_ryw");

        store.set(&key, json!(value.clone()));

        prop_assert_eq!(store.get(&key), Some(json!(value)));
    }

    // *For any* key, writing v1 and then v2 leaves v2 visible.
    #[test]
    fn prop_memory_last_write_wins(
        key in key_strategy("prop_lww"),
        v1 in "[a-z]{1,16}",
        v2 in "[a-z]{1,16}",
    ) {
        let store = MemoryStore::new("prop_lww");

        store.set(&key, json!(v1));
        store.set(&key, json!(v2.clone()));

        prop_assert_eq!(store.get(&key), Some(json!(v2)));
    }

    // *For any* name, repeated construction returns the same instance.
    #[test]
    fn prop_registry_identity(name in key_strategy("prop_identity")) {
        let first = MemoryStore::new(&name);
        let second = MemoryStore::new(&name);

        prop_assert_eq!(first, second);
    }

    // *For any* bounded lifetime, ages strictly below the bound are fresh
    // and ages at or past the bound are stale.
    #[test]
    fn prop_lifetime_strict_bound(secs in 1u64..3600, slack_ms in 0u64..1000) {
        let lifetime = Lifetime::seconds(secs);
        let below = Duration::from_secs(secs) - Duration::from_millis(slack_ms + 1);
        let at_or_past = Duration::from_secs(secs) + Duration::from_millis(slack_ms);

        prop_assert!(lifetime.is_fresh(below));
        prop_assert!(!lifetime.is_fresh(at_or_past));
    }

    // *For any* age, an unbounded lifetime stays fresh.
    #[test]
    fn prop_lifetime_unbounded_always_fresh(ms in 0u64..u64::MAX / 2) {
        prop_assert!(Lifetime::Unbounded.is_fresh(Duration::from_millis(ms)));
    }
}
