//! Pull-based stats aggregation.
//!
//! Counters (or anything else with reportable state) register under a name;
//! an external aggregator calls [`StatsRegistry::collect`] to pull every
//! producer's serialized stats on demand. Nothing is pushed: producers are
//! only queried when someone asks.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ratewatch::{EventCounter, MatchAll, StatsProducer, StatsRegistry};
//!
//! let registry = StatsRegistry::new();
//! let counter = Arc::new(EventCounter::with_capacity(3, MatchAll));
//! registry.register("rx", Arc::clone(&counter) as Arc<dyn StatsProducer>);
//!
//! counter.observe("packet".to_string());
//!
//! let stats = registry.collect();
//! assert_eq!(stats["rx"]["total"], 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;

use crate::counter::EventCounter;

/// Named source of serialized stats.
///
/// Implementations serialize their current state on every call; the
/// registry never caches.
pub trait StatsProducer: Send + Sync {
    /// Current stats as a JSON value.
    fn stats(&self) -> Value;
}

/// Counters expose their snapshot as stats when the item type serializes.
impl<T> StatsProducer for EventCounter<T>
where
    T: Serialize + Clone + Send,
{
    fn stats(&self) -> Value {
        serde_json::to_value(self.snapshot()).unwrap_or(Value::Null)
    }
}

/// Registry of named stats producers queried on demand.
///
/// Registration and collection are safe from any task or thread.
#[derive(Default)]
pub struct StatsRegistry {
    producers: DashMap<String, Arc<dyn StatsProducer>>,
}

impl StatsRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            producers: DashMap::new(),
        }
    }

    /// Register a producer under a name.
    ///
    /// An existing producer under the same name is replaced.
    pub fn register(&self, name: impl Into<String>, producer: Arc<dyn StatsProducer>) {
        self.producers.insert(name.into(), producer);
    }

    /// Remove a producer. Returns true if it was registered.
    pub fn unregister(&self, name: &str) -> bool {
        self.producers.remove(name).is_some()
    }

    /// Query every producer and collect their stats, sorted by name.
    pub fn collect(&self) -> BTreeMap<String, Value> {
        self.producers
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().stats()))
            .collect()
    }

    /// Number of registered producers.
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    /// Whether the registry has no producers.
    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }
}

impl fmt::Debug for StatsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsRegistry")
            .field("producers", &self.producers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::MatchAll;
    use serde_json::json;

    struct StaticProducer(Value);

    impl StatsProducer for StaticProducer {
        fn stats(&self) -> Value {
            self.0.clone()
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = StatsRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.collect().is_empty());
    }

    #[test]
    fn test_register_and_collect() {
        let registry = StatsRegistry::new();
        registry.register("uptime", Arc::new(StaticProducer(json!({"seconds": 12}))));

        let stats = registry.collect();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats["uptime"]["seconds"], 12);
    }

    #[test]
    fn test_counter_as_producer() {
        let registry = StatsRegistry::new();
        let counter = Arc::new(EventCounter::with_capacity(2, MatchAll));
        registry.register("rx", Arc::clone(&counter) as Arc<dyn StatsProducer>);

        counter.observe("a".to_string());
        counter.observe("b".to_string());
        counter.observe("c".to_string());

        let stats = registry.collect();
        assert_eq!(stats["rx"]["total"], 3);
        assert_eq!(stats["rx"]["recent"], json!(["b", "c"]));
        assert_eq!(stats["rx"]["capacity"], 2);
    }

    #[test]
    fn test_register_replaces_existing_name() {
        let registry = StatsRegistry::new();
        registry.register("stats", Arc::new(StaticProducer(json!(1))));
        registry.register("stats", Arc::new(StaticProducer(json!(2))));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.collect()["stats"], json!(2));
    }

    #[test]
    fn test_unregister() {
        let registry = StatsRegistry::new();
        registry.register("gone", Arc::new(StaticProducer(json!(null))));

        assert!(registry.unregister("gone"));
        assert!(!registry.unregister("gone"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_collect_is_sorted_by_name() {
        let registry = StatsRegistry::new();
        registry.register("zeta", Arc::new(StaticProducer(json!(1))));
        registry.register("alpha", Arc::new(StaticProducer(json!(2))));

        let names: Vec<String> = registry.collect().into_keys().collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
