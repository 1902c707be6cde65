//! Shared configuration map
//!
//! Name-keyed collection of configuration instances, stored in the registry
//! under [`CONFIGURATIONS`](crate::CONFIGURATIONS) and handed to every tag
//! resolver ahead of decoding. Unlike the instance registry, entries may be
//! replaced: configurations are rebuilt by their owners, not contested.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::registry::Instance;

/// Shared name-to-instance configuration mapping.
#[derive(Default)]
pub struct ConfigMap {
    entries: RwLock<HashMap<String, Instance>>,
}

impl ConfigMap {
    /// Create a new empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a configuration instance under `name`, replacing any previous
    /// entry.
    pub fn set(&self, name: impl Into<String>, instance: Instance) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.into(), instance);
    }

    /// Look up a configuration instance by name.
    pub fn get(&self, name: &str) -> Option<Instance> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    /// Look up and downcast a configuration instance.
    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.get(name)?.downcast::<T>().ok()
    }

    /// Whether a configuration is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(name)
    }

    /// Number of stored configurations.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the map holds no configurations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct CacheConfiguration {
        ttl_seconds: u64,
    }

    #[test]
    fn set_get_round_trip() {
        let map = ConfigMap::new();
        assert!(map.is_empty());

        map.set("cache", Arc::new(CacheConfiguration { ttl_seconds: 30 }));
        assert!(map.contains("cache"));
        assert_eq!(map.len(), 1);

        let config = map.get_as::<CacheConfiguration>("cache").unwrap();
        assert_eq!(config.ttl_seconds, 30);
    }

    #[test]
    fn set_replaces_previous_entries() {
        let map = ConfigMap::new();
        map.set("cache", Arc::new(CacheConfiguration { ttl_seconds: 30 }));
        map.set("cache", Arc::new(CacheConfiguration { ttl_seconds: 60 }));

        let config = map.get_as::<CacheConfiguration>("cache").unwrap();
        assert_eq!(config.ttl_seconds, 60);
    }

    #[test]
    fn get_misses_for_unknown_names() {
        let map = ConfigMap::new();
        assert!(map.get("unknown").is_none());
    }
}
