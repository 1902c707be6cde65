//! Testing utilities
//!
//! Injection requires a registry seeded with the two well-known entries;
//! these helpers produce one so tests can focus on the graph under test.
//!
//! # Example
//!
//! ```rust,ignore
//! use armature::testing;
//!
//! let (injector, registry) = testing::configured_injector();
//! registry.put("greetingService", GreetingService::default()).unwrap();
//! injector.inject_fields(&mut controller).unwrap();
//! ```

use std::sync::Arc;

use crate::config::{ConfigMap, SystemConfiguration, CONFIGURATIONS, SYSTEM_CONFIGURATION};
use crate::inject::Injector;
use crate::registry::{InstanceMap, RegistryExt};

/// A registry holding the default system configuration and an empty
/// configuration map under their well-known names.
pub fn configured_registry() -> Arc<InstanceMap> {
    configured_registry_with(SystemConfiguration::default())
}

/// A registry seeded with the given system configuration.
pub fn configured_registry_with(config: SystemConfiguration) -> Arc<InstanceMap> {
    let registry = Arc::new(InstanceMap::new());
    registry
        .put(SYSTEM_CONFIGURATION, config)
        .expect("fresh registry accepts the system configuration");
    registry
        .put(CONFIGURATIONS, ConfigMap::new())
        .expect("fresh registry accepts the configuration map");
    registry
}

/// An injector over a freshly configured registry, plus the registry itself
/// for direct seeding.
pub fn configured_injector() -> (Injector, Arc<InstanceMap>) {
    let registry = configured_registry();
    (Injector::new(registry.clone()), registry)
}
