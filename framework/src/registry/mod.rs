//! Instance registry
//!
//! The engine consumes the registry through exactly two operations: lookup by
//! name and store-if-absent. How instances got into the registry before
//! injection runs is a collaborator concern; [`InstanceMap`] is the default
//! in-memory implementation.
//!
//! Names are lower-camel-cased (`userService`, `systemConfiguration`) and the
//! store has at-most-one-writer-wins semantics: a second writer for the same
//! name gets an error the engine downgrades to a warning, and the first
//! writer's value stands.
//!
//! # Example
//!
//! ```rust,ignore
//! use armature::{InstanceMap, RegistryExt};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(InstanceMap::new());
//! registry.put("greetingService", GreetingService::default())?;
//! let service: Arc<GreetingService> = registry.get_as("greetingService").unwrap();
//! ```

use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::InjectError;

/// Type-erased shared instance handle stored in the registry.
///
/// Composite instances are stored as `Arc<T>`; capability bindings box the
/// trait-object pointer inside the handle (`Arc<Arc<dyn Trait>>`), see
/// [`RegistryExt::bind`].
pub type Instance = Arc<dyn Any + Send + Sync>;

/// The two operations the engine consumes from an instance registry.
pub trait InstanceRegistry: Send + Sync {
    /// Look up an instance by its lower-camel-cased name.
    fn lookup(&self, name: &str) -> Option<Instance>;

    /// Store an instance under `name` unless the name is already taken.
    ///
    /// The check and the insert are one atomic step; a taken name reports
    /// [`InjectError::InstanceRegistered`].
    fn store_if_absent(&self, name: &str, instance: Instance) -> Result<(), InjectError>;
}

/// Default in-memory instance registry.
#[derive(Default)]
pub struct InstanceMap {
    instances: RwLock<HashMap<String, Instance>>,
}

impl InstanceMap {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored instances.
    pub fn len(&self) -> usize {
        self.instances
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Whether the registry holds no instances.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InstanceRegistry for InstanceMap {
    fn lookup(&self, name: &str) -> Option<Instance> {
        self.instances
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    fn store_if_absent(&self, name: &str, instance: Instance) -> Result<(), InjectError> {
        let mut instances = self.instances.write().unwrap_or_else(|e| e.into_inner());
        match instances.entry(name.to_string()) {
            Entry::Occupied(_) => Err(InjectError::registered(name)),
            Entry::Vacant(slot) => {
                slot.insert(instance);
                Ok(())
            }
        }
    }
}

/// Typed conveniences layered over the two registry operations.
pub trait RegistryExt: InstanceRegistry {
    /// Store a concrete value under `name`, wrapping it into an instance
    /// handle.
    fn put<T: Any + Send + Sync>(&self, name: &str, value: T) -> Result<(), InjectError> {
        self.store_if_absent(name, Arc::new(value))
    }

    /// Look up `name` and downcast to the concrete instance type.
    fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.lookup(name)?.downcast::<T>().ok()
    }

    /// Store a trait-object binding, resolvable into capability fields and
    /// hook parameters declared as `dyn Trait`.
    fn bind<T: ?Sized + Send + Sync + 'static>(
        &self,
        name: &str,
        value: Arc<T>,
    ) -> Result<(), InjectError> {
        self.store_if_absent(name, Arc::new(value))
    }

    /// Look up a trait-object binding stored with [`RegistryExt::bind`].
    fn get_bound<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.get_as::<Arc<T>>(name).map(|outer| (*outer).clone())
    }
}

impl<R: InstanceRegistry + ?Sized> RegistryExt for R {}

/// Bind a trait object into a registry under a name (auto-wraps in Arc)
///
/// # Example
/// ```rust,ignore
/// bind!(registry, "greeter", dyn Greeter, ConsoleGreeter::new());
/// ```
#[macro_export]
macro_rules! bind {
    ($registry:expr, $name:expr, $trait:ty, $instance:expr) => {
        $crate::registry::RegistryExt::bind::<$trait>(
            &*$registry,
            $name,
            ::std::sync::Arc::new($instance) as ::std::sync::Arc<$trait>,
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestService {
        value: String,
    }

    trait Marker: Send + Sync {
        fn id(&self) -> u8;
    }

    struct MarkerImpl;

    impl Marker for MarkerImpl {
        fn id(&self) -> u8 {
            7
        }
    }

    #[test]
    fn lookup_misses_on_empty_registry() {
        let registry = InstanceMap::new();
        assert!(registry.lookup("testService").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn put_and_get_as_round_trip() {
        let registry = InstanceMap::new();
        registry
            .put(
                "testService",
                TestService {
                    value: "hello".to_string(),
                },
            )
            .unwrap();

        let service: Arc<TestService> = registry.get_as("testService").unwrap();
        assert_eq!(service.value, "hello");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn first_writer_wins() {
        let registry = InstanceMap::new();
        registry.put("slot", 1u32).unwrap();
        let second = registry.put("slot", 2u32);
        assert!(matches!(
            second,
            Err(InjectError::InstanceRegistered { .. })
        ));
        assert_eq!(*registry.get_as::<u32>("slot").unwrap(), 1);
    }

    #[test]
    fn lookup_returns_the_same_instance() {
        let registry = InstanceMap::new();
        registry.put("slot", 5i64).unwrap();
        let first = registry.lookup("slot").unwrap();
        let second = registry.lookup("slot").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn get_as_rejects_mismatched_types() {
        let registry = InstanceMap::new();
        registry.put("slot", 5i64).unwrap();
        assert!(registry.get_as::<String>("slot").is_none());
    }

    #[test]
    fn bind_and_get_bound_round_trip() {
        let registry = InstanceMap::new();
        bind!(&registry, "marker", dyn Marker, MarkerImpl).unwrap();

        let marker = registry.get_bound::<dyn Marker>("marker").unwrap();
        assert_eq!(marker.id(), 7);
    }
}
