//! armature — a trait-driven dependency injection engine
//!
//! armature wires component graphs at runtime: fields are resolved from a
//! shared, name-keyed instance registry or decoded by pluggable tag
//! resolvers, nested composites are injected recursively, and an optional
//! `init` hook fires with auto-resolved arguments once every field is set.
//!
//! Rust has no runtime reflection, so injectable types describe themselves
//! through the [`Injectable`] trait — usually generated by
//! `#[derive(Injectable)]` from the companion macro crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use armature::{Injectable, Injector, InstanceMap, RegistryExt};
//! use std::sync::Arc;
//!
//! #[derive(Default, Clone, Injectable)]
//! pub struct GreetingService {
//!     pub greeting: String,
//! }
//!
//! #[derive(Default, Injectable)]
//! pub struct GreetController {
//!     greeting_service: Option<Arc<GreetingService>>,
//! }
//!
//! let registry = Arc::new(InstanceMap::new());
//! registry.put("greetingService", GreetingService::default())?;
//!
//! let injector = Injector::new(registry);
//! let mut controller = GreetController::default();
//! injector.inject(&mut controller)?;
//! ```

extern crate self as armature;

pub mod config;
pub mod error;
pub mod inject;
pub mod reflect;
pub mod registry;
pub mod resolver;
pub mod testing;

pub use armature_macros::{tag_resolver, Injectable};
pub use config::{ConfigMap, SystemConfiguration, CONFIGURATIONS, SYSTEM_CONFIGURATION};
pub use error::InjectError;
pub use inject::{Callable, Factory, Injector};
pub use reflect::{FieldDescriptor, FieldKind, Injectable, ParamDescriptor};
pub use registry::{Instance, InstanceMap, InstanceRegistry, RegistryExt};
pub use resolver::{ResolverContext, TagResolver, ValueResolver};

// Re-exported for macro-generated registrations.
pub use inventory;
