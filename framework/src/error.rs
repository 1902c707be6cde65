//! Engine-wide error types
//!
//! Provides a unified error type for every injection failure. Errors are
//! returned synchronously to the immediate caller; the engine never retries,
//! and already-assigned fields are not rolled back when a later field fails.

use thiserror::Error;

/// Injection error
///
/// This enum represents all possible errors the injection engine can report.
///
/// # Example
///
/// ```rust,ignore
/// use armature::{InjectError, Injector};
///
/// match injector.inject_fields(&mut component) {
///     Ok(()) => {}
///     Err(InjectError::NotConfigured) => panic!("registry was never seeded"),
///     Err(err) => tracing::error!(%err, "injection failed"),
/// }
/// ```
#[derive(Debug, Clone, Error)]
pub enum InjectError {
    /// No capability field exists on the component
    ///
    /// Raised when a front-end asks for the role a component implements and
    /// the component embeds no named trait object.
    #[error("interface is not implemented")]
    NotImplemented,

    /// A resolved instance failed to view as the declared composite
    ///
    /// Typically a hook argument of unexpected type: the registry held an
    /// instance under the expected name, but not of the declared type.
    #[error("invalid object")]
    InvalidObject,

    /// A resolver's derived tag keyword is empty
    ///
    /// Resolver type names must carry a prefix before the `Resolver` suffix,
    /// e.g. `ValueResolver` claims the `value` keyword. A type named just
    /// `Resolver` is a programming error, not a data error.
    #[error("invalid tag name on resolver '{resolver}', e.g. ExampleResolver")]
    InvalidTagName {
        /// Type path of the offending resolver
        resolver: &'static str,
    },

    /// The registry is missing a required well-known entry
    ///
    /// `systemConfiguration` and `configurations` must be stored before any
    /// injection proceeds.
    #[error("system is not configured")]
    NotConfigured,

    /// The function-injection target is not a callable
    #[error("invalid func")]
    InvalidFunc,

    /// A hook or callable parameter could not be resolved
    ///
    /// Capability and sequence parameters cannot be auto-created; without a
    /// registry entry the whole call fails and the target is never invoked.
    #[error("{type_name} is not injected")]
    NotInjected {
        /// Short type name of the unresolved parameter
        type_name: &'static str,
    },

    /// An instance name is already taken in the registry
    ///
    /// The engine downgrades this to a warning wherever it arises: the first
    /// writer's value stands.
    #[error("instance '{name}' is already registered")]
    InstanceRegistered {
        /// The contested registry name
        name: String,
    },
}

impl InjectError {
    /// Create an InvalidTagName error for a resolver type path
    pub fn invalid_tag_name(resolver: &'static str) -> Self {
        Self::InvalidTagName { resolver }
    }

    /// Create a NotInjected error for an unresolved parameter type
    pub fn not_injected(type_name: &'static str) -> Self {
        Self::NotInjected { type_name }
    }

    /// Create an InstanceRegistered error for a contested name
    pub fn registered(name: impl Into<String>) -> Self {
        Self::InstanceRegistered { name: name.into() }
    }
}
