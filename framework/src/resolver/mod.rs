//! Tag resolver protocol
//!
//! A tag resolver converts a field's raw tag value into a resolved instance.
//! Each resolver claims one keyword, derived from its type name: the
//! `Resolver` suffix is stripped and the remainder lower-cased, so
//! `ValueResolver` claims `value`. Resolvers live in a single ordered
//! collection owned by the [`Injector`](crate::Injector) — registration order
//! is resolution precedence, and the first resolver producing an instance for
//! a field wins.
//!
//! # Example
//!
//! ```rust,ignore
//! use armature::{tag_resolver, ResolverContext, TagResolver};
//!
//! #[tag_resolver]
//! #[derive(Default)]
//! pub struct ProfileResolver;
//!
//! impl TagResolver for ProfileResolver {
//!     fn init(&self, _context: ResolverContext) {}
//!
//!     fn decode(&self, _object, field, value) -> Option<Instance> {
//!         // fields tagged `#[inject(tag(profile = "..."))]` land here
//!     }
//! }
//! ```

pub mod provider;
pub mod value;

use std::sync::Arc;

use crate::config::{ConfigMap, SystemConfiguration};
use crate::reflect::{name, FieldDescriptor, Injectable};
use crate::registry::Instance;

pub use provider::ResolverRegistration;
pub use value::ValueResolver;

/// Shared state handed to resolvers ahead of each decode.
#[derive(Clone)]
pub struct ResolverContext {
    /// The system configuration.
    pub system: Arc<SystemConfiguration>,
    /// The shared configuration map.
    pub configurations: Arc<ConfigMap>,
}

/// A tag decoding strategy.
pub trait TagResolver: Send + Sync {
    /// Receive the resolver context ahead of [`TagResolver::decode`].
    fn init(&self, context: ResolverContext);

    /// Convert the field's raw tag value into a resolved instance, or `None`
    /// when the resolver has nothing to contribute.
    fn decode(
        &self,
        object: &dyn Injectable,
        field: &FieldDescriptor,
        value: &str,
    ) -> Option<Instance>;

    /// Whether decoded instances are cached in the registry under the field
    /// name, so later lookups return the same instance.
    fn is_singleton(&self) -> bool {
        false
    }
}

/// Derive the tag keyword a resolver claims from its type name.
///
/// `ValueResolver` claims `value`; a type named just `Resolver` yields
/// `None`, which the engine treats as a programming error.
pub fn resolver_keyword(type_path: &str) -> Option<String> {
    let type_name = name::short_type_name(type_path);
    let keyword = type_name.replace("Resolver", "");
    if keyword.is_empty() {
        None
    } else {
        Some(name::lower_first(&keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keyword_strips_the_suffix_and_lowers() {
        assert_eq!(
            resolver_keyword("armature::resolver::value::ValueResolver"),
            Some("value".to_string())
        );
        assert_eq!(
            resolver_keyword("app::ProfileResolver"),
            Some("profile".to_string())
        );
    }

    #[test]
    fn keyword_without_a_suffix_is_the_lowered_name() {
        assert_eq!(resolver_keyword("app::Mock"), Some("mock".to_string()));
    }

    #[test]
    fn bare_suffix_is_invalid() {
        assert_eq!(resolver_keyword("app::Resolver"), None);
    }
}
