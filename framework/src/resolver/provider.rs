//! Resolver auto-registration
//!
//! Collects resolver registrations at compile time so applications can
//! declare a resolver where it is defined and have
//! [`Injector::bootstrap_resolvers`](crate::Injector::bootstrap_resolvers)
//! pick it up at startup:
//!
//! ```rust,ignore
//! armature::submit_resolver!(ProfileResolver);
//! // or, at the definition site:
//! #[armature::tag_resolver]
//! pub struct ProfileResolver { ... }
//! ```
//!
//! Collected registrations follow link order; call
//! [`Injector::register_resolver`](crate::Injector::register_resolver)
//! explicitly when precedence between resolvers matters.

use crate::inject::Injector;

/// Entry for an inventory-collected resolver registration.
pub struct ResolverRegistration {
    /// Registers the resolver with the given injector.
    pub register: fn(&Injector),
    /// Resolver type name for logging.
    pub name: &'static str,
}

inventory::collect!(ResolverRegistration);

/// Submit a `Default`-constructible resolver for collection
///
/// # Example
/// ```rust,ignore
/// armature::submit_resolver!(ProfileResolver);
/// ```
#[macro_export]
macro_rules! submit_resolver {
    ($resolver:ty) => {
        $crate::inventory::submit! {
            $crate::resolver::ResolverRegistration {
                register: |injector| {
                    injector.register_resolver(<$resolver as ::std::default::Default>::default());
                },
                name: ::core::stringify!($resolver),
            }
        }
    };
}
