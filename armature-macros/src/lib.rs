//! Procedural macros for the armature framework
//!
//! This crate provides compile-time generation for:
//! - The `Injectable` reflection surface (field descriptors, type-erased
//!   setters, nested composite access, init hook bridging)
//! - Tag resolver auto-registration at the definition site

use proc_macro::TokenStream;

mod injectable;
mod resolver;

/// Derive the `Injectable` reflection surface for a struct
///
/// Field behavior is driven by the declared type:
/// - `Option<Arc<T>>` / `Arc<T>` — a pointer to a composite dependency,
///   assignable from the registry and recursed into while exclusively owned
/// - `Option<Arc<dyn Trait>>` / `Arc<dyn Trait>` — a capability binding
/// - `Vec<T>` — a sequence, assignable but never auto-created
/// - primitives and `String` — plain data
/// - any other named type — a by-value composite; it must implement
///   `Injectable` and `Clone`, or be opted out with `#[inject(skip)]`
///
/// # Field attributes
///
/// ```rust,ignore
/// #[derive(Default, Injectable)]
/// pub struct GreetController {
///     /// Embedded composite: its fields are flattened into this struct's.
///     #[inject(embedded)]
///     base: BaseController,
///
///     /// Tagged field: decoded by the resolver claiming the `value` keyword.
///     #[inject(tag(value = "${app.name:anonymous}"))]
///     app_name: Option<Arc<String>>,
///
///     /// Convention field: resolved from the registry as `greeting_service`
///     /// lower-camel-cased to `greetingService`.
///     greeting_service: Option<Arc<GreetingService>>,
///
///     /// Left alone entirely.
///     #[inject(skip)]
///     scratch: Vec<u8>,
/// }
/// ```
///
/// # Init hook
///
/// A struct-level `#[inject(init(...))]` declares the dependency parameters
/// of the type's `init` method, invoked after field injection:
///
/// ```rust,ignore
/// #[derive(Default, Injectable)]
/// #[inject(init(GreetingService, dyn Formatter))]
/// pub struct GreetController { ... }
///
/// impl GreetController {
///     fn init(&mut self, service: Arc<GreetingService>, formatter: Arc<dyn Formatter>) {
///         // dependency-dependent setup
///     }
/// }
/// ```
#[proc_macro_derive(Injectable, attributes(inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable_impl(input)
}

/// Register a tag resolver at its definition site
///
/// The resolver is collected at compile time and registered by
/// `Injector::bootstrap_resolvers()`. The type must implement `Default` and
/// `TagResolver`.
///
/// # Example
///
/// ```rust,ignore
/// #[tag_resolver]
/// #[derive(Default)]
/// pub struct ProfileResolver;
/// ```
#[proc_macro_attribute]
pub fn tag_resolver(attr: TokenStream, input: TokenStream) -> TokenStream {
    resolver::tag_resolver_impl(attr, input)
}
