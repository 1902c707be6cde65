//! Resolver registration macro for the armature framework
//!
//! Provides the `#[tag_resolver]` attribute that submits a resolver type for
//! inventory collection, so `Injector::bootstrap_resolvers()` registers it at
//! startup without a call site.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, ItemStruct};

/// Implements the `#[tag_resolver]` attribute macro
///
/// Re-emits the struct untouched and appends an inventory submission that
/// registers a `Default`-constructed instance with the injector.
pub fn tag_resolver_impl(_attr: TokenStream, input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemStruct);
    let name = &item.ident;
    let name_str = name.to_string();

    let expanded = quote! {
        #item

        ::armature::inventory::submit! {
            ::armature::resolver::ResolverRegistration {
                register: |injector| {
                    injector.register_resolver(<#name as ::std::default::Default>::default());
                },
                name: #name_str,
            }
        }
    };

    TokenStream::from(expanded)
}
