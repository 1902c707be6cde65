//! Injectable derive macro for the armature framework
//!
//! Generates the `Injectable` reflection surface: field descriptors,
//! type-erased assignment, nested composite access, and the init hook bridge.
//! The original runtime behavior lives in the framework's engine; this macro
//! only describes the shape of one struct to it.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::Parse;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr, Type};

const PRIMITIVES: &[&str] = &[
    "bool", "char", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64", "i128",
    "isize", "f32", "f64", "String",
];

/// How a declared field participates in injection.
enum Model {
    /// Plain data, assigned by clone.
    ScalarPlain(Type),
    /// `Arc`-held plain data.
    ScalarArc { elem: Type, optional: bool },
    /// A by-value composite; must implement `Injectable` and `Clone`.
    CompositePlain(Type),
    /// An `Arc`-held composite dependency.
    CompositeArc { elem: Type, optional: bool },
    /// An `Arc`-held named trait object.
    Capability { trait_ty: Type, optional: bool },
    /// A homogeneous collection, assigned by clone.
    Sequence { full: Type, elem: Type },
    /// Opted out with `#[inject(skip)]`.
    Skipped,
}

struct FieldSpec {
    ident: syn::Ident,
    name: String,
    model: Model,
    tags: Vec<(String, String)>,
    embedded: bool,
}

pub fn derive_injectable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let name_str = name.to_string();

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Injectable does not support generic structs",
        ));
    }

    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Injectable can only be derived for structs",
            ))
        }
    };

    let specs = match &data.fields {
        Fields::Named(fields) => fields
            .named
            .iter()
            .map(parse_field)
            .collect::<syn::Result<Vec<_>>>()?,
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Injectable does not support tuple structs, use named fields instead",
            ))
        }
    };

    let init_params = parse_init_attr(input)?;

    let descriptors = specs
        .iter()
        .filter(|spec| !matches!(spec.model, Model::Skipped))
        .map(descriptor_tokens)
        .collect::<syn::Result<Vec<_>>>()?;

    let set_arms: Vec<TokenStream2> = specs.iter().filter_map(set_field_arm).collect();
    let composite_arms: Vec<TokenStream2> = specs.iter().filter_map(composite_mut_arm).collect();

    let embedded_idents: Vec<&syn::Ident> = specs
        .iter()
        .filter(|spec| spec.embedded && matches!(spec.model, Model::CompositePlain(_)))
        .map(|spec| &spec.ident)
        .collect();

    let set_fallback = if embedded_idents.is_empty() {
        quote! { false }
    } else {
        quote! {
            #( if self.#embedded_idents.set_field(name, value.clone()) { return true; } )*
            false
        }
    };

    let composite_fallback = if embedded_idents.is_empty() {
        quote! { ::std::option::Option::None }
    } else {
        quote! {
            #( if let ::std::option::Option::Some(found) = self.#embedded_idents.composite_mut(name) {
                return ::std::option::Option::Some(found);
            } )*
            ::std::option::Option::None
        }
    };

    let hook_impl = match init_params {
        Some(params) => hook_tokens(&params)?,
        None => TokenStream2::new(),
    };

    Ok(quote! {
        impl ::armature::reflect::Injectable for #name {
            fn type_name(&self) -> &'static str {
                #name_str
            }

            fn field_descriptors() -> &'static [::armature::reflect::FieldDescriptor] {
                const FIELDS: &[::armature::reflect::FieldDescriptor] = &[
                    #(#descriptors),*
                ];
                FIELDS
            }

            fn fields(&self) -> &'static [::armature::reflect::FieldDescriptor] {
                <Self as ::armature::reflect::Injectable>::field_descriptors()
            }

            #[allow(unused_variables)]
            fn set_field(&mut self, name: &str, value: ::armature::registry::Instance) -> bool {
                match name {
                    #(#set_arms)*
                    _ => { #set_fallback }
                }
            }

            #[allow(unused_variables)]
            fn composite_mut(
                &mut self,
                name: &str,
            ) -> ::std::option::Option<&mut dyn ::armature::reflect::Injectable> {
                match name {
                    #(#composite_arms)*
                    _ => { #composite_fallback }
                }
            }

            #hook_impl

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    })
}

fn parse_field(field: &syn::Field) -> syn::Result<FieldSpec> {
    let ident = field.ident.clone().expect("named field has an ident");
    let name = ident.to_string();

    let mut embedded = false;
    let mut skip = false;
    let mut tags: Vec<(String, String)> = Vec::new();

    for attr in &field.attrs {
        if !attr.path().is_ident("inject") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("embedded") {
                embedded = true;
                Ok(())
            } else if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else if meta.path.is_ident("tag") {
                meta.parse_nested_meta(|tag_meta| {
                    let keyword = tag_meta
                        .path
                        .get_ident()
                        .ok_or_else(|| tag_meta.error("expected a tag keyword"))?
                        .to_string();
                    let value: LitStr = tag_meta.value()?.parse()?;
                    tags.push((keyword, value.value()));
                    Ok(())
                })
            } else {
                Err(meta.error("expected `embedded`, `skip`, or `tag(...)`"))
            }
        })?;
    }

    let model = if skip {
        Model::Skipped
    } else {
        classify(&field.ty)?
    };

    if embedded && !matches!(model, Model::CompositePlain(_) | Model::Capability { .. }) {
        return Err(syn::Error::new_spanned(
            field,
            "only by-value composites and capabilities can be embedded",
        ));
    }

    Ok(FieldSpec {
        ident,
        name,
        model,
        tags,
        embedded,
    })
}

fn classify(ty: &Type) -> syn::Result<Model> {
    if let Some(inner) = generic_inner(ty, "Option") {
        if let Some(arc_inner) = generic_inner(inner, "Arc") {
            return Ok(classify_arc(arc_inner, true));
        }
        return Ok(Model::ScalarPlain(ty.clone()));
    }
    if let Some(arc_inner) = generic_inner(ty, "Arc") {
        return Ok(classify_arc(arc_inner, false));
    }
    if let Some(elem) = generic_inner(ty, "Vec") {
        return Ok(Model::Sequence {
            full: ty.clone(),
            elem: elem.clone(),
        });
    }
    if is_primitive(ty) {
        return Ok(Model::ScalarPlain(ty.clone()));
    }
    match ty {
        Type::Path(_) => Ok(Model::CompositePlain(ty.clone())),
        _ => Err(syn::Error::new_spanned(
            ty,
            "unsupported field type for Injectable, opt out with #[inject(skip)]",
        )),
    }
}

fn classify_arc(inner: &Type, optional: bool) -> Model {
    if matches!(inner, Type::TraitObject(_)) {
        Model::Capability {
            trait_ty: inner.clone(),
            optional,
        }
    } else if is_primitive(inner) {
        Model::ScalarArc {
            elem: inner.clone(),
            optional,
        }
    } else {
        Model::CompositeArc {
            elem: inner.clone(),
            optional,
        }
    }
}

fn generic_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn is_primitive(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    if type_path.path.segments.len() != 1 {
        return false;
    }
    let ident = type_path.path.segments[0].ident.to_string();
    PRIMITIVES.contains(&ident.as_str())
}

/// Short name of a type as it appears in descriptors: `Baz` for
/// `crate::Baz`, `Formatter` for `dyn Formatter`.
fn short_name(ty: &Type) -> syn::Result<String> {
    match ty {
        Type::Path(type_path) => Ok(type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_default()),
        Type::TraitObject(trait_obj) => {
            for bound in &trait_obj.bounds {
                if let syn::TypeParamBound::Trait(bound) = bound {
                    if let Some(segment) = bound.path.segments.last() {
                        return Ok(segment.ident.to_string());
                    }
                }
            }
            Err(syn::Error::new_spanned(ty, "capability has no trait bound"))
        }
        _ => Err(syn::Error::new_spanned(ty, "unsupported descriptor type")),
    }
}

fn descriptor_tokens(spec: &FieldSpec) -> syn::Result<TokenStream2> {
    let name = &spec.name;
    let (kind, type_name) = match &spec.model {
        Model::ScalarPlain(ty) => (quote!(Scalar), short_name(ty)?),
        Model::ScalarArc { elem, .. } => (quote!(Scalar), short_name(elem)?),
        Model::CompositePlain(ty) => (quote!(Composite), short_name(ty)?),
        Model::CompositeArc { elem, .. } => (quote!(Composite), short_name(elem)?),
        Model::Capability { trait_ty, .. } => (quote!(Capability), short_name(trait_ty)?),
        Model::Sequence { elem, .. } => (quote!(Sequence), short_name(elem)?),
        Model::Skipped => unreachable!("skipped fields carry no descriptor"),
    };

    let mut tokens = quote! {
        ::armature::reflect::FieldDescriptor::new(
            #name,
            #type_name,
            ::armature::reflect::FieldKind::#kind,
        )
    };

    if !spec.tags.is_empty() {
        let keys = spec.tags.iter().map(|(key, _)| key);
        let values = spec.tags.iter().map(|(_, value)| value);
        tokens = quote! { #tokens.with_tags(&[ #( (#keys, #values) ),* ]) };
    }

    if spec.embedded {
        tokens = match &spec.model {
            Model::CompositePlain(ty) => quote! {
                #tokens.embedded(<#ty as ::armature::reflect::Injectable>::field_descriptors)
            },
            _ => quote! { #tokens.embedded_opaque() },
        };
    }

    Ok(tokens)
}

fn set_field_arm(spec: &FieldSpec) -> Option<TokenStream2> {
    let ident = &spec.ident;
    let name = &spec.name;
    match &spec.model {
        Model::ScalarPlain(ty) => Some(quote! {
            #name => match value.downcast_ref::<#ty>() {
                ::std::option::Option::Some(v) => {
                    self.#ident = v.clone();
                    true
                }
                ::std::option::Option::None => false,
            },
        }),
        Model::ScalarArc { elem, optional } | Model::CompositeArc { elem, optional } => {
            let assign = if *optional {
                quote! { self.#ident = ::std::option::Option::Some(v); }
            } else {
                quote! { self.#ident = v; }
            };
            Some(quote! {
                #name => match value.downcast::<#elem>() {
                    ::std::result::Result::Ok(v) => {
                        #assign
                        true
                    }
                    ::std::result::Result::Err(_) => false,
                },
            })
        }
        Model::CompositePlain(ty) => {
            if spec.embedded {
                return None;
            }
            Some(quote! {
                #name => match value.downcast_ref::<#ty>() {
                    ::std::option::Option::Some(v) => {
                        self.#ident = v.clone();
                        true
                    }
                    ::std::option::Option::None => false,
                },
            })
        }
        Model::Capability { trait_ty, optional } => {
            let assign = if *optional {
                quote! { self.#ident = ::std::option::Option::Some((*v).clone()); }
            } else {
                quote! { self.#ident = (*v).clone(); }
            };
            Some(quote! {
                #name => match value.downcast::<::std::sync::Arc<#trait_ty>>() {
                    ::std::result::Result::Ok(v) => {
                        #assign
                        true
                    }
                    ::std::result::Result::Err(_) => false,
                },
            })
        }
        Model::Sequence { full, .. } => Some(quote! {
            #name => match value.downcast_ref::<#full>() {
                ::std::option::Option::Some(v) => {
                    self.#ident = v.clone();
                    true
                }
                ::std::option::Option::None => false,
            },
        }),
        Model::Skipped => None,
    }
}

fn composite_mut_arm(spec: &FieldSpec) -> Option<TokenStream2> {
    let ident = &spec.ident;
    let name = &spec.name;
    match &spec.model {
        Model::CompositePlain(_) => Some(quote! {
            #name => ::std::option::Option::Some(
                &mut self.#ident as &mut dyn ::armature::reflect::Injectable,
            ),
        }),
        Model::CompositeArc { optional, .. } => {
            if *optional {
                Some(quote! {
                    #name => self
                        .#ident
                        .as_mut()
                        .and_then(::std::sync::Arc::get_mut)
                        .map(|v| v as &mut dyn ::armature::reflect::Injectable),
                })
            } else {
                Some(quote! {
                    #name => ::std::sync::Arc::get_mut(&mut self.#ident)
                        .map(|v| v as &mut dyn ::armature::reflect::Injectable),
                })
            }
        }
        _ => None,
    }
}

fn parse_init_attr(input: &DeriveInput) -> syn::Result<Option<Vec<Type>>> {
    let mut params = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("inject") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("init") {
                let content;
                syn::parenthesized!(content in meta.input);
                let types =
                    content.parse_terminated(Type::parse, syn::Token![,])?;
                params = Some(types.into_iter().collect::<Vec<_>>());
                Ok(())
            } else {
                Err(meta.error("expected `init(...)` at the struct level"))
            }
        })?;
    }
    Ok(params)
}

fn hook_tokens(params: &[Type]) -> syn::Result<TokenStream2> {
    let descriptors = params
        .iter()
        .map(param_descriptor)
        .collect::<syn::Result<Vec<_>>>()?;

    let bindings = params
        .iter()
        .enumerate()
        .map(|(index, ty)| {
            let binding = quote::format_ident!("arg{}", index);
            let recover = param_recovery(ty);
            quote! {
                let ::std::option::Option::Some(#binding) = args.next().and_then(#recover) else {
                    return false;
                };
            }
        })
        .collect::<Vec<_>>();

    let names = (0..params.len())
        .map(|index| quote::format_ident!("arg{}", index))
        .collect::<Vec<_>>();

    Ok(quote! {
        fn init_params(
            &self,
        ) -> ::std::option::Option<::std::vec::Vec<::armature::reflect::ParamDescriptor>> {
            ::std::option::Option::Some(::std::vec![ #(#descriptors),* ])
        }

        fn call_init(&mut self, args: ::std::vec::Vec<::armature::registry::Instance>) -> bool {
            let mut args = args.into_iter();
            #(#bindings)*
            self.init(#(#names),*);
            true
        }
    })
}

fn param_descriptor(ty: &Type) -> syn::Result<TokenStream2> {
    match ty {
        Type::TraitObject(_) => Ok(quote! {
            ::armature::reflect::ParamDescriptor::capability::<#ty>()
        }),
        _ if generic_inner(ty, "Vec").is_some() => Ok(quote! {
            ::armature::reflect::ParamDescriptor::sequence::<#ty>()
        }),
        _ if is_primitive(ty) => Ok(quote! {
            ::armature::reflect::ParamDescriptor::scalar::<#ty>()
        }),
        Type::Path(_) => Ok(quote! {
            ::armature::reflect::ParamDescriptor::of::<#ty>()
        }),
        _ => Err(syn::Error::new_spanned(ty, "unsupported init parameter")),
    }
}

fn param_recovery(ty: &Type) -> TokenStream2 {
    match ty {
        Type::TraitObject(_) => quote! {
            |instance| {
                instance
                    .downcast::<::std::sync::Arc<#ty>>()
                    .ok()
                    .map(|v| (*v).clone())
            }
        },
        _ => quote! {
            |instance| instance.downcast::<#ty>().ok()
        },
    }
}
