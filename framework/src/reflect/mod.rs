//! Type inspection for injectable composites
//!
//! The engine has no runtime reflection to lean on, so every injectable type
//! carries its own description: an ordered list of [`FieldDescriptor`]s, a
//! type-erased setter, and mutable access to nested composite members. The
//! [`Injectable`] trait bundles that surface; `#[derive(Injectable)]`
//! generates it for structs with named fields.
//!
//! Free functions in this module operate on descriptor lists the way the
//! engine consumes them: [`deep_fields`] flattens embedded hierarchies into a
//! single ordered sequence, and [`find_capability_field`] extracts the first
//! embedded trait-object member, which front-ends use to classify components
//! by the role they implement.

pub mod name;

use std::any::Any;
use std::sync::Arc;

use crate::error::InjectError;
use crate::registry::Instance;

/// Kind classification for declared members, as far as injection cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain data: numbers, strings, anything opted out of recursion.
    Scalar,
    /// A struct-typed value or pointer that can hold nested dependencies.
    Composite,
    /// A named trait object identifying the role a component implements.
    Capability,
    /// A homogeneous collection; never auto-created.
    Sequence,
}

/// One declared member of an injectable composite type.
///
/// `type_name` reports the element type after stripping `Option`/`Arc`/`Vec`
/// wrappers, the descriptor-level analog of pointer and slice indirection.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Declared field name.
    pub name: &'static str,
    /// Short name of the field's element type.
    pub type_name: &'static str,
    /// Kind of the element type.
    pub kind: FieldKind,
    /// Tag keyword to raw value pairs declared on the field.
    pub tags: &'static [(&'static str, &'static str)],
    /// Whether the member is an embedded composite flattened into its parent.
    pub anonymous: bool,
    /// Declared members of an embedded composite, consulted when flattening.
    pub nested: Option<fn() -> &'static [FieldDescriptor]>,
}

impl FieldDescriptor {
    /// Create a descriptor with no tags and no embedding.
    pub const fn new(name: &'static str, type_name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            type_name,
            kind,
            tags: &[],
            anonymous: false,
            nested: None,
        }
    }

    /// Attach the field's declared tag set.
    pub const fn with_tags(mut self, tags: &'static [(&'static str, &'static str)]) -> Self {
        self.tags = tags;
        self
    }

    /// Mark the member as an embedded composite contributing `nested` fields.
    pub const fn embedded(mut self, nested: fn() -> &'static [FieldDescriptor]) -> Self {
        self.anonymous = true;
        self.nested = Some(nested);
        self
    }

    /// Mark the member as embedded without nested fields, e.g. an embedded
    /// capability.
    pub const fn embedded_opaque(mut self) -> Self {
        self.anonymous = true;
        self
    }

    /// Raw value for a tag keyword, if the field declares it.
    pub fn tag(&self, keyword: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(key, _)| *key == keyword)
            .map(|(_, value)| *value)
    }
}

/// A declared dependency of an init hook or a callable's parameter list.
#[derive(Debug, Clone, Copy)]
pub struct ParamDescriptor {
    /// Fully qualified type path as reported by `std::any::type_name`.
    pub type_path: &'static str,
    /// Kind of the parameter type.
    pub kind: FieldKind,
    /// Zero-value construction policy; absent for kinds that cannot be
    /// auto-created.
    pub construct: Option<fn() -> Instance>,
    /// Views an exclusively owned instance as an injectable composite.
    pub as_composite: Option<fn(&mut (dyn Any + Send + Sync)) -> Option<&mut dyn Injectable>>,
}

impl ParamDescriptor {
    /// Descriptor for a composite dependency; auto-created from its zero
    /// value when the registry holds no instance.
    pub fn of<T>() -> Self
    where
        T: Injectable + Default,
    {
        Self {
            type_path: std::any::type_name::<T>(),
            kind: FieldKind::Composite,
            construct: Some(|| Arc::new(T::default()) as Instance),
            as_composite: Some(|any| any.downcast_mut::<T>().map(|v| v as &mut dyn Injectable)),
        }
    }

    /// Descriptor for plain data; auto-created but never recursed into.
    pub fn scalar<T>() -> Self
    where
        T: Any + Send + Sync + Default,
    {
        Self {
            type_path: std::any::type_name::<T>(),
            kind: FieldKind::Scalar,
            construct: Some(|| Arc::new(T::default()) as Instance),
            as_composite: None,
        }
    }

    /// Descriptor for a named trait object; resolvable only from the registry.
    pub fn capability<T>() -> Self
    where
        T: ?Sized + Any,
    {
        Self {
            type_path: std::any::type_name::<T>(),
            kind: FieldKind::Capability,
            construct: None,
            as_composite: None,
        }
    }

    /// Descriptor for a collection; resolvable only from the registry.
    pub fn sequence<T>() -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            type_path: std::any::type_name::<T>(),
            kind: FieldKind::Sequence,
            construct: None,
            as_composite: None,
        }
    }

    /// Short type name, e.g. `Configuration` for `system::Configuration`.
    pub fn short_name(&self) -> &'static str {
        name::short_type_name(self.type_path)
    }

    /// Originating module segment, e.g. `system` for `system::Configuration`.
    pub fn module_segment(&self) -> &'static str {
        name::module_segment(self.type_path)
    }
}

/// Reflection surface implemented by injectable composite types.
///
/// Usually generated by `#[derive(Injectable)]`. Manual implementations must
/// uphold the contract the engine relies on:
///
/// - `fields` reports declared members in order, embedded composites flagged
///   anonymous with their nested descriptors attached;
/// - `set_field` and `composite_mut` accept flattened (promoted) names by
///   delegating to embedded members when the name is not their own;
/// - `composite_mut` returns `Some` only while the member is exclusively
///   owned — shared (`Arc`-aliased) values were injected where they were
///   constructed and must not be mutated through the graph.
pub trait Injectable: Any + Send + Sync {
    /// Short type name used for registry naming and self-recursion checks.
    fn type_name(&self) -> &'static str;

    /// Declared members of the type, embedding order preserved.
    fn field_descriptors() -> &'static [FieldDescriptor]
    where
        Self: Sized;

    /// Object-safe view of [`Injectable::field_descriptors`].
    fn fields(&self) -> &'static [FieldDescriptor];

    /// Assign a resolved instance to the named field.
    ///
    /// Returns false when the field is unknown or the payload type does not
    /// match; the engine treats that as "not settable" and moves on.
    fn set_field(&mut self, name: &str, value: Instance) -> bool;

    /// Mutable access to a currently held composite member.
    fn composite_mut(&mut self, name: &str) -> Option<&mut dyn Injectable>;

    /// Declared parameters of the type's init hook; `None` when the type has
    /// no hook.
    fn init_params(&self) -> Option<Vec<ParamDescriptor>> {
        None
    }

    /// Invoke the init hook with resolved arguments in declared order.
    ///
    /// Returns false when an argument does not match its declared type.
    fn call_init(&mut self, args: Vec<Instance>) -> bool {
        let _ = args;
        true
    }

    /// Upcast to [`Any`] for type identity checks.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast to [`Any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Flatten embedded composite hierarchies into a single ordered field list.
///
/// An anonymous embedded composite contributes its own fields spliced at its
/// position; every other member is appended directly. Name collisions are not
/// resolved here — first occurrence wins implicitly through assignment order.
pub fn deep_fields(fields: &'static [FieldDescriptor]) -> Vec<FieldDescriptor> {
    let mut flattened = Vec::new();
    collect_fields(fields, &mut flattened);
    flattened
}

fn collect_fields(fields: &'static [FieldDescriptor], out: &mut Vec<FieldDescriptor>) {
    for field in fields {
        match field.nested {
            Some(nested) if field.anonymous => collect_fields(nested(), out),
            _ => out.push(*field),
        }
    }
}

/// First anonymous member whose type is a named trait object, recursing
/// through anonymous composites. `None` when the type embeds no capability.
pub fn find_capability_field(fields: &'static [FieldDescriptor]) -> Option<FieldDescriptor> {
    for field in fields {
        if !field.anonymous {
            continue;
        }
        if field.kind == FieldKind::Capability {
            return Some(*field);
        }
        if let Some(nested) = field.nested {
            if let Some(found) = find_capability_field(nested()) {
                return Some(found);
            }
        }
    }
    None
}

/// The capability a component implements, or [`InjectError::NotImplemented`].
pub fn capability_of(object: &dyn Injectable) -> Result<FieldDescriptor, InjectError> {
    find_capability_field(object.fields()).ok_or(InjectError::NotImplemented)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Inner {
        level: String,
    }

    impl Injectable for Inner {
        fn type_name(&self) -> &'static str {
            "Inner"
        }

        fn field_descriptors() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] =
                &[FieldDescriptor::new("level", "String", FieldKind::Scalar)];
            FIELDS
        }

        fn fields(&self) -> &'static [FieldDescriptor] {
            Self::field_descriptors()
        }

        fn set_field(&mut self, name: &str, value: Instance) -> bool {
            match name {
                "level" => match value.downcast_ref::<String>() {
                    Some(v) => {
                        self.level = v.clone();
                        true
                    }
                    None => false,
                },
                _ => false,
            }
        }

        fn composite_mut(&mut self, _name: &str) -> Option<&mut dyn Injectable> {
            None
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    trait Role: Send + Sync {}

    #[derive(Default)]
    struct Outer {
        inner: Inner,
        role: Option<Arc<dyn Role>>,
        count: u32,
    }

    impl Injectable for Outer {
        fn type_name(&self) -> &'static str {
            "Outer"
        }

        fn field_descriptors() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::new("inner", "Inner", FieldKind::Composite)
                    .embedded(<Inner as Injectable>::field_descriptors),
                FieldDescriptor::new("role", "Role", FieldKind::Capability)
                    .embedded_opaque(),
                FieldDescriptor::new("count", "u32", FieldKind::Scalar),
            ];
            FIELDS
        }

        fn fields(&self) -> &'static [FieldDescriptor] {
            Self::field_descriptors()
        }

        fn set_field(&mut self, name: &str, value: Instance) -> bool {
            match name {
                "role" => match value.downcast::<Arc<dyn Role>>() {
                    Ok(v) => {
                        self.role = Some((*v).clone());
                        true
                    }
                    Err(_) => false,
                },
                "count" => match value.downcast_ref::<u32>() {
                    Some(v) => {
                        self.count = *v;
                        true
                    }
                    None => false,
                },
                _ => self.inner.set_field(name, value),
            }
        }

        fn composite_mut(&mut self, name: &str) -> Option<&mut dyn Injectable> {
            match name {
                "inner" => Some(&mut self.inner),
                _ => self.inner.composite_mut(name),
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn deep_fields_splices_embedded_members_in_place() {
        let flattened = deep_fields(Outer::field_descriptors());
        let names: Vec<&str> = flattened.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["level", "role", "count"]);
    }

    #[test]
    fn capability_field_is_the_first_anonymous_trait_object() {
        let field = find_capability_field(Outer::field_descriptors()).unwrap();
        assert_eq!(field.name, "role");
        assert_eq!(field.type_name, "Role");
    }

    #[test]
    fn capability_of_reports_not_implemented() {
        let inner = Inner::default();
        assert!(matches!(
            capability_of(&inner),
            Err(InjectError::NotImplemented)
        ));
    }

    #[test]
    fn descriptor_tag_lookup() {
        const TAGS: &[(&str, &str)] = &[("value", "${app.name}")];
        let field =
            FieldDescriptor::new("app_name", "String", FieldKind::Scalar).with_tags(TAGS);
        assert_eq!(field.tag("value"), Some("${app.name}"));
        assert_eq!(field.tag("profile"), None);
    }

    #[test]
    fn param_descriptor_names() {
        let param = ParamDescriptor::of::<Inner>();
        assert_eq!(param.short_name(), "Inner");
        assert_eq!(param.module_segment(), "tests");
        assert_eq!(param.kind, FieldKind::Composite);
        assert!(param.construct.is_some());

        let capability = ParamDescriptor::capability::<dyn Role>();
        assert_eq!(capability.short_name(), "Role");
        assert!(capability.construct.is_none());
    }
}
