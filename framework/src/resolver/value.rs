//! The built-in `value` resolver

use std::sync::{Arc, RwLock};

use crate::config::placeholder;
use crate::reflect::{FieldDescriptor, Injectable};
use crate::registry::Instance;

use super::{ResolverContext, TagResolver};

/// Resolves `value` tags into strings.
///
/// A field tagged `#[inject(tag(value = "${app.name:fallback}"))]` receives
/// the placeholder resolved against the system configuration; a raw value
/// with no placeholder is injected verbatim.
#[derive(Default)]
pub struct ValueResolver {
    context: RwLock<Option<ResolverContext>>,
}

impl TagResolver for ValueResolver {
    fn init(&self, context: ResolverContext) {
        *self.context.write().unwrap_or_else(|e| e.into_inner()) = Some(context);
    }

    fn decode(
        &self,
        _object: &dyn Injectable,
        field: &FieldDescriptor,
        value: &str,
    ) -> Option<Instance> {
        let guard = self.context.read().unwrap_or_else(|e| e.into_inner());
        let context = guard.as_ref()?;
        let resolved = placeholder::resolve(value, &context.system);
        tracing::debug!(field = field.name, raw = value, %resolved, "decoded value tag");
        Some(Arc::new(resolved) as Instance)
    }
}

crate::submit_resolver!(ValueResolver);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigMap, SystemConfiguration};
    use crate::reflect::FieldKind;
    use crate::registry::Instance;
    use std::any::Any;

    #[derive(Default)]
    struct Holder {
        app_name: Option<Arc<String>>,
    }

    impl Injectable for Holder {
        fn type_name(&self) -> &'static str {
            "Holder"
        }

        fn field_descriptors() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[FieldDescriptor::new(
                "app_name",
                "String",
                FieldKind::Scalar,
            )];
            FIELDS
        }

        fn fields(&self) -> &'static [FieldDescriptor] {
            Self::field_descriptors()
        }

        fn set_field(&mut self, name: &str, value: Instance) -> bool {
            match name {
                "app_name" => match value.downcast::<String>() {
                    Ok(v) => {
                        self.app_name = Some(v);
                        true
                    }
                    Err(_) => false,
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

    fn context() -> ResolverContext {
        ResolverContext {
            system: Arc::new(SystemConfiguration::default()),
            configurations: Arc::new(ConfigMap::new()),
        }
    }

    #[test]
    fn decode_before_init_yields_nothing() {
        let resolver = ValueResolver::default();
        let holder = Holder::default();
        let field = &Holder::field_descriptors()[0];
        assert!(resolver.decode(&holder, field, "${app.name}").is_none());
    }

    #[test]
    fn decode_resolves_placeholders() {
        let resolver = ValueResolver::default();
        resolver.init(context());

        let holder = Holder::default();
        let field = &Holder::field_descriptors()[0];
        let instance = resolver.decode(&holder, field, "${app.name}").unwrap();
        let text = instance.downcast::<String>().unwrap();
        assert_eq!(*text, "armature-app");
    }

    #[test]
    fn decode_passes_literals_through() {
        let resolver = ValueResolver::default();
        resolver.init(context());

        let holder = Holder::default();
        let field = &Holder::field_descriptors()[0];
        let instance = resolver.decode(&holder, field, "plain").unwrap();
        let text = instance.downcast::<String>().unwrap();
        assert_eq!(*text, "plain");
    }

    #[test]
    fn value_resolver_is_transient() {
        assert!(!ValueResolver::default().is_singleton());
    }
}
