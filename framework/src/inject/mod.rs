//! The injection engine
//!
//! [`Injector`] wires a component graph against an instance registry and an
//! ordered set of tag resolvers:
//!
//! - [`Injector::inject_fields`] resolves every field of a composite, by
//!   naming convention first and by tag strategy second, recursing into
//!   nested composite values;
//! - [`Injector::inject_method`] resolves the parameters of the component's
//!   `init` hook (auto-creating what the registry lacks) and invokes it;
//! - [`Injector::inject`] runs both, the full-object treatment a component
//!   receives at registration time;
//! - [`Injector::inject_func`] adapts a registered factory into a ready
//!   instance by resolving its parameters and calling it.
//!
//! Execution is synchronous and single-threaded per call; the registry is
//! shared, but one object graph must not be injected twice concurrently.
//!
//! # Example
//!
//! ```rust,ignore
//! use armature::{Injector, InstanceMap, RegistryExt, SystemConfiguration, ConfigMap};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(InstanceMap::new());
//! registry.put(armature::SYSTEM_CONFIGURATION, SystemConfiguration::load())?;
//! registry.put(armature::CONFIGURATIONS, ConfigMap::new())?;
//!
//! let injector = Injector::new(registry);
//! injector.bootstrap_resolvers();
//!
//! let mut controller = GreetController::default();
//! injector.inject(&mut controller)?;
//! ```

pub mod callable;

use std::any::TypeId;
use std::sync::{Arc, RwLock};

use crate::config::{SystemConfiguration, CONFIGURATIONS, SYSTEM_CONFIGURATION};
use crate::error::InjectError;
use crate::reflect::{self, name, FieldKind, Injectable, ParamDescriptor};
use crate::registry::{Instance, InstanceRegistry};
use crate::resolver::{resolver_keyword, ResolverContext, ResolverRegistration, TagResolver};

pub use callable::{Callable, Dependency, Factory, FuncResult, IntoCallable};

struct RegisteredResolver {
    type_path: &'static str,
    resolver: Box<dyn TagResolver>,
}

/// The dependency injection engine.
///
/// Holds the registry handle and the ordered, append-only resolver
/// collection. Both live for the process lifetime; there is no teardown path.
pub struct Injector {
    registry: Arc<dyn InstanceRegistry>,
    resolvers: RwLock<Vec<Arc<RegisteredResolver>>>,
}

impl Injector {
    /// Create an engine over the given registry.
    pub fn new(registry: Arc<dyn InstanceRegistry>) -> Self {
        Self {
            registry,
            resolvers: RwLock::new(Vec::new()),
        }
    }

    /// The registry this engine resolves against.
    pub fn registry(&self) -> &Arc<dyn InstanceRegistry> {
        &self.registry
    }

    /// Append a resolver; registration order is resolution precedence.
    pub fn register_resolver<R: TagResolver + 'static>(&self, resolver: R) {
        let entry = Arc::new(RegisteredResolver {
            type_path: std::any::type_name::<R>(),
            resolver: Box::new(resolver),
        });
        self.resolvers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry);
    }

    /// Register every inventory-collected resolver.
    pub fn bootstrap_resolvers(&self) {
        for registration in inventory::iter::<ResolverRegistration> {
            tracing::debug!(resolver = registration.name, "registering collected resolver");
            (registration.register)(self);
        }
    }

    /// Number of registered resolvers.
    pub fn resolver_count(&self) -> usize {
        self.resolvers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Full-object injection: fields, then the init hook.
    pub fn inject(&self, object: &mut dyn Injectable) -> Result<(), InjectError> {
        self.inject_fields(object)?;
        self.inject_method(object)
    }

    /// Resolve and assign every field of `object`, recursing into nested
    /// composite values.
    ///
    /// Requires the registry to hold the system configuration and the shared
    /// configuration map under their well-known names; both are read once
    /// here and passed down through the recursion.
    pub fn inject_fields(&self, object: &mut dyn Injectable) -> Result<(), InjectError> {
        let context = self.context()?;
        self.inject_fields_with(object, &context)
    }

    fn context(&self) -> Result<ResolverContext, InjectError> {
        let system = self
            .registry
            .lookup(SYSTEM_CONFIGURATION)
            .and_then(|instance| instance.downcast::<SystemConfiguration>().ok())
            .ok_or(InjectError::NotConfigured)?;
        let configurations = self
            .registry
            .lookup(CONFIGURATIONS)
            .and_then(|instance| instance.downcast::<crate::config::ConfigMap>().ok())
            .ok_or(InjectError::NotConfigured)?;
        Ok(ResolverContext {
            system,
            configurations,
        })
    }

    fn snapshot(&self) -> Vec<Arc<RegisteredResolver>> {
        self.resolvers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn inject_fields_with(
        &self,
        object: &mut dyn Injectable,
        context: &ResolverContext,
    ) -> Result<(), InjectError> {
        let parent_type = object.as_any().type_id();
        let resolvers = self.snapshot();
        let mut nested_err = None;

        for field in reflect::deep_fields(object.fields()) {
            let field_name = name::lower_camel(field.name);

            // Convention lookup wins over tags.
            let mut resolved = self.registry.lookup(&field_name);

            if resolved.is_none() {
                for entry in &resolvers {
                    let keyword = resolver_keyword(entry.type_path)
                        .ok_or(InjectError::invalid_tag_name(entry.type_path))?;
                    let Some(raw) = field.tag(&keyword) else {
                        continue;
                    };
                    entry.resolver.init(context.clone());
                    if let Some(instance) = entry.resolver.decode(&*object, &field, raw) {
                        if entry.resolver.is_singleton() {
                            if let Err(err) =
                                self.registry.store_if_absent(&field_name, instance.clone())
                            {
                                tracing::warn!(instance = %field_name, %err, "instance already exists");
                            }
                        }
                        resolved = Some(instance);
                        // Only one tag takes part in resolving a field.
                        break;
                    }
                }
            }

            if let Some(instance) = resolved {
                if object.set_field(field.name, instance) {
                    tracing::debug!(
                        parent = object.type_name(),
                        field = field.name,
                        "injected field"
                    );
                }
            }

            if let Some(child) = object.composite_mut(field.name) {
                if child.as_any().type_id() != parent_type {
                    if let Err(err) = self.inject_fields_with(child, context) {
                        nested_err = Some(err);
                    }
                }
            }
        }

        match nested_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Resolve the parameters of `object`'s init hook and invoke it.
    ///
    /// A component without a hook is a no-op success. A capability or
    /// sequence parameter with no registry entry fails the whole call and the
    /// hook is never invoked; other kinds are auto-created from their zero
    /// value and stored under their plain type name.
    pub fn inject_method(&self, object: &mut dyn Injectable) -> Result<(), InjectError> {
        let Some(params) = object.init_params() else {
            return Ok(());
        };
        let parent_type = object.as_any().type_id();
        let mut nested_err = None;

        let mut args = Vec::with_capacity(params.len());
        for param in &params {
            let instance = self.resolve_param(param, Some(parent_type), &mut nested_err)?;
            args.push(instance);
        }

        if !object.call_init(args) {
            return Err(InjectError::InvalidObject);
        }
        match nested_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Resolve the parameters of a type-erased factory and invoke it,
    /// returning the produced instance.
    ///
    /// Fails with [`InjectError::InvalidFunc`] when the value is not a
    /// [`Factory`].
    pub fn inject_func(
        &self,
        callable: &(dyn std::any::Any + Send + Sync),
    ) -> Result<Option<Instance>, InjectError> {
        let factory = callable
            .downcast_ref::<Factory>()
            .ok_or(InjectError::InvalidFunc)?;
        self.inject_callable(factory)
    }

    /// Resolve the parameters of a callable and invoke it.
    ///
    /// Field-injection failures on resolved parameters are logged and
    /// swallowed; an unresolvable parameter fails immediately, naming the
    /// offending type.
    pub fn inject_callable(&self, callable: &dyn Callable) -> Result<Option<Instance>, InjectError> {
        let params = callable.params();
        let mut args = Vec::with_capacity(params.len());
        for param in &params {
            let mut swallowed = None;
            let instance = self.resolve_param(param, None, &mut swallowed)?;
            if let Some(err) = swallowed {
                tracing::debug!(%err, param = param.short_name(), "field injection of callable parameter failed");
            }
            args.push(instance);
        }
        Ok(callable.call(args))
    }

    /// Sugar over [`Injector::inject_callable`] for plain closures.
    pub fn inject_fn<F, Args>(&self, function: F) -> Result<Option<Instance>, InjectError>
    where
        F: IntoCallable<Args>,
    {
        self.inject_callable(&*function.into_callable())
    }

    /// Resolve one declared parameter: plain name, qualified name, then the
    /// auto-creation policy.
    fn resolve_param(
        &self,
        param: &ParamDescriptor,
        parent_type: Option<TypeId>,
        nested_err: &mut Option<InjectError>,
    ) -> Result<Instance, InjectError> {
        let short = param.short_name();
        let plain_name = name::lower_camel(short);

        let mut instance = self.registry.lookup(&plain_name);
        if instance.is_none() {
            let qualified = format!("{}{}", param.module_segment(), short);
            instance = self.registry.lookup(&name::lower_camel(&qualified));
        }

        match instance {
            Some(mut found) => {
                self.descend_into(&mut found, param, parent_type, nested_err);
                Ok(found)
            }
            None => match param.kind {
                // Capability and sequence creation is not supported.
                FieldKind::Capability | FieldKind::Sequence => {
                    Err(InjectError::not_injected(short))
                }
                _ => {
                    let construct = param
                        .construct
                        .ok_or(InjectError::not_injected(short))?;
                    let mut created = construct();
                    self.descend_into(&mut created, param, parent_type, nested_err);
                    if let Err(err) = self.registry.store_if_absent(&plain_name, created.clone()) {
                        tracing::warn!(instance = %plain_name, %err, "instance already exists");
                    }
                    Ok(created)
                }
            },
        }
    }

    /// Field-inject a composite parameter while it is exclusively owned.
    ///
    /// Shared instances were injected where they were constructed; skipping
    /// them is what makes re-entrant mutation of the graph impossible.
    fn descend_into(
        &self,
        instance: &mut Instance,
        param: &ParamDescriptor,
        parent_type: Option<TypeId>,
        nested_err: &mut Option<InjectError>,
    ) {
        if param.kind != FieldKind::Composite {
            return;
        }
        let Some(as_composite) = param.as_composite else {
            return;
        };
        let Some(exclusive) = Arc::get_mut(instance) else {
            return;
        };
        let Some(child) = as_composite(exclusive) else {
            return;
        };
        if let Some(parent) = parent_type {
            if child.as_any().type_id() == parent {
                return;
            }
        }
        if let Err(err) = self.inject_fields(child) {
            *nested_err = Some(err);
        }
    }
}
