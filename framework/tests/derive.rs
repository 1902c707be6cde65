//! End-to-end injection through the derived reflection surface.

use std::sync::Arc;

use armature::reflect::{capability_of, deep_fields};
use armature::{
    bind, tag_resolver, testing, Factory, InjectError, Injectable, Injector, InstanceMap,
    InstanceRegistry, RegistryExt, ResolverContext, TagResolver,
};

pub trait Formatter: Send + Sync {
    fn format(&self, text: &str) -> String;
}

struct UpperFormatter;

impl Formatter for UpperFormatter {
    fn format(&self, text: &str) -> String {
        text.to_uppercase()
    }
}

#[derive(Default, Clone, Injectable)]
pub struct GreetingService {
    pub greeting: String,
}

#[derive(Default, Clone, Injectable)]
pub struct BaseController {
    pub request_count: u32,
}

#[derive(Default, Injectable)]
#[inject(init(GreetingService, dyn Formatter))]
pub struct GreetController {
    #[inject(embedded)]
    base: BaseController,
    #[inject(tag(value = "${app.name:anonymous}"))]
    app_name: Option<Arc<String>>,
    greeting_service: Option<Arc<GreetingService>>,
    formatter: Option<Arc<dyn Formatter>>,
    banner: String,
}

impl GreetController {
    fn init(&mut self, service: Arc<GreetingService>, formatter: Arc<dyn Formatter>) {
        self.banner = formatter.format(&service.greeting);
    }
}

#[derive(Default, Injectable)]
pub struct ApiController {
    #[inject(embedded)]
    formatter: Option<Arc<dyn Formatter>>,
}

#[derive(Default, Clone, Injectable)]
pub struct Baz {
    pub x: i32,
}

#[derive(Default, Injectable)]
pub struct Foo {
    baz: Option<Arc<Baz>>,
}

#[derive(Default, Injectable)]
pub struct Scratchpad {
    pub label: String,
    #[inject(skip)]
    pub buffer: [u8; 4],
}

#[tag_resolver]
#[derive(Default)]
pub struct ProfileResolver;

impl TagResolver for ProfileResolver {
    fn init(&self, _context: ResolverContext) {}

    fn decode(
        &self,
        _object: &dyn Injectable,
        _field: &armature::FieldDescriptor,
        value: &str,
    ) -> Option<armature::Instance> {
        Some(Arc::new(format!("profile:{value}")) as armature::Instance)
    }

    fn is_singleton(&self) -> bool {
        true
    }
}

#[derive(Default, Injectable)]
pub struct ProfiledComponent {
    #[inject(tag(profile = "active"))]
    profile: Option<Arc<String>>,
}

#[test]
fn derived_descriptors_flatten_embedded_fields() {
    let flattened = deep_fields(GreetController::field_descriptors());
    let names: Vec<&str> = flattened.iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        vec![
            "request_count",
            "app_name",
            "greeting_service",
            "formatter",
            "banner"
        ]
    );
}

#[test]
fn convention_injection_assigns_registry_instances() {
    let (injector, registry) = testing::configured_injector();
    let service = Arc::new(GreetingService {
        greeting: "hello".to_string(),
    });
    registry
        .store_if_absent("greetingService", service.clone() as armature::Instance)
        .unwrap();
    bind!(registry, "formatter", dyn Formatter, UpperFormatter).unwrap();

    let mut controller = GreetController::default();
    injector.inject(&mut controller).unwrap();

    assert!(Arc::ptr_eq(
        controller.greeting_service.as_ref().unwrap(),
        &service
    ));
    assert_eq!(
        controller.formatter.as_ref().unwrap().format("ok"),
        "OK"
    );
    assert_eq!(controller.banner, "HELLO");
}

#[test]
fn embedded_fields_resolve_through_the_parent() {
    let (injector, registry) = testing::configured_injector();
    registry.put("requestCount", 7u32).unwrap();
    bind!(registry, "formatter", dyn Formatter, UpperFormatter).unwrap();

    let mut controller = GreetController::default();
    injector.inject(&mut controller).unwrap();
    assert_eq!(controller.base.request_count, 7);
}

#[test]
fn value_tags_decode_against_the_system_configuration() {
    let (injector, registry) = testing::configured_injector();
    injector.bootstrap_resolvers();
    bind!(registry, "formatter", dyn Formatter, UpperFormatter).unwrap();

    let mut controller = GreetController::default();
    injector.inject(&mut controller).unwrap();
    assert_eq!(
        controller.app_name.as_ref().unwrap().as_str(),
        "armature-app"
    );
}

#[test]
fn hooks_auto_create_missing_composite_dependencies() {
    let (injector, registry) = testing::configured_injector();
    bind!(registry, "formatter", dyn Formatter, UpperFormatter).unwrap();

    let mut controller = GreetController::default();
    injector.inject(&mut controller).unwrap();

    // The zero greeting formats to an empty banner, and the auto-created
    // service is cached under its plain type name.
    assert_eq!(controller.banner, "");
    assert!(registry.get_as::<GreetingService>("greetingService").is_some());
}

#[test]
fn capability_hook_parameters_require_a_binding() {
    let (injector, _registry) = testing::configured_injector();

    let mut controller = GreetController::default();
    let err = injector.inject_method(&mut controller).unwrap_err();
    assert!(matches!(err, InjectError::NotInjected { type_name } if type_name == "Formatter"));
    assert_eq!(controller.banner, "");
}

#[test]
fn components_classify_by_their_capability_field() {
    let api = ApiController::default();
    let capability = capability_of(&api).unwrap();
    assert_eq!(capability.type_name, "Formatter");

    let foo = Foo::default();
    assert!(matches!(
        capability_of(&foo),
        Err(InjectError::NotImplemented)
    ));
}

#[test]
fn pointer_fields_inject_the_named_instance() {
    let (injector, registry) = testing::configured_injector();
    let stored = Arc::new(Baz { x: 5 });
    registry
        .store_if_absent("baz", stored.clone() as armature::Instance)
        .unwrap();

    let mut foo = Foo::default();
    injector.inject_fields(&mut foo).unwrap();

    let injected = foo.baz.as_ref().unwrap();
    assert_eq!(injected.x, 5);
    assert!(Arc::ptr_eq(injected, &stored));
}

#[test]
fn skipped_fields_are_left_alone() {
    let (injector, registry) = testing::configured_injector();
    registry.put("label", "named".to_string()).unwrap();

    let mut pad = Scratchpad::default();
    injector.inject_fields(&mut pad).unwrap();
    assert_eq!(pad.label, "named");
    assert_eq!(pad.buffer, [0u8; 4]);
}

#[test]
fn attribute_registered_resolvers_bootstrap_and_cache() {
    let (injector, registry) = testing::configured_injector();
    injector.bootstrap_resolvers();
    assert!(injector.resolver_count() >= 2);

    let mut component = ProfiledComponent::default();
    injector.inject_fields(&mut component).unwrap();

    assert_eq!(
        component.profile.as_ref().unwrap().as_str(),
        "profile:active"
    );
    let cached = registry.get_as::<String>("profile").unwrap();
    assert!(Arc::ptr_eq(&cached, component.profile.as_ref().unwrap()));
}

#[test]
fn factories_adapt_into_ready_instances() {
    let (injector, registry) = testing::configured_injector();

    let factory = Factory::from_fn(|service: Arc<GreetingService>| service);
    let produced = injector
        .inject_func(&factory)
        .unwrap()
        .unwrap()
        .downcast::<GreetingService>()
        .unwrap();

    assert_eq!(produced.greeting, "");
    let stored = registry.get_as::<GreetingService>("greetingService").unwrap();
    assert!(Arc::ptr_eq(&produced, &stored));
}

#[test]
fn injection_requires_a_configured_registry() {
    let injector = Injector::new(Arc::new(InstanceMap::new()));
    let mut controller = GreetController::default();
    assert!(matches!(
        injector.inject_fields(&mut controller),
        Err(InjectError::NotConfigured)
    ));
}
