//! armature demo application
//!
//! Wires a small component graph: seeds the registry with the well-known
//! configuration entries, bootstraps the collected tag resolvers, adapts a
//! factory into a ready instance, injects a controller, and classifies it by
//! the capability it implements.

mod components;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use armature::reflect::capability_of;
use armature::{
    bind, ConfigMap, Factory, Injector, InstanceMap, InstanceRegistry, RegistryExt,
    SystemConfiguration, CONFIGURATIONS, SYSTEM_CONFIGURATION,
};
use components::{Formatter, GreetController, GreetingService, PlainFormatter, ShoutingFormatter};

#[derive(Parser)]
#[command(name = "app")]
#[command(about = "armature dependency injection demo")]
struct Cli {
    /// Format the greeting in capitals
    #[arg(long)]
    shout: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Wire the component graph and greet (default command)
    Run,
    /// Print the resolved system configuration
    Config,
}

fn main() {
    let config = SystemConfiguration::load();
    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(config, cli.shout),
        Commands::Config => {
            let rendered = render_config(&config);
            println!("{rendered}");
        }
    }
}

fn render_config(config: &SystemConfiguration) -> String {
    format!(
        "app:     {} ({} profile)\nserver:  port {}\nlogging: {}",
        config.app.name, config.app.profiles.active, config.server.port, config.logging.level
    )
}

fn run(config: SystemConfiguration, shout: bool) {
    let registry = Arc::new(InstanceMap::new());
    registry
        .put(SYSTEM_CONFIGURATION, config)
        .expect("fresh registry accepts the system configuration");
    registry
        .put(CONFIGURATIONS, ConfigMap::new())
        .expect("fresh registry accepts the configuration map");

    let injector = Injector::new(registry.clone());
    injector.bootstrap_resolvers();
    tracing::info!(resolvers = injector.resolver_count(), "injector ready");

    // Capability binding the controller depends on.
    if shout {
        bind!(registry, "formatter", dyn Formatter, ShoutingFormatter)
            .expect("formatter binding is unique");
    } else {
        bind!(registry, "formatter", dyn Formatter, PlainFormatter)
            .expect("formatter binding is unique");
    }

    // Adapt a factory into a ready instance and register it; from here on it
    // participates as a dependency like any other.
    let factory = Factory::from_fn(|| {
        Arc::new(GreetingService {
            greeting: "welcome aboard".to_string(),
        })
    });
    let produced = injector
        .inject_func(&factory)
        .expect("factory resolves without parameters");
    if let Some(instance) = produced {
        if let Err(err) = registry.store_if_absent("greetingService", instance) {
            tracing::warn!(%err, "greeting service already registered");
        }
    }

    let mut controller = GreetController::default();
    if let Err(err) = injector.inject(&mut controller) {
        tracing::error!(%err, "controller injection failed");
        std::process::exit(1);
    }

    match capability_of(&controller) {
        Ok(capability) => tracing::debug!(role = capability.type_name, "classified controller"),
        Err(_) => tracing::debug!("controller implements no capability"),
    }

    println!("{}", controller.greet());
}
