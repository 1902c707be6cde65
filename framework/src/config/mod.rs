//! Configuration model
//!
//! The engine reads two well-known instances from the registry before any
//! tag-based injection proceeds: the system configuration (under
//! [`SYSTEM_CONFIGURATION`]) and the shared configuration map (under
//! [`CONFIGURATIONS`]). Both are handed to every tag resolver ahead of
//! decoding.
//!
//! # Example
//!
//! ```rust,ignore
//! use armature::{ConfigMap, RegistryExt, SystemConfiguration};
//!
//! let registry = Arc::new(InstanceMap::new());
//! registry.put(armature::SYSTEM_CONFIGURATION, SystemConfiguration::load())?;
//! registry.put(armature::CONFIGURATIONS, ConfigMap::new())?;
//! ```

pub mod map;
pub mod placeholder;
pub mod properties;

pub use map::ConfigMap;
pub use properties::{
    AppProperties, LoggingProperties, Profiles, ServerProperties, SystemConfiguration,
};

/// Well-known registry name of the system configuration instance.
pub const SYSTEM_CONFIGURATION: &str = "systemConfiguration";

/// Well-known registry name of the shared configuration map.
pub const CONFIGURATIONS: &str = "configurations";
