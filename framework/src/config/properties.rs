//! System configuration properties
//!
//! Typed view of the process-wide settings the engine and its resolvers care
//! about. Construction is environment-aware: [`SystemConfiguration::load`]
//! reads `.env` first, then lets real environment variables override the
//! defaults.

use serde::{Deserialize, Serialize};

use crate::Injectable;

/// Profile selection for the running application.
#[derive(Debug, Clone, Serialize, Deserialize, Injectable)]
#[serde(default)]
pub struct Profiles {
    /// Profiles included alongside the active one.
    pub include: Vec<String>,
    /// The active profile.
    pub active: String,
}

impl Default for Profiles {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            active: "dev".to_string(),
        }
    }
}

/// Application identity properties.
#[derive(Debug, Clone, Serialize, Deserialize, Injectable)]
#[serde(default)]
pub struct AppProperties {
    /// Project the application belongs to.
    pub project: String,
    /// Application name.
    pub name: String,
    /// Profile selection.
    pub profiles: Profiles,
}

impl Default for AppProperties {
    fn default() -> Self {
        Self {
            project: "armature".to_string(),
            name: "armature-app".to_string(),
            profiles: Profiles::default(),
        }
    }
}

/// Server properties.
#[derive(Debug, Clone, Serialize, Deserialize, Injectable)]
#[serde(default)]
pub struct ServerProperties {
    /// Listen port, kept textual so placeholders can reference it verbatim.
    pub port: String,
}

impl Default for ServerProperties {
    fn default() -> Self {
        Self {
            port: "8080".to_string(),
        }
    }
}

/// Logging properties.
#[derive(Debug, Clone, Serialize, Deserialize, Injectable)]
#[serde(default)]
pub struct LoggingProperties {
    /// Log level filter.
    pub level: String,
}

impl Default for LoggingProperties {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// The system configuration stored under
/// [`SYSTEM_CONFIGURATION`](crate::SYSTEM_CONFIGURATION).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Injectable)]
#[serde(default)]
pub struct SystemConfiguration {
    /// Application identity.
    pub app: AppProperties,
    /// Server settings.
    pub server: ServerProperties,
    /// Logging settings.
    pub logging: LoggingProperties,
}

impl SystemConfiguration {
    /// Build the configuration from defaults, `.env`, and the environment.
    ///
    /// Precedence, lowest to highest: built-in defaults, `.env` entries,
    /// real environment variables.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        if let Ok(project) = std::env::var("APP_PROJECT") {
            config.app.project = project;
        }
        if let Ok(name) = std::env::var("APP_NAME") {
            config.app.name = name;
        }
        if let Ok(active) = std::env::var("APP_PROFILES_ACTIVE") {
            config.app.profiles.active = active;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            config.server.port = port;
        }
        if let Ok(level) = std::env::var("LOGGING_LEVEL") {
            config.logging.level = level;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = SystemConfiguration::default();
        assert_eq!(config.app.project, "armature");
        assert_eq!(config.app.name, "armature-app");
        assert_eq!(config.app.profiles.active, "dev");
        assert_eq!(config.server.port, "8080");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn serializes_with_lowercase_keys() {
        let tree = serde_json::to_value(SystemConfiguration::default()).unwrap();
        assert_eq!(tree["app"]["name"], "armature-app");
        assert_eq!(tree["server"]["port"], "8080");
    }
}
