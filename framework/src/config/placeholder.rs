//! Property placeholder resolution
//!
//! Resolves `${path.to.property:default}` references against the serialized
//! system configuration. A same-named environment variable overrides the
//! configuration value; the declared default applies when neither yields
//! anything.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::properties::SystemConfiguration;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{(.*?)\}").expect("placeholder pattern is valid"))
}

/// Replace every `${...}` reference in `source` with its resolved value.
///
/// References that resolve to nothing are left in place, matching the
/// tolerant behavior callers rely on for late-bound properties.
pub fn resolve(source: &str, config: &SystemConfiguration) -> String {
    let tree = serde_json::to_value(config).unwrap_or(Value::Null);
    resolve_with(source, &tree)
}

/// Replace `${...}` references against an already-serialized property tree.
pub fn resolve_with(source: &str, tree: &Value) -> String {
    let mut resolved = source.to_string();
    for capture in placeholder_pattern().captures_iter(source) {
        let full = &capture[0];
        let mut path = &capture[1];
        let mut default_value = "";
        if let Some(split) = path.find(':') {
            default_value = &path[split + 1..];
            path = &path[..split];
        }

        let mut value = lookup_path(tree, path).unwrap_or_default();
        if value.is_empty() {
            value = default_value.to_string();
        }
        if let Ok(env_value) = std::env::var(path) {
            if !env_value.is_empty() {
                value = env_value;
            }
        }
        if !value.is_empty() {
            resolved = resolved.replace(full, &value);
        }
    }
    resolved
}

fn lookup_path(tree: &Value, path: &str) -> Option<String> {
    let mut node = tree;
    for segment in path.split('.') {
        node = node.get(segment)?;
    }
    match node {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_a_property_path() {
        let config = SystemConfiguration::default();
        assert_eq!(resolve("${app.name}", &config), "armature-app");
        assert_eq!(
            resolve("listening on ${server.port}", &config),
            "listening on 8080"
        );
    }

    #[test]
    fn falls_back_to_the_declared_default() {
        let config = SystemConfiguration::default();
        assert_eq!(resolve("${app.owner:nobody}", &config), "nobody");
    }

    #[test]
    fn leaves_unresolvable_references_in_place() {
        let config = SystemConfiguration::default();
        assert_eq!(resolve("${app.owner}", &config), "${app.owner}");
    }

    #[test]
    fn environment_variables_win() {
        let config = SystemConfiguration::default();
        std::env::set_var("armature.test.placeholder", "from-env");
        assert_eq!(
            resolve("${armature.test.placeholder:fallback}", &config),
            "from-env"
        );
        std::env::remove_var("armature.test.placeholder");
    }

    #[test]
    fn literal_sources_pass_through() {
        let config = SystemConfiguration::default();
        assert_eq!(resolve("plain text", &config), "plain text");
    }

    #[test]
    fn non_string_terminals_render_as_json() {
        let tree = serde_json::json!({ "app": { "workers": 4 } });
        assert_eq!(resolve_with("${app.workers}", &tree), "4");
    }
}
