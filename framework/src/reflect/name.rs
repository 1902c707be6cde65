//! Name conversion helpers
//!
//! Registry names are lower-camel-cased: a field `user_service` and a type
//! `UserService` both resolve to the key `userService`.

/// Lower-case the first character, leaving the rest untouched.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert snake_case or UpperCamelCase input to lowerCamelCase.
pub fn lower_camel(name: &str) -> String {
    if !name.contains('_') {
        return lower_first(name);
    }
    let mut parts = name.split('_').filter(|part| !part.is_empty());
    let mut out = String::with_capacity(name.len());
    if let Some(first) = parts.next() {
        out.push_str(&first.to_lowercase());
    }
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

/// Short type name of a fully qualified path: `system::Configuration` and
/// `dyn app::Greeter` become `Configuration` and `Greeter`.
pub fn short_type_name(type_path: &str) -> &str {
    let path = type_path.trim_start_matches("dyn ");
    let path = match path.find('<') {
        Some(index) => &path[..index],
        None => path,
    };
    match path.rfind("::") {
        Some(index) => &path[index + 2..],
        None => path,
    }
}

/// Originating module segment of a fully qualified path: `system` for
/// `system::Configuration`; empty for an unqualified name.
pub fn module_segment(type_path: &str) -> &str {
    let path = type_path.trim_start_matches("dyn ");
    let path = match path.find('<') {
        Some(index) => &path[..index],
        None => path,
    };
    let Some(end) = path.rfind("::") else {
        return "";
    };
    let head = &path[..end];
    match head.rfind("::") {
        Some(index) => &head[index + 2..],
        None => head,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lower_first_only_touches_the_first_char() {
        assert_eq!(lower_first("Configuration"), "configuration");
        assert_eq!(lower_first("userService"), "userService");
        assert_eq!(lower_first(""), "");
    }

    #[test]
    fn lower_camel_converts_snake_case() {
        assert_eq!(lower_camel("user_service"), "userService");
        assert_eq!(lower_camel("app_name"), "appName");
        assert_eq!(lower_camel("x"), "x");
    }

    #[test]
    fn lower_camel_lowers_upper_camel_input() {
        assert_eq!(lower_camel("UserService"), "userService");
        assert_eq!(lower_camel("Configuration"), "configuration");
    }

    #[test]
    fn short_type_name_strips_path_and_dyn() {
        assert_eq!(short_type_name("system::Configuration"), "Configuration");
        assert_eq!(short_type_name("dyn app::Greeter"), "Greeter");
        assert_eq!(short_type_name("Plain"), "Plain");
        assert_eq!(
            short_type_name("alloc::vec::Vec<alloc::string::String>"),
            "Vec"
        );
    }

    #[test]
    fn module_segment_reports_the_owning_module() {
        assert_eq!(module_segment("armature::system::Configuration"), "system");
        assert_eq!(module_segment("system::Configuration"), "system");
        assert_eq!(module_segment("Plain"), "");
    }
}
