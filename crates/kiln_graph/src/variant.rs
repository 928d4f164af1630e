//! Build-variant configuration naming.
//!
//! Variant configurations are spelled as a lower-camel prefix followed by the
//! capitalized base name: `debug` + `api` is `debugApi`, `tiyaRelease` +
//! `runtimeOnly` is `tiyaReleaseRuntimeOnly`.

/// Base configuration names whose contents are re-threaded into parents, in
/// propagation order.
pub const PROPAGATED_CONFIGURATIONS: [&str; 3] = ["api", "runtimeOnly", "implementation"];

/// Build types every module is built in.
pub const BUILD_TYPES: [&str; 2] = ["debug", "release"];

/// Spells the configuration `base` under variant `prefix`.
///
/// An empty prefix returns `base` unchanged.
pub fn configuration_name(prefix: &str, base: &str) -> String {
    if prefix.is_empty() {
        return base.to_string();
    }
    format!("{prefix}{}", capitalize(base))
}

/// The variant prefixes a module with the given flavor propagates under.
///
/// Always `""`, `debug` and `release`; a non-empty flavor adds `<flavor>`,
/// `<flavor>Debug` and `<flavor>Release`.
pub fn variant_prefixes(flavor: &str) -> Vec<String> {
    let mut prefixes = vec![String::new()];
    prefixes.extend(BUILD_TYPES.iter().map(|t| t.to_string()));
    if !flavor.is_empty() {
        prefixes.push(flavor.to_string());
        prefixes.extend(BUILD_TYPES.iter().map(|t| configuration_name(flavor, t)));
    }
    prefixes
}

/// Uppercases the first character only.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_prefix_keeps_base() {
        assert_eq!(configuration_name("", "api"), "api");
        assert_eq!(configuration_name("", "runtimeOnly"), "runtimeOnly");
    }

    #[test]
    fn prefix_capitalizes_first_char_only() {
        assert_eq!(configuration_name("debug", "api"), "debugApi");
        assert_eq!(configuration_name("flavor", "implementation"), "flavorImplementation");
        assert_eq!(configuration_name("release", "runtimeOnly"), "releaseRuntimeOnly");
        assert_eq!(
            configuration_name("tiyaDebug", "runtimeOnly"),
            "tiyaDebugRuntimeOnly"
        );
    }

    #[test]
    fn prefixes_without_flavor() {
        assert_eq!(variant_prefixes(""), vec!["", "debug", "release"]);
    }

    #[test]
    fn prefixes_with_flavor() {
        assert_eq!(
            variant_prefixes("tiya"),
            vec!["", "debug", "release", "tiya", "tiyaDebug", "tiyaRelease"]
        );
    }

    #[test]
    fn capitalize_edge_cases() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("a"), "A");
        assert_eq!(capitalize("Api"), "Api");
    }
}
