//! Naming rules shared by the resolver and the template filters.

use heck::{ToSnakeCase, ToUpperCamelCase};
use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Suffixes that look plural but usually are not (`status`, `address`, `axis`).
/// Collection fields ending in one of these must carry an explicit override.
const DISALLOWED_SUFFIXES: [&str; 3] = ["ss", "us", "is"];

/// Plural endings and their singular replacement, first match wins.
/// Checked before [`AMBIGUOUS_PLURALS`], so `sses` still resolves.
const SINGULAR_RULES: [(&str, &str); 5] = [
    ("ies", "y"),
    ("sses", "ss"),
    ("xes", "x"),
    ("ches", "ch"),
    ("shes", "sh"),
];

/// `-es` endings whose singular cannot be told from the spelling
/// (`hostAliases`/`aliases` vs `cases`, `sizes` vs `quizzes`, `shoes` vs
/// `heroes`). Collection fields ending in one of these need an override.
const AMBIGUOUS_PLURALS: [&str; 3] = ["ses", "zes", "oes"];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "priv", "pub", "ref", "return", "self", "static", "struct", "super", "trait",
    "true", "try", "type", "typeof", "unsafe", "use", "virtual", "where", "while", "yield",
    "abstract", "become", "do", "final", "macro", "override", "unsized", "Self",
];

/// Keywords that cannot be written as raw identifiers.
const PATH_KEYWORDS: [&str; 5] = ["crate", "self", "super", "Self", "_"];

#[must_use]
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

#[must_use]
pub fn is_keyword(s: &str) -> bool {
    s == "_" || RUST_KEYWORDS.contains(&s)
}

/// Whether `segment` can name a module directory. Keywords are fine as long as
/// they have a raw form (`r#type`); `crate`, `self`, `super` and `_` do not.
#[must_use]
pub fn is_module_segment(segment: &str) -> bool {
    is_identifier(segment) && !PATH_KEYWORDS.contains(&segment)
}

/// A namespace segment as it appears in a Rust path, `r#`-escaped if needed.
#[must_use]
pub fn module_segment(segment: &str) -> String {
    if is_keyword(segment) {
        format!("r#{segment}")
    } else {
        segment.to_string()
    }
}

/// Singular element name for a collection field.
///
/// `singular` overrides everything and is returned verbatim. Without one, names
/// ending in a disallowed suffix return `None` (an override is required), the
/// rule table is tried, ambiguous `-es` endings return `None`, and finally a
/// trailing `s` is dropped. A name with no trailing `s` is its own element name.
#[must_use]
pub fn collection_element_name(field: &str, singular: Option<&str>) -> Option<String> {
    if let Some(explicit) = singular {
        return Some(explicit.to_string());
    }
    if DISALLOWED_SUFFIXES.iter().any(|s| field.ends_with(s)) {
        return None;
    }
    for (plural, replacement) in SINGULAR_RULES {
        if let Some(stem) = field.strip_suffix(plural) {
            if !stem.is_empty() {
                return Some(format!("{stem}{replacement}"));
            }
        }
    }
    if AMBIGUOUS_PLURALS.iter().any(|s| field.ends_with(s)) {
        return None;
    }
    match field.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => Some(stem.to_string()),
        _ => Some(field.to_string()),
    }
}

/// Snake-case identifier that is safe to emit as a Rust field or method name.
///
/// Non-alphanumeric characters separate words (`$ref` → `ref_`,
/// `x-kubernetes-int` → `x_kubernetes_int`), keywords get a trailing underscore
/// and a leading digit gets a leading one.
#[must_use]
pub fn snake_identifier(raw: &str) -> String {
    let mut name = raw.to_snake_case();
    if name.is_empty() {
        return "field_".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    if RUST_KEYWORDS.contains(&name.as_str()) {
        name.push('_');
    }
    name
}

/// Upper camel case variant name for an enum constant.
#[must_use]
pub fn variant_identifier(raw: &str) -> String {
    let mut name = raw.to_upper_camel_case();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, 'V');
    }
    if name == "Self" {
        name.push('_');
    }
    name
}

/// Descriptions mentioning deprecation mark members that are left out of the model.
#[must_use]
pub fn is_deprecated(description: Option<&str>) -> bool {
    description.is_some_and(|d| d.to_lowercase().contains("deprecate"))
}

/// Wrap `text` to `width` columns for doc comments.
///
/// Explicit line breaks are kept; a blank input line yields an empty output line.
#[must_use]
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && current.len() + 1 + word.len() > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_s_removed() {
        assert_eq!(collection_element_name("verbs", None).as_deref(), Some("verb"));
        assert_eq!(collection_element_name("podCIDRs", None).as_deref(), Some("podCIDR"));
        assert_eq!(collection_element_name("items", None).as_deref(), Some("item"));
    }

    #[test]
    fn test_rule_table() {
        assert_eq!(collection_element_name("policies", None).as_deref(), Some("policy"));
        assert_eq!(collection_element_name("addresses", None).as_deref(), Some("address"));
        assert_eq!(collection_element_name("prefixes", None).as_deref(), Some("prefix"));
        assert_eq!(collection_element_name("matches", None).as_deref(), Some("match"));
        assert_eq!(collection_element_name("meshes", None).as_deref(), Some("mesh"));
    }

    #[test]
    fn test_disallowed_suffix_needs_override() {
        assert_eq!(collection_element_name("status", None), None);
        assert_eq!(collection_element_name("ingress", None), None);
        assert_eq!(collection_element_name("axis", None), None);
        assert_eq!(
            collection_element_name("status", Some("statusEntry")).as_deref(),
            Some("statusEntry")
        );
    }

    #[test]
    fn test_ambiguous_es_plural_needs_override() {
        assert_eq!(collection_element_name("hostAliases", None), None);
        assert_eq!(collection_element_name("statuses", None), None);
        assert_eq!(collection_element_name("sizes", None), None);
        assert_eq!(collection_element_name("heroes", None), None);
        assert_eq!(
            collection_element_name("hostAliases", Some("hostAlias")).as_deref(),
            Some("hostAlias")
        );
        // Plain `-es` endings that are not ambiguous still take the `s` rule.
        assert_eq!(collection_element_name("volumes", None).as_deref(), Some("volume"));
        assert_eq!(collection_element_name("addresses", None).as_deref(), Some("address"));
    }

    #[test]
    fn test_override_is_verbatim() {
        assert_eq!(collection_element_name("verbs", Some("Verb")).as_deref(), Some("Verb"));
        assert_eq!(collection_element_name("data", Some("datum")).as_deref(), Some("datum"));
    }

    #[test]
    fn test_no_trailing_s_is_own_element() {
        assert_eq!(collection_element_name("data", None).as_deref(), Some("data"));
        assert_eq!(collection_element_name("s", None).as_deref(), Some("s"));
    }

    #[test]
    fn test_snake_identifier() {
        assert_eq!(snake_identifier("apiVersion"), "api_version");
        assert_eq!(snake_identifier("hostIPC"), "host_ipc");
        assert_eq!(snake_identifier("$ref"), "ref_");
        assert_eq!(snake_identifier("type"), "type_");
        assert_eq!(snake_identifier("x-kubernetes-int-or-string"), "x_kubernetes_int_or_string");
        assert_eq!(snake_identifier("3d"), "_3d");
        assert_eq!(snake_identifier("$"), "field_");
    }

    #[test]
    fn test_variant_identifier() {
        assert_eq!(variant_identifier("json-patch"), "JsonPatch");
        assert_eq!(variant_identifier("Merge"), "Merge");
        assert_eq!(variant_identifier("1x"), "V1x");
    }

    #[test]
    fn test_is_deprecated() {
        assert!(is_deprecated(Some("Deprecated: use spec.foo instead")));
        assert!(is_deprecated(Some("This field is DEPRECATED.")));
        assert!(!is_deprecated(Some("The desired state")));
        assert!(!is_deprecated(None));
    }

    #[test]
    fn test_wrap_lines() {
        let lines = wrap_lines("one two three four", 9);
        assert_eq!(lines, ["one two", "three", "four"]);
        let lines = wrap_lines("first\n\nsecond", 80);
        assert_eq!(lines, ["first", "", "second"]);
    }

    #[test]
    fn test_module_segments() {
        assert_eq!(module_segment("v1"), "v1");
        assert_eq!(module_segment("type"), "r#type");
        assert!(is_module_segment("type"));
        assert!(!is_module_segment("self"));
        assert!(!is_module_segment("crate"));
        assert!(!is_module_segment("_"));
        assert!(is_keyword("mod"));
        assert!(!is_keyword("Widget"));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("v1beta1"));
        assert!(is_identifier("_private"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }
}
