//! Namespace path helpers.
//!
//! Declarations carry their namespace as a `::`-joined string, exactly as it
//! appears in the header. Registry keys and native entry-point names are
//! derived from it here so every crate agrees on the joined forms.

/// Split a `::`-joined namespace path into its segments.
///
/// An empty path yields no segments; leading `::` is normalized away.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split("::").filter(|s| !s.is_empty()).collect()
}

/// Join a namespace path, enclosing type names, and a simple name into the
/// fully-qualified registry key (`ns::Outer::Name`).
pub fn full_name(namespace: &str, enclosing_types: &[String], name: &str) -> String {
    let mut parts: Vec<&str> = split_path(namespace);
    parts.extend(enclosing_types.iter().map(String::as_str));
    parts.push(name);
    parts.join("::")
}

/// The flattened type name used for native entry points: all path segments
/// joined with underscores, with a leading underscore (`_Foo`,
/// `acme_systems_Foo`-style for qualified names).
pub fn full_safe_type_name(namespace: &str, name: &str) -> String {
    format!("{}_{}", namespace.replace("::", "_"), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_empty_path() {
        assert!(split_path("").is_empty());
        assert_eq!(split_path("::a::b"), vec!["a", "b"]);
    }

    #[test]
    fn full_name_global() {
        assert_eq!(full_name("", &[], "Foo"), "Foo");
        assert_eq!(full_name("a::b", &[], "Foo"), "a::b::Foo");
    }

    #[test]
    fn full_name_nested() {
        let enclosing = vec!["Outer".to_string()];
        assert_eq!(full_name("a", &enclosing, "Inner"), "a::Outer::Inner");
    }

    #[test]
    fn safe_type_name() {
        assert_eq!(full_safe_type_name("", "Foo"), "_Foo");
        assert_eq!(full_safe_type_name("a::b", "Foo"), "a_b_Foo");
    }
}
