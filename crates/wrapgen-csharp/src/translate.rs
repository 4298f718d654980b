//! Type and namespace translation tables.
//!
//! Kept as data rather than branching logic: adding a mapping means adding
//! a row. The namespace table comes from the configuration so the same
//! backend serves differently-named native roots.

use wrapgen_core::{Config, name};

/// Native type name → C# alias.
const TYPE_TRANSLATIONS: &[(&str, &str)] = &[
    ("int8_t", "sbyte"),
    ("uint8_t", "byte"),
    ("unsigned char", "byte"),
    ("int16_t", "short"),
    ("uint16_t", "ushort"),
    ("int32_t", "int"),
    ("long", "int"),
    ("uint32_t", "uint"),
    ("unsigned int", "uint"),
    ("unsigned long", "uint"),
    ("int64_t", "long"),
    ("long long", "long"),
    ("long int", "long"),
    ("uint64_t", "ulong"),
    ("unsigned long long", "ulong"),
    ("unsigned long int", "ulong"),
    // Assume 64-bit targets.
    ("size_t", "ulong"),
];

/// Native enum base type → C# enum base.
const ENUM_BASE_TRANSLATIONS: &[(&str, &str)] = &[
    ("uint8_t", "byte"),
    ("unsigned char", "byte"),
    ("uint16_t", "ushort"),
    ("unsigned short", "ushort"),
];

/// Look up the C# alias for a native type name.
pub(crate) fn translate_type_name(type_name: &str) -> Option<&'static str> {
    TYPE_TRANSLATIONS
        .iter()
        .find(|(from, _)| *from == type_name)
        .map(|(_, to)| *to)
}

/// Look up the C# base type for an enum's declared underlying type.
pub(crate) fn translate_enum_base(base: &str) -> Option<&'static str> {
    ENUM_BASE_TRANSLATIONS
        .iter()
        .find(|(from, _)| *from == base)
        .map(|(_, to)| *to)
}

/// Namespace translation bound to one backend run's configuration.
pub(crate) struct Translator<'a> {
    config: &'a Config,
}

impl<'a> Translator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// Substitute the first two path segments through the configured table,
    /// leaving deeper segments untouched, and join with `.` for the target
    /// surface.
    pub fn translate_path(&self, namespace: &str) -> String {
        let mut segments: Vec<String> = name::split_path(namespace)
            .into_iter()
            .map(str::to_string)
            .collect();
        for segment in segments.iter_mut().take(2) {
            if let Some(translated) = self.config.namespace_translations.get(segment) {
                *segment = translated.clone();
            }
        }
        segments.join(".")
    }

    /// Translated namespace of a type qualification, if any.
    pub fn type_namespace(&self, namespace: Option<&str>) -> Option<String> {
        let ns = namespace?;
        if ns.is_empty() {
            return None;
        }
        Some(self.translate_path(ns))
    }

    /// Namespace block an entity renders into; file-scope declarations land
    /// in the base namespace.
    pub fn entity_namespace(&self, namespace: &str) -> String {
        if namespace.is_empty() {
            self.config.base_namespace.clone()
        } else {
            self.translate_path(namespace)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config() -> Config {
        let mut namespace_translations = BTreeMap::new();
        namespace_translations.insert("acme".to_string(), "Acme".to_string());
        namespace_translations.insert("common".to_string(), "Common".to_string());
        namespace_translations.insert("systems".to_string(), "Systems".to_string());
        Config {
            template_directory: "templates".into(),
            output_directory: "out".into(),
            base_namespace: "Acme".to_string(),
            namespace_translations,
            result_base: None,
            header_root: "include".into(),
            formatter_command: None,
        }
    }

    #[test]
    fn fixed_width_integers_map_to_aliases() {
        assert_eq!(translate_type_name("int8_t"), Some("sbyte"));
        assert_eq!(translate_type_name("unsigned long long"), Some("ulong"));
        assert_eq!(translate_type_name("size_t"), Some("ulong"));
        assert_eq!(translate_type_name("Widget"), None);
    }

    #[test]
    fn enum_bases_map_to_aliases() {
        assert_eq!(translate_enum_base("uint8_t"), Some("byte"));
        assert_eq!(translate_enum_base("unsigned short"), Some("ushort"));
        assert_eq!(translate_enum_base("int"), None);
    }

    #[test]
    fn only_first_two_segments_are_translated() {
        let config = config();
        let tr = Translator::new(&config);
        // "systems" has a mapping, but as a third segment it must pass
        // through untouched.
        assert_eq!(tr.translate_path("acme::common::systems"), "Acme.Common.systems");
        assert_eq!(tr.translate_path("acme::systems"), "Acme.Systems");
        assert_eq!(tr.translate_path("other::deep::path"), "other.deep.path");
    }

    #[test]
    fn entity_namespace_defaults_to_base() {
        let config = config();
        let tr = Translator::new(&config);
        assert_eq!(tr.entity_namespace(""), "Acme");
        assert_eq!(tr.entity_namespace("acme::systems"), "Acme.Systems");
    }
}
