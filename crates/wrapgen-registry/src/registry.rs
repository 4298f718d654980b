//! The aggregated interface model.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use wrapgen_core::metadata::{
    ClassMetadata, EnumMetadata, FileDecls, FunctionMetadata, InterfaceMetadata, StructMetadata,
    TemplateMetadata,
};

/// All declarations extracted from the header set, keyed by fully-qualified
/// `namespace::Name`.
///
/// Built by merging one [`FileDecls`] per header, in parse order. Once
/// parsing finishes the model is frozen: backends receive a shared
/// reference and clone the parts they rewrite, so no backend's rewrites can
/// leak into another backend's view.
#[derive(Debug, Clone, Default)]
pub struct ApiModel {
    pub enums: FxHashMap<String, EnumMetadata>,
    pub structs: FxHashMap<String, StructMetadata>,
    pub functions: FxHashMap<String, FunctionMetadata>,
    pub classes: FxHashMap<String, ClassMetadata>,
    pub templates: FxHashMap<String, TemplateMetadata>,
    pub interfaces: FxHashMap<String, InterfaceMetadata>,
}

impl ApiModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one header's declarations into the model.
    ///
    /// Template instantiations attach to their definition; an instantiation
    /// of a template the model has never seen is dropped with a debug log,
    /// matching the registry's general stance that absent data is a valid
    /// negative answer.
    pub fn merge(&mut self, decls: FileDecls) {
        for e in decls.enums {
            self.enums.insert(e.full_name(), e);
        }
        for s in decls.structs {
            self.structs.insert(s.full_name(), s);
        }
        for c in decls.classes {
            self.classes.insert(c.full_name(), c);
        }
        for i in decls.interfaces {
            self.interfaces.insert(i.full_name(), i);
        }
        for f in decls.functions {
            self.functions.insert(f.full_name(), f);
        }
        for t in decls.templates {
            self.templates.insert(t.full_name(), t);
        }
        for (template_name, inst) in decls.instantiations {
            match self.templates.get_mut(&template_name) {
                Some(t) => t.instantiations.push(inst),
                None => debug!(
                    template = %template_name,
                    file = %inst.header_file,
                    "dropping instantiation of unknown template"
                ),
            }
        }
    }

    /// Does `class` derive, directly or transitively, from the type named
    /// (`base_namespace`, `base_name`)?
    ///
    /// Base references are resolved by name through the class mapping at
    /// query time. A base that is not in the model ends the walk with a
    /// negative answer. The visited set bounds the walk, so a cyclic base
    /// chain terminates instead of recursing forever.
    pub fn class_derives_from(
        &self,
        class: &ClassMetadata,
        base_namespace: &str,
        base_name: &str,
    ) -> bool {
        let mut visited: FxHashSet<String> = FxHashSet::default();
        let mut current = class;

        loop {
            let Some(base) = &current.base else {
                return false;
            };
            if base.namespace == base_namespace && base.name == base_name {
                return true;
            }

            let key = base.full_name();
            if !visited.insert(key.clone()) {
                return false;
            }
            match self.classes.get(&key) {
                Some(next) => current = next,
                None => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrapgen_core::metadata::BaseRef;

    fn class(namespace: &str, name: &str, base: Option<(&str, &str)>) -> ClassMetadata {
        ClassMetadata {
            header_file: "test.h".to_string(),
            start_line: 1,
            end_line: 1,
            namespace: namespace.to_string(),
            enclosing_types: Vec::new(),
            name: name.to_string(),
            base: base.map(|(ns, n)| BaseRef {
                namespace: ns.to_string(),
                name: n.to_string(),
            }),
            fields: Vec::new(),
            methods: Vec::new(),
            doc_comments: None,
        }
    }

    fn model_of(classes: Vec<ClassMetadata>) -> ApiModel {
        let mut model = ApiModel::new();
        model.merge(FileDecls {
            classes,
            ..FileDecls::default()
        });
        model
    }

    #[test]
    fn direct_base_matches() {
        let model = model_of(vec![class("acme", "Foo", Some(("acme::systems", "ResultBase")))]);
        let foo = &model.classes["acme::Foo"];
        assert!(model.class_derives_from(foo, "acme::systems", "ResultBase"));
        assert!(!model.class_derives_from(foo, "acme::systems", "Other"));
    }

    #[test]
    fn transitive_base_matches() {
        let model = model_of(vec![
            class("acme", "Leaf", Some(("acme", "Mid"))),
            class("acme", "Mid", Some(("acme::systems", "ResultBase"))),
        ]);
        let leaf = &model.classes["acme::Leaf"];
        assert!(model.class_derives_from(leaf, "acme::systems", "ResultBase"));
    }

    #[test]
    fn unknown_base_is_a_negative_answer() {
        let model = model_of(vec![class("acme", "Foo", Some(("elsewhere", "Unknown")))]);
        let foo = &model.classes["acme::Foo"];
        assert!(!model.class_derives_from(foo, "acme::systems", "ResultBase"));
    }

    #[test]
    fn baseless_class_derives_from_nothing() {
        let model = model_of(vec![class("acme", "Foo", None)]);
        let foo = &model.classes["acme::Foo"];
        assert!(!model.class_derives_from(foo, "acme", "Anything"));
    }

    #[test]
    fn cyclic_bases_terminate() {
        let model = model_of(vec![
            class("acme", "A", Some(("acme", "B"))),
            class("acme", "B", Some(("acme", "A"))),
        ]);
        let a = &model.classes["acme::A"];
        assert!(!model.class_derives_from(a, "acme::systems", "ResultBase"));
        // The immediate-match path still answers positively inside a cycle.
        assert!(model.class_derives_from(a, "acme", "B"));
    }

    #[test]
    fn later_headers_override_earlier_keys() {
        let mut model = ApiModel::new();
        model.merge(FileDecls {
            classes: vec![class("acme", "Foo", None)],
            ..FileDecls::default()
        });
        model.merge(FileDecls {
            classes: vec![class("acme", "Foo", Some(("acme", "Base")))],
            ..FileDecls::default()
        });
        assert_eq!(model.classes.len(), 1);
        assert!(model.classes["acme::Foo"].base.is_some());
    }
}
