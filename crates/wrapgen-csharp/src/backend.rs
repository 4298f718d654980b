//! The C# backend: snapshot, rewrite, render, finish.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::{info, warn};

use wrapgen_core::Config;
use wrapgen_core::metadata::{ClassMetadata, InterfaceMetadata, StructMetadata, TemplateMetadata};
use wrapgen_registry::ApiModel;

use crate::error::GenerateError;
use crate::render::{Templates, output_subdir, write_file};
use crate::rewrite::MethodRewriter;
use crate::translate::Translator;
use crate::view::{
    ClassView, EnumView, FieldView, FunctionView, InterfaceView, MethodView, StructView,
    TemplateView, TypeView,
};

/// Generates one C# source file per entity plus the aggregate free-function
/// file under `<output root>/CSharp/`.
///
/// Each run wipes and fully recreates the output tree: regeneration is
/// total, so renamed or deleted entities never leave stale files behind.
#[derive(Debug, Default)]
pub struct CSharpBackend;

impl CSharpBackend {
    pub const NAME: &'static str = "csharp";

    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, model: &ApiModel, config: &Config) -> Result<(), GenerateError> {
        // Private snapshot; rewrites must never leak into the canonical
        // model or into another backend's view.
        let model = model.clone();

        let templates = Templates::load(&config.template_directory)?;
        let out_root = config.output_directory.join("CSharp");

        if out_root.exists() {
            fs::remove_dir_all(&out_root).map_err(|source| GenerateError::Io {
                path: out_root.clone(),
                source,
            })?;
        }
        fs::create_dir_all(&out_root).map_err(|source| GenerateError::Io {
            path: out_root.clone(),
            source,
        })?;

        let tr = Translator::new(config);

        self.render_enums(&model, &templates, &tr, config, &out_root)?;
        self.render_structs(&model, &templates, &tr, config, &out_root)?;
        self.render_global_functions(&model, &templates, &tr, config, &out_root)?;
        self.render_interfaces(&model, &templates, &tr, config, &out_root)?;
        self.render_classes(&model, &templates, &tr, config, &out_root)?;
        self.render_templates(&model, &templates, &tr, config, &out_root)?;

        self.format_output(&out_root, config);
        Ok(())
    }

    fn render_enums(
        &self,
        model: &ApiModel,
        templates: &Templates,
        tr: &Translator<'_>,
        config: &Config,
        out_root: &Path,
    ) -> Result<(), GenerateError> {
        for key in sorted_keys(&model.enums) {
            let e = &model.enums[key];
            let view = EnumView::build(e, tr);
            let rendered = templates.render("enum.cs.tera", &view, config)?;
            let path = entity_path(out_root, &e.header_file, &e.enclosing_types, &e.name, config);
            write_file(&path, &rendered)?;
        }
        Ok(())
    }

    fn render_structs(
        &self,
        model: &ApiModel,
        templates: &Templates,
        tr: &Translator<'_>,
        config: &Config,
        out_root: &Path,
    ) -> Result<(), GenerateError> {
        for key in sorted_keys(&model.structs) {
            let s = &model.structs[key];
            let view = self.struct_view(s, tr);
            let rendered = templates.render("struct.cs.tera", &view, config)?;
            let path = entity_path(out_root, &s.header_file, &s.enclosing_types, &s.name, config);
            write_file(&path, &rendered)?;
        }
        Ok(())
    }

    fn render_global_functions(
        &self,
        model: &ApiModel,
        templates: &Templates,
        tr: &Translator<'_>,
        config: &Config,
        out_root: &Path,
    ) -> Result<(), GenerateError> {
        let views: Vec<FunctionView> = sorted_keys(&model.functions)
            .into_iter()
            .map(|key| FunctionView::build(&model.functions[key], tr))
            .collect();
        let rendered = templates.render("global_functions.cs.tera", &views, config)?;
        write_file(
            &out_root.join(format!("{}.cs", config.base_namespace)),
            &rendered,
        )
    }

    fn render_interfaces(
        &self,
        model: &ApiModel,
        templates: &Templates,
        tr: &Translator<'_>,
        config: &Config,
        out_root: &Path,
    ) -> Result<(), GenerateError> {
        for key in sorted_keys(&model.interfaces) {
            let i = &model.interfaces[key];
            let view = self.interface_view(model, i, tr)?;
            let rendered = templates.render("interface.cs.tera", &view, config)?;
            let path = entity_path(out_root, &i.header_file, &i.enclosing_types, &i.name, config);
            write_file(&path, &rendered)?;
        }
        Ok(())
    }

    fn render_classes(
        &self,
        model: &ApiModel,
        templates: &Templates,
        tr: &Translator<'_>,
        config: &Config,
        out_root: &Path,
    ) -> Result<(), GenerateError> {
        for key in sorted_keys(&model.classes) {
            let c = &model.classes[key];
            let view = self.class_view(model, c, tr)?;
            let rendered = templates.render("class.cs.tera", &view, config)?;
            let path = entity_path(out_root, &c.header_file, &c.enclosing_types, &c.name, config);
            write_file(&path, &rendered)?;
        }
        Ok(())
    }

    fn render_templates(
        &self,
        model: &ApiModel,
        templates: &Templates,
        tr: &Translator<'_>,
        config: &Config,
        out_root: &Path,
    ) -> Result<(), GenerateError> {
        for key in sorted_keys(&model.templates) {
            let t = &model.templates[key];
            let view = self.template_view(t, tr);
            let rendered = templates.render("template.cs.tera", &view, config)?;
            let def = &t.definition;
            let path = entity_path(out_root, &def.header_file, &def.enclosing_types, &def.name, config);
            write_file(&path, &rendered)?;
        }
        Ok(())
    }

    fn class_view(
        &self,
        model: &ApiModel,
        c: &ClassMetadata,
        tr: &Translator<'_>,
    ) -> Result<ClassView, GenerateError> {
        let rewriter = MethodRewriter::new(model, tr, false);
        let mut delegates = Vec::new();
        let mut events = Vec::new();
        let methods: Vec<MethodView> = c
            .methods
            .iter()
            .map(|m| rewriter.rewrite_method(m, &mut delegates, &mut events))
            .collect::<Result<_, _>>()?;

        Ok(ClassView {
            name: c.name.clone(),
            namespace: tr.entity_namespace(&c.namespace),
            full_safe_type_name: c.full_safe_type_name(),
            base: c.base.as_ref().map(|b| {
                let ns = tr.translate_path(&b.namespace);
                if ns.is_empty() {
                    b.name.clone()
                } else {
                    format!("{}.{}", ns, b.name)
                }
            }),
            doc_comments: crate::docs::translate_comments(c.doc_comments.as_ref()),
            fields: c
                .fields
                .iter()
                .map(|f| FieldView::from_metadata(f, tr))
                .collect(),
            methods,
            has_events: !events.is_empty(),
            delegates,
            events,
            surrounding_types: c.enclosing_types.clone(),
            is_nested_type: c.is_nested_type(),
        })
    }

    fn interface_view(
        &self,
        model: &ApiModel,
        i: &InterfaceMetadata,
        tr: &Translator<'_>,
    ) -> Result<InterfaceView, GenerateError> {
        let rewriter = MethodRewriter::new(model, tr, true);
        let mut delegates = Vec::new();
        let mut events = Vec::new();
        let methods: Vec<MethodView> = i
            .methods
            .iter()
            .map(|m| rewriter.rewrite_method(m, &mut delegates, &mut events))
            .collect::<Result<_, _>>()?;

        Ok(InterfaceView {
            name: i.name.clone(),
            namespace: tr.entity_namespace(&i.namespace),
            doc_comments: crate::docs::translate_comments(i.doc_comments.as_ref()),
            methods,
            has_events: !events.is_empty(),
            delegates,
            events,
            surrounding_types: i.enclosing_types.clone(),
            is_nested_type: i.is_nested_type(),
        })
    }

    fn struct_view(&self, s: &StructMetadata, tr: &Translator<'_>) -> StructView {
        StructView {
            name: s.name.clone(),
            namespace: tr.entity_namespace(&s.namespace),
            doc_comments: crate::docs::translate_comments(s.doc_comments.as_ref()),
            fields: s
                .fields
                .iter()
                .map(|f| FieldView::from_metadata(f, tr))
                .collect(),
            surrounding_types: s.enclosing_types.clone(),
            is_nested_type: s.is_nested_type(),
        }
    }

    fn template_view(&self, t: &TemplateMetadata, tr: &Translator<'_>) -> TemplateView {
        let def = &t.definition;
        let instantiations = t
            .instantiations
            .iter()
            .map(|inst| {
                let args: Vec<String> = inst
                    .arguments
                    .iter()
                    .map(|a| TypeView::from_expr(a, tr).display)
                    .collect();
                format!("{}<{}>", def.name, args.join(", "))
            })
            .collect();

        TemplateView {
            name: def.name.clone(),
            namespace: tr.entity_namespace(&def.namespace),
            parameters: t.parameters.clone(),
            doc_comments: crate::docs::translate_comments(def.doc_comments.as_ref()),
            fields: def
                .fields
                .iter()
                .map(|f| FieldView::from_metadata(f, tr))
                .collect(),
            methods: def.methods.iter().map(|m| MethodView::simple(m, tr)).collect(),
            instantiations,
        }
    }

    /// Hand the finished tree to the external formatter, if one is
    /// configured. Fire-and-forget: a formatter failure is surfaced but
    /// never rolls back written files.
    fn format_output(&self, out_root: &Path, config: &Config) {
        let Some(command) = &config.formatter_command else {
            return;
        };
        info!(command = %command, path = %out_root.display(), "running output formatter");
        match Command::new(command).arg(out_root).status() {
            Ok(status) if status.success() => info!("formatter finished"),
            Ok(status) => warn!(%status, "formatter exited with failure"),
            Err(err) => warn!(error = %err, "failed to launch formatter"),
        }
    }
}

/// Output path for one entity: header directory minus the configured root,
/// one extra segment per enclosing type, `<Name>.cs`.
fn entity_path(
    out_root: &Path,
    header_file: &str,
    enclosing_types: &[String],
    name: &str,
    config: &Config,
) -> std::path::PathBuf {
    let mut dir = out_root.join(output_subdir(header_file, config));
    for surrounding in enclosing_types {
        dir = dir.join(surrounding);
    }
    dir.join(format!("{}.cs", name))
}

fn sorted_keys<V, S>(map: &HashMap<String, V, S>) -> Vec<&String>
where
    S: std::hash::BuildHasher,
{
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    keys
}
