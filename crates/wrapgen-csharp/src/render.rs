//! Template engine wrapper and output-tree helpers.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera};

use wrapgen_core::Config;

use crate::error::GenerateError;

/// The backend's template set, glob-loaded from the configured template
/// root. Partials live under `partials/` and are pulled in by name.
pub(crate) struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn load(template_root: &Path) -> Result<Self, GenerateError> {
        let dir = template_root.join("csharp");
        let pattern = format!("{}/**/*.tera", dir.display());
        let mut tera = Tera::new(&pattern)
            .map_err(|source| GenerateError::TemplateLoad { path: dir, source })?;
        // Output is C#, not HTML.
        tera.autoescape_on(Vec::new());
        Ok(Self { tera })
    }

    /// Render one entity. Unresolved placeholders surface as errors carrying
    /// the template name.
    pub fn render<T: Serialize>(
        &self,
        template: &str,
        data: &T,
        config: &Config,
    ) -> Result<String, GenerateError> {
        let mut context = Context::new();
        context.insert("data", data);
        context.insert("config", config);
        self.tera
            .render(template, &context)
            .map_err(|source| GenerateError::Template {
                template: template.to_string(),
                source,
            })
    }
}

/// Write one output file, creating its directory chain.
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| GenerateError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Output subdirectory mirroring the header's directory, minus the
/// configured header root.
pub(crate) fn output_subdir(header_file: &str, config: &Config) -> PathBuf {
    let dir = Path::new(header_file).parent().unwrap_or_else(|| Path::new(""));
    dir.strip_prefix(&config.header_root).unwrap_or(dir).to_path_buf()
}
