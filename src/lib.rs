//! wrapgen — regenerable language bindings from native headers.
//!
//! The pipeline: parse each header in order (reader → parser), merge the
//! declarations into the frozen [`ApiModel`], then run each backend
//! sequentially against it. Backends snapshot whatever they rewrite, so
//! their rewrites never interfere.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub use wrapgen_core::{Config, ConfigError};
pub use wrapgen_csharp::{CSharpBackend, GenerateError};
pub use wrapgen_parser::{ParseError, Parser};
pub use wrapgen_registry::ApiModel;

/// One binding target. Adding a target means implementing this over new
/// translation tables and templates, not touching the pipeline.
pub trait Backend {
    fn name(&self) -> &'static str;
    fn generate(&self, model: &ApiModel, config: &Config) -> Result<(), GenerateError>;
}

impl Backend for CSharpBackend {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn generate(&self, model: &ApiModel, config: &Config) -> Result<(), GenerateError> {
        CSharpBackend::generate(self, model, config)
    }
}

/// The registered backends, run in order.
pub fn backends() -> Vec<Box<dyn Backend>> {
    vec![Box::new(CSharpBackend::new())]
}

/// A fatal pipeline error. The run stops at the first one; nothing is
/// rolled back beyond files already flushed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("failed to read header {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse the header set and regenerate every backend's output tree.
pub fn run(config: &Config, headers: &[PathBuf]) -> Result<(), RunError> {
    let mut parser = Parser::new();
    let mut model = ApiModel::new();

    for path in headers {
        let source = fs::read_to_string(path).map_err(|source| RunError::Io {
            path: path.clone(),
            source,
        })?;
        let decls = parser.parse_header(&header_name(path), &source)?;
        model.merge(decls);
    }
    info!(headers = headers.len(), "parsed header set");

    for backend in backends() {
        info!(backend = backend.name(), "generating bindings");
        backend.generate(&model, config)?;
    }
    Ok(())
}

/// Header paths are recorded with forward slashes so output layout and
/// diagnostics are stable across platforms.
fn header_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
