//! Backend error types.

use std::path::PathBuf;
use thiserror::Error;

/// A fatal generation error. The run stops here; files already flushed
/// stay on disk.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A result-returning method's callback documentation does not end with
    /// an `@param` line. No line number is available for alias doc blocks,
    /// hence the explicit unknown sentinel.
    #[error("{file}:unknown: last doc comment must describe the callback parameter: {comment}")]
    MalformedCallbackDoc { file: String, comment: String },

    #[error("failed to load templates from {path}: {source}")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("failed to render template '{template}': {source}")]
    Template {
        template: String,
        #[source]
        source: tera::Error,
    },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
