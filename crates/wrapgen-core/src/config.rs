//! Generator configuration.
//!
//! A static settings object loaded once at startup and handed read-only to
//! every backend. Anything a target could reasonably want to vary lives
//! here as data; backends keep no settings of their own.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Read-only generator settings shared by all backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory containing one template subdirectory per backend.
    pub template_directory: PathBuf,
    /// Root directory under which each backend creates its output tree.
    pub output_directory: PathBuf,
    /// Root namespace of the generated surface (also names the aggregate
    /// free-function file).
    pub base_namespace: String,
    /// Namespace segment substitutions, applied to the first two segments
    /// of every namespace path.
    #[serde(default)]
    pub namespace_translations: BTreeMap<String, String>,
    /// Fully-qualified name of the class that marks callback arguments as
    /// result-shaped (`ns::Name`). Unset disables the check.
    #[serde(default)]
    pub result_base: Option<String>,
    /// Path prefix stripped from header paths when mirroring them into the
    /// output tree.
    #[serde(default)]
    pub header_root: PathBuf,
    /// External formatter invoked on the output tree after generation.
    #[serde(default)]
    pub formatter_command: Option<String>,
}

impl Config {
    /// Load settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The configured result-base reference split into (namespace, name).
    pub fn result_base_parts(&self) -> Option<(&str, &str)> {
        let full = self.result_base.as_deref()?;
        match full.rfind("::") {
            Some(i) => Some((&full[..i], &full[i + 2..])),
            None => Some(("", full)),
        }
    }
}

/// Failure to load the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> Config {
        serde_json::from_str(
            r#"{
                "template_directory": "templates",
                "output_directory": "out",
                "base_namespace": "Acme"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn minimal_config_defaults() {
        let config = minimal();
        assert_eq!(config.base_namespace, "Acme");
        assert!(config.namespace_translations.is_empty());
        assert!(config.result_base.is_none());
        assert!(config.formatter_command.is_none());
    }

    #[test]
    fn result_base_parts_split() {
        let mut config = minimal();
        config.result_base = Some("acme::systems::ResultBase".to_string());
        assert_eq!(
            config.result_base_parts(),
            Some(("acme::systems", "ResultBase"))
        );

        config.result_base = Some("ResultBase".to_string());
        assert_eq!(config.result_base_parts(), Some(("", "ResultBase")));
    }
}
