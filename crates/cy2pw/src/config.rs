//! Converter settings read from a `cy2pw.toml` file.
//!
//! ```toml
//! source_suffix = "cy.js"
//! target_suffix = "spec.ts"
//!
//! [print]
//! single_quote = true
//! indent_width = 2
//! ```

use crate::codegen::PrintOptions;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "cy2pw.toml";

/// Triple-slash directive Cypress scaffolding puts at the top of spec files.
pub const REFERENCE_DIRECTIVE: &str = "/// <reference types=\"cypress\" />";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Files whose name ends with this suffix are converted.
    pub source_suffix: String,
    /// Replaces `source_suffix` in the name of the written file.
    pub target_suffix: String,
    pub strip_reference_directive: bool,
    pub print: PrintOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_suffix: "cy.js".to_string(),
            target_suffix: "spec.ts".to_string(),
            strip_reference_directive: true,
            print: PrintOptions::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_toml_str(&text).map_err(|error| match error {
            ConfigError::Invalid { message, .. } => ConfigError::Invalid {
                path: Some(path.to_path_buf()),
                message,
            },
            error => error,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|error: toml::de::Error| ConfigError::Invalid {
            path: None,
            message: error.message().to_string(),
        })
    }

    pub fn is_source_file(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.source_suffix)
    }

    /// `todo.cy.js` -> `todo.spec.ts`
    pub fn target_file_name(&self, file_name: &str) -> String {
        match file_name.strip_suffix(&self.source_suffix) {
            Some(stem) => format!("{stem}{}", self.target_suffix),
            None => file_name.to_string(),
        }
    }

    /// Removes the Cypress type reference directive lines.
    pub fn prepare_source(&self, source: &str) -> String {
        if !self.strip_reference_directive {
            return source.to_string();
        }
        source
            .split_inclusive('\n')
            .filter(|line| line.trim() != REFERENCE_DIRECTIVE)
            .collect()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, error: std::io::Error },
    Invalid { path: Option<PathBuf>, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Read { path, error } => write!(f, "Failed to read '{}': {error}", path.display()),
            Self::Invalid {
                path: Some(path),
                message,
            } => write!(f, "Invalid config '{}': {message}", path.display()),
            Self::Invalid { path: None, message } => write!(f, "Invalid config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { error, .. } => Some(error),
            Self::Invalid { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_fields() {
        let config = Config::from_toml_str("target_suffix = \"test.ts\"\n[print]\nindent_width = 4\n").unwrap();
        assert_eq!(config.source_suffix, "cy.js");
        assert_eq!(config.target_suffix, "test.ts");
        assert!(config.strip_reference_directive);
        assert_eq!(config.print.indent_width, 4);
        assert!(config.print.single_quote);
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_toml() {
        let error = Config::from_toml_str("source_suffix = 1").unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { path: None, .. }));
    }

    #[test]
    fn test_file_names() {
        let config = Config::default();
        assert!(config.is_source_file("todo.cy.js"));
        assert!(!config.is_source_file("helpers.js"));
        assert_eq!(config.target_file_name("todo.cy.js"), "todo.spec.ts");
    }

    #[test]
    fn test_prepare_source() {
        let source = "/// <reference types=\"cypress\" />\ncy.visit('/')\n";
        assert_eq!(Config::default().prepare_source(source), "cy.visit('/')\n");
        let keep = Config {
            strip_reference_directive: false,
            ..Config::default()
        };
        assert_eq!(keep.prepare_source(source), source);
    }
}
