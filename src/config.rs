//! Analysis configuration.
//!
//! Loaded from a JSON file; every key is optional.
//!
//! ```json
//! {
//!   "default_style": "slf4j",
//!   "log4j_bridge": false,
//!   "logger_names": ["log", "logger"],
//!   "exception_type_suffixes": ["Exception", "Error", "Throwable"]
//! }
//! ```

use crate::error::{LogRefsError, Result};
use crate::style::LoggerStyle;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Knobs for Java call-site extraction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Style for calls whose logging library cannot be told from imports.
    /// `None` skips such calls.
    pub default_style: Option<LoggerStyle>,

    /// SLF4J calls are served by Log4j 2 (`log4j-slf4j2-impl` on the classpath).
    pub log4j_bridge: bool,

    /// Receiver names always treated as loggers, in addition to declared ones.
    pub logger_names: Vec<String>,

    /// Type-name suffixes that mark a throwable.
    pub exception_type_suffixes: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_style: None,
            log4j_bridge: false,
            logger_names: ["log", "logger", "LOG", "LOGGER"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exception_type_suffixes: ["Exception", "Error", "Throwable"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| LogRefsError::io(path, err))?;
        Self::from_json(&contents).map_err(|message| LogRefsError::InvalidConfig {
            file: path.to_path_buf(),
            message,
        })
    }

    /// Parse configuration from JSON text.
    pub fn from_json(contents: &str) -> std::result::Result<Self, String> {
        let config: AnalysisConfig = serde_json::from_str(contents)
            .map_err(|err| format!("JSON parse error: {}", err))?;

        if config.exception_type_suffixes.iter().any(|s| s.is_empty()) {
            return Err("exception_type_suffixes must not contain empty strings".to_string());
        }

        Ok(config)
    }

    /// Whether a (possibly qualified) type name denotes a throwable.
    pub fn is_exception_type(&self, type_name: &str) -> bool {
        let simple = simple_type_name(type_name);
        self.exception_type_suffixes
            .iter()
            .any(|suffix| simple.ends_with(suffix.as_str()))
    }
}

/// `java.io.IOException` -> `IOException`, `List<String>` -> `List`.
pub(crate) fn simple_type_name(type_name: &str) -> &str {
    let without_generics = type_name.split('<').next().unwrap_or(type_name).trim();
    without_generics
        .rsplit('.')
        .next()
        .unwrap_or(without_generics)
}
