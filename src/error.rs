//! logrefs error types.
//!
//! Only genuine failures live here. A format string that cannot be counted or
//! a call whose arguments do not line up is a normal outcome and is reported
//! through [`crate::resolve::Resolution`], never as an error.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for logrefs operations.
#[derive(Error, Debug)]
pub enum LogRefsError {
    /// I/O error during file operations.
    #[error("I/O error for path {path}: {source}")]
    Io {
        /// The file path that caused the I/O error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Tree-sitter parsing error.
    #[error("Parse error in {file}: {message}")]
    Parse {
        /// The file that failed to parse.
        file: PathBuf,
        /// The parse error message.
        message: String,
    },

    /// Configuration file could not be read or is malformed.
    #[error("Invalid configuration in {file}: {message}")]
    InvalidConfig {
        /// The configuration file.
        file: PathBuf,
        /// What was wrong with it.
        message: String,
    },

    /// A logger style name did not match any known style.
    #[error("Unknown logger style: {0}")]
    UnknownStyle(String),

    /// Glob pattern could not be compiled.
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// UTF-8 validation error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl LogRefsError {
    /// Build an I/O error carrying the offending path.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        LogRefsError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Stable identifier for the error variant, used in JSON payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            LogRefsError::Io { .. } => "Io",
            LogRefsError::Parse { .. } => "Parse",
            LogRefsError::InvalidConfig { .. } => "InvalidConfig",
            LogRefsError::UnknownStyle(_) => "UnknownStyle",
            LogRefsError::Pattern(_) => "Pattern",
            LogRefsError::Utf8(_) => "Utf8",
            LogRefsError::Other(_) => "Other",
        }
    }

    /// File associated with the error, if any.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            LogRefsError::Io { path, .. } => Some(path),
            LogRefsError::Parse { file, .. } | LogRefsError::InvalidConfig { file, .. } => {
                Some(file)
            }
            _ => None,
        }
    }
}

/// Result type alias for logrefs operations.
pub type Result<T> = std::result::Result<T, LogRefsError>;
