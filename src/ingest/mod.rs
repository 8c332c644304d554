//! Filesystem → AST → logging call sites.
//!
//! This module reads Java source files, parses them with tree-sitter and
//! extracts the logging calls whose placeholders can be resolved.

pub mod java;

pub use java::{extract_java_log_calls, LogCallSite};

use crate::config::AnalysisConfig;
use crate::error::{LogRefsError, Result};
use std::path::{Path, PathBuf};

/// Logging calls found in one file.
#[derive(Debug, Clone)]
pub struct FileCalls {
    /// The scanned file.
    pub path: PathBuf,
    /// Calls in source order.
    pub sites: Vec<LogCallSite>,
}

/// Whether a path looks like Java source.
pub fn is_java_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("java")
}

/// Read and scan a single Java file.
pub fn ingest_file(path: &Path, config: &AnalysisConfig) -> Result<FileCalls> {
    let source = std::fs::read(path).map_err(|err| LogRefsError::io(path, err))?;
    let sites = extract_java_log_calls(path, &source, config)?;
    Ok(FileCalls {
        path: path.to_path_buf(),
        sites,
    })
}

/// Scan every Java file matching a glob pattern.
///
/// Files that cannot be read or parsed are logged and skipped; an invalid
/// pattern is an error. Results are sorted by path.
pub fn ingest_glob(pattern: &str, config: &AnalysisConfig) -> Result<Vec<FileCalls>> {
    let mut results = Vec::new();

    for entry in glob::glob(pattern)? {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                log::warn!("Skipping unreadable glob entry: {}", err);
                continue;
            }
        };

        if !path.is_file() || !is_java_file(&path) {
            log::debug!("Skipping non-Java path {}", path.display());
            continue;
        }

        match ingest_file(&path, config) {
            Ok(calls) => results.push(calls),
            Err(err) => log::warn!("Skipping {}: {}", path.display(), err),
        }
    }

    results.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_java_file() {
        assert!(is_java_file(Path::new("src/Main.java")));
        assert!(!is_java_file(Path::new("src/main.rs")));
        assert!(!is_java_file(Path::new("Makefile")));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ingest_file(Path::new("/nonexistent/A.java"), &AnalysisConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), "Io");
        assert_eq!(err.file_path(), Some(Path::new("/nonexistent/A.java")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = ingest_glob("src/[", &AnalysisConfig::default()).unwrap_err();
        assert_eq!(err.kind(), "Pattern");
    }
}
