//! Configuration loading tests.

use logrefs::config::AnalysisConfig;
use logrefs::LoggerStyle;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_full_config() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("logrefs.json");
    fs::write(
        &path,
        r#"{
            "default_style": "log4j_formatted_style",
            "log4j_bridge": true,
            "logger_names": ["audit"],
            "exception_type_suffixes": ["Failure"]
        }"#,
    )
    .expect("Failed to write config");

    let config = AnalysisConfig::load(&path).expect("config should load");
    assert_eq!(config.default_style, Some(LoggerStyle::Log4jFormattedStyle));
    assert!(config.log4j_bridge);
    assert_eq!(config.logger_names, vec!["audit".to_string()]);
    assert!(config.is_exception_type("com.acme.TransferFailure"));
    assert!(!config.is_exception_type("IOException"));
}

#[test]
fn test_empty_object_is_default() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("logrefs.json");
    fs::write(&path, "{}").expect("Failed to write config");

    assert_eq!(
        AnalysisConfig::load(&path).unwrap(),
        AnalysisConfig::default()
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("absent.json");

    let err = AnalysisConfig::load(&path).unwrap_err();
    assert_eq!(err.kind(), "Io");
    assert_eq!(err.file_path(), Some(path.as_path()));
}

#[test]
fn test_malformed_json_is_invalid_config() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("logrefs.json");
    fs::write(&path, "{ default_style: ").expect("Failed to write config");

    let err = AnalysisConfig::load(&path).unwrap_err();
    assert_eq!(err.kind(), "InvalidConfig");
    assert!(err.to_string().contains("JSON parse error"));
}

#[test]
fn test_unknown_style_name_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("logrefs.json");
    fs::write(&path, r#"{"default_style": "jul"}"#).expect("Failed to write config");

    let err = AnalysisConfig::load(&path).unwrap_err();
    assert_eq!(err.kind(), "InvalidConfig");
}

#[test]
fn test_unsupported_style_is_accepted_as_default() {
    let config = AnalysisConfig::from_json(r#"{"default_style": "unsupported"}"#).unwrap();
    assert_eq!(config.default_style, Some(LoggerStyle::Unsupported));
}
