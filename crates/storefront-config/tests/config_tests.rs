// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the storefront configuration system.

use std::io::Write;

use serial_test::serial;
use storefront_config::diagnostic::ConfigError;
use storefront_config::model::{StorefrontConfig, DEFAULT_BASE_URL, DEFAULT_REFRESH_PATH};
use storefront_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// A fully specified file deserializes into every field.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[api]
base_url = "http://localhost:3000"
refresh_path = "/auth/refresh"
timeout_secs = 15

[log]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.api.base_url, "http://localhost:3000");
    assert_eq!(config.api.refresh_path, "/auth/refresh");
    assert_eq!(config.api.timeout_secs, Some(15));
    assert_eq!(config.log.level, "debug");
}

/// An empty file falls back to the compiled defaults.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config, StorefrontConfig::default());
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.api.refresh_path, DEFAULT_REFRESH_PATH);
    assert!(config.api.timeout_secs.is_none());
    assert_eq!(config.log.level, "info");
}

/// A misspelled key is rejected with a suggestion.
#[test]
fn unknown_key_yields_suggestion() {
    let toml = r#"
[api]
base_ulr = "https://example.com"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "base_ulr");
            assert_eq!(suggestion.as_deref(), Some("base_url"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level sections are rejected too.
#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[cache]\nttl = 3\n").expect_err("unknown section");
    assert!(matches!(errors[0], ConfigError::UnknownKey { .. }));
}

/// A string where a number belongs is an invalid type error.
#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[api]\ntimeout_secs = \"soon\"\n")
        .expect_err("should reject string timeout");
    assert!(
        matches!(&errors[0], ConfigError::InvalidType { key, .. } if key.contains("timeout_secs")),
        "got {errors:?}"
    );
}

/// Values that parse but make no sense fail validation.
#[test]
fn semantic_validation_runs_after_parsing() {
    let errors = load_and_validate_str("[api]\nbase_url = \"fakestoreapi.com\"\n")
        .expect_err("missing scheme should fail");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

/// Base URLs that would only fail on the first request are caught at load time.
#[test]
fn malformed_base_url_fails_at_load() {
    for bad in ["http://bad host", "https://:8080", "http://exa%mple"] {
        let toml = format!("[api]\nbase_url = \"{bad}\"\n");
        let errors = load_and_validate_str(&toml).expect_err(bad);
        assert!(
            matches!(&errors[0], ConfigError::Validation { message } if message.contains(bad)),
            "{bad}: {errors:?}"
        );
    }
}

/// `STOREFRONT_API_BASE_URL` lands in `api.base_url`, not `api.base.url`.
#[test]
#[serial]
fn env_var_overrides_file_value() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[api]\nbase_url = \"http://from-file.test\"").expect("write config");

    // SAFETY: test-only env mutation, serialized with #[serial].
    unsafe { std::env::set_var("STOREFRONT_API_BASE_URL", "http://from-env.test") };
    let result = load_and_validate_path(file.path());
    unsafe { std::env::remove_var("STOREFRONT_API_BASE_URL") };

    let config = result.expect("config should load");
    assert_eq!(config.api.base_url, "http://from-env.test");
}

/// `STOREFRONT_LOG_LEVEL` lands in `log.level`.
#[test]
#[serial]
fn env_var_overrides_log_level() {
    let file = tempfile::NamedTempFile::new().expect("temp file");

    unsafe { std::env::set_var("STOREFRONT_LOG_LEVEL", "warn") };
    let result = load_and_validate_path(file.path());
    unsafe { std::env::remove_var("STOREFRONT_LOG_LEVEL") };

    assert_eq!(result.expect("config should load").log.level, "warn");
}

/// `STOREFRONT_PASSWORD` is a login secret, not a config key.
#[test]
#[serial]
fn password_env_var_is_not_config() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[api]\nbase_url = \"http://from-file.test\"").expect("write config");

    unsafe { std::env::set_var("STOREFRONT_PASSWORD", "83r5^_") };
    let result = load_and_validate_path(file.path());
    unsafe { std::env::remove_var("STOREFRONT_PASSWORD") };

    let config = result.expect("password variable must not break config loading");
    assert_eq!(config.api.base_url, "http://from-file.test");
}

/// Unknown keys in an explicit file carry a source span.
#[test]
#[serial]
fn unknown_key_in_file_points_at_source() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "[log]\nlevle = \"info\"\n").expect("write config");

    let errors = load_and_validate_path(file.path()).expect_err("should reject typo");
    match &errors[0] {
        ConfigError::UnknownKey {
            suggestion, span, ..
        } => {
            assert_eq!(suggestion.as_deref(), Some("level"));
            if let Some(span) = span {
                assert_eq!(span.offset(), "[log]\n".len());
            }
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}
