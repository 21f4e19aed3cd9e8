// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::StorefrontConfig;

/// Levels accepted by `log.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &StorefrontConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if let Err(message) = check_base_url(config.api.base_url.trim()) {
        errors.push(ConfigError::Validation { message });
    }

    if !config.api.refresh_path.starts_with('/') {
        errors.push(ConfigError::Validation {
            message: format!(
                "api.refresh_path `{}` must start with `/`",
                config.api.refresh_path
            ),
        });
    }

    if config.api.timeout_secs == Some(0) {
        errors.push(ConfigError::Validation {
            message: "api.timeout_secs must be greater than zero when set".to_string(),
        });
    }

    let level = config.log.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of: {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `api.base_url` must parse as an http(s) URL with a host.
fn check_base_url(base_url: &str) -> Result<(), String> {
    let parsed = url::Url::parse(base_url)
        .map_err(|e| format!("api.base_url `{base_url}` is not a valid URL: {e}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!(
            "api.base_url `{base_url}` must use http or https, not `{}`",
            parsed.scheme()
        ));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(format!("api.base_url `{base_url}` has no host"));
    }
    Ok(())
}
