// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! Every struct uses `#[serde(deny_unknown_fields)]` so typos are reported
//! at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Default remote API host.
pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";

/// Default path of the access-token refresh endpoint.
pub const DEFAULT_REFRESH_PATH: &str = "/refreshToken/accessToken";

/// Top-level storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorefrontConfig {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Remote REST API configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Scheme and host every route is resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path called with the refresh token after a 401/501.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,

    /// Per-request timeout. `None` keeps the HTTP client's default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            refresh_path: default_refresh_path(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_refresh_path() -> String {
    DEFAULT_REFRESH_PATH.to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Level for the `storefront` targets (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
