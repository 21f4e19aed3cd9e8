// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-based loading with XDG lookup and `STOREFRONT_` env overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::StorefrontConfig;

/// Name of the config file looked up in each directory of the hierarchy.
pub const CONFIG_FILE_NAME: &str = "storefront.toml";

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "STOREFRONT_";

/// Files consulted by [`load_config`], lowest precedence first.
pub fn config_file_hierarchy() -> Vec<PathBuf> {
    let mut files = vec![PathBuf::from("/etc/storefront").join(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        files.push(dir.join("storefront").join(CONFIG_FILE_NAME));
    }
    files.push(PathBuf::from(CONFIG_FILE_NAME));
    files
}

/// Build the layered figment without extracting it.
///
/// Merge order (later overrides earlier): compiled defaults, `/etc`, the
/// user config dir, `./storefront.toml`, then `STOREFRONT_*` variables.
pub fn build_figment() -> Figment {
    config_file_hierarchy()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(StorefrontConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<StorefrontConfig, figment::Error> {
    build_figment().extract()
}

/// Load from one explicit file (no hierarchy) with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StorefrontConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StorefrontConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Load from an inline TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<StorefrontConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StorefrontConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Config sections reachable from the environment. Other `STOREFRONT_*`
/// variables (such as `STOREFRONT_PASSWORD`) are not configuration.
const ENV_SECTIONS: &[&str] = &["api_", "log_"];

/// `STOREFRONT_API_BASE_URL` → `api.base_url`, `STOREFRONT_LOG_LEVEL` → `log.level`.
///
/// Only the section prefix is turned into a dot; `Env::split("_")` would also
/// break `base_url` into `base.url`.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .filter(|key| {
            let key = key.as_str().to_ascii_lowercase();
            ENV_SECTIONS.iter().any(|section| key.starts_with(section))
        })
        .map(|key| {
            key.as_str()
                .replacen("api_", "api.", 1)
                .replacen("log_", "log.", 1)
                .into()
        })
}
