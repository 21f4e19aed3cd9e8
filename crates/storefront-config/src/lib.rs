// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the storefront client.
//!
//! TOML files in an XDG hierarchy, `STOREFRONT_*` environment overrides,
//! strict unknown-key rejection, and miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use storefront_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("API: {}", config.api.base_url);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::StorefrontConfig;

/// Load configuration from the file hierarchy and validate it.
pub fn load_and_validate() -> Result<StorefrontConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load one explicit config file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<StorefrontConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Load an inline TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<StorefrontConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

#[allow(clippy::result_large_err)]
fn finish(
    loaded: Result<StorefrontConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<StorefrontConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Contents of every existing file in the hierarchy, for error spans.
fn collect_toml_sources() -> Vec<(String, String)> {
    loader::config_file_hierarchy()
        .iter()
        .filter_map(|path| read_source(path))
        .collect()
}

fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    let shown = if path.is_relative() {
        std::env::current_dir()
            .map(|d| d.join(path).display().to_string())
            .unwrap_or_else(|_| path.display().to_string())
    } else {
        path.display().to_string()
    };
    Some((shown, content))
}
