// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password acquisition via the STOREFRONT_PASSWORD variable or a TTY prompt.

use secrecy::SecretString;
use storefront_core::StorefrontError;

/// Environment variable consulted before prompting.
pub const PASSWORD_ENV_VAR: &str = "STOREFRONT_PASSWORD";

/// Get the login password for `username`.
///
/// Priority:
/// 1. `STOREFRONT_PASSWORD` (scripts, CI)
/// 2. Hidden TTY prompt via `rpassword`
pub fn get_password(username: &str) -> Result<SecretString, StorefrontError> {
    if let Ok(password) = std::env::var(PASSWORD_ENV_VAR) {
        if !password.is_empty() {
            return Ok(SecretString::from(password));
        }
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("Password for {username}: ");
        let password = rpassword::read_password()
            .map_err(|e| StorefrontError::Internal(format!("failed to read password: {e}")))?;
        return Ok(SecretString::from(password));
    }

    Err(StorefrontError::Validation(vec![format!(
        "no password provided. Set {PASSWORD_ENV_VAR} or run interactively"
    )]))
}
