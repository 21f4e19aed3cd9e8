// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the storefront client.

use thiserror::Error;

/// The primary error type used across the storefront workspace.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration errors (invalid TOML, bad base URL, header construction).
    #[error("configuration error: {0}")]
    Config(String),

    /// The remote API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced an HTTP status (DNS, connect, TLS, body read).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A response body could not be decoded into the expected shape.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Input rejected before any network call was made.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StorefrontError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this failure should trigger a silent token refresh.
    ///
    /// 501 is grouped with 401: the backend reports some expired
    /// sessions as "Not Implemented".
    pub fn needs_reauth(&self) -> bool {
        matches!(self.status(), Some(401 | 501))
    }

    /// Response body of an HTTP error, when non-empty.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } if !body.trim().is_empty() => Some(body.as_str()),
            _ => None,
        }
    }
}
