// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read and write access to session credentials.
//!
//! The dispatcher only ever sees these two traits, never a concrete store,
//! so a fake can stand in for the session during tests.

use std::sync::Arc;

/// Source of the bearer credentials attached to outbound requests.
pub trait CredentialProvider: Send + Sync {
    /// Token for regular API calls. `None` means the header is omitted.
    fn access_token(&self) -> Option<String>;

    /// Token presented to the refresh endpoint.
    fn refresh_token(&self) -> Option<String>;
}

/// Sink for credential changes made while reauthenticating.
pub trait CredentialUpdater: Send + Sync {
    /// Replace the access token unconditionally.
    fn set_access_token(&self, token: String);

    /// Drop both tokens after an unrecoverable authorization failure.
    fn log_out(&self);
}

impl<T: CredentialProvider + ?Sized> CredentialProvider for Arc<T> {
    fn access_token(&self) -> Option<String> {
        (**self).access_token()
    }

    fn refresh_token(&self) -> Option<String> {
        (**self).refresh_token()
    }
}

impl<T: CredentialUpdater + ?Sized> CredentialUpdater for Arc<T> {
    fn set_access_token(&self, token: String) {
        (**self).set_access_token(token)
    }

    fn log_out(&self) {
        (**self).log_out()
    }
}
