// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits consumed by the request dispatcher.

pub mod credentials;

pub use credentials::{CredentialProvider, CredentialUpdater};
