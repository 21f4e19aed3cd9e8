// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authenticated client for the Fake Store REST API.
//!
//! [`SessionStore`] keeps the credentials in memory, [`Dispatcher`] attaches
//! them to every call and owns the refresh-and-replay protocol, and
//! [`StorefrontClient`] exposes the typed catalog operations.

pub mod client;
pub mod dispatcher;
pub mod session;

pub use client::StorefrontClient;
pub use dispatcher::{ApiRequest, ApiResponse, Dispatcher};
pub use session::SessionStore;
