// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for storefront integration tests.
//!
//! Provides [`FakeStoreServer`], a mock of the remote catalog API with
//! opt-in login, refresh, and write routes.

pub mod fixtures;
pub mod server;

pub use fixtures::{sample_products, CREATED_PRODUCT_ID};
pub use server::{FakeStoreServer, REFRESH_PATH};
