// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the storefront client.
//!
//! Holds the catalog domain types, the shared error type, and the credential
//! traits the request dispatcher is written against.

pub mod catalog;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use catalog::{CatalogFilter, CategoryFacet, ALL_CATEGORIES};
pub use error::StorefrontError;
pub use traits::{CredentialProvider, CredentialUpdater};
pub use types::{
    Credentials, LoginResponse, Product, ProductDraft, ProductEcho, ProductPatch, Rating, Session,
};
