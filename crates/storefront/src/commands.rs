// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot subcommand handlers.

use storefront_client::StorefrontClient;
use storefront_core::catalog::{facets_with_all, unique_categories};
use storefront_core::{
    CatalogFilter, Credentials, ProductDraft, ProductPatch, StorefrontError,
};
use tracing::{debug, warn};

use crate::prompt;
use crate::render::Output;

/// Log `username` in, prompting for the password when needed.
///
/// Errors are returned unrendered; callers report them with
/// [`Output::login_error`].
pub async fn login(
    client: &StorefrontClient,
    username: &str,
    out: &Output,
) -> Result<(), StorefrontError> {
    let password = prompt::get_password(username)?;
    let credentials = Credentials {
        username: username.to_string(),
        password,
    };
    client.login(&credentials).await?;
    out.notice(&format!("logged in as {username}"));
    Ok(())
}

pub async fn products(
    client: &StorefrontClient,
    filter: &CatalogFilter,
    out: &Output,
) -> Result<(), StorefrontError> {
    let products = client.list_products().await?;
    let shown = filter.apply(&products);
    debug!(total = products.len(), shown = shown.len(), "catalog filtered");
    out.products(&shown);
    Ok(())
}

pub async fn categories(client: &StorefrontClient, out: &Output) -> Result<(), StorefrontError> {
    let products = client.list_products().await?;
    out.facets(&facets_with_all(&products));
    Ok(())
}

pub async fn show(client: &StorefrontClient, id: u64, out: &Output) -> Result<(), StorefrontError> {
    let product = client.get_product(id).await?;
    out.product(&product);
    Ok(())
}

pub async fn create(
    client: &StorefrontClient,
    draft: &ProductDraft,
    out: &Output,
) -> Result<(), StorefrontError> {
    draft.validate()?;
    match client.list_products().await {
        Ok(products) => {
            let known = unique_categories(&products);
            if let Some(message) = new_category_notice(&draft.category, &known) {
                out.notice(&message);
            }
        }
        Err(e) => warn!(error = %e, "could not load known categories"),
    }

    let echo = client.create_product(draft).await?;
    out.echo("created", &echo);
    Ok(())
}

/// Notice shown when a new product starts a category the catalog has not
/// seen yet. `None` when the category is known or nothing is known.
pub fn new_category_notice(category: &str, known: &[String]) -> Option<String> {
    if known.is_empty() || known.iter().any(|k| k == category) {
        return None;
    }
    Some(format!(
        "new category `{category}` (known: {})",
        known.join(", ")
    ))
}

/// Edit a product the way the edit form does: start from the stored record,
/// apply the given changes, and require the result to be complete.
pub async fn update(
    client: &StorefrontClient,
    id: u64,
    changes: ProductPatch,
    out: &Output,
) -> Result<(), StorefrontError> {
    if changes.is_empty() {
        return Err(StorefrontError::Validation(vec![
            "nothing to update: pass at least one field".into(),
        ]));
    }
    let prior = client.get_product(id).await?;
    let patch = ProductPatch::from(&prior).overlay(changes);
    patch.validate_complete()?;

    let merged = client.update_and_merge(&prior, &patch).await?;
    out.notice(&format!("updated #{id}"));
    out.product(&merged);
    Ok(())
}

pub async fn delete(client: &StorefrontClient, id: u64, out: &Output) -> Result<(), StorefrontError> {
    client.delete_product(id).await?;
    out.notice(&format!("deleted #{id}"));
    Ok(())
}
