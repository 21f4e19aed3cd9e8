// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category facets and title search over a fetched product collection.
//!
//! Nothing here is stored: facets are recomputed from whatever collection the
//! caller currently holds.

use serde::Serialize;

use crate::types::Product;

/// Facet name that selects every product.
pub const ALL_CATEGORIES: &str = "All";

/// One entry of the category selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryFacet {
    pub name: String,
    pub count: usize,
}

/// Distinct categories with their product counts, in first-seen order.
pub fn category_facets(products: &[Product]) -> Vec<CategoryFacet> {
    let mut facets: Vec<CategoryFacet> = Vec::new();
    for product in products {
        match facets.iter_mut().find(|f| f.name == product.category) {
            Some(facet) => facet.count += 1,
            None => facets.push(CategoryFacet {
                name: product.category.clone(),
                count: 1,
            }),
        }
    }
    facets
}

/// [`category_facets`] preceded by the catch-all [`ALL_CATEGORIES`] entry.
pub fn facets_with_all(products: &[Product]) -> Vec<CategoryFacet> {
    let mut facets = vec![CategoryFacet {
        name: ALL_CATEGORIES.to_string(),
        count: products.len(),
    }];
    facets.extend(category_facets(products));
    facets
}

/// Distinct category names, used to offer choices when creating or editing.
pub fn unique_categories(products: &[Product]) -> Vec<String> {
    category_facets(products)
        .into_iter()
        .map(|f| f.name)
        .collect()
}

/// Category selection plus free-text title search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// `None` or [`ALL_CATEGORIES`] keeps every category.
    pub category: Option<String>,
    pub search: String,
}

impl CatalogFilter {
    pub fn new(category: Option<String>, search: impl Into<String>) -> Self {
        Self {
            category,
            search: search.into(),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = match self.category.as_deref() {
            None | Some(ALL_CATEGORIES) => true,
            Some(wanted) => product.category == wanted,
        };
        let search_ok = self.search.trim().is_empty()
            || product
                .title
                .to_lowercase()
                .contains(&self.search.to_lowercase());
        category_ok && search_ok
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}
