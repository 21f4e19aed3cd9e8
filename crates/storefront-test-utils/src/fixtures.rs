// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog records shaped like the public Fake Store API.

use serde_json::{json, Value};

/// Four products across three categories, first-seen order
/// "men's clothing", "jewelery", "electronics".
pub fn sample_products() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 109.95,
            "description": "Your perfect pack for everyday use and walks in the forest.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": {"rate": 3.9, "count": 120}
        }),
        json!({
            "id": 2,
            "title": "Mens Casual Premium Slim Fit T-Shirts",
            "price": 22.3,
            "description": "Slim-fitting style, contrast raglan long sleeve.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg",
            "rating": {"rate": 4.1, "count": 259}
        }),
        json!({
            "id": 5,
            "title": "John Hardy Women's Legends Naga Gold & Silver Dragon Station Chain Bracelet",
            "price": 695,
            "description": "From our Legends Collection, the Naga was inspired by the mythical water dragon.",
            "category": "jewelery",
            "image": "https://fakestoreapi.com/img/71pWzhdJNwL._AC_UL640_QL65_ML3_.jpg",
            "rating": {"rate": 4.6, "count": 400}
        }),
        json!({
            "id": 9,
            "title": "WD 2TB Elements Portable External Hard Drive - USB 3.0",
            "price": 64,
            "description": "USB 3.0 and USB 2.0 compatibility, fast data transfers.",
            "category": "electronics",
            "image": "https://fakestoreapi.com/img/61IBBVJvSDL._AC_SY879_.jpg",
            "rating": {"rate": 3.3, "count": 203}
        }),
    ]
}

/// Id assigned by the mock server to created products.
pub const CREATED_PRODUCT_ID: u64 = 21;
