// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the client and the front-end.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StorefrontError;

/// Minimum accepted password length for the login form.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Credentials and display name for the single active session.
///
/// The two tokens are independently nullable. Holding an access token is what
/// counts as "logged in".
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user_name: Option<String>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.access_token.is_some()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |t: &Option<String>| t.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Session")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("user_name", &self.user_name)
            .finish()
    }
}

/// Server-computed rating of a product. Never user-editable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

/// A catalog record as returned by `GET /products` and `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating: Rating,
}

impl Product {
    /// Fold a create/update response onto this record.
    ///
    /// Write responses omit `id` and `rating`, so both are always kept from
    /// `self`. Editable fields are overwritten only when the echo carries them.
    pub fn merge_echo(&self, echo: &ProductEcho) -> Product {
        Product {
            id: self.id,
            title: echo.title.clone().unwrap_or_else(|| self.title.clone()),
            price: echo.price.unwrap_or(self.price),
            description: echo
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            category: echo.category.clone().unwrap_or_else(|| self.category.clone()),
            image: echo.image.clone().unwrap_or_else(|| self.image.clone()),
            rating: self.rating,
        }
    }
}

/// Payload for `POST /products`. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
}

impl ProductDraft {
    /// Check that every field is filled in, reporting all gaps at once.
    pub fn validate(&self) -> Result<(), StorefrontError> {
        let mut problems = Vec::new();
        require_text(&mut problems, "title", Some(&self.title));
        require_price(&mut problems, Some(self.price));
        require_text(&mut problems, "description", Some(&self.description));
        require_text(&mut problems, "category", Some(&self.category));
        require_text(&mut problems, "image", Some(&self.image));
        into_result(problems)
    }
}

/// Payload for `PUT /products/{id}`. Absent fields are left out of the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.image.is_none()
    }

    /// Require a full field set, as the edit form does before saving.
    pub fn validate_complete(&self) -> Result<(), StorefrontError> {
        let mut problems = Vec::new();
        require_text(&mut problems, "title", self.title.as_deref());
        require_price(&mut problems, self.price);
        require_text(&mut problems, "description", self.description.as_deref());
        require_text(&mut problems, "category", self.category.as_deref());
        require_text(&mut problems, "image", self.image.as_deref());
        into_result(problems)
    }

    /// Overlay the fields set in `overrides` on top of `self`.
    pub fn overlay(mut self, overrides: ProductPatch) -> ProductPatch {
        if overrides.title.is_some() {
            self.title = overrides.title;
        }
        if overrides.price.is_some() {
            self.price = overrides.price;
        }
        if overrides.description.is_some() {
            self.description = overrides.description;
        }
        if overrides.category.is_some() {
            self.category = overrides.category;
        }
        if overrides.image.is_some() {
            self.image = overrides.image;
        }
        self
    }
}

impl From<ProductDraft> for ProductPatch {
    fn from(draft: ProductDraft) -> Self {
        Self {
            title: Some(draft.title),
            price: Some(draft.price),
            description: Some(draft.description),
            category: Some(draft.category),
            image: Some(draft.image),
        }
    }
}

/// Prefills an edit form from the currently displayed record.
impl From<&Product> for ProductPatch {
    fn from(product: &Product) -> Self {
        Self {
            title: Some(product.title.clone()),
            price: Some(product.price),
            description: Some(product.description.clone()),
            category: Some(product.category.clone()),
            image: Some(product.image.clone()),
        }
    }
}

/// Body returned by create and update calls.
///
/// The remote API echoes the submitted fields back, sometimes with `price`
/// as a string, and leaves out `rating` (and `id` on updates).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductEcho {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceRepr {
    Number(f64),
    Text(String),
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<PriceRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PriceRepr::Number(n)) => Ok(Some(n)),
        Some(PriceRepr::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid price `{s}`: {e}"))),
    }
}

/// Username and password entered on the login form.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Form-level checks performed before the login request is sent.
    pub fn validate(&self) -> Result<(), StorefrontError> {
        let mut problems = Vec::new();
        if self.username.trim().is_empty() {
            problems.push("username is required".to_string());
        }
        let password = self.password.expose_secret();
        if password.is_empty() {
            problems.push("password is required".to_string());
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            problems.push(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            ));
        }
        into_result(problems)
    }

    /// JSON body for `POST /auth/login`.
    pub fn to_login_body(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "password": self.password.expose_secret(),
        })
    }
}

/// Body returned by `POST /auth/login`.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default, rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn require_text(problems: &mut Vec<String>, field: &str, value: Option<&str>) {
    if value.is_none_or(|v| v.trim().is_empty()) {
        problems.push(format!("{field} is required"));
    }
}

fn require_price(problems: &mut Vec<String>, price: Option<f64>) {
    match price {
        None => problems.push("price is required".to_string()),
        Some(p) if !p.is_finite() || p <= 0.0 => {
            problems.push(format!("price must be a positive number, got {p}"));
        }
        Some(_) => {}
    }
}

fn into_result(problems: Vec<String>) -> Result<(), StorefrontError> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(StorefrontError::Validation(problems))
    }
}
