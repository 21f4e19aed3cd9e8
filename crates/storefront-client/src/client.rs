// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed catalog and login operations on top of the dispatcher.

use std::sync::Arc;

use storefront_config::model::ApiConfig;
use storefront_core::{
    Credentials, LoginResponse, Product, ProductDraft, ProductEcho, ProductPatch, Session,
    StorefrontError,
};
use tracing::{debug, info};

use crate::dispatcher::{ApiRequest, Dispatcher};
use crate::session::SessionStore;

/// Route of the login endpoint.
pub const LOGIN_PATH: &str = "/auth/login";

/// Route of the product collection.
pub const PRODUCTS_PATH: &str = "/products";

/// Catalog client bound to one session.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    dispatcher: Dispatcher<Arc<SessionStore>>,
    session: Arc<SessionStore>,
}

impl StorefrontClient {
    /// Client with a fresh, empty session.
    pub fn new(config: &ApiConfig) -> Result<Self, StorefrontError> {
        Self::with_session(config, Arc::new(SessionStore::new()))
    }

    /// Client sharing an existing session store.
    pub fn with_session(
        config: &ApiConfig,
        session: Arc<SessionStore>,
    ) -> Result<Self, StorefrontError> {
        let dispatcher = Dispatcher::new(config, Arc::clone(&session))?;
        Ok(Self {
            dispatcher,
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn snapshot(&self) -> Session {
        self.session.snapshot()
    }

    /// Log in and populate the session.
    ///
    /// On success the access token (and refresh token, when the server sends
    /// one) is stored and the display name set to the entered username.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, StorefrontError> {
        credentials.validate()?;

        let request = ApiRequest::post(LOGIN_PATH, credentials.to_login_body());
        let login: LoginResponse = self.dispatcher.execute(&request).await?.json()?;

        self.session.set_access_token(login.token.clone());
        if let Some(refresh) = &login.refresh_token {
            self.session.set_refresh_token(refresh.clone());
        }
        self.session.set_user_name(credentials.username.clone());
        info!(user = %credentials.username, "logged in");
        Ok(login)
    }

    pub fn log_out(&self) {
        self.session.log_out();
        info!("logged out");
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, StorefrontError> {
        let products: Vec<Product> = self
            .dispatcher
            .execute(&ApiRequest::get(PRODUCTS_PATH))
            .await?
            .json()?;
        debug!(count = products.len(), "catalog fetched");
        Ok(products)
    }

    pub async fn get_product(&self, id: u64) -> Result<Product, StorefrontError> {
        self.dispatcher
            .execute(&ApiRequest::get(product_path(id)))
            .await?
            .json()
    }

    /// Create a product. The response carries no rating.
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<ProductEcho, StorefrontError> {
        draft.validate()?;
        let echo: ProductEcho = self
            .dispatcher
            .execute(&ApiRequest::post(PRODUCTS_PATH, to_body(draft)?))
            .await?
            .json()?;
        info!(id = ?echo.id, "product created");
        Ok(echo)
    }

    /// Send a partial or full update. The response omits `id` and `rating`.
    pub async fn update_product(
        &self,
        id: u64,
        patch: &ProductPatch,
    ) -> Result<ProductEcho, StorefrontError> {
        if patch.is_empty() {
            return Err(StorefrontError::Validation(vec![
                "update needs at least one field".to_string(),
            ]));
        }
        let echo = self
            .dispatcher
            .execute(&ApiRequest::put(product_path(id), to_body(patch)?))
            .await?
            .json()?;
        info!(id, "product updated");
        Ok(echo)
    }

    /// Update `prior` and return it with the echoed fields folded in.
    pub async fn update_and_merge(
        &self,
        prior: &Product,
        patch: &ProductPatch,
    ) -> Result<Product, StorefrontError> {
        let echo = self.update_product(prior.id, patch).await?;
        Ok(prior.merge_echo(&echo))
    }

    pub async fn delete_product(&self, id: u64) -> Result<(), StorefrontError> {
        let response = self
            .dispatcher
            .execute(&ApiRequest::delete(product_path(id)))
            .await?;
        info!(id, status = response.status, "product deleted");
        Ok(())
    }
}

fn product_path(id: u64) -> String {
    format!("{PRODUCTS_PATH}/{id}")
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, StorefrontError> {
    serde_json::to_value(value).map_err(|e| StorefrontError::Internal(format!(
        "failed to encode request body: {e}"
    )))
}
