// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A wiremock server that behaves like the Fake Store API.
//!
//! Routes are opt-in: each `with_*` call mounts one group of mocks, so a test
//! only gets the behavior it asks for.

use serde_json::{json, Value};
use storefront_config::model::ApiConfig;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use crate::fixtures::{sample_products, CREATED_PRODUCT_ID};

/// Refresh route mounted by [`FakeStoreServer::with_refresh`].
pub const REFRESH_PATH: &str = "/refreshToken/accessToken";

/// Mock Fake Store API.
pub struct FakeStoreServer {
    server: MockServer,
}

impl FakeStoreServer {
    /// Start a server with no routes mounted.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// API settings pointing at this server.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.uri(),
            ..ApiConfig::default()
        }
    }

    /// `GET /products` and `GET /products/{id}` for every fixture.
    pub async fn with_catalog(self) -> Self {
        let products = sample_products();
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(products.clone())))
            .mount(&self.server)
            .await;
        for product in products {
            let id = product["id"].as_u64().unwrap_or_default();
            Mock::given(method("GET"))
                .and(path(format!("/products/{id}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(product))
                .mount(&self.server)
                .await;
        }
        self
    }

    /// `POST /auth/login` accepting exactly one username/password pair.
    ///
    /// Any other body gets the 401 text the real API sends.
    pub async fn with_login(self, username: &str, password: &str, token: &str) -> Self {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"username": username, "password": password})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": token})))
            .mount(&self.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string("username or password is incorrect"),
            )
            .with_priority(10)
            .mount(&self.server)
            .await;
        self
    }

    /// Any request presenting `Bearer {token}` is rejected with `status`.
    pub async fn with_rejected_token(self, token: &str, status: u16) -> Self {
        Mock::given(header("authorization", format!("Bearer {token}").as_str()))
            .respond_with(ResponseTemplate::new(status).set_body_string("token expired"))
            .with_priority(1)
            .mount(&self.server)
            .await;
        self
    }

    /// Refresh endpoint that trades `refresh_token` for `new_access_token`.
    pub async fn with_refresh(self, refresh_token: &str, new_access_token: &str) -> Self {
        Mock::given(method("GET"))
            .and(path(REFRESH_PATH))
            .and(header("authorization", format!("Bearer {refresh_token}").as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"accessToken": new_access_token})),
            )
            .mount(&self.server)
            .await;
        self.with_failing_refresh().await
    }

    /// Refresh endpoint that never yields a token.
    pub async fn with_failing_refresh(self) -> Self {
        Mock::given(path(REFRESH_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid refresh token"))
            .with_priority(10)
            .mount(&self.server)
            .await;
        self
    }

    /// Create, update and delete routes that echo the submitted fields.
    ///
    /// Creates come back with an id; updates come back without one and with
    /// the price rendered as a string, as the real API does for form posts.
    pub async fn with_product_writes(self) -> Self {
        Mock::given(method("POST"))
            .and(path("/products"))
            .respond_with(EchoBody {
                id: Some(CREATED_PRODUCT_ID),
                price_as_string: false,
            })
            .mount(&self.server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(EchoBody {
                id: None,
                price_as_string: true,
            })
            .mount(&self.server)
            .await;
        for product in sample_products() {
            let id = product["id"].as_u64().unwrap_or_default();
            Mock::given(method("DELETE"))
                .and(path(format!("/products/{id}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(product))
                .mount(&self.server)
                .await;
        }
        self
    }

    /// Paths of every request received so far, in arrival order.
    pub async fn received_paths(&self) -> Vec<String> {
        self.received()
            .await
            .iter()
            .map(|r| r.url.path().to_string())
            .collect()
    }

    /// `authorization` header of every request received so far.
    pub async fn authorization_headers(&self) -> Vec<Option<String>> {
        self.received()
            .await
            .iter()
            .map(|r| {
                r.headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }

    async fn received(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}

/// Responds with the JSON request body, optionally tagged with an id.
struct EchoBody {
    id: Option<u64>,
    price_as_string: bool,
}

impl Respond for EchoBody {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(mut body) = serde_json::from_slice::<Value>(&request.body) else {
            return ResponseTemplate::new(400).set_body_string("body must be JSON");
        };
        if let Some(fields) = body.as_object_mut() {
            if let Some(id) = self.id {
                fields.insert("id".into(), json!(id));
            }
            if self.price_as_string {
                if let Some(price) = fields.get("price").and_then(Value::as_f64) {
                    fields.insert("price".into(), json!(price.to_string()));
                }
            }
        }
        ResponseTemplate::new(200).set_body_json(body)
    }
}
