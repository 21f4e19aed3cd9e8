// SPDX-FileCopyrightText: 2026 Storefront Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authenticated request dispatch with a single silent token refresh.
//!
//! Every API call goes through [`Dispatcher::execute`]. The access token is
//! attached as a bearer credential; when the server answers 401 or 501 the
//! refresh endpoint is called once with the refresh token, and on success the
//! original request is replayed once with the new access token.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use storefront_config::model::ApiConfig;
use storefront_core::{CredentialProvider, CredentialUpdater, StorefrontError};
use tracing::{debug, info, warn};

/// Description of one logical API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::PUT,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            body: None,
        }
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, StorefrontError> {
        serde_json::from_str(&self.body).map_err(|e| StorefrontError::Decode {
            message: format!("failed to parse response body: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Body of a successful refresh call.
#[derive(Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
}

/// Which stored token a request presents.
#[derive(Debug, Clone, Copy)]
enum Bearer {
    Access,
    Refresh,
}

/// Executes API calls on behalf of one session.
///
/// Generic over the credential capability so tests can observe every read
/// and write without a real session store.
#[derive(Debug, Clone)]
pub struct Dispatcher<C> {
    http: reqwest::Client,
    base_url: String,
    refresh_path: String,
    credentials: C,
}

impl<C> Dispatcher<C>
where
    C: CredentialProvider + CredentialUpdater,
{
    /// Build a dispatcher for the API described by `config`.
    pub fn new(config: &ApiConfig, credentials: C) -> Result<Self, StorefrontError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| StorefrontError::Transport {
            message: format!("failed to build HTTP client: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            refresh_path: config.refresh_path.clone(),
            credentials,
        })
    }

    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    /// Run `request`, recovering at most once from an authorization failure.
    ///
    /// - 2xx: returned as is.
    /// - 401/501: one refresh call. If it yields a new access token, it is
    ///   stored and `request` is replayed once; that outcome is final. If it
    ///   does not, the session is logged out and the original error returned.
    /// - Any other failure, including transport errors: returned unchanged.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, StorefrontError> {
        let err = match self.send(request, Bearer::Access).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };
        if !err.needs_reauth() {
            return Err(err);
        }

        warn!(
            method = %request.method,
            path = %request.path,
            status = ?err.status(),
            "authorization rejected, refreshing access token"
        );

        match self.refresh_access_token().await {
            Some(token) => {
                self.credentials.set_access_token(token);
                info!(path = %request.path, "access token refreshed, replaying request");
                self.send(request, Bearer::Access).await
            }
            None => {
                warn!("token refresh failed, logging out");
                self.credentials.log_out();
                Err(err)
            }
        }
    }

    /// Call the refresh endpoint. `None` covers every way of not getting a
    /// usable token back.
    async fn refresh_access_token(&self) -> Option<String> {
        let request = ApiRequest::get(self.refresh_path.clone());
        let response = match self.send(&request, Bearer::Refresh).await {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "refresh call failed");
                return None;
            }
        };
        match response.json::<RefreshResponse>() {
            Ok(refreshed) => Some(refreshed.access_token),
            Err(e) => {
                debug!(error = %e, "refresh response carried no access token");
                None
            }
        }
    }

    async fn send(&self, request: &ApiRequest, bearer: Bearer) -> Result<ApiResponse, StorefrontError> {
        let url = self.url(&request.path);
        let token = match bearer {
            Bearer::Access => self.credentials.access_token(),
            Bearer::Refresh => self.credentials.refresh_token(),
        };

        let mut builder = self.http.request(request.method.clone(), &url);
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                StorefrontError::Config(format!("token is not a valid header value: {e}"))
            })?;
            builder = builder.header(AUTHORIZATION, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| StorefrontError::Transport {
            message: format!("{} {url} failed: {e}", request.method),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        debug!(method = %request.method, %url, status = %status, ?bearer, "response received");

        let body = response.text().await.map_err(|e| StorefrontError::Transport {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if status.is_success() {
            Ok(ApiResponse {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(http_error(status, body))
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn http_error(status: StatusCode, body: String) -> StorefrontError {
    StorefrontError::Http {
        status: status.as_u16(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tracing_test::traced_test;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    /// Credential fake that records every write.
    #[derive(Debug, Default)]
    struct RecordingCredentials {
        access: Mutex<Option<String>>,
        refresh: Mutex<Option<String>>,
        stored: Mutex<Vec<String>>,
        logouts: Mutex<usize>,
    }

    impl RecordingCredentials {
        fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
            Self {
                access: Mutex::new(access.map(str::to_string)),
                refresh: Mutex::new(refresh.map(str::to_string)),
                ..Default::default()
            }
        }

        fn stored(&self) -> Vec<String> {
            self.stored.lock().unwrap().clone()
        }

        fn logouts(&self) -> usize {
            *self.logouts.lock().unwrap()
        }
    }

    impl CredentialProvider for RecordingCredentials {
        fn access_token(&self) -> Option<String> {
            self.access.lock().unwrap().clone()
        }

        fn refresh_token(&self) -> Option<String> {
            self.refresh.lock().unwrap().clone()
        }
    }

    impl CredentialUpdater for RecordingCredentials {
        fn set_access_token(&self, token: String) {
            self.stored.lock().unwrap().push(token.clone());
            *self.access.lock().unwrap() = Some(token);
        }

        fn log_out(&self) {
            *self.logouts.lock().unwrap() += 1;
            *self.access.lock().unwrap() = None;
            *self.refresh.lock().unwrap() = None;
        }
    }

    fn dispatcher(server: &MockServer, creds: RecordingCredentials) -> Dispatcher<RecordingCredentials> {
        let config = ApiConfig {
            base_url: server.uri(),
            ..ApiConfig::default()
        };
        Dispatcher::new(&config, creds).unwrap()
    }

    fn bearer(request: &Request) -> Option<String> {
        request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    #[tokio::test]
    async fn attaches_current_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let d = dispatcher(&server, RecordingCredentials::with_tokens(Some("abc"), None));
        let response = d.execute(&ApiRequest::get("/products")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "[]");
    }

    #[tokio::test]
    async fn omits_header_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let d = dispatcher(&server, RecordingCredentials::default());
        d.execute(&ApiRequest::get("products/1")).await.unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(bearer(&received[0]), None);
    }

    #[tokio::test]
    async fn refreshes_once_and_replays_with_new_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(header("authorization", "Bearer expired"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/refreshToken/accessToken"))
            .and(header("authorization", "Bearer r1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"accessToken": "new123"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(header("authorization", "Bearer new123"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[{\"id\":1}]"))
            .expect(1)
            .mount(&server)
            .await;

        let d = dispatcher(
            &server,
            RecordingCredentials::with_tokens(Some("expired"), Some("r1")),
        );
        let response = d.execute(&ApiRequest::get("/products")).await.unwrap();

        assert_eq!(response.body, "[{\"id\":1}]");
        assert_eq!(d.credentials().stored(), vec!["new123".to_string()]);
        assert_eq!(d.credentials().access_token().as_deref(), Some("new123"));
        assert_eq!(d.credentials().logouts(), 0);

        // Refresh strictly precedes the replay.
        let paths: Vec<String> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect();
        assert_eq!(paths, ["/products", "/refreshToken/accessToken", "/products"]);
    }

    #[tokio::test]
    async fn status_501_is_treated_like_401() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/products/3"))
            .and(header("authorization", "Bearer old"))
            .respond_with(ResponseTemplate::new(501))
            .mount(&server)
            .await;
        Mock::given(path("/refreshToken/accessToken"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"accessToken": "fresh"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/products/3"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let d = dispatcher(&server, RecordingCredentials::with_tokens(Some("old"), Some("r")));
        assert!(d.execute(&ApiRequest::delete("/products/3")).await.is_ok());
    }

    #[tokio::test]
    async fn replay_failure_is_final() {
        let server = MockServer::start().await;
        Mock::given(path("/products"))
            .respond_with(ResponseTemplate::new(401).set_body_string("still no"))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(path("/refreshToken/accessToken"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"accessToken": "t2"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let d = dispatcher(&server, RecordingCredentials::with_tokens(Some("t1"), Some("r")));
        let err = d.execute(&ApiRequest::get("/products")).await.unwrap_err();

        assert_eq!(err.status(), Some(401));
        assert_eq!(d.credentials().logouts(), 0);
        assert_eq!(d.credentials().access_token().as_deref(), Some("t2"));
    }

    #[tokio::test]
    #[traced_test]
    async fn failed_refresh_logs_out_and_returns_original_error() {
        let server = MockServer::start().await;
        Mock::given(path("/products"))
            .respond_with(ResponseTemplate::new(401).set_body_string("jwt expired"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/refreshToken/accessToken"))
            .respond_with(ResponseTemplate::new(403).set_body_string("refresh revoked"))
            .expect(1)
            .mount(&server)
            .await;

        let d = dispatcher(&server, RecordingCredentials::with_tokens(Some("a"), Some("r")));
        let err = d.execute(&ApiRequest::get("/products")).await.unwrap_err();

        match err {
            StorefrontError::Http { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "jwt expired");
            }
            other => panic!("expected original HTTP error, got {other:?}"),
        }
        assert_eq!(d.credentials().logouts(), 1);
        assert!(d.credentials().access_token().is_none());
        assert!(d.credentials().refresh_token().is_none());
        assert!(logs_contain("token refresh failed, logging out"));
    }

    #[tokio::test]
    async fn refresh_without_access_token_field_logs_out() {
        let server = MockServer::start().await;
        Mock::given(path("/products"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/refreshToken/accessToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "x"})))
            .mount(&server)
            .await;

        let d = dispatcher(&server, RecordingCredentials::with_tokens(Some("a"), Some("r")));
        let err = d.execute(&ApiRequest::get("/products")).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(d.credentials().logouts(), 1);
        assert!(d.credentials().stored().is_empty());
    }

    #[tokio::test]
    async fn refresh_without_refresh_token_sends_no_header() {
        let server = MockServer::start().await;
        Mock::given(path("/products"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(path("/refreshToken/accessToken"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"accessToken": "x"})))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(path("/refreshToken/accessToken"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let d = dispatcher(&server, RecordingCredentials::with_tokens(Some("a"), None));
        assert!(d.execute(&ApiRequest::get("/products")).await.is_err());
        assert_eq!(d.credentials().logouts(), 1);
    }

    #[tokio::test]
    async fn other_statuses_skip_refresh() {
        for status in [400u16, 403, 404, 500, 503] {
            let server = MockServer::start().await;
            Mock::given(path("/products/99"))
                .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(path("/refreshToken/accessToken"))
                .respond_with(ResponseTemplate::new(200))
                .expect(0)
                .mount(&server)
                .await;

            let d = dispatcher(&server, RecordingCredentials::with_tokens(Some("a"), Some("r")));
            let err = d.execute(&ApiRequest::get("/products/99")).await.unwrap_err();
            assert_eq!(err.status(), Some(status));
            assert_eq!(d.credentials().logouts(), 0);
            assert!(d.credentials().stored().is_empty());
        }
    }

    #[tokio::test]
    async fn transport_errors_are_not_retried() {
        // Bind and release a port so nothing is listening on it.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let config = ApiConfig {
            base_url: format!("http://127.0.0.1:{port}"),
            timeout_secs: Some(2),
            ..ApiConfig::default()
        };
        let d = Dispatcher::new(&config, RecordingCredentials::with_tokens(Some("a"), Some("r")))
            .unwrap();
        let err = d.execute(&ApiRequest::get("/products")).await.unwrap_err();

        assert!(matches!(err, StorefrontError::Transport { .. }), "got {err:?}");
        assert_eq!(d.credentials().logouts(), 0);
    }

    #[tokio::test]
    async fn sends_json_body_for_writes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/products"))
            .and(wiremock::matchers::body_json(serde_json::json!({"title": "Lamp"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\":21}"))
            .expect(1)
            .mount(&server)
            .await;

        let d = dispatcher(&server, RecordingCredentials::default());
        let response = d
            .execute(&ApiRequest::post("/products", serde_json::json!({"title": "Lamp"})))
            .await
            .unwrap();
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["id"], 21);
    }

    #[test]
    fn joins_paths_with_or_without_slash() {
        let config = ApiConfig {
            base_url: "https://fakestoreapi.com/".into(),
            ..ApiConfig::default()
        };
        let d = Dispatcher::new(&config, RecordingCredentials::default()).unwrap();
        assert_eq!(d.url("/products"), "https://fakestoreapi.com/products");
        assert_eq!(d.url("products/7"), "https://fakestoreapi.com/products/7");
    }
}
