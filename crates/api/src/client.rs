//! HTTP plumbing shared by every resource module.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::Part;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::ApiError;

const CLIENT_USER_AGENT: &str = concat!("bazaar/", env!("CARGO_PKG_VERSION"));

/// Bearer token issued by `POST /auth/login`.
#[derive(Clone, Debug)]
pub struct AdminToken(SecretString);

impl AdminToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for the session store and the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// A file for a multipart upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub(crate) fn into_part(self) -> Result<Part, ApiError> {
        Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)
            .map_err(|e| ApiError::Request(format!("invalid content type: {e}")))
    }
}

/// Client for the retail backend.
///
/// Cheap to clone. [`ApiClient::authed`] returns a copy that sends the given
/// token on every request; the unauthenticated client sends none.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
    token: Option<AdminToken>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
            }),
            token: None,
        })
    }

    /// A copy of this client that authenticates as `token`.
    #[must_use]
    pub fn authed(&self, token: &AdminToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            token: Some(token.clone()),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Resolve a backend-relative asset path (e.g. `/uploads/x.jpg`) against
    /// the API origin. Absolute URLs pass through.
    #[must_use]
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:")
        {
            return path.to_string();
        }
        Url::parse(&self.inner.base_url)
            .and_then(|base| base.join(path))
            .map_or_else(|_| path.to_string(), String::from)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let builder = self.inner.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        }
    }

    /// Send a request and decode the payload.
    ///
    /// Accepts both `{ success, message?, data? }` envelopes and bare bodies.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;

        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(e) if status.is_success() => {
                    tracing::error!(
                        status = %status,
                        body = %String::from_utf8_lossy(&bytes).chars().take(500).collect::<String>(),
                        "Backend returned non-JSON body"
                    );
                    return Err(ApiError::Decode(e.to_string()));
                }
                // Error pages (proxies, HTML 502s) carry no usable message.
                Err(_) => Value::Null,
            }
        };

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &body);
            if err.is_server_error() {
                tracing::error!(status = %status, error = %err, "Backend request failed");
            } else {
                tracing::debug!(status = %status, error = %err, "Backend rejected request");
            }
            return Err(err);
        }

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        let payload = unwrap_envelope(body);
        serde_json::from_value(payload).map_err(|e| {
            tracing::error!(error = %e, "Failed to decode backend response");
            ApiError::Decode(e.to_string())
        })
    }
}

/// `data` when the body is an envelope, otherwise the body itself.
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("success") && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub(crate) fn client_for(server: &MockServer) -> ApiClient {
        let url = Url::parse(&server.uri()).unwrap();
        ApiClient::new(&url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_unwrap_envelope() {
        assert_eq!(
            unwrap_envelope(json!({"success": true, "data": [1, 2]})),
            json!([1, 2])
        );
        assert_eq!(unwrap_envelope(json!([1, 2])), json!([1, 2]));
        assert_eq!(
            unwrap_envelope(json!({"success": true, "message": "ok"})),
            json!({"success": true, "message": "ok"})
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let url = Url::parse("http://localhost:5000/api").unwrap();
        let client = ApiClient::new(&url, Duration::from_secs(1))
            .unwrap()
            .authed(&AdminToken::new("super-secret"));
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("authenticated: true"));
    }

    #[test]
    fn test_asset_url() {
        let url = Url::parse("http://localhost:5000/api/").unwrap();
        let client = ApiClient::new(&url, Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.asset_url("/uploads/kurta.jpg"),
            "http://localhost:5000/uploads/kurta.jpg"
        );
        assert_eq!(
            client.asset_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[tokio::test]
    async fn test_bearer_token_only_when_authed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let authed = client.authed(&AdminToken::new("tok-1"));
        let value: Value = authed
            .send(authed.request(Method::GET, "/ping"))
            .await
            .unwrap();
        assert_eq!(value["ok"], true);

        // no header: nothing matches, wiremock answers 404
        let err = client
            .send::<Value>(client.request(Method::GET, "/ping"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_success_false_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thing"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": false, "message": "Nope"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .send::<Value>(client.request(Method::GET, "/thing"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Nope");
    }

    #[tokio::test]
    async fn test_timeout_is_normalised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let client = ApiClient::new(&url, Duration::from_millis(50)).unwrap();
        let err = client
            .send::<Value>(client.request(Method::GET, "/slow"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Timeout));
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_is_network_error() {
        let url = Url::parse("http://127.0.0.1:9").unwrap();
        let client = ApiClient::new(&url, Duration::from_secs(2)).unwrap();
        let err = client
            .send::<Value>(client.request(Method::GET, "/x"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), bazaar_core::NETWORK_ERROR_MESSAGE);
    }
}
