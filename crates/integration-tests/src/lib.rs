//! Integration tests for Bazaar.
//!
//! Each test boots the real admin or storefront router on an ephemeral port,
//! pointed at a [`wiremock`] server standing in for the retail backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `admin_auth` - login, route guard, token expiry
//! - `admin_products` - product forms and delete confirmation
//! - `admin_sales` - selling, history, report export
//! - `admin_settings` - settings tabs
//! - `storefront` - public catalog pages

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Token the mock backend hands out on login.
pub const TEST_TOKEN: &str = "test-jwt";

/// A running app plus the mock backend behind it.
pub struct TestContext {
    /// Client with a cookie jar that does not follow redirects.
    pub client: Client,
    pub base_url: String,
    pub backend: MockServer,
}

impl TestContext {
    /// Start the admin panel against a fresh mock backend.
    pub async fn admin() -> Self {
        let backend = MockServer::start().await;
        let config = bazaar_admin::config::AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            api: bazaar_admin::config::ApiConfig {
                base_url: Url::parse(&backend.uri()).unwrap(),
                timeout: Duration::from_secs(5),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
            json_logs: false,
        };
        let state = bazaar_admin::state::AppState::new(config).unwrap();
        let addr = serve(bazaar_admin::app(state)).await;
        Self::new(addr, backend)
    }

    /// Start the storefront against a fresh mock backend.
    pub async fn storefront() -> Self {
        let backend = MockServer::start().await;
        let config = bazaar_storefront::config::StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            api: bazaar_storefront::config::ApiConfig {
                base_url: Url::parse(&backend.uri()).unwrap(),
                timeout: Duration::from_secs(5),
            },
            demo_attributes: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
            json_logs: false,
        };
        let state = bazaar_storefront::state::AppState::new(config).unwrap();
        let addr = serve(bazaar_storefront::app(state)).await;
        Self::new(addr, backend)
    }

    fn new(addr: SocketAddr, backend: MockServer) -> Self {
        let client = Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: format!("http://{addr}"),
            backend,
        }
    }

    /// Absolute URL for an app path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET an app path.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    /// POST a urlencoded form to an app path.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// Log in through the admin form; the backend accepts any credentials.
    pub async fn login(&self) {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "token": TEST_TOKEN,
                    "user": {"_id": "u1", "name": "Asha", "email": "owner@shop.in"}
                }
            })))
            .mount(&self.backend)
            .await;

        let resp = self
            .post_form(
                "/login",
                &[("email", "owner@shop.in"), ("password", "secret")],
            )
            .await;
        assert_eq!(resp.status(), 303, "login should redirect");
    }

    /// Serve `body` wrapped in the backend's success envelope for GET `route`.
    pub async fn mock_get(&self, route: &str, data: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": data})),
            )
            .mount(&self.backend)
            .await;
    }
}

async fn serve(app: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Location header of a redirect response.
#[must_use]
pub fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// A backend product document.
#[must_use]
pub fn product_json(id: &str, name: &str, quantity: i64) -> Value {
    json!({
        "_id": id,
        "name": name,
        "barcode": format!("BC-{id}"),
        "purchaseRate": 100,
        "sellingRate": 150,
        "quantity": quantity,
        "gst": 5,
        "category": "Kurtas"
    })
}

/// A backend sale document referencing a product by id.
#[must_use]
pub fn sale_json(id: &str, product_id: &str, quantity: i64, created_at: &str) -> Value {
    json!({
        "_id": id,
        "productId": product_id,
        "quantitySold": quantity,
        "totalSaleValue": 150 * quantity,
        "totalPurchaseValue": 100 * quantity,
        "profit": 50 * quantity,
        "createdAt": created_at
    })
}
