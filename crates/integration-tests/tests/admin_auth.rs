//! Admin login, route guard, and token expiry.

use bazaar_integration_tests::{TEST_TOKEN, TestContext, location};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_protected_page_redirects_to_login_with_next() {
    let ctx = TestContext::admin().await;

    let resp = ctx.get("/products?q=kurta").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?next=%2Fproducts%3Fq%3Dkurta");

    let resp = ctx.get("/").await;
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn test_health_needs_no_login() {
    let ctx = TestContext::admin().await;
    let resp = ctx.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_invalid_login_makes_no_backend_call() {
    let ctx = TestContext::admin().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.backend)
        .await;

    let resp = ctx
        .post_form("/login", &[("email", "not-an-email"), ("password", "pw")])
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Invalid email"));
}

#[tokio::test]
async fn test_rejected_credentials_show_backend_message() {
    let ctx = TestContext::admin().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"success": false, "message": "Invalid credentials"})),
        )
        .mount(&ctx.backend)
        .await;

    let resp = ctx
        .post_form("/login", &[("email", "owner@shop.in"), ("password", "wrong")])
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("Invalid credentials"));

    // Still signed out
    let resp = ctx.get("/products").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_login_returns_to_next_and_sends_token() {
    let ctx = TestContext::admin().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"token": TEST_TOKEN, "user": {"name": "Asha", "email": "owner@shop.in"}}
        })))
        .mount(&ctx.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})))
        .expect(1)
        .mount(&ctx.backend)
        .await;

    let resp = ctx
        .post_form(
            "/login",
            &[
                ("email", "owner@shop.in"),
                ("password", "secret"),
                ("next", "/products"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/products");

    let resp = ctx.get("/products").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Asha"));
}

#[tokio::test]
async fn test_login_ignores_offsite_next() {
    let ctx = TestContext::admin().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"token": TEST_TOKEN}
        })))
        .mount(&ctx.backend)
        .await;

    let resp = ctx
        .post_form(
            "/login",
            &[
                ("email", "owner@shop.in"),
                ("password", "secret"),
                ("next", "//evil.example"),
            ],
        )
        .await;
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn test_backend_401_signs_admin_out() {
    let ctx = TestContext::admin().await;
    ctx.login().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})),
        )
        .mount(&ctx.backend)
        .await;

    let resp = ctx.get("/products").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?expired=1");

    // The session was cleared, so the guard now applies.
    let resp = ctx.get("/products").await;
    assert_eq!(location(&resp), "/login?next=%2Fproducts");

    let resp = ctx.get("/login?expired=1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("session has expired"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let ctx = TestContext::admin().await;
    ctx.login().await;

    let resp = ctx.post_form("/logout", &[]).await;
    assert_eq!(location(&resp), "/login");

    let resp = ctx.get("/sales").await;
    assert_eq!(location(&resp), "/login?next=%2Fsales");
}

#[tokio::test]
async fn test_security_headers_present() {
    let ctx = TestContext::admin().await;
    let resp = ctx.get("/login").await;
    let csp = resp
        .headers()
        .get("content-security-policy")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(csp.contains("default-src 'none'"));
    assert!(csp.contains(&ctx.backend.uri()));
    assert!(resp.headers().contains_key("x-request-id"));
}
