//! Public storefront pages against the mock backend.

use bazaar_integration_tests::{TestContext, product_json};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mock_settings(ctx: &TestContext) {
    ctx.mock_get(
        "/settings",
        json!({
            "businessName": "Rang Mahal",
            "tagline": "Handloom since 1982",
            "theme": {"primaryColor": "#123456"}
        }),
    )
    .await;
}

#[tokio::test]
async fn test_health_and_readiness() {
    let ctx = TestContext::storefront().await;
    assert_eq!(ctx.get("/health").await.status(), StatusCode::OK);

    // No settings mock yet: backend answers 404
    assert_eq!(
        ctx.get("/health/ready").await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );

    mock_settings(&ctx).await;
    assert_eq!(ctx.get("/health/ready").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_catalog_lists_and_searches_products() {
    let ctx = TestContext::storefront().await;
    mock_settings(&ctx).await;
    ctx.mock_get(
        "/products",
        json!([
            product_json("p1", "Cotton Kurta", 20),
            product_json("p2", "Silk Saree", 0),
        ]),
    )
    .await;

    let body = ctx.get("/products").await.text().await.unwrap();
    assert!(body.contains("Rang Mahal"));
    assert!(body.contains("Cotton Kurta"));
    assert!(body.contains("Silk Saree"));

    let body = ctx.get("/products?q=kurta").await.text().await.unwrap();
    assert!(body.contains("Cotton Kurta"));
    assert!(!body.contains("Silk Saree"));
}

#[tokio::test]
async fn test_catalog_accepts_huge_visible_count() {
    let ctx = TestContext::storefront().await;
    mock_settings(&ctx).await;
    ctx.mock_get("/products", json!([product_json("p1", "Cotton Kurta", 20)]))
        .await;

    let resp = ctx.get("/products?visible=18446744073709551615").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Cotton Kurta"));
}

#[tokio::test]
async fn test_catalog_survives_settings_failure() {
    let ctx = TestContext::storefront().await;
    ctx.mock_get("/products", json!([product_json("p1", "Cotton Kurta", 20)]))
        .await;

    let resp = ctx.get("/products").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    // Built-in business name
    assert!(body.contains("Bazaar"));
    assert!(body.contains("Cotton Kurta"));
}

#[tokio::test]
async fn test_catalog_shows_backend_error() {
    let ctx = TestContext::storefront().await;
    mock_settings(&ctx).await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "Database unavailable"})),
        )
        .mount(&ctx.backend)
        .await;

    let resp = ctx.get("/products").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Database unavailable"));
}

#[tokio::test]
async fn test_product_detail_and_missing_product() {
    let ctx = TestContext::storefront().await;
    mock_settings(&ctx).await;
    ctx.mock_get("/products/p1", json!(product_json("p1", "Cotton Kurta", 20)))
        .await;
    Mock::given(method("GET"))
        .and(path("/products/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Product not found"})))
        .mount(&ctx.backend)
        .await;

    let resp = ctx.get("/products/p1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Cotton Kurta"));

    assert_eq!(ctx.get("/products/nope").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_theme_css_uses_settings_colors() {
    let ctx = TestContext::storefront().await;
    mock_settings(&ctx).await;

    let resp = ctx.get("/theme.css").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("--color-primary: #123456;"));
}
