//! Admin settings tabs and brand uploads.

use bazaar_integration_tests::{TestContext, location};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

const DAYS: [&str; 6] = [
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

fn hours_form(open: &str, close: &str) -> Vec<(String, String)> {
    let mut form = vec![
        ("monday_open".to_string(), open.to_string()),
        ("monday_close".to_string(), close.to_string()),
    ];
    form.extend(DAYS.iter().map(|day| (format!("{day}_closed"), "true".to_string())));
    form
}

#[tokio::test]
async fn test_settings_page_renders_backend_values() {
    let ctx = TestContext::admin().await;
    ctx.login().await;
    Mock::given(method("GET"))
        .and(path("/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"businessName": "Rang Mahal", "tagline": "Handloom since 1982"}
        })))
        .mount(&ctx.backend)
        .await;

    let resp = ctx.get("/settings").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains(r#"value="Rang Mahal""#));
    assert!(body.contains(r#"action="/settings/business""#));
}

#[tokio::test]
async fn test_inverted_hours_are_rejected_without_call() {
    let ctx = TestContext::admin().await;
    ctx.login().await;
    Mock::given(method("PUT"))
        .and(path("/settings/hours"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.backend)
        .await;

    let resp = ctx
        .client
        .post(ctx.url("/settings/hours"))
        .form(&hours_form("18:00", "09:00"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("Monday: closing time must be after opening time")
    );
}

#[tokio::test]
async fn test_valid_hours_send_only_the_hours_section() {
    let ctx = TestContext::admin().await;
    ctx.login().await;
    Mock::given(method("PUT"))
        .and(path("/settings/hours"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&ctx.backend)
        .await;

    let resp = ctx
        .client
        .post(ctx.url("/settings/hours"))
        .form(&hours_form("09:00", "18:00"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/settings?tab=hours&success=saved");

    let requests = ctx.backend.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&put.body).unwrap();
    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["businessHours"]);
}

#[tokio::test]
async fn test_blank_business_name_is_rejected() {
    let ctx = TestContext::admin().await;
    ctx.login().await;
    Mock::given(method("PUT"))
        .and(path("/settings/business"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.backend)
        .await;

    let resp = ctx
        .post_form("/settings/business", &[("business_name", "  "), ("tagline", "x")])
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("Business name is required"));
}

#[tokio::test]
async fn test_theme_saved() {
    let ctx = TestContext::admin().await;
    ctx.login().await;
    Mock::given(method("PUT"))
        .and(path("/settings/theme"))
        .and(body_json(json!({"theme": {
            "primaryColor": "#8b1e3f",
            "secondaryColor": "#f4ede4",
            "accentColor": "#d4a017",
            "fontFamily": "Poppins"
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&ctx.backend)
        .await;

    let resp = ctx
        .post_form(
            "/settings/theme",
            &[
                ("primary_color", "#8b1e3f"),
                ("secondary_color", "#f4ede4"),
                ("accent_color", "#d4a017"),
                ("font_family", "Poppins"),
            ],
        )
        .await;
    assert_eq!(location(&resp), "/settings?tab=theme&success=saved");
}

#[tokio::test]
async fn test_unknown_section_is_404() {
    let ctx = TestContext::admin().await;
    ctx.login().await;
    let resp = ctx.post_form("/settings/payments", &[("x", "y")]).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logo_upload_rejects_non_image() {
    let ctx = TestContext::admin().await;
    ctx.login().await;
    Mock::given(method("POST"))
        .and(path("/settings/upload/logo"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.backend)
        .await;

    let part = reqwest::multipart::Part::bytes(b"%PDF-1.4".to_vec())
        .file_name("logo.pdf")
        .mime_str("application/pdf")
        .unwrap();
    let resp = ctx
        .client
        .post(ctx.url("/settings/upload/logo"))
        .multipart(reqwest::multipart::Form::new().part("file", part))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/settings?tab=business&error=not_image");
}

#[tokio::test]
async fn test_unknown_banner_text_is_not_echoed() {
    let ctx = TestContext::admin().await;
    ctx.login().await;
    ctx.mock_get("/settings", json!({})).await;

    let body = ctx
        .get("/settings?tab=business&error=Your+store+was+suspended")
        .await
        .text()
        .await
        .unwrap();
    assert!(!body.contains("Your store was suspended"));

    let body = ctx
        .get("/settings?tab=business&error=not_image")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Only image files can be uploaded."));
}
