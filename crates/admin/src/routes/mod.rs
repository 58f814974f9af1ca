//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness
//! GET  /health/ready                    - Readiness (backend reachable)
//!
//! # Auth
//! GET  /login                           - Login page (?next=, ?expired=1)
//! POST /login                           - Sign in against the backend
//! POST /logout                          - Sign out
//!
//! # Dashboard
//! GET  /                                - Stock and sales overview
//!
//! # Products
//! GET  /products                        - Product table with search
//! GET  /products/new                    - Create form
//! POST /products                        - Create (multipart, optional image)
//! GET  /products/{id}/edit              - Edit form
//! POST /products/{id}                   - Update (multipart, optional image)
//! POST /products/{id}/delete            - Delete, with force confirmation
//!
//! # Sales
//! GET  /sales                           - History and summary
//! GET  /sales/new                       - Sell form with live quote
//! POST /sales                           - Record a sale
//! GET  /sales/report                    - Filterable report with totals
//! GET  /sales/report/export             - CSV or XLSX download
//!
//! # Settings
//! GET  /settings?tab=                   - Settings tabs
//! POST /settings/{section}              - Save one tab
//! POST /settings/upload/{kind}          - Upload logo or favicon
//! ```
//!
//! Everything except `/login` and `/health*` requires a session token via
//! [`RequireAdminToken`](crate::middleware::RequireAdminToken).

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod products;
pub mod report;
pub mod sales;
pub mod settings;

use askama::Template;
use axum::{
    Router,
    extract::multipart::Field,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use bazaar_api::{ApiError, Upload};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::CurrentAdmin;
use crate::state::AppState;

// =============================================================================
// Shared view data
// =============================================================================

/// Admin user view for the header.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.display_name().to_string(),
            email: admin.email.clone(),
        }
    }
}

/// `?success=` and `?error=` codes set by a redirect after a submit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlashQuery {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Banner text shown at the top of a page.
#[derive(Debug, Clone, Default)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl Flash {
    /// An error banner only.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: None,
            error: Some(message.into()),
        }
    }
}

impl From<FlashQuery> for Flash {
    /// Only known codes produce a banner; anything else is dropped.
    fn from(query: FlashQuery) -> Self {
        let success = query.success.and_then(|s| {
            let message = match s.as_str() {
                "created" => "Product created.",
                "updated" => "Product updated.",
                "deleted" => "Product deleted.",
                "sold" => "Sale recorded.",
                "saved" => "Settings saved.",
                "uploaded" => "Image uploaded.",
                _ => return None,
            };
            Some(message.to_owned())
        });
        let error = query.error.and_then(|e| {
            let message = match e.as_str() {
                "not_found" => "That item no longer exists.",
                "no_file" => "Choose a file to upload.",
                "not_image" => "Only image files can be uploaded.",
                _ => return None,
            };
            Some(message.to_owned())
        });
        Self { success, error }
    }
}

fn redirect_with(path: &str, key: &str, code: &str) -> Response {
    let sep = if path.contains('?') { '&' } else { '?' };
    Redirect::to(&format!("{path}{sep}{key}={code}")).into_response()
}

/// Redirect to `path` with a success code in the query.
#[must_use]
pub fn redirect_with_success(path: &str, code: &str) -> Response {
    redirect_with(path, "success", code)
}

/// Redirect to `path` with an error code in the query.
#[must_use]
pub fn redirect_with_error(path: &str, code: &str) -> Response {
    redirect_with(path, "error", code)
}

/// Text for a page-level error banner.
///
/// A rejected token is not a banner: it propagates so the session-expiry
/// middleware signs the admin out.
///
/// # Errors
///
/// Returns the error itself when the backend answered 401.
pub fn banner(err: ApiError) -> Result<String> {
    if err.is_unauthorized() {
        return Err(err.into());
    }
    tracing::warn!(error = %err, "Backend call failed");
    Ok(err.message())
}

/// Request body limit on routes that accept an image.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Read a file part. No file chosen arrives as an empty part and is `None`.
///
/// # Errors
///
/// Returns `BadRequest` if the body can't be read (e.g. it is too large).
pub async fn read_upload(field: Field<'_>) -> Result<Option<Upload>> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?;

    if file_name.is_empty() || bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(Upload {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    }))
}

/// Only image uploads are forwarded to the backend.
#[must_use]
pub fn is_image(upload: &Upload) -> bool {
    upload.content_type.starts_with("image/")
}

/// Render a template to HTML, logging (not leaking) render failures.
pub fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

// =============================================================================
// Router
// =============================================================================

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(products::router())
        .merge(sales::router())
        .merge(report::router())
        .merge(settings::router())
}
