//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before an HTML error page is rendered; the page only
//! ever shows user-facing text.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use bazaar_api::ApiError;
use thiserror::Error;

use crate::filters;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Standalone error page. Deliberately independent of business settings so
/// it renders even when the backend is down.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub title: &'static str,
    pub message: String,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Api(err) => match err.status() {
                Some(404) => StatusCode::NOT_FOUND,
                _ if err.is_server_error() => StatusCode::BAD_GATEWAY,
                Some(code) => StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY),
                None => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn is_server_side(&self) -> bool {
        match self {
            Self::Api(err) => err.is_server_error(),
            Self::Internal(_) => true,
            Self::NotFound(_) => false,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) => "We couldn't find what you were looking for.".to_string(),
            Self::Internal(_) => bazaar_core::status_message(500).to_string(),
            Self::Api(err) if err.is_server_error() => match err.status() {
                Some(status) => bazaar_core::status_message(status).to_string(),
                None => err.message(),
            },
            Self::Api(err) => err.message(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_side() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status_code();
        let page = ErrorTemplate {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error"),
            message: self.user_message(),
        };

        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error page");
                (status, page.message).into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
