//! Unified error handling for admin.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use bazaar_api::ApiError;
use thiserror::Error;

use crate::export::ExportError;
use crate::filters;
use crate::middleware::SessionExpired;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Report export failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Standalone error page, rendered without backend data.
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
            Self::Api(err) => match err.status() {
                Some(code) if !err.is_server_error() => {
                    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Session(_) | Self::Export(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn is_server_side(&self) -> bool {
        match self {
            Self::Api(err) => err.is_server_error(),
            Self::Session(_) | Self::Export(_) | Self::Internal(_) => true,
            Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }

    /// Text for the page; never internal details.
    fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.message(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::BadRequest(message) => message.clone(),
            Self::Session(_) | Self::Export(_) | Self::Internal(_) => {
                bazaar_core::status_message(500).to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // The session-expiry middleware turns this into sign-out + redirect.
        if let Self::Api(err) = &self
            && err.is_unauthorized()
        {
            let mut response = (StatusCode::UNAUTHORIZED, err.message()).into_response();
            response.extensions_mut().insert(SessionExpired);
            return response;
        }

        if self.is_server_side() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
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

/// Set the Sentry user context for the signed-in admin.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
