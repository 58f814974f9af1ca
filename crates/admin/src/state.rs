//! Application state shared across handlers.

use std::sync::Arc;

use axum::http::HeaderValue;
use bazaar_api::{AdminToken, ApiClient, ApiError};

use crate::config::AdminConfig;
use crate::middleware::security_headers::content_security_policy;

/// Application state shared across all handlers.
///
/// Holds only immutable resources; the admin token lives in the session and
/// is attached per request with [`AppState::api_for`].
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ApiClient,
    csp: HeaderValue,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client fails to build.
    pub fn new(config: AdminConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api.base_url, config.api.timeout)?;
        let csp = content_security_policy(&config.api.base_url);

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api, csp }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Unauthenticated backend client (login only).
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Backend client carrying the session's bearer token.
    #[must_use]
    pub fn api_for(&self, token: &AdminToken) -> ApiClient {
        self.inner.api.authed(token)
    }

    /// Content-Security-Policy header allowing backend-hosted images.
    #[must_use]
    pub fn csp(&self) -> &HeaderValue {
        &self.inner.csp
    }
}
