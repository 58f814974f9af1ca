//! Application state shared across handlers.

use std::sync::Arc;

use axum::http::HeaderValue;
use bazaar_api::{ApiClient, ApiError};
use bazaar_core::Settings;

use crate::config::StorefrontConfig;
use crate::middleware::security_headers::content_security_policy;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and holds only immutable
/// resources. No backend data is cached between requests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    csp: HeaderValue,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client fails to build.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api.base_url, config.api.timeout)?;
        let csp = content_security_policy(&config.api.base_url);

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api, csp }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Content-Security-Policy header allowing backend-hosted images.
    #[must_use]
    pub fn csp(&self) -> &HeaderValue {
        &self.inner.csp
    }

    /// Business info for the navbar and footer.
    ///
    /// Best effort: a failed fetch is logged and replaced by built-in
    /// defaults so the page still renders.
    pub async fn business_info(&self) -> Settings {
        match self.api().get_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load business settings, using defaults");
                Settings::fallback()
            }
        }
    }
}
