//! `POST /auth/login`

use bazaar_core::{AdminUserId, Email};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::{AdminToken, ApiClient};
use crate::error::ApiError;

/// The signed-in administrator, as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminUser {
    #[serde(alias = "_id")]
    pub id: Option<AdminUserId>,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: AdminToken,
    pub user: Option<AdminUser>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginWire {
    token: String,
    #[serde(default, alias = "admin")]
    user: Option<AdminUser>,
}

impl ApiClient {
    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for bad credentials, or any other
    /// transport or backend error.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.as_str(),
            password,
        };
        let wire: LoginWire = self
            .send(self.request(Method::POST, "/auth/login").json(&body))
            .await?;

        if wire.token.trim().is_empty() {
            return Err(ApiError::Decode("login response has an empty token".into()));
        }

        Ok(LoginResponse {
            token: AdminToken::new(wire.token),
            user: wire.user,
        })
    }
}
