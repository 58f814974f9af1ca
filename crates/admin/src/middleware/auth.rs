//! Authentication extractor and the session-expiry observer.
//!
//! The admin is "signed in" while the session holds a backend token. The
//! token is never validated here; the backend rejects a stale one with 401,
//! and [`session_expiry_middleware`] turns that into a sign-out.

use axum::{
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use bazaar_api::{AdminToken, LoginResponse};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

/// Where the session-expiry observer sends the admin.
pub const EXPIRED_REDIRECT: &str = "/login?expired=1";

/// Extractor that requires a stored admin token.
///
/// Without one, the request is redirected to `/login?next=<path>`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     auth: RequireAdminToken,
///     State(state): State<AppState>,
/// ) -> Result<Html<String>> {
///     let products = state.api_for(&auth.token).list_products().await?;
///     // ...
/// }
/// ```
pub struct RequireAdminToken {
    pub token: AdminToken,
    pub admin: CurrentAdmin,
}

/// Rejection for [`RequireAdminToken`].
pub enum AdminAuthRejection {
    /// No token in the session; carries the path to return to.
    RedirectToLogin(String),
    /// The session layer is missing (a wiring bug).
    SessionUnavailable,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(next) => Redirect::to(&login_redirect(&next)).into_response(),
            Self::SessionUnavailable => {
                tracing::error!("Session layer missing from admin router");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminToken
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::SessionUnavailable)?;

        let token: String = session
            .get(session_keys::ADMIN_TOKEN)
            .await
            .ok()
            .flatten()
            .filter(|t: &String| !t.trim().is_empty())
            .ok_or_else(|| {
                let next = parts
                    .uri
                    .path_and_query()
                    .map_or("/", |pq| pq.as_str())
                    .to_string();
                AdminAuthRejection::RedirectToLogin(next)
            })?;

        let admin = session
            .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();

        Ok(Self {
            token: AdminToken::new(token),
            admin,
        })
    }
}

/// `/login?next=<path>`, or plain `/login` when there is nowhere to return to.
#[must_use]
pub fn login_redirect(next: &str) -> String {
    match safe_next(next) {
        Some(path) if path != "/" => format!("/login?next={}", urlencoding::encode(path)),
        _ => "/login".to_string(),
    }
}

/// Accept only local absolute paths as a post-login destination.
#[must_use]
pub fn safe_next(next: &str) -> Option<&str> {
    let next = next.trim();
    let local = next.starts_with('/') && !next.starts_with("//") && !next.starts_with("/\\");
    local.then_some(next)
}

/// Store the token and admin after a successful login.
///
/// The session id is cycled first so a pre-login id can't be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_admin_session(
    session: &Session,
    login: &LoginResponse,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::ADMIN_TOKEN, login.token.expose())
        .await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Drop everything in the session (logout, or token rejected).
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_admin_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Response marker set by the error handler when the backend answered 401.
#[derive(Debug, Clone, Copy)]
pub struct SessionExpired;

/// The single place that reacts to a rejected token: any response carrying
/// [`SessionExpired`] clears the session and redirects to the login page.
pub async fn session_expiry_middleware(session: Session, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.extensions().get::<SessionExpired>().is_none() {
        return response;
    }

    tracing::info!("Backend rejected the admin token, signing out");
    if let Err(e) = clear_admin_session(&session).await {
        tracing::warn!(error = %e, "Failed to clear admin session");
    }
    Redirect::to(EXPIRED_REDIRECT).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next("/products?q=kurta"), Some("/products?q=kurta"));
        assert_eq!(safe_next("https://evil.example"), None);
        assert_eq!(safe_next("//evil.example"), None);
        assert_eq!(safe_next("/\\evil.example"), None);
        assert_eq!(safe_next(""), None);
    }

    #[test]
    fn test_login_redirect() {
        assert_eq!(login_redirect("/"), "/login");
        assert_eq!(
            login_redirect("/sales/report?from=2024-01-01"),
            "/login?next=%2Fsales%2Freport%3Ffrom%3D2024-01-01"
        );
        assert_eq!(login_redirect("//evil.example"), "/login");
    }
}
