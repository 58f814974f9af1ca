//! Authentication route handlers for admin.
//!
//! Email and password are checked locally first; only a well-formed form is
//! sent to the backend, which returns the bearer token kept in the session.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use bazaar_core::validation::validate_login;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_admin_session, safe_next, set_admin_session};
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

use super::render;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub next: String,
    pub error: Option<String>,
    pub expired: bool,
}

/// Query parameters for the login page.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginQuery {
    pub next: String,
    pub expired: Option<String>,
}

/// Login form body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

/// Render the login page, or skip it when already signed in.
///
/// GET /login
#[instrument(skip(session))]
async fn login_page(session: Session, Query(query): Query<LoginQuery>) -> Response {
    let signed_in = session
        .get::<String>(session_keys::ADMIN_TOKEN)
        .await
        .ok()
        .flatten()
        .is_some();
    if signed_in {
        return Redirect::to(safe_next(&query.next).unwrap_or("/")).into_response();
    }

    render(&LoginTemplate {
        email: String::new(),
        next: query.next,
        error: None,
        expired: query.expired.is_some(),
    })
    .into_response()
}

/// Sign in and return to `next` when it is a local path.
///
/// POST /login
#[instrument(skip(state, session, form), fields(email = %form.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let rejected = |message: String, form: &LoginForm| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            render(&LoginTemplate {
                email: form.email.trim().to_string(),
                next: form.next.clone(),
                error: Some(message),
                expired: false,
            }),
        )
            .into_response()
    };

    let email = match validate_login(&form.email, &form.password) {
        Ok(email) => email,
        Err(e) => return Ok(rejected(e.to_string(), &form)),
    };

    let login = match state.api().login(&email, &form.password).await {
        Ok(login) => login,
        Err(e) => {
            // Wrong credentials come back as 401 here; that is a form error,
            // not an expired session.
            tracing::warn!(error = %e, "Login rejected");
            return Ok(rejected(e.message(), &form));
        }
    };

    let admin = CurrentAdmin::from_login(login.user.as_ref(), email.as_str());
    set_admin_session(&session, &login, &admin).await?;
    set_sentry_user(&admin.email);
    tracing::info!("Admin signed in");

    Ok(Redirect::to(safe_next(&form.next).unwrap_or("/")).into_response())
}

/// Logout and clear session.
///
/// POST /logout
async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = clear_admin_session(&session).await {
        tracing::warn!(error = %e, "Failed to clear admin session");
    }
    clear_sentry_user();
    Redirect::to("/login")
}
