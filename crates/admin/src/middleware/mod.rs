//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (one span per request)
//! 3. Request ID (tag span, Sentry scope, and response)
//! 4. Session layer (tower-sessions, in-memory store)
//! 5. Session expiry (a backend 401 anywhere signs the admin out)
//! 6. Security headers (CSP, frame and sniffing protection)
//!
//! Route guarding is per handler via the [`RequireAdminToken`] extractor.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    RequireAdminToken, SessionExpired, clear_admin_session, login_redirect, safe_next,
    session_expiry_middleware, set_admin_session,
};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
