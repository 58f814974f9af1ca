//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (one span per request)
//! 3. Request ID (tag span, Sentry scope, and response)
//! 4. Security headers (CSP, frame and sniffing protection)

pub mod request_id;
pub mod security_headers;

pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
