//! Bazaar API - REST client for the retail backend.
//!
//! The backend owns every product, sale, and setting. This crate is the only
//! place either front-end talks to it.
//!
//! # Architecture
//!
//! - One [`ApiClient`] per process, built from config (base URL, timeout)
//! - Admin calls use [`ApiClient::authed`] to attach the session's bearer token
//! - Every failure is normalised into [`ApiError`]; [`ApiError::into_body`]
//!   gives the uniform `{ success: false, status, message, data }` shape
//! - No retries, no caching, no request de-duplication
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_api::{AdminToken, ApiClient};
//!
//! let api = ApiClient::new(base_url, Duration::from_secs(15))?;
//! let products = api.list_products().await?;
//!
//! let login = api.login(&email, "secret").await?;
//! let admin = api.authed(&login.token);
//! admin.delete_product(&products[0].id, false).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod client;
mod error;

pub mod auth;
pub mod dashboard;
pub mod products;
pub mod sales;
pub mod settings;

pub use auth::{AdminUser, LoginResponse};
pub use client::{AdminToken, ApiClient, Upload};
pub use error::{ApiError, ErrorBody};
pub use products::DeleteOutcome;
