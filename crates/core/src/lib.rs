//! Bazaar Core - Shared types and pure logic.
//!
//! This crate provides the domain types used across all Bazaar components:
//! - `api` - REST client for the retail backend
//! - `storefront` - Public-facing catalog site
//! - `admin` - Back-office panel for products, sales, and settings
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The backend owns every entity; the types here are transient copies
//! used to validate forms, derive views, and build reports.
//!
//! # Modules
//!
//! - [`types`] - IDs, money, emails, products, sales, settings, statuses
//! - [`validation`] - Client-side checks run before any submission
//! - [`catalog`] - Search, filter, sort, and "load more" slicing
//! - [`enrich`] - Opt-in demo attributes (size, color, fabric)
//! - [`report`] - Sales report rows, filters, and the totals row

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod enrich;
pub mod report;
pub mod types;
pub mod validation;

pub use types::*;
pub use validation::ValidationError;
