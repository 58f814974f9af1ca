//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers and backend DTOs for the retail
//! domain.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod sale;
pub mod settings;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, margin_percent};
pub use product::{Product, ProductInput};
pub use sale::{
    DashboardSummary, Sale, SaleProduct, SaleProductInfo, SaleQuote, SaleRequest, SalesSummary,
};
pub use settings::*;
pub use status::*;
