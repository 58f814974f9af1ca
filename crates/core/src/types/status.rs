//! Status enums and the HTTP status message table.

use serde::{Deserialize, Serialize};

/// Quantity at or below which a product is flagged as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Stock level of a product, derived from its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Classify a quantity.
    #[must_use]
    pub const fn from_quantity(quantity: i64) -> Self {
        if quantity <= 0 {
            Self::OutOfStock
        } else if quantity <= LOW_STOCK_THRESHOLD {
            Self::LowStock
        } else {
            Self::InStock
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InStock => "In stock",
            Self::LowStock => "Low stock",
            Self::OutOfStock => "Out of stock",
        }
    }

    /// CSS classes for the badge.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::InStock => "badge badge-green",
            Self::LowStock => "badge badge-yellow",
            Self::OutOfStock => "badge badge-red",
        }
    }
}

/// User-facing text for an HTTP status when the backend supplies no message.
#[must_use]
pub const fn status_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request. Please check your input and try again.",
        401 => "Your session has expired. Please log in again.",
        403 => "You do not have permission to perform this action.",
        404 => "The requested resource was not found.",
        409 => "This conflicts with existing data.",
        422 => "Some of the submitted data is invalid.",
        429 => "Too many requests. Please wait a moment and try again.",
        500..=599 => "Server error. Please try again later.",
        _ => "Something went wrong. Please try again.",
    }
}

/// Message for a request that never reached the backend.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to reach the server. Please check your connection and try again.";

/// Message for a request that timed out.
pub const TIMEOUT_MESSAGE: &str = "The server took too long to respond. Please try again.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_thresholds() {
        assert_eq!(StockStatus::from_quantity(-1), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_quantity(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_quantity(5), StockStatus::LowStock);
        assert_eq!(StockStatus::from_quantity(6), StockStatus::InStock);
    }

    #[test]
    fn test_status_message_table() {
        assert!(status_message(401).contains("session"));
        assert_eq!(status_message(502), status_message(500));
        assert_eq!(status_message(418), "Something went wrong. Please try again.");
    }
}
