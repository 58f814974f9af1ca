//! Product as returned by the backend.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::margin_percent;
use super::status::StockStatus;

/// A catalog product.
///
/// Owned by the backend; the front-ends only hold request-scoped copies and
/// derive profit, margin, and stock badges from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend document id (`_id` on the wire).
    #[serde(alias = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub barcode: String,
    /// Absolute or backend-relative image URL.
    #[serde(default, alias = "imageUrl")]
    pub image: Option<String>,
    pub purchase_rate: Decimal,
    pub selling_rate: Decimal,
    #[serde(default)]
    pub quantity: i64,
    /// GST percentage.
    #[serde(default)]
    pub gst: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Per-unit profit: selling rate minus purchase rate.
    #[must_use]
    pub fn profit(&self) -> Decimal {
        self.selling_rate.saturating_sub(self.purchase_rate)
    }

    /// Profit as a percentage of the purchase rate.
    #[must_use]
    pub fn margin_percent(&self) -> Option<Decimal> {
        margin_percent(self.purchase_rate, self.selling_rate)
    }

    /// Stock badge for list views.
    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        StockStatus::from_quantity(self.quantity)
    }

    /// Case-insensitive containment on name or barcode.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_term(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.barcode.to_lowercase().contains(needle)
    }

    /// Whether the product's category equals `category`, ignoring case.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(category))
    }
}

/// Validated product fields, ready for `POST /products/add` or
/// `PUT /products/update/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub name: String,
    pub barcode: String,
    pub purchase_rate: Decimal,
    pub selling_rate: Decimal,
    pub quantity: i64,
    pub gst: Decimal,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl ProductInput {
    /// Text parts of the multipart body, in backend field names.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("barcode", self.barcode.clone()),
            ("purchaseRate", self.purchase_rate.normalize().to_string()),
            ("sellingRate", self.selling_rate.normalize().to_string()),
            ("quantity", self.quantity.to_string()),
            ("gst", self.gst.normalize().to_string()),
        ];
        if let Some(category) = &self.category {
            fields.push(("category", category.clone()));
        }
        if let Some(description) = &self.description {
            fields.push(("description", description.clone()));
        }
        fields
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_deserialize_backend_shape() {
        let json = r#"{
            "_id": "65b2a1",
            "name": "Linen Kurta",
            "barcode": "8901234",
            "image": "/uploads/kurta.jpg",
            "purchaseRate": 100,
            "sellingRate": "150.50",
            "quantity": 20,
            "gst": 5,
            "createdAt": "2024-03-01T10:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "65b2a1");
        assert_eq!(product.selling_rate, dec!(150.50));
        assert_eq!(product.profit(), dec!(50.50));
        assert_eq!(product.category, None);
    }

    #[test]
    fn test_matches_term_name_or_barcode() {
        let product: Product = serde_json::from_str(
            r#"{"id":"1","name":"Cotton Saree","barcode":"AB-77","purchaseRate":1,"sellingRate":2}"#,
        )
        .unwrap();
        assert!(product.matches_term("saree"));
        assert!(product.matches_term("ab-7"));
        assert!(!product.matches_term("silk"));
    }

    #[test]
    fn test_form_fields_skip_absent_optionals() {
        let input = ProductInput {
            name: "Kurta".into(),
            barcode: String::new(),
            purchase_rate: dec!(100.00),
            selling_rate: dec!(150.50),
            quantity: 20,
            gst: dec!(5),
            category: Some("Men".into()),
            description: None,
        };
        let fields = input.form_fields();
        assert!(fields.contains(&("purchaseRate", "100".to_string())));
        assert!(fields.contains(&("sellingRate", "150.5".to_string())));
        assert!(fields.contains(&("category", "Men".to_string())));
        assert!(!fields.iter().any(|(k, _)| *k == "description"));
    }
}
