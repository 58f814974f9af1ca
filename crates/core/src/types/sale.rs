//! Sales: backend records, the sell request, and the pre-submit quote.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ProductId, SaleId};
use super::product::Product;

/// A recorded sale. Immutable from the front-end's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(alias = "_id")]
    pub id: SaleId,
    /// Either a bare id or the populated product document.
    #[serde(rename = "productId")]
    pub product: SaleProduct,
    pub quantity_sold: i64,
    #[serde(default)]
    pub custom_selling_price: Option<Decimal>,
    pub total_sale_value: Decimal,
    pub total_purchase_value: Decimal,
    pub profit: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Product reference on a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SaleProduct {
    /// The backend populated the reference.
    Populated(SaleProductInfo),
    /// Only the id is present.
    Id(ProductId),
}

/// Populated product fields carried on a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleProductInfo {
    #[serde(alias = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub purchase_rate: Option<Decimal>,
    #[serde(default)]
    pub selling_rate: Option<Decimal>,
}

impl SaleProduct {
    /// The referenced product id.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        match self {
            Self::Populated(info) => &info.id,
            Self::Id(id) => id,
        }
    }

    /// Populated fields, if the backend included them.
    #[must_use]
    pub const fn info(&self) -> Option<&SaleProductInfo> {
        match self {
            Self::Populated(info) => Some(info),
            Self::Id(_) => None,
        }
    }
}

/// Body of `POST /sales/sell`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub product_id: ProductId,
    pub quantity_sold: i64,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_selling_price: Option<Decimal>,
}

/// Expected figures for a sale, shown before it is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleQuote {
    /// Custom price when given, otherwise the product's selling rate.
    pub unit_price: Decimal,
    pub quantity: i64,
    pub sale_value: Decimal,
    pub purchase_value: Decimal,
    pub expected_profit: Decimal,
    pub remaining_stock: i64,
}

impl SaleQuote {
    /// Quote selling `quantity` units of `product`.
    ///
    /// Returns `None` when the figures do not fit in a [`Decimal`].
    #[must_use]
    pub fn new(product: &Product, quantity: i64, custom_price: Option<Decimal>) -> Option<Self> {
        let unit_price = custom_price.unwrap_or(product.selling_rate);
        let units = Decimal::from(quantity);
        let sale_value = unit_price.checked_mul(units)?;
        let purchase_value = product.purchase_rate.checked_mul(units)?;

        Some(Self {
            unit_price,
            quantity,
            sale_value,
            purchase_value,
            expected_profit: sale_value.checked_sub(purchase_value)?,
            remaining_stock: product.quantity.checked_sub(quantity)?,
        })
    }
}

/// Aggregates from `GET /sales/summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesSummary {
    /// Number of sale records.
    pub total_sales: i64,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub today_sales: Option<i64>,
    pub today_revenue: Option<Decimal>,
    pub today_profit: Option<Decimal>,
}

/// Inventory aggregates from `GET /dashboard/summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub total_products: i64,
    pub total_stock: i64,
    /// Inventory valued at purchase rates.
    pub stock_purchase_value: Decimal,
    /// Inventory valued at selling rates.
    pub stock_selling_value: Decimal,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,
}
