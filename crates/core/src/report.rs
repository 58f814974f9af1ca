//! Sales report: rows joined from sales and products, filters, and the
//! export table with its trailing `TOTAL` row.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId, Sale};
use crate::validation::ValidationError;

/// Column headers, in export order.
pub const HEADERS: [&str; 9] = [
    "Date",
    "Product",
    "Barcode",
    "Quantity",
    "Purchase Rate",
    "Selling Price",
    "Sale Value",
    "Purchase Value",
    "Profit",
];

/// Label in the first column of the totals row.
pub const TOTAL_LABEL: &str = "TOTAL";

const UNKNOWN_PRODUCT: &str = "Unknown product";

/// One sale, flattened for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub sold_at: DateTime<Utc>,
    pub product_id: ProductId,
    pub product_name: String,
    pub barcode: String,
    pub quantity: i64,
    pub purchase_rate: Option<Decimal>,
    /// Price per unit actually charged.
    pub unit_price: Option<Decimal>,
    pub sale_value: Decimal,
    pub purchase_value: Decimal,
    pub profit: Decimal,
}

impl ReportRow {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.sold_at.date_naive()
    }
}

/// Join sales with products into report rows, newest first.
///
/// Product fields come from the populated sale when present, then from the
/// product list. Rates missing from both are derived from the sale totals.
#[must_use]
pub fn build_rows(sales: &[Sale], products: &[Product]) -> Vec<ReportRow> {
    let by_id: HashMap<&ProductId, &Product> = products.iter().map(|p| (&p.id, p)).collect();

    let mut rows: Vec<ReportRow> = sales
        .iter()
        .map(|sale| {
            let id = sale.product.id();
            let info = sale.product.info();
            let product = by_id.get(id).copied();

            let product_name = info
                .map(|i| i.name.clone())
                .or_else(|| product.map(|p| p.name.clone()))
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());
            let barcode = info
                .map(|i| i.barcode.clone())
                .filter(|b| !b.is_empty())
                .or_else(|| product.map(|p| p.barcode.clone()))
                .unwrap_or_default();

            let per_unit = |total: Decimal| {
                (sale.quantity_sold > 0).then(|| total / Decimal::from(sale.quantity_sold))
            };
            let purchase_rate = info
                .and_then(|i| i.purchase_rate)
                .or_else(|| product.map(|p| p.purchase_rate))
                .or_else(|| per_unit(sale.total_purchase_value));
            let unit_price = sale
                .custom_selling_price
                .or_else(|| per_unit(sale.total_sale_value));

            ReportRow {
                sold_at: sale.created_at,
                product_id: id.clone(),
                product_name,
                barcode,
                quantity: sale.quantity_sold,
                purchase_rate,
                unit_price,
                sale_value: sale.total_sale_value,
                purchase_value: sale.total_purchase_value,
                profit: sale.profit,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.sold_at.cmp(&a.sold_at));
    rows
}

/// Report filters as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportFilter {
    /// Product name or barcode.
    pub q: String,
    /// First day included, `YYYY-MM-DD`.
    pub from: String,
    /// Last day included, `YYYY-MM-DD`.
    pub to: String,
}

/// Parsed, checked filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportCriteria {
    needle: String,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl ReportFilter {
    /// Parse the dates.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed date or a `from` after `to`.
    pub fn criteria(&self) -> Result<ReportCriteria, ValidationError> {
        let from = parse_date(&self.from, "From date")?;
        let to = parse_date(&self.to, "To date")?;
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(ValidationError::DateRangeInverted);
        }
        Ok(ReportCriteria {
            needle: self.q.trim().to_lowercase(),
            from,
            to,
        })
    }

    /// Query string carrying the same filters.
    #[must_use]
    pub fn query_string(&self) -> String {
        [("q", &self.q), ("from", &self.from), ("to", &self.to)]
            .into_iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v.trim())))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl ReportCriteria {
    /// Whether `row` passes every filter. Both date bounds are inclusive.
    #[must_use]
    pub fn matches(&self, row: &ReportRow) -> bool {
        let date = row.date();
        (self.needle.is_empty()
            || row.product_name.to_lowercase().contains(&self.needle)
            || row.barcode.to_lowercase().contains(&self.needle))
            && self.from.is_none_or(|from| date >= from)
            && self.to.is_none_or(|to| date <= to)
    }

    #[must_use]
    pub fn apply(&self, rows: Vec<ReportRow>) -> Vec<ReportRow> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}

fn parse_date(value: &str, field: &'static str) -> Result<Option<NaiveDate>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate { field })
}

/// Sums over a set of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    pub count: usize,
    pub quantity: i64,
    pub sale_value: Decimal,
    pub purchase_value: Decimal,
    pub profit: Decimal,
    /// Set only when every row belongs to the same product.
    pub purchase_rate: Option<Decimal>,
}

impl ReportTotals {
    #[must_use]
    pub fn from_rows(rows: &[ReportRow]) -> Self {
        let mut totals = rows.iter().fold(Self::default(), |mut acc, row| {
            acc.count += 1;
            acc.quantity += row.quantity;
            acc.sale_value += row.sale_value;
            acc.purchase_value += row.purchase_value;
            acc.profit += row.profit;
            acc
        });

        if let Some((first, rest)) = rows.split_first()
            && rest.iter().all(|row| row.product_id == first.product_id)
        {
            totals.purchase_rate = first.purchase_rate;
        }
        totals
    }
}

// =============================================================================
// Export
// =============================================================================

/// A single exported cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Money(Decimal),
    Empty,
}

impl Cell {
    fn money(value: Option<Decimal>) -> Self {
        value.map_or(Self::Empty, |v| Self::Money(v.round_dp(2)))
    }

    /// Plain-text rendering used for CSV.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Money(d) => format!("{d:.2}"),
            Self::Empty => String::new(),
        }
    }
}

/// Export file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// `sales-report-YYYY-MM-DD.<ext>`, dated in UTC like [`ReportRow::date`].
    #[must_use]
    pub fn filename(self, at: DateTime<Utc>) -> String {
        format!(
            "sales-report-{}.{}",
            at.date_naive().format("%Y-%m-%d"),
            self.extension()
        )
    }
}

/// Rows ready for export: one per sale plus exactly one totals row last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub headers: [&'static str; 9],
    pub rows: Vec<Vec<Cell>>,
}

impl ReportTable {
    #[must_use]
    pub fn new(rows: &[ReportRow]) -> Self {
        let totals = ReportTotals::from_rows(rows);
        let mut cells: Vec<Vec<Cell>> = rows
            .iter()
            .map(|row| {
                vec![
                    Cell::Text(row.date().format("%Y-%m-%d").to_string()),
                    Cell::Text(row.product_name.clone()),
                    Cell::Text(row.barcode.clone()),
                    Cell::Integer(row.quantity),
                    Cell::money(row.purchase_rate),
                    Cell::money(row.unit_price),
                    Cell::money(Some(row.sale_value)),
                    Cell::money(Some(row.purchase_value)),
                    Cell::money(Some(row.profit)),
                ]
            })
            .collect();

        cells.push(vec![
            Cell::Text(TOTAL_LABEL.to_string()),
            Cell::Empty,
            Cell::Empty,
            Cell::Integer(totals.quantity),
            Cell::money(totals.purchase_rate),
            Cell::Empty,
            Cell::money(Some(totals.sale_value)),
            Cell::money(Some(totals.purchase_value)),
            Cell::money(Some(totals.profit)),
        ]);

        Self {
            headers: HEADERS,
            rows: cells,
        }
    }
}
