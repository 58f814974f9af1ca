//! Selling products and the sales history.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use bazaar_api::ApiClient;
use bazaar_core::report::{ReportRow, ReportTotals, build_rows};
use bazaar_core::validation::SaleDraft;
use bazaar_core::{Product, SaleQuote, SalesSummary};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminToken;
use crate::state::AppState;

use super::{AdminUserView, Flash, FlashQuery, banner, redirect_with_success, render};

// =============================================================================
// Views
// =============================================================================

/// An entry in the product picker.
#[derive(Debug, Clone)]
pub struct ProductOption {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

/// The product being sold.
#[derive(Debug, Clone)]
pub struct SelectedProduct {
    pub name: String,
    pub barcode: String,
    pub stock: i64,
    pub purchase_rate: Decimal,
    pub selling_rate: Decimal,
    pub image_url: Option<String>,
}

impl SelectedProduct {
    fn new(product: &Product, api: &ApiClient) -> Self {
        Self {
            name: product.name.clone(),
            barcode: product.barcode.clone(),
            stock: product.quantity,
            purchase_rate: product.purchase_rate,
            selling_rate: product.selling_rate,
            image_url: product.image.as_deref().map(|p| api.asset_url(p)),
        }
    }
}

/// Summary cards on the history page.
#[derive(Debug, Clone, Default)]
pub struct SummaryView {
    pub total_sales: i64,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub today: Option<TodayView>,
}

/// Today's figures, when the backend reports them.
#[derive(Debug, Clone)]
pub struct TodayView {
    pub sales: i64,
    pub revenue: Decimal,
    pub profit: Decimal,
}

impl From<SalesSummary> for SummaryView {
    fn from(summary: SalesSummary) -> Self {
        let today = summary.today_sales.map(|sales| TodayView {
            sales,
            revenue: summary.today_revenue.unwrap_or_default(),
            profit: summary.today_profit.unwrap_or_default(),
        });
        Self {
            total_sales: summary.total_sales,
            total_quantity: summary.total_quantity,
            total_revenue: summary.total_revenue,
            total_profit: summary.total_profit,
            today,
        }
    }
}

/// A sale in the history table.
#[derive(Debug, Clone)]
pub struct SaleRow {
    pub date: String,
    pub product_name: String,
    pub barcode: String,
    pub quantity: i64,
    pub unit_price: String,
    pub sale_value: Decimal,
    pub profit: Decimal,
}

impl From<&ReportRow> for SaleRow {
    fn from(row: &ReportRow) -> Self {
        Self {
            date: row.sold_at.format("%d %b %Y, %H:%M").to_string(),
            product_name: row.product_name.clone(),
            barcode: row.barcode.clone(),
            quantity: row.quantity,
            unit_price: row
                .unit_price
                .map(|p| p.round_dp(2).to_string())
                .unwrap_or_default(),
            sale_value: row.sale_value,
            profit: row.profit,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Sell form template.
#[derive(Template)]
#[template(path = "sales/new.html")]
pub struct SellTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Flash,
    pub options: Vec<ProductOption>,
    pub draft: SaleDraft,
    pub selected: Option<SelectedProduct>,
    pub quote: Option<SaleQuote>,
}

/// Sales history template.
#[derive(Template)]
#[template(path = "sales/index.html")]
pub struct SalesIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Flash,
    pub summary: SummaryView,
    pub sales: Vec<SaleRow>,
    pub totals: ReportTotals,
}

// =============================================================================
// Router
// =============================================================================

/// Build the sales router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales", get(index).post(sell))
        .route("/sales/new", get(new_form))
}

// =============================================================================
// Sell
// =============================================================================

fn sell_page(
    auth: &RequireAdminToken,
    api: &ApiClient,
    products: &[Product],
    draft: SaleDraft,
    flash: Flash,
) -> SellTemplate {
    let options = products
        .iter()
        .filter(|p| p.quantity > 0 || p.id.as_str() == draft.product_id)
        .map(|p| ProductOption {
            id: p.id.to_string(),
            label: format!("{} ({} in stock)", p.name, p.quantity),
            selected: p.id.as_str() == draft.product_id,
        })
        .collect();

    let product = products.iter().find(|p| p.id.as_str() == draft.product_id);
    let quote = product.and_then(|p| {
        SaleQuote::new(
            p,
            draft.quantity_hint().filter(|q| *q > 0).unwrap_or(1),
            draft.custom_price_hint(),
        )
    });

    SellTemplate {
        admin_user: AdminUserView::from(&auth.admin),
        current_path: "/sales/new".to_string(),
        flash,
        options,
        selected: product.map(|p| SelectedProduct::new(p, api)),
        quote,
        draft,
    }
}

/// GET /sales/new
///
/// Submitting the form with GET (the "Preview" button) refreshes the quote.
#[instrument(skip(auth, state))]
async fn new_form(
    auth: RequireAdminToken,
    State(state): State<AppState>,
    Query(draft): Query<SaleDraft>,
) -> Result<Response> {
    let api = state.api_for(&auth.token);
    let (products, flash) = match api.list_products().await {
        Ok(products) => (products, Flash::default()),
        Err(e) => (Vec::new(), Flash::error(banner(e)?)),
    };
    Ok(render(&sell_page(&auth, &api, &products, draft, flash)).into_response())
}

/// POST /sales
///
/// The product is re-read so the stock check uses the current quantity. An
/// invalid quantity or price re-renders the form and nothing is sold.
#[instrument(skip(auth, state, draft))]
async fn sell(
    auth: RequireAdminToken,
    State(state): State<AppState>,
    Form(draft): Form<SaleDraft>,
) -> Result<Response> {
    let api = state.api_for(&auth.token);
    let products = match api.list_products().await {
        Ok(products) => products,
        Err(e) => {
            let flash = Flash::error(banner(e)?);
            return Ok(render(&sell_page(&auth, &api, &[], draft, flash)).into_response());
        }
    };

    let Some(product) = products.iter().find(|p| p.id.as_str() == draft.product_id) else {
        let flash = Flash::error("Select a product to sell.");
        let page = sell_page(&auth, &api, &products, draft, flash);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&page)).into_response());
    };

    let request = match draft.validate(product) {
        Ok(request) => request,
        Err(e) => {
            let page = sell_page(&auth, &api, &products, draft, Flash::error(e.to_string()));
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&page)).into_response());
        }
    };

    match api.sell(&request).await {
        Ok(()) => {
            tracing::info!(
                product_id = %request.product_id,
                quantity = request.quantity_sold,
                "Sale recorded"
            );
            Ok(redirect_with_success("/sales", "sold"))
        }
        Err(e) => {
            let flash = Flash::error(banner(e)?);
            Ok(render(&sell_page(&auth, &api, &products, draft, flash)).into_response())
        }
    }
}

// =============================================================================
// History
// =============================================================================

/// GET /sales
#[instrument(skip(auth, state))]
async fn index(
    auth: RequireAdminToken,
    State(state): State<AppState>,
    Query(query): Query<FlashQuery>,
) -> Result<Response> {
    let api = state.api_for(&auth.token);
    let mut flash = Flash::from(query);

    let fetched = tokio::try_join!(
        api.sales_history(),
        api.sales_summary(),
        api.list_products()
    );
    let (summary, rows) = match fetched {
        Ok((sales, summary, products)) => (summary.into(), build_rows(&sales, &products)),
        Err(e) => {
            flash.error = Some(banner(e)?);
            (SummaryView::default(), Vec::new())
        }
    };

    Ok(render(&SalesIndexTemplate {
        admin_user: AdminUserView::from(&auth.admin),
        current_path: "/sales".to_string(),
        flash,
        summary,
        totals: ReportTotals::from_rows(&rows),
        sales: rows.iter().map(SaleRow::from).collect(),
    })
    .into_response())
}
