//! Dashboard route handler.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use bazaar_core::{DashboardSummary, LOW_STOCK_THRESHOLD, StockStatus};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminToken;
use crate::state::AppState;

use super::products::ProductRow;
use super::sales::SummaryView;
use super::{AdminUserView, Flash, FlashQuery, banner, render};

/// Products shown in the low-stock table.
const LOW_STOCK_ROWS: usize = 10;

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Flash,
    pub stock: DashboardSummary,
    pub sales: SummaryView,
    pub low_stock: Vec<ProductRow>,
    pub low_stock_threshold: i64,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

/// Dashboard page handler.
///
/// The three reads are independent and run together; any failure becomes a
/// single page-level banner.
#[instrument(skip(auth, state))]
async fn dashboard(
    auth: RequireAdminToken,
    State(state): State<AppState>,
    Query(query): Query<FlashQuery>,
) -> Result<Response> {
    let api = state.api_for(&auth.token);
    let mut flash = Flash::from(query);

    let fetched = tokio::try_join!(
        api.dashboard_summary(),
        api.sales_summary(),
        api.list_products()
    );

    let (stock, sales, low_stock) = match fetched {
        Ok((stock, sales, products)) => {
            let mut low: Vec<_> = products
                .iter()
                .filter(|p| p.stock_status() != StockStatus::InStock)
                .collect();
            low.sort_by_key(|p| p.quantity);
            let rows = low
                .into_iter()
                .take(LOW_STOCK_ROWS)
                .map(|p| ProductRow::new(p, &api))
                .collect();
            (stock, SummaryView::from(sales), rows)
        }
        Err(e) => {
            flash.error = Some(banner(e)?);
            (DashboardSummary::default(), SummaryView::default(), Vec::new())
        }
    };

    Ok(render(&DashboardTemplate {
        admin_user: AdminUserView::from(&auth.admin),
        current_path: "/".to_string(),
        flash,
        stock,
        sales,
        low_stock,
        low_stock_threshold: LOW_STOCK_THRESHOLD,
    })
    .into_response())
}
