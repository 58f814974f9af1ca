//! Sales report with filters, totals, and CSV/XLSX export.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use bazaar_api::ApiClient;
use bazaar_core::ValidationError;
use bazaar_core::report::{
    ExportFormat, ReportCriteria, ReportFilter, ReportRow, ReportTable, ReportTotals, build_rows,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::export;
use crate::filters;
use crate::middleware::RequireAdminToken;
use crate::state::AppState;

use super::sales::SaleRow;
use super::{AdminUserView, Flash, banner, render};

/// Report page template.
#[derive(Template)]
#[template(path = "sales/report.html")]
pub struct ReportTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Flash,
    pub filter: ReportFilter,
    pub rows: Vec<SaleRow>,
    pub totals: ReportTotals,
    pub csv_url: String,
    pub xlsx_url: String,
}

/// Export query: the report filters plus the format.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExportQuery {
    pub format: ExportFormat,
    #[serde(flatten)]
    pub filter: ReportFilter,
}

/// Build the report router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales/report", get(report))
        .route("/sales/report/export", get(export_report))
}

fn export_url(filter: &ReportFilter, format: ExportFormat) -> String {
    let query = filter.query_string();
    if query.is_empty() {
        format!("/sales/report/export?format={}", format.extension())
    } else {
        format!("/sales/report/export?format={}&{query}", format.extension())
    }
}

/// Fetch sales and products together and keep the matching rows.
async fn filtered_rows(
    api: &ApiClient,
    criteria: &ReportCriteria,
) -> std::result::Result<Vec<ReportRow>, bazaar_api::ApiError> {
    let (sales, products) = tokio::try_join!(api.sales_history(), api.list_products())?;
    Ok(criteria.apply(build_rows(&sales, &products)))
}

/// GET /sales/report
///
/// Malformed dates are reported without fetching anything.
#[instrument(skip(auth, state))]
async fn report(
    auth: RequireAdminToken,
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> Result<Response> {
    let api = state.api_for(&auth.token);
    let mut flash = Flash::default();

    let rows = match filter.criteria() {
        Ok(criteria) => match filtered_rows(&api, &criteria).await {
            Ok(rows) => rows,
            Err(e) => {
                flash.error = Some(banner(e)?);
                Vec::new()
            }
        },
        Err(e) => {
            flash.error = Some(e.to_string());
            Vec::new()
        }
    };

    Ok(render(&ReportTemplate {
        admin_user: AdminUserView::from(&auth.admin),
        current_path: "/sales/report".to_string(),
        flash,
        csv_url: export_url(&filter, ExportFormat::Csv),
        xlsx_url: export_url(&filter, ExportFormat::Xlsx),
        filter,
        totals: ReportTotals::from_rows(&rows),
        rows: rows.iter().map(SaleRow::from).collect(),
    })
    .into_response())
}

/// GET /sales/report/export?format=csv|xlsx
#[instrument(skip(auth, state))]
async fn export_report(
    auth: RequireAdminToken,
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response> {
    let criteria = query
        .filter
        .criteria()
        .map_err(|e: ValidationError| AppError::BadRequest(e.to_string()))?;

    let api = state.api_for(&auth.token);
    let rows = filtered_rows(&api, &criteria).await?;
    let table = ReportTable::new(&rows);
    let bytes = export::write(&table, query.format)?;

    let filename = query.format.filename(chrono::Utc::now());
    tracing::info!(rows = rows.len(), %filename, "Sales report exported");

    Ok((
        [
            (CONTENT_TYPE, query.format.content_type().to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
            (CACHE_CONTROL, "no-store".to_string()),
        ],
        bytes,
    )
        .into_response())
}
