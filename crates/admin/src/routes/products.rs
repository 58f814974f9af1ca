//! Product management: list, create, edit, delete.

use askama::Template;
use axum::{
    Form, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bazaar_api::{ApiClient, DeleteOutcome, Upload};
use bazaar_core::catalog::search;
use bazaar_core::validation::ProductDraft;
use bazaar_core::{Product, ProductId, margin_percent};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdminToken;
use crate::state::AppState;

use super::{
    AdminUserView, Flash, FlashQuery, MAX_UPLOAD_BYTES, banner, is_image, read_upload,
    redirect_with_success, render,
};

// =============================================================================
// Views
// =============================================================================

/// One product in a table.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub barcode: String,
    pub image_url: Option<String>,
    pub category: String,
    pub purchase_rate: Decimal,
    pub selling_rate: Decimal,
    pub profit: Decimal,
    pub margin: String,
    pub quantity: i64,
    pub gst: Decimal,
    pub status_label: &'static str,
    pub status_class: &'static str,
}

impl ProductRow {
    #[must_use]
    pub fn new(product: &Product, api: &ApiClient) -> Self {
        let status = product.stock_status();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            barcode: product.barcode.clone(),
            image_url: product.image.as_deref().map(|p| api.asset_url(p)),
            category: product.category.clone().unwrap_or_default(),
            purchase_rate: product.purchase_rate,
            selling_rate: product.selling_rate,
            profit: product.profit(),
            margin: filters::margin_label(product.margin_percent()),
            quantity: product.quantity,
            gst: product.gst,
            status_label: status.label(),
            status_class: status.badge_class(),
        }
    }
}

/// Profit preview for the form, when both rates parse and the profit fits.
#[derive(Debug, Clone)]
pub struct ProfitPreview {
    pub profit: Decimal,
    pub margin: String,
}

impl ProfitPreview {
    fn from_draft(draft: &ProductDraft) -> Option<Self> {
        let purchase: Decimal = draft.purchase_rate.trim().parse().ok()?;
        let selling: Decimal = draft.selling_rate.trim().parse().ok()?;
        Some(Self {
            profit: selling.checked_sub(purchase)?,
            margin: filters::margin_label(margin_percent(purchase, selling)),
        })
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Products list page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Flash,
    pub products: Vec<ProductRow>,
    pub total: usize,
    pub search_query: String,
}

/// Create/edit form template.
#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub title: String,
    pub action: String,
    pub draft: ProductDraft,
    pub current_image: String,
    pub image_url: Option<String>,
    pub preview: Option<ProfitPreview>,
    pub error: Option<String>,
}

/// Confirmation page shown when the product has recorded sales.
#[derive(Template)]
#[template(path = "products/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub id: String,
    pub name: String,
    pub sales_count: String,
    pub message: String,
    pub error: Option<String>,
}

// =============================================================================
// Router
// =============================================================================

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(index).post(create))
        .route("/products/new", get(new_form))
        .route("/products/{id}", post(update))
        .route("/products/{id}/edit", get(edit_form))
        .route("/products/{id}/delete", post(delete))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

// =============================================================================
// List
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductsQuery {
    pub q: String,
    #[serde(flatten)]
    pub flash: FlashQuery,
}

/// GET /products
#[instrument(skip(auth, state))]
async fn index(
    auth: RequireAdminToken,
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Response> {
    let api = state.api_for(&auth.token);
    let mut flash = Flash::from(query.flash);

    let (products, total) = match api.list_products().await {
        Ok(products) => {
            let rows: Vec<ProductRow> = search(&products, &query.q)
                .into_iter()
                .map(|p| ProductRow::new(p, &api))
                .collect();
            (rows, products.len())
        }
        Err(e) => {
            flash.error = Some(banner(e)?);
            (Vec::new(), 0)
        }
    };

    Ok(render(&ProductsIndexTemplate {
        admin_user: AdminUserView::from(&auth.admin),
        current_path: "/products".to_string(),
        flash,
        products,
        total,
        search_query: query.q,
    })
    .into_response())
}

// =============================================================================
// Create / edit
// =============================================================================

/// Form body plus the optional image, read from multipart.
struct ProductSubmission {
    draft: ProductDraft,
    current_image: String,
    image: Option<Upload>,
}

async fn read_submission(mut multipart: Multipart) -> Result<ProductSubmission> {
    let mut submission = ProductSubmission {
        draft: ProductDraft::default(),
        current_image: String::new(),
        image: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            submission.image = read_upload(field).await?;
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let draft = &mut submission.draft;
        match name.as_str() {
            "name" => draft.name = value,
            "barcode" => draft.barcode = value,
            "purchase_rate" => draft.purchase_rate = value,
            "selling_rate" => draft.selling_rate = value,
            "quantity" => draft.quantity = value,
            "gst" => draft.gst = value,
            "category" => draft.category = value,
            "description" => draft.description = value,
            "current_image" => submission.current_image = value,
            _ => {}
        }
    }
    Ok(submission)
}

fn form_page(
    auth: &RequireAdminToken,
    api: &ApiClient,
    product_id: Option<&str>,
    draft: ProductDraft,
    current_image: String,
    error: Option<String>,
) -> ProductFormTemplate {
    let (title, action) = product_id.map_or_else(
        || ("Add Product".to_string(), "/products".to_string()),
        |id| {
            (
                "Edit Product".to_string(),
                format!("/products/{}", urlencoding::encode(id)),
            )
        },
    );
    let image_url = Some(current_image.as_str())
        .filter(|p| !p.trim().is_empty())
        .map(|p| api.asset_url(p));

    ProductFormTemplate {
        admin_user: AdminUserView::from(&auth.admin),
        current_path: "/products".to_string(),
        title,
        action,
        preview: ProfitPreview::from_draft(&draft),
        draft,
        current_image,
        image_url,
        error,
    }
}

/// Validate a submission; on failure the form comes back with no backend call.
fn check_submission(
    submission: &ProductSubmission,
) -> std::result::Result<bazaar_core::ProductInput, String> {
    let input = submission.draft.validate().map_err(|e| e.to_string())?;
    if let Some(image) = &submission.image
        && !is_image(image)
    {
        return Err("Image must be an image file (JPEG, PNG, GIF or WebP)".to_string());
    }
    Ok(input)
}

/// GET /products/new
#[instrument(skip(auth, state))]
async fn new_form(auth: RequireAdminToken, State(state): State<AppState>) -> Response {
    let api = state.api_for(&auth.token);
    render(&form_page(
        &auth,
        &api,
        None,
        ProductDraft {
            gst: "0".to_string(),
            ..ProductDraft::default()
        },
        String::new(),
        None,
    ))
    .into_response()
}

/// POST /products
#[instrument(skip(auth, state, multipart))]
async fn create(
    auth: RequireAdminToken,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let api = state.api_for(&auth.token);
    let submission = read_submission(multipart).await?;

    let input = match check_submission(&submission) {
        Ok(input) => input,
        Err(message) => {
            let page = form_page(&auth, &api, None, submission.draft, String::new(), Some(message));
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&page)).into_response());
        }
    };

    match api.create_product(&input, submission.image).await {
        Ok(()) => {
            tracing::info!(name = %input.name, "Product created");
            Ok(redirect_with_success("/products", "created"))
        }
        Err(e) => {
            let message = banner(e)?;
            let page = form_page(&auth, &api, None, submission.draft, String::new(), Some(message));
            Ok(render(&page).into_response())
        }
    }
}

/// GET /products/{id}/edit
#[instrument(skip(auth, state))]
async fn edit_form(
    auth: RequireAdminToken,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let api = state.api_for(&auth.token);
    let product = match api.get_product(&ProductId::new(id.clone())).await {
        Ok(product) => product,
        Err(e) if e.status() == Some(404) => {
            return Err(AppError::NotFound(format!("product {id}")));
        }
        Err(e) => return Err(e.into()),
    };

    let page = form_page(
        &auth,
        &api,
        Some(&id),
        ProductDraft::from(&product),
        product.image.clone().unwrap_or_default(),
        None,
    );
    Ok(render(&page).into_response())
}

/// POST /products/{id}
#[instrument(skip(auth, state, multipart))]
async fn update(
    auth: RequireAdminToken,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let api = state.api_for(&auth.token);
    let submission = read_submission(multipart).await?;

    let input = match check_submission(&submission) {
        Ok(input) => input,
        Err(message) => {
            let page = form_page(
                &auth,
                &api,
                Some(&id),
                submission.draft,
                submission.current_image,
                Some(message),
            );
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&page)).into_response());
        }
    };

    match api
        .update_product(&ProductId::new(id.clone()), &input, submission.image)
        .await
    {
        Ok(()) => {
            tracing::info!(product_id = %id, "Product updated");
            Ok(redirect_with_success("/products", "updated"))
        }
        Err(e) => {
            let message = banner(e)?;
            let page = form_page(
                &auth,
                &api,
                Some(&id),
                submission.draft,
                submission.current_image,
                Some(message),
            );
            Ok(render(&page).into_response())
        }
    }
}

// =============================================================================
// Delete
// =============================================================================

/// Delete form body. The first submit carries only `name`; the confirmation
/// page resubmits with `force=true` and the acknowledgement checkbox.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub name: String,
    pub force: Option<String>,
    pub acknowledge: Option<String>,
    pub sales_count: String,
    pub message: String,
}

impl DeleteForm {
    fn is_force(&self) -> bool {
        self.force.as_deref() == Some("true")
    }

    fn is_acknowledged(&self) -> bool {
        self.acknowledge.as_deref().is_some_and(|v| v != "false")
    }
}

/// POST /products/{id}/delete
#[instrument(skip(auth, state, form))]
async fn delete(
    auth: RequireAdminToken,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Result<Response> {
    let confirm_page = |sales_count: String, message: String, error: Option<String>| {
        ConfirmDeleteTemplate {
            admin_user: AdminUserView::from(&auth.admin),
            current_path: "/products".to_string(),
            id: id.clone(),
            name: form.name.clone(),
            sales_count,
            message,
            error,
        }
    };

    let force = form.is_force();
    if force && !form.is_acknowledged() {
        let page = confirm_page(
            form.sales_count.clone(),
            form.message.clone(),
            Some("Tick the box to confirm you understand the sales history will be removed.".to_string()),
        );
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&page)).into_response());
    }

    let api = state.api_for(&auth.token);
    match api.delete_product(&ProductId::new(id.clone()), force).await {
        Ok(DeleteOutcome::Deleted) => {
            tracing::info!(product_id = %id, force, "Product deleted");
            Ok(redirect_with_success("/products", "deleted"))
        }
        Ok(DeleteOutcome::RequiresConfirmation {
            sales_count,
            message,
        }) => {
            let count = sales_count.map(|n| n.to_string()).unwrap_or_default();
            Ok(render(&confirm_page(count, message, None)).into_response())
        }
        Err(e) => {
            let message = banner(e)?;
            Ok(render(&confirm_page(
                form.sales_count.clone(),
                form.message.clone(),
                Some(message),
            ))
            .into_response())
        }
    }
}
