//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use bazaar_api::ApiClient;
use bazaar_core::catalog::{self, CatalogItem, CatalogQuery, SortOrder};
use bazaar_core::enrich::{COLORS, SIZES, demo_attributes};
use bazaar_core::{Product, ProductId};
use tracing::instrument;

use super::ShopView;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub stock_label: &'static str,
    pub stock_class: &'static str,
    pub in_stock: bool,
    pub gst: String,
    pub attributes: Option<AttributesView>,
}

/// Demo size/color/fabric values, when enrichment is on.
#[derive(Clone)]
pub struct AttributesView {
    pub sizes: String,
    pub colors: String,
    pub fabric: &'static str,
}

impl ProductView {
    pub fn new(item: &CatalogItem, api: &ApiClient) -> Self {
        let product = &item.product;
        let status = product.stock_status();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.selling_rate.to_string(),
            image_url: product
                .image
                .as_deref()
                .filter(|i| !i.trim().is_empty())
                .map(|i| api.asset_url(i)),
            category: product.category.clone(),
            description: product.description.clone(),
            stock_label: status.label(),
            stock_class: status.badge_class(),
            in_stock: product.quantity > 0,
            gst: product.gst.normalize().to_string(),
            attributes: item.attributes.as_ref().map(|a| AttributesView {
                sizes: a.sizes.join(", "),
                colors: a.colors.join(", "),
                fabric: a.fabric,
            }),
        }
    }

    fn from_product(product: Product, enrich: bool, api: &ApiClient) -> Self {
        let item = CatalogItem {
            attributes: enrich.then(|| demo_attributes(&product.id)),
            product,
        };
        Self::new(&item, api)
    }
}

/// A `<select>` option.
#[derive(Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

fn options<'a>(values: impl IntoIterator<Item = &'a str>, current: &str) -> Vec<OptionView> {
    values
        .into_iter()
        .map(|v| OptionView {
            value: v.to_string(),
            label: v.to_string(),
            selected: v.eq_ignore_ascii_case(current.trim()),
        })
        .collect()
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub shop: ShopView,
    pub query: CatalogQuery,
    pub products: Vec<ProductView>,
    pub total_matches: usize,
    pub is_filtered: bool,
    pub categories: Vec<OptionView>,
    pub sizes: Vec<OptionView>,
    pub colors: Vec<OptionView>,
    pub sort_options: Vec<OptionView>,
    /// Query string for the "load more" link.
    pub load_more: Option<String>,
    pub error: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub shop: ShopView,
    pub product: ProductView,
}

/// Display the product listing page.
///
/// A failed product fetch renders the page with an error panel instead of
/// the grid.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> ProductsIndexTemplate {
    let (settings, products) = tokio::join!(state.business_info(), state.api().list_products());
    let shop = ShopView::new(&settings, state.api());
    let enrich = state.config().demo_attributes;

    let sort_options = SortOrder::ALL
        .into_iter()
        .map(|order| OptionView {
            value: order.as_str().to_string(),
            label: order.label().to_string(),
            selected: order == query.sort_order(),
        })
        .collect();
    let (sizes, colors) = if enrich {
        (options(SIZES, &query.size), options(COLORS, &query.color))
    } else {
        (Vec::new(), Vec::new())
    };

    let products = match products {
        Ok(products) => products,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch products");
            return ProductsIndexTemplate {
                shop,
                is_filtered: query.is_filtered(),
                query,
                products: Vec::new(),
                total_matches: 0,
                categories: Vec::new(),
                sizes,
                colors,
                sort_options,
                load_more: None,
                error: Some(e.message()),
            };
        }
    };

    let categories = catalog::categories(&products);
    let categories = options(categories.iter().map(String::as_str), &query.category);
    let page = catalog::apply(CatalogItem::from_products(products, enrich), &query);

    ProductsIndexTemplate {
        shop,
        products: page
            .items
            .iter()
            .map(|item| ProductView::new(item, state.api()))
            .collect(),
        total_matches: page.total_matches,
        is_filtered: query.is_filtered(),
        categories,
        sizes,
        colors,
        sort_options,
        load_more: page
            .has_more
            .then(|| query.with_visible(page.next_visible)),
        query,
        error: None,
    }
}

/// Display the product detail page.
///
/// # Errors
///
/// Returns 404 when the backend has no such product, or a backend error.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let id = ProductId::new(id);
    let (settings, product) =
        tokio::join!(state.business_info(), state.api().get_product(&id));

    let product = product.map_err(|e| match e.status() {
        Some(404) => AppError::NotFound(format!("product {id}")),
        _ => AppError::Api(e),
    })?;

    Ok(ProductShowTemplate {
        shop: ShopView::new(&settings, state.api()),
        product: ProductView::from_product(product, state.config().demo_attributes, state.api()),
    })
}
