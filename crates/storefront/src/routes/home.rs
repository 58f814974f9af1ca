//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use bazaar_core::catalog::{self, CatalogItem, SortOrder};
use tracing::instrument;

use super::ShopView;
use super::products::ProductView;
use crate::filters;
use crate::state::AppState;

/// Number of products in each home page strip.
const FEATURED_COUNT: usize = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub shop: ShopView,
    pub description: String,
    /// First products in backend order.
    pub featured: Vec<ProductView>,
    /// Most recently added products.
    pub new_arrivals: Vec<ProductView>,
    pub categories: Vec<String>,
    pub error: Option<String>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> HomeTemplate {
    let (settings, products) = tokio::join!(state.business_info(), state.api().list_products());
    let shop = ShopView::new(&settings, state.api());

    let (products, error) = match products {
        Ok(products) => (products, None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch products");
            (Vec::new(), Some(e.message()))
        }
    };

    let categories = catalog::categories(&products);
    let items = CatalogItem::from_products(products, state.config().demo_attributes);

    let view = |items: &[CatalogItem]| {
        items
            .iter()
            .take(FEATURED_COUNT)
            .map(|item| ProductView::new(item, state.api()))
            .collect::<Vec<_>>()
    };
    let featured = view(&items);
    let mut newest = items;
    catalog::sort(&mut newest, SortOrder::Newest);
    let new_arrivals = view(&newest);

    HomeTemplate {
        shop,
        description: settings.description,
        featured,
        new_arrivals,
        categories,
        error,
    }
}
