//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /products               - Catalog (search, filters, sort, load more)
//! GET  /products/:id           - Product detail
//! GET  /about                  - About page (story, team, values)
//! GET  /contact                - Contact details and opening hours
//! GET  /theme.css              - Theme colors from settings as CSS variables
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (backend reachable)
//! ```

pub mod health;
pub mod home;
pub mod pages;
pub mod products;

use axum::{Router, routing::get};
use bazaar_api::ApiClient;
use bazaar_core::Settings;

use crate::state::AppState;

// =============================================================================
// Shared layout data
// =============================================================================

/// A social network link for the footer.
#[derive(Clone)]
pub struct SocialLink {
    pub name: &'static str,
    pub url: String,
}

/// Business info shown in the navbar and footer of every page.
#[derive(Clone)]
pub struct ShopView {
    pub name: String,
    pub tagline: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub social_links: Vec<SocialLink>,
    pub footer_about: String,
    pub copyright: String,
    pub meta_title: String,
    pub meta_description: String,
}

impl ShopView {
    /// Build the layout view. Image paths are resolved against the backend.
    #[must_use]
    pub fn new(settings: &Settings, api: &ApiClient) -> Self {
        let asset = |path: Option<&str>| {
            path.map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| api.asset_url(p))
        };

        let social_links = if settings.footer.show_social_links {
            settings
                .social_media
                .links()
                .into_iter()
                .map(|(name, url)| SocialLink { name, url })
                .collect()
        } else {
            Vec::new()
        };

        let meta_title = if settings.seo.meta_title.trim().is_empty() {
            settings.business_name.clone()
        } else {
            settings.seo.meta_title.clone()
        };

        Self {
            name: settings.business_name.clone(),
            tagline: settings.tagline.clone(),
            logo_url: asset(settings.logo.as_deref()),
            favicon_url: asset(settings.favicon.as_deref()),
            phone: settings.primary_phone().map(|p| p.number.clone()),
            email: settings.primary_email().map(|e| e.email.clone()),
            address: settings.address.one_line(),
            social_links,
            footer_about: settings.footer.about_text.clone(),
            copyright: settings.footer.copyright_text.clone(),
            meta_title,
            meta_description: settings.seo.meta_description.clone(),
        }
    }
}

// =============================================================================
// Router
// =============================================================================

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        .route("/theme.css", get(pages::theme_css))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
