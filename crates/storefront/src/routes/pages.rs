//! Business pages driven by the settings document.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::IntoResponse,
};
use bazaar_core::{Settings, Theme};
use tracing::instrument;

use super::{ShopView, SocialLink};
use crate::filters;
use crate::state::AppState;

/// Team member display data.
#[derive(Clone)]
pub struct TeamMemberView {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image_url: Option<String>,
}

/// Core value display data.
#[derive(Clone)]
pub struct ValueView {
    pub title: String,
    pub description: String,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub shop: ShopView,
    pub description: String,
    pub story: String,
    pub vision: String,
    pub mission: String,
    pub team: Vec<TeamMemberView>,
    pub values: Vec<ValueView>,
}

/// One labelled contact entry.
#[derive(Clone)]
pub struct ContactEntry {
    pub value: String,
    pub label: String,
    pub primary: bool,
}

/// One row of the opening-hours table.
#[derive(Clone)]
pub struct HoursRow {
    pub day: &'static str,
    pub hours: String,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub shop: ShopView,
    pub phones: Vec<ContactEntry>,
    pub emails: Vec<ContactEntry>,
    pub hours: Vec<HoursRow>,
    pub social: Vec<SocialLink>,
}

/// Display the about page.
#[instrument(skip(state))]
pub async fn about(State(state): State<AppState>) -> AboutTemplate {
    let settings = state.business_info().await;
    let shop = ShopView::new(&settings, state.api());
    let about = settings.about_content;

    AboutTemplate {
        shop,
        description: settings.description,
        story: about.story,
        vision: about.vision,
        mission: about.mission,
        team: about
            .team_members
            .into_iter()
            .map(|m| TeamMemberView {
                image_url: m
                    .image
                    .as_deref()
                    .filter(|i| !i.trim().is_empty())
                    .map(|i| state.api().asset_url(i)),
                name: m.name,
                role: m.role,
                bio: m.bio,
            })
            .collect(),
        values: about
            .core_values
            .into_iter()
            .map(|v| ValueView {
                title: v.title,
                description: v.description,
            })
            .collect(),
    }
}

/// Display the contact page.
#[instrument(skip(state))]
pub async fn contact(State(state): State<AppState>) -> ContactTemplate {
    let settings = state.business_info().await;
    contact_page(&settings, ShopView::new(&settings, state.api()))
}

fn contact_page(settings: &Settings, shop: ShopView) -> ContactTemplate {
    let phones = settings
        .phone_numbers
        .iter()
        .filter(|p| !p.number.trim().is_empty())
        .map(|p| ContactEntry {
            value: p.number.clone(),
            label: p.label.clone(),
            primary: p.is_primary,
        })
        .collect();
    let emails = settings
        .emails
        .iter()
        .filter(|e| !e.email.trim().is_empty())
        .map(|e| ContactEntry {
            value: e.email.clone(),
            label: e.label.clone(),
            primary: e.is_primary,
        })
        .collect();
    let hours = settings
        .business_hours
        .week()
        .into_iter()
        .map(|(day, h)| HoursRow {
            day: day.label(),
            hours: if h.closed {
                "Closed".to_string()
            } else {
                format!("{} - {}", h.open, h.close)
            },
        })
        .collect();
    let social = settings
        .social_media
        .links()
        .into_iter()
        .map(|(name, url)| SocialLink { name, url })
        .collect();

    ContactTemplate {
        shop,
        phones,
        emails,
        hours,
        social,
    }
}

/// Theme colors and font from settings as CSS custom properties.
///
/// Served as a stylesheet so the CSP can keep `style-src 'self'`.
#[instrument(skip(state))]
pub async fn theme_css(State(state): State<AppState>) -> impl IntoResponse {
    let settings = state.business_info().await;
    (
        [
            (CONTENT_TYPE, "text/css; charset=utf-8"),
            (CACHE_CONTROL, "no-cache"),
        ],
        theme_stylesheet(&settings.theme),
    )
}

fn theme_stylesheet(theme: &Theme) -> String {
    let mut vars = Vec::new();
    for (name, value) in [
        ("--color-primary", &theme.primary_color),
        ("--color-secondary", &theme.secondary_color),
        ("--color-accent", &theme.accent_color),
    ] {
        if is_hex_color(value.trim()) {
            vars.push(format!("  {name}: {};", value.trim()));
        }
    }
    let font = theme.font_family.trim();
    if !font.is_empty()
        && font
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | ',' | '-' | '\'' | '"'))
    {
        vars.push(format!("  --font-body: {font}, system-ui, sans-serif;"));
    }
    format!(":root {{\n{}\n}}\n", vars.join("\n"))
}

/// `#rgb` or `#rrggbb`. Anything else is dropped rather than written into CSS.
fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}
