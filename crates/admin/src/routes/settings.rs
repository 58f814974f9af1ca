//! Business settings tabs and brand uploads.
//!
//! Each tab is its own form and saves only its own section, so a failed save
//! on one tab never touches another.

use askama::Template;
use axum::{
    Form, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bazaar_api::ApiClient;
use bazaar_core::{AssetKind, Settings, SettingsSection};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::{FormFields, apply_section};
use crate::middleware::RequireAdminToken;
use crate::state::AppState;

use super::{
    AdminUserView, Flash, FlashQuery, MAX_UPLOAD_BYTES, banner, is_image, read_upload,
    redirect_with_error, redirect_with_success, render,
};

// =============================================================================
// Views
// =============================================================================

/// A tab in the settings navigation.
#[derive(Debug, Clone)]
pub struct TabView {
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// A phone or email row. `index` is the radio value for "primary".
#[derive(Debug, Clone)]
pub struct ContactRow {
    pub index: usize,
    pub value: String,
    pub label: String,
    pub is_primary: bool,
}

/// One day in the hours table.
#[derive(Debug, Clone)]
pub struct HoursRow {
    pub key: &'static str,
    pub label: &'static str,
    pub open: String,
    pub close: String,
    pub closed: bool,
}

/// A team member row; blank rows add a member.
#[derive(Debug, Clone, Default)]
pub struct TeamRow {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image: String,
}

/// A core value row; blank rows add a value.
#[derive(Debug, Clone, Default)]
pub struct ValueRow {
    pub title: String,
    pub description: String,
}

/// Everything the tab forms display.
#[derive(Debug, Clone)]
pub struct SettingsView {
    pub settings: Settings,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub phones: Vec<ContactRow>,
    pub emails: Vec<ContactRow>,
    pub hours: Vec<HoursRow>,
    pub team: Vec<TeamRow>,
    pub values: Vec<ValueRow>,
    pub og_image: String,
}

impl SettingsView {
    /// Build the view; each repeated list gets one blank row for adding.
    #[must_use]
    pub fn new(settings: Settings, api: &ApiClient) -> Self {
        let asset = |path: Option<&str>| {
            path.map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| api.asset_url(p))
        };

        let mut phones: Vec<ContactRow> = settings
            .phone_numbers
            .iter()
            .map(|p| (p.number.clone(), p.label.clone(), p.is_primary))
            .chain(std::iter::once(Default::default()))
            .enumerate()
            .map(|(index, (value, label, is_primary))| ContactRow {
                index,
                value,
                label,
                is_primary,
            })
            .collect();
        let mut emails: Vec<ContactRow> = settings
            .emails
            .iter()
            .map(|e| (e.email.clone(), e.label.clone(), e.is_primary))
            .chain(std::iter::once(Default::default()))
            .enumerate()
            .map(|(index, (value, label, is_primary))| ContactRow {
                index,
                value,
                label,
                is_primary,
            })
            .collect();
        // With nothing flagged, the first row is shown as primary.
        for rows in [&mut phones, &mut emails] {
            if !rows.iter().any(|r| r.is_primary)
                && let Some(first) = rows.first_mut()
            {
                first.is_primary = true;
            }
        }

        let hours = settings
            .business_hours
            .week()
            .into_iter()
            .map(|(day, h)| HoursRow {
                key: day.key(),
                label: day.label(),
                open: h.open,
                close: h.close,
                closed: h.closed,
            })
            .collect();

        let team = settings
            .about_content
            .team_members
            .iter()
            .map(|m| TeamRow {
                name: m.name.clone(),
                role: m.role.clone(),
                bio: m.bio.clone(),
                image: m.image.clone().unwrap_or_default(),
            })
            .chain(std::iter::once(TeamRow::default()))
            .collect();

        let values = settings
            .about_content
            .core_values
            .iter()
            .map(|v| ValueRow {
                title: v.title.clone(),
                description: v.description.clone(),
            })
            .chain(std::iter::once(ValueRow::default()))
            .collect();

        Self {
            logo_url: asset(settings.logo.as_deref()),
            favicon_url: asset(settings.favicon.as_deref()),
            og_image: settings.seo.og_image.clone().unwrap_or_default(),
            phones,
            emails,
            hours,
            team,
            values,
            settings,
        }
    }
}

/// Settings page template.
#[derive(Template)]
#[template(path = "settings/index.html")]
pub struct SettingsTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Flash,
    pub tabs: Vec<TabView>,
    pub active: &'static str,
    pub view: SettingsView,
}

fn settings_page(
    auth: &RequireAdminToken,
    api: &ApiClient,
    section: SettingsSection,
    settings: Settings,
    flash: Flash,
) -> SettingsTemplate {
    SettingsTemplate {
        admin_user: AdminUserView::from(&auth.admin),
        current_path: "/settings".to_string(),
        flash,
        tabs: SettingsSection::ALL
            .into_iter()
            .map(|s| TabView {
                path: s.path(),
                label: s.label(),
                active: s == section,
            })
            .collect(),
        active: section.path(),
        view: SettingsView::new(settings, api),
    }
}

// =============================================================================
// Router
// =============================================================================

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/settings", get(index))
        .route("/settings/{section}", post(save))
        .route("/settings/upload/{kind}", post(upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsQuery {
    pub tab: String,
    #[serde(flatten)]
    pub flash: FlashQuery,
}

fn tab_url(section: SettingsSection) -> String {
    format!("/settings?tab={}", section.path())
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /settings?tab=
#[instrument(skip(auth, state))]
async fn index(
    auth: RequireAdminToken,
    State(state): State<AppState>,
    Query(query): Query<SettingsQuery>,
) -> Result<Response> {
    let section = query.tab.parse().unwrap_or(SettingsSection::Business);
    let api = state.api_for(&auth.token);
    let mut flash = Flash::from(query.flash);

    let settings = match api.get_settings().await {
        Ok(settings) => settings,
        Err(e) => {
            flash.error = Some(banner(e)?);
            Settings::default()
        }
    };

    Ok(render(&settings_page(&auth, &api, section, settings, flash)).into_response())
}

/// POST /settings/{section}
///
/// Only this tab's fields are read and sent. Invalid input re-renders the tab
/// with no backend call.
#[instrument(skip(auth, state, form))]
async fn save(
    auth: RequireAdminToken,
    State(state): State<AppState>,
    Path(section): Path<String>,
    Form(form): Form<Vec<(String, String)>>,
) -> Result<Response> {
    let section: SettingsSection = section
        .parse()
        .map_err(|e: bazaar_core::UnknownSection| AppError::NotFound(e.to_string()))?;
    let api = state.api_for(&auth.token);
    let fields = FormFields::from(form);

    let mut draft = Settings::default();
    if let Err(e) = apply_section(&mut draft, section, &fields) {
        let page = settings_page(&auth, &api, section, draft, Flash::error(e.to_string()));
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&page)).into_response());
    }

    let payload = draft
        .section_payload(section)
        .map_err(|e| AppError::Internal(format!("settings payload: {e}")))?;

    match api.update_settings_section(section, &payload).await {
        Ok(()) => {
            tracing::info!(%section, "Settings saved");
            Ok(redirect_with_success(&tab_url(section), "saved"))
        }
        Err(e) => {
            let flash = Flash::error(banner(e)?);
            Ok(render(&settings_page(&auth, &api, section, draft, flash)).into_response())
        }
    }
}

/// POST /settings/upload/{kind}
#[instrument(skip(auth, state, multipart))]
async fn upload(
    auth: RequireAdminToken,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    mut multipart: Multipart,
) -> Result<Response> {
    let kind: AssetKind = kind
        .parse()
        .map_err(|e: bazaar_core::UnknownSection| AppError::NotFound(e.to_string()))?;
    let back = tab_url(SettingsSection::Business);

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() == Some("file") {
            file = read_upload(field).await?;
        }
    }

    let Some(file) = file else {
        return Ok(redirect_with_error(&back, "no_file"));
    };
    if !is_image(&file) {
        return Ok(redirect_with_error(&back, "not_image"));
    }

    let api = state.api_for(&auth.token);
    match api.upload_asset(kind, file).await {
        Ok(()) => {
            tracing::info!(kind = kind.path(), "Brand asset uploaded");
            Ok(redirect_with_success(&back, "uploaded"))
        }
        Err(e) => {
            let flash = Flash::error(banner(e)?);
            let settings = api.get_settings().await.unwrap_or_default();
            let page = settings_page(&auth, &api, SettingsSection::Business, settings, flash);
            Ok(render(&page).into_response())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use bazaar_core::PhoneNumber;
    use std::time::Duration;
    use url::Url;

    fn api() -> ApiClient {
        ApiClient::new(
            &Url::parse("http://localhost:5000/api").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_view_adds_blank_rows() {
        let view = SettingsView::new(Settings::default(), &api());
        assert_eq!(view.phones.len(), 1);
        assert!(view.phones[0].is_primary);
        assert_eq!(view.team.len(), 1);
        assert_eq!(view.values.len(), 1);
        assert_eq!(view.hours.len(), 7);
    }

    #[test]
    fn test_view_keeps_flagged_primary() {
        let settings = Settings {
            phone_numbers: vec![
                PhoneNumber {
                    number: "1".into(),
                    ..PhoneNumber::default()
                },
                PhoneNumber {
                    number: "2".into(),
                    is_primary: true,
                    ..PhoneNumber::default()
                },
            ],
            ..Settings::default()
        };
        let view = SettingsView::new(settings, &api());
        let flags: Vec<bool> = view.phones.iter().map(|r| r.is_primary).collect();
        assert_eq!(flags, vec![false, true, false]);
        assert_eq!(view.phones[2].index, 2);
    }

    #[test]
    fn test_tab_url() {
        assert_eq!(tab_url(SettingsSection::Hours), "/settings?tab=hours");
    }
}
