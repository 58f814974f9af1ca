//! Settings endpoints.

use bazaar_core::{AssetKind, Settings, SettingsSection};
use reqwest::Method;
use reqwest::multipart::Form;
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Value;
use tracing::instrument;

use crate::client::{ApiClient, Upload};
use crate::error::ApiError;

#[derive(Deserialize)]
#[serde(untagged)]
enum SettingsBody {
    Keyed { settings: Settings },
    Bare(Settings),
}

impl ApiClient {
    /// `GET /settings`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_settings(&self) -> Result<Settings, ApiError> {
        let body: SettingsBody = self.send(self.request(Method::GET, "/settings")).await?;
        Ok(match body {
            SettingsBody::Keyed { settings } | SettingsBody::Bare(settings) => settings,
        })
    }

    /// `PUT /settings/<section>` with a partial document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, payload), fields(section = %section))]
    pub async fn update_settings_section(
        &self,
        section: SettingsSection,
        payload: &Value,
    ) -> Result<(), ApiError> {
        let path = format!("/settings/{}", section.path());
        let _: IgnoredAny = self
            .send(self.request(Method::PUT, &path).json(payload))
            .await?;
        Ok(())
    }

    /// `POST /settings/upload/<kind>` as multipart; the file part is named
    /// after the asset kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the file part is invalid or the request fails.
    #[instrument(skip(self, file), fields(kind = kind.path(), size = file.bytes.len()))]
    pub async fn upload_asset(&self, kind: AssetKind, file: Upload) -> Result<(), ApiError> {
        let form = Form::new().part(kind.path(), file.into_part()?);
        let path = format!("/settings/upload/{}", kind.path());
        let _: IgnoredAny = self
            .send(self.request(Method::POST, &path).multipart(form))
            .await?;
        Ok(())
    }
}
