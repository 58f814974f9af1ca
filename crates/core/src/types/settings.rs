//! Business settings: one aggregate document fetched wholesale and edited
//! section by section.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// The business settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub business_name: String,
    pub tagline: String,
    pub description: String,
    pub logo: Option<String>,
    pub favicon: Option<String>,
    pub address: Address,
    pub phone_numbers: Vec<PhoneNumber>,
    pub emails: Vec<EmailEntry>,
    pub social_media: SocialMedia,
    pub business_hours: BusinessHours,
    pub about_content: AboutContent,
    pub seo: Seo,
    pub theme: Theme,
    pub footer: Footer,
}

impl Settings {
    /// Built-in business info shown when the settings fetch fails.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            business_name: "Bazaar".to_string(),
            tagline: "Everyday fashion, fairly priced".to_string(),
            footer: Footer {
                copyright_text: "All rights reserved.".to_string(),
                ..Footer::default()
            },
            ..Self::default()
        }
    }

    /// Body of the partial update for one section.
    ///
    /// # Errors
    ///
    /// Returns an error if a nested value fails to serialize.
    pub fn section_payload(&self, section: SettingsSection) -> serde_json::Result<Value> {
        Ok(match section {
            SettingsSection::Business => json!({
                "businessName": self.business_name,
                "tagline": self.tagline,
                "description": self.description,
            }),
            SettingsSection::Contact => json!({
                "address": serde_json::to_value(&self.address)?,
                "phoneNumbers": serde_json::to_value(&self.phone_numbers)?,
                "emails": serde_json::to_value(&self.emails)?,
            }),
            SettingsSection::Hours => json!({
                "businessHours": serde_json::to_value(&self.business_hours)?,
            }),
            SettingsSection::About => json!({
                "aboutContent": serde_json::to_value(&self.about_content)?,
            }),
            SettingsSection::Social => json!({
                "socialMedia": serde_json::to_value(&self.social_media)?,
            }),
            SettingsSection::Seo => json!({ "seo": serde_json::to_value(&self.seo)? }),
            SettingsSection::Theme => json!({ "theme": serde_json::to_value(&self.theme)? }),
            SettingsSection::Footer => json!({ "footer": serde_json::to_value(&self.footer)? }),
        })
    }

    /// Primary phone number, or the first listed.
    #[must_use]
    pub fn primary_phone(&self) -> Option<&PhoneNumber> {
        primary_or_first(&self.phone_numbers)
    }

    /// Primary email, or the first listed.
    #[must_use]
    pub fn primary_email(&self) -> Option<&EmailEntry> {
        primary_or_first(&self.emails)
    }
}

/// An editable settings section; each maps to `PUT /settings/<path>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsSection {
    Business,
    Contact,
    Hours,
    About,
    Social,
    Seo,
    Theme,
    Footer,
}

impl SettingsSection {
    /// Sections in tab order.
    pub const ALL: [Self; 8] = [
        Self::Business,
        Self::Contact,
        Self::Hours,
        Self::About,
        Self::Social,
        Self::Seo,
        Self::Theme,
        Self::Footer,
    ];

    /// URL path segment.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Contact => "contact",
            Self::Hours => "hours",
            Self::About => "about",
            Self::Social => "social",
            Self::Seo => "seo",
            Self::Theme => "theme",
            Self::Footer => "footer",
        }
    }

    /// Tab label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Contact => "Contact",
            Self::Hours => "Business Hours",
            Self::About => "About Page",
            Self::Social => "Social Media",
            Self::Seo => "SEO",
            Self::Theme => "Theme",
            Self::Footer => "Footer",
        }
    }
}

impl fmt::Display for SettingsSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Unknown settings section name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown settings section: {0}")]
pub struct UnknownSection(pub String);

impl FromStr for SettingsSection {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.path() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// Uploadable brand assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Logo,
    Favicon,
}

impl AssetKind {
    /// URL path segment under `/settings/upload/`.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Logo => "logo",
            Self::Favicon => "favicon",
        }
    }
}

impl FromStr for AssetKind {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logo" => Ok(Self::Logo),
            "favicon" => Ok(Self::Favicon),
            other => Err(UnknownSection(other.to_string())),
        }
    }
}

// =============================================================================
// Contact
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(alias = "pincode", alias = "zipCode")]
    pub postal_code: String,
    pub country: String,
}

impl Address {
    /// Non-empty parts joined with commas.
    #[must_use]
    pub fn one_line(&self) -> String {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Entries in a list where one may be marked primary.
pub trait Primary {
    fn is_primary(&self) -> bool;
    fn set_primary(&mut self, primary: bool);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhoneNumber {
    pub number: String,
    /// e.g. "Store", "WhatsApp"
    pub label: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailEntry {
    pub email: String,
    pub label: String,
    pub is_primary: bool,
}

impl Primary for PhoneNumber {
    fn is_primary(&self) -> bool {
        self.is_primary
    }

    fn set_primary(&mut self, primary: bool) {
        self.is_primary = primary;
    }
}

impl Primary for EmailEntry {
    fn is_primary(&self) -> bool {
        self.is_primary
    }

    fn set_primary(&mut self, primary: bool) {
        self.is_primary = primary;
    }
}

/// Keep at most one primary entry: the first one flagged wins.
pub fn normalize_primary<T: Primary>(items: &mut [T]) {
    let mut seen = false;
    for item in items {
        if item.is_primary() {
            if seen {
                item.set_primary(false);
            }
            seen = true;
        }
    }
}

fn primary_or_first<T: Primary>(items: &[T]) -> Option<&T> {
    items.iter().find(|i| i.is_primary()).or_else(|| items.first())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialMedia {
    pub facebook: String,
    pub instagram: String,
    pub twitter: String,
    pub youtube: String,
    pub linkedin: String,
    pub whatsapp: String,
}

impl SocialMedia {
    /// `(network, url)` pairs for the configured links.
    #[must_use]
    pub fn links(&self) -> Vec<(&'static str, String)> {
        [
            ("Facebook", &self.facebook),
            ("Instagram", &self.instagram),
            ("Twitter", &self.twitter),
            ("YouTube", &self.youtube),
            ("LinkedIn", &self.linkedin),
            ("WhatsApp", &self.whatsapp),
        ]
        .into_iter()
        .filter(|(_, url)| !url.trim().is_empty())
        .map(|(name, url)| (name, url.trim().to_string()))
        .collect()
    }
}

// =============================================================================
// Hours
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

/// Opening hours for one day; times are `HH:MM`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DayHours {
    pub open: String,
    pub close: String,
    pub closed: bool,
}

/// Weekly hours keyed by day. Days missing from the document count as closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessHours(pub BTreeMap<Weekday, DayHours>);

impl BusinessHours {
    /// All seven days in week order.
    #[must_use]
    pub fn week(&self) -> Vec<(Weekday, DayHours)> {
        Weekday::ALL
            .into_iter()
            .map(|day| {
                let hours = self.0.get(&day).cloned().unwrap_or(DayHours {
                    closed: true,
                    ..DayHours::default()
                });
                (day, hours)
            })
            .collect()
    }
}

// =============================================================================
// About, SEO, theme, footer
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutContent {
    pub story: String,
    pub vision: String,
    pub mission: String,
    pub team_members: Vec<TeamMember>,
    pub core_values: Vec<CoreValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub image: Option<String>,
    pub bio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreValue {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Seo {
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub og_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub font_family: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Footer {
    pub copyright_text: String,
    pub about_text: String,
    pub show_social_links: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_document() {
        let json = r#"{
            "businessName": "Silk Route",
            "phoneNumbers": [{"number": "98450 00000", "isPrimary": true}],
            "businessHours": {
                "monday": {"open": "10:00", "close": "20:00", "closed": false},
                "sunday": {"closed": true}
            },
            "address": {"city": "Jaipur", "pincode": "302001"}
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.business_name, "Silk Route");
        assert_eq!(settings.address.postal_code, "302001");
        assert_eq!(settings.address.one_line(), "Jaipur, 302001");

        let week = settings.business_hours.week();
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].1.open, "10:00");
        // tuesday missing from the document
        assert!(week[1].1.closed);
    }

    #[test]
    fn test_normalize_primary_first_wins() {
        let mut phones = vec![
            PhoneNumber {
                number: "1".into(),
                is_primary: false,
                ..PhoneNumber::default()
            },
            PhoneNumber {
                number: "2".into(),
                is_primary: true,
                ..PhoneNumber::default()
            },
            PhoneNumber {
                number: "3".into(),
                is_primary: true,
                ..PhoneNumber::default()
            },
        ];
        normalize_primary(&mut phones);
        let flags: Vec<bool> = phones.iter().map(|p| p.is_primary).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn test_primary_falls_back_to_first() {
        let settings = Settings {
            emails: vec![
                EmailEntry {
                    email: "a@shop.in".into(),
                    ..EmailEntry::default()
                },
                EmailEntry {
                    email: "b@shop.in".into(),
                    ..EmailEntry::default()
                },
            ],
            ..Settings::default()
        };
        assert_eq!(settings.primary_email().unwrap().email, "a@shop.in");
    }

    #[test]
    fn test_section_payload_is_partial() {
        let settings = Settings {
            business_name: "Silk Route".into(),
            tagline: "Handloom".into(),
            ..Settings::default()
        };
        let body = settings
            .section_payload(SettingsSection::Business)
            .unwrap();
        assert_eq!(body["businessName"], "Silk Route");
        assert!(body.get("theme").is_none());

        let body = settings.section_payload(SettingsSection::Theme).unwrap();
        assert!(body.get("theme").is_some());
        assert!(body.get("businessName").is_none());
    }

    #[test]
    fn test_section_from_str() {
        assert_eq!(
            "hours".parse::<SettingsSection>(),
            Ok(SettingsSection::Hours)
        );
        assert!("billing".parse::<SettingsSection>().is_err());
    }

    #[test]
    fn test_social_links_skip_empty() {
        let social = SocialMedia {
            instagram: " https://instagram.com/silkroute ".into(),
            ..SocialMedia::default()
        };
        assert_eq!(
            social.links(),
            vec![("Instagram", "https://instagram.com/silkroute".to_string())]
        );
    }
}
