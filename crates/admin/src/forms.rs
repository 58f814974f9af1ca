//! Settings tab forms.
//!
//! Each tab posts a flat urlencoded body. Repeated rows (phones, emails, team
//! members, core values) arrive as repeated field names in document order,
//! so the body is taken as a pair list rather than a struct.

use bazaar_core::validation::{normalize_contact, validate_hours};
use bazaar_core::{
    CoreValue, DayHours, EmailEntry, PhoneNumber, Settings, SettingsSection, TeamMember,
    ValidationError,
};

/// A submitted form as ordered `(name, value)` pairs.
#[derive(Debug, Clone, Default)]
pub struct FormFields(Vec<(String, String)>);

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl FormFields {
    /// First value for `name`, trimmed; empty when absent.
    #[must_use]
    pub fn get(&self, name: &str) -> String {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.trim().to_string())
            .unwrap_or_default()
    }

    /// Every value for `name`, in order.
    #[must_use]
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Checkbox state: present with any value other than "false".
    #[must_use]
    pub fn checked(&self, name: &str) -> bool {
        self.0.iter().any(|(k, v)| k == name && v != "false")
    }

    fn optional(&self, name: &str) -> Option<String> {
        Some(self.get(name)).filter(|v| !v.is_empty())
    }

    /// Values of parallel repeated fields, row by row. Short columns pad
    /// with empty strings.
    fn rows<const N: usize>(&self, names: [&str; N]) -> Vec<[String; N]> {
        let columns = names.map(|name| self.all(name));
        let len = columns.iter().map(Vec::len).max().unwrap_or(0);
        (0..len)
            .map(|i| {
                std::array::from_fn(|c| {
                    columns
                        .get(c)
                        .and_then(|col| col.get(i))
                        .map(|v| v.trim().to_string())
                        .unwrap_or_default()
                })
            })
            .collect()
    }
}

/// Apply one tab's form onto `settings` and check it.
///
/// Only the fields belonging to `section` are touched, so the caller can
/// start from an empty document and send just that section's payload.
///
/// # Errors
///
/// Returns the first validation failure for the section.
pub fn apply_section(
    settings: &mut Settings,
    section: SettingsSection,
    form: &FormFields,
) -> Result<(), ValidationError> {
    match section {
        SettingsSection::Business => {
            settings.business_name = form.get("business_name");
            settings.tagline = form.get("tagline");
            settings.description = form.get("description");
            if settings.business_name.is_empty() {
                return Err(ValidationError::Required {
                    field: "Business name",
                });
            }
        }
        SettingsSection::Contact => {
            let address = &mut settings.address;
            address.street = form.get("street");
            address.city = form.get("city");
            address.state = form.get("state");
            address.postal_code = form.get("postal_code");
            address.country = form.get("country");

            let phone_primary = form.get("phone_primary");
            settings.phone_numbers = form
                .rows(["phone_number", "phone_label"])
                .into_iter()
                .enumerate()
                .map(|(i, [number, label])| PhoneNumber {
                    number,
                    label,
                    is_primary: phone_primary == i.to_string(),
                })
                .collect();

            let email_primary = form.get("email_primary");
            settings.emails = form
                .rows(["email_address", "email_label"])
                .into_iter()
                .enumerate()
                .map(|(i, [email, label])| EmailEntry {
                    email,
                    label,
                    is_primary: email_primary == i.to_string(),
                })
                .collect();

            normalize_contact(settings)?;
        }
        SettingsSection::Hours => {
            for (day, _) in settings.business_hours.week() {
                let key = day.key();
                let hours = DayHours {
                    open: form.get(&format!("{key}_open")),
                    close: form.get(&format!("{key}_close")),
                    closed: form.checked(&format!("{key}_closed")),
                };
                settings.business_hours.0.insert(day, hours);
            }
            validate_hours(&settings.business_hours)?;
        }
        SettingsSection::About => {
            let about = &mut settings.about_content;
            about.story = form.get("story");
            about.vision = form.get("vision");
            about.mission = form.get("mission");
            about.team_members = form
                .rows(["team_name", "team_role", "team_bio", "team_image"])
                .into_iter()
                .filter(|[name, ..]| !name.is_empty())
                .map(|[name, role, bio, image]| TeamMember {
                    name,
                    role,
                    bio,
                    image: Some(image).filter(|i| !i.is_empty()),
                })
                .collect();
            about.core_values = form
                .rows(["value_title", "value_description"])
                .into_iter()
                .filter(|[title, _]| !title.is_empty())
                .map(|[title, description]| CoreValue { title, description })
                .collect();
        }
        SettingsSection::Social => {
            let social = &mut settings.social_media;
            social.facebook = form.get("facebook");
            social.instagram = form.get("instagram");
            social.twitter = form.get("twitter");
            social.youtube = form.get("youtube");
            social.linkedin = form.get("linkedin");
            social.whatsapp = form.get("whatsapp");
        }
        SettingsSection::Seo => {
            settings.seo.meta_title = form.get("meta_title");
            settings.seo.meta_description = form.get("meta_description");
            settings.seo.meta_keywords = form.get("meta_keywords");
            settings.seo.og_image = form.optional("og_image");
        }
        SettingsSection::Theme => {
            settings.theme.primary_color = form.get("primary_color");
            settings.theme.secondary_color = form.get("secondary_color");
            settings.theme.accent_color = form.get("accent_color");
            settings.theme.font_family = form.get("font_family");
        }
        SettingsSection::Footer => {
            settings.footer.copyright_text = form.get("copyright_text");
            settings.footer.about_text = form.get("about_text");
            settings.footer.show_social_links = form.checked("show_social_links");
        }
    }
    Ok(())
}
