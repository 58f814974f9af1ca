//! Session-related types for admin authentication.
//!
//! The backend issues an opaque bearer token on login. The session keeps the
//! token (which every backend call needs) and a display copy of the admin.

use bazaar_api::AdminUser;
use serde::{Deserialize, Serialize};

/// Session-stored admin identity, for the header only. Never used for
/// authorization; the backend decides that from the token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's display name.
    pub name: String,
    /// Admin's email address.
    pub email: String,
    /// Role as reported by the backend (e.g. "admin").
    pub role: String,
}

impl CurrentAdmin {
    /// Build from the login response, falling back to the typed email when
    /// the backend returns no user.
    #[must_use]
    pub fn from_login(user: Option<&AdminUser>, email: &str) -> Self {
        user.map_or_else(
            || Self {
                name: String::new(),
                email: email.to_string(),
                role: String::new(),
            },
            |u| Self {
                name: u.name.clone(),
                email: if u.email.is_empty() {
                    email.to_string()
                } else {
                    u.email.clone()
                },
                role: u.role.clone(),
            },
        )
    }

    /// Name to show in the header.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for the backend bearer token.
    pub const ADMIN_TOKEN: &str = "adminToken";

    /// Key for the display copy of the signed-in admin.
    pub const CURRENT_ADMIN: &str = "currentAdmin";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_login_without_user() {
        let admin = CurrentAdmin::from_login(None, "owner@shop.in");
        assert_eq!(admin.display_name(), "owner@shop.in");
    }

    #[test]
    fn test_from_login_with_user() {
        let user = AdminUser {
            name: "Asha".into(),
            role: "admin".into(),
            ..AdminUser::default()
        };
        let admin = CurrentAdmin::from_login(Some(&user), "owner@shop.in");
        assert_eq!(admin.display_name(), "Asha");
        assert_eq!(admin.email, "owner@shop.in");
    }
}
