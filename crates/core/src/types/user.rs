//! Authenticated user identity.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;

/// The identity record returned by login/signup and kept in the session.
///
/// Accepts both `_id` (document stores) and `id` for the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    pub email: Email,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl CurrentUser {
    /// Display name, falling back to the email when no name is on file.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.email.to_string()
        } else {
            full.to_string()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_shape() {
        let json = r#"{"_id":"u1","email":"Ada@Example.com","firstName":"Ada","lastName":"Lovelace","isAdmin":true}"#;
        let user: CurrentUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, UserId::new("u1"));
        assert_eq!(user.email.as_str(), "ada@example.com");
        assert!(user.is_admin);
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let user: CurrentUser = serde_json::from_str(r#"{"id":"u2","email":"b@c.io"}"#).unwrap();
        assert!(!user.is_admin);
        assert_eq!(user.display_name(), "b@c.io");
    }
}
