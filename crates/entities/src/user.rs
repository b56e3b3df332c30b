//! User-related entity definitions.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Access role. Fixed when the account is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Returns the wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

/// A user's stored criteria for compatible commute partners.
///
/// Every field is optional; the update endpoint validates the commute time
/// format and the age range before persisting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingPreferences {
    /// Start of the commute window (`HH:mm`).
    pub commute_start: Option<String>,
    /// End of the commute window (`HH:mm`).
    pub commute_end: Option<String>,
    /// Days of the week the user commutes.
    pub preferred_days: Option<Vec<String>>,
    /// Lower age bound for matches. At least 18.
    pub min_age: Option<i32>,
    /// Upper age bound for matches. At most 100.
    pub max_age: Option<i32>,
    /// Maximum acceptable detour distance in kilometres.
    pub max_distance_km: Option<i32>,
    /// Preferred vehicle arrangement.
    pub vehicle_preference: Option<String>,
    /// Preferred gender of commute partners.
    pub gender_preference: Option<String>,
    /// Whether smoking is acceptable.
    pub smoking: Option<bool>,
    /// Music preference.
    pub music: Option<String>,
    /// Free-text profession.
    pub profession: Option<String>,
    /// Free-text languages.
    pub languages: Option<String>,
    /// Free-text interests.
    pub interests: Option<String>,
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Email address, stored lower-cased.
    pub email: String,
    /// Salted credential hash. Never serialised to clients.
    pub password: String,
    /// Display name.
    pub name: Option<String>,
    /// Short profile text.
    pub bio: Option<String>,
    /// Access role.
    pub role: UserRole,
    /// Commute-partner matching criteria.
    pub matching_preferences: Option<MatchingPreferences>,
    /// When this record was created.
    pub created_at: DateTime,
    /// When this record was last updated.
    pub updated_at: DateTime,
}

impl User {
    /// Creates a new user with the default role.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            email: email.into(),
            password: password_hash.into(),
            name: None,
            bio: None,
            role: UserRole::User,
            matching_preferences: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("test@example.com", "salt$hash").with_name("Test User");

        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.name, Some("Test User".to_string()));
        assert_eq!(user.role, UserRole::User);
        assert!(user.matching_preferences.is_none());
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&UserRole::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
    }
}
