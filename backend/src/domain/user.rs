//! User identity record as supplied by the authentication backend.
//!
//! Role fields stay raw strings here. Normalisation (lower-casing, closed-set
//! parsing) is the access resolver's job; keeping the provider's values
//! untouched means a stale or partially-loaded record never fails to
//! deserialise.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Organization the user belongs to, when any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Organization {
    /// Organization identifier as issued by the backend.
    pub id: String,
    /// Display name of the organization.
    pub name: String,
}

/// Identity claims for the signed-in user, held in session state for the
/// duration of the browser session.
///
/// Every optional field may be absent: the record is built from whatever
/// claims the auth backend included, and the resolver must tolerate gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Stable user identifier.
    pub id: String,
    /// Display name, falling back to the email local part upstream.
    pub name: String,
    /// Email address used for login.
    pub email: String,
    /// Flat system role string, e.g. `"admin"`. Raw as the provider sent it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Role within the user's organization, e.g. `"project_manager"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_role: Option<String>,
    /// Superusers bypass every other authorisation check.
    #[serde(default)]
    pub is_superuser: bool,
    /// Organization membership, when the user belongs to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<Organization>,
}

impl User {
    /// Build a minimal user with only the identity fields set.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::User;
    ///
    /// let user = User::with_identity("42", "Ada", "ada@example.com");
    /// assert!(user.role.is_none());
    /// assert!(!user.is_superuser);
    /// ```
    pub fn with_identity(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: None,
            organization_role: None,
            is_superuser: false,
            organization: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialises_with_all_optional_fields_absent() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "7",
            "name": "Ada",
            "email": "ada@example.com",
        }))
        .expect("partial record must deserialise");
        assert_eq!(user.id, "7");
        assert!(user.role.is_none());
        assert!(user.organization.is_none());
        assert!(!user.is_superuser);
    }

    #[test]
    fn round_trips_through_json() {
        let user = User {
            organization_role: Some("developer".to_owned()),
            organization: Some(Organization {
                id: "org-1".to_owned(),
                name: "Example Corp".to_owned(),
            }),
            ..User::with_identity("7", "Ada", "ada@example.com")
        };
        let encoded = serde_json::to_string(&user).expect("serialise");
        let decoded: User = serde_json::from_str(&encoded).expect("deserialise");
        assert_eq!(decoded, user);
    }
}
