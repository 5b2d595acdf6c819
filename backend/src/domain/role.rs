//! Role enumeration and the hierarchy used for access checks.
//!
//! Roles form a closed set with a total rank order. Every authorisation
//! decision reduces to comparing ranks, so the table lives here and nowhere
//! else.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role held by a user, either system wide or within an organization.
///
/// ## Invariants
/// - The set is closed; unrecognised role strings never become a `Role`.
/// - Each role has exactly one rank (see [`Role::rank`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Superadmin,
    Admin,
    ProjectManager,
    Developer,
    Verifier,
    Salesperson,
    Support,
    User,
}

/// All roles in descending rank order. Useful for iterating the hierarchy.
pub const ALL_ROLES: [Role; 8] = [
    Role::Superadmin,
    Role::Admin,
    Role::ProjectManager,
    Role::Developer,
    Role::Verifier,
    Role::Salesperson,
    Role::Support,
    Role::User,
];

impl Role {
    /// Parse a role string case-insensitively.
    ///
    /// Returns `None` for anything outside the closed set so callers fail
    /// closed instead of comparing against an undefined rank.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Role;
    ///
    /// assert_eq!(Role::parse("Admin"), Some(Role::Admin));
    /// assert_eq!(Role::parse("wizard"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "superadmin" => Some(Self::Superadmin),
            "admin" => Some(Self::Admin),
            "project_manager" => Some(Self::ProjectManager),
            "developer" => Some(Self::Developer),
            "verifier" => Some(Self::Verifier),
            "salesperson" => Some(Self::Salesperson),
            "support" => Some(Self::Support),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    /// Integer rank for "at least as privileged as" comparisons.
    ///
    /// Salesperson and support share a rank; neither outranks the other.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Superadmin => 7,
            Self::Admin => 6,
            Self::ProjectManager => 5,
            Self::Developer => 4,
            Self::Verifier => 3,
            Self::Salesperson | Self::Support => 2,
            Self::User => 1,
        }
    }

    /// Canonical snake_case wire string for the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
            Self::Admin => "admin",
            Self::ProjectManager => "project_manager",
            Self::Developer => "developer",
            Self::Verifier => "verifier",
            Self::Salesperson => "salesperson",
            Self::Support => "support",
            Self::User => "user",
        }
    }

    /// Human-readable label shown in navigation chrome.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Superadmin => "Super Admin",
            Self::Admin => "Organization Admin",
            Self::ProjectManager => "Project Manager",
            Self::Developer => "Developer",
            Self::Verifier => "Verifier",
            Self::Salesperson => "Salesperson",
            Self::Support => "Support Staff",
            Self::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
