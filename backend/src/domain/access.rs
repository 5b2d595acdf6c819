//! Access resolver: effective-role derivation, hierarchy checks, and the
//! allow-or-redirect decision for guarded pages.
//!
//! The resolver is pure and synchronous. It holds no state, so re-invoking it
//! on every navigation or session refresh is idempotent for a stable
//! `(user, path)` pair. Failures never escape as errors to the browser; every
//! failure path terminates in a redirect decision.

use thiserror::Error;

use super::role::Role;
use super::user::User;

/// Path the browser is sent to when no user is present.
pub const LOGIN_PATH: &str = "/login";

/// Errors raised while deriving an effective role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No user record is available; the caller must redirect to login.
    #[error("no authenticated user")]
    Unauthenticated,
}

/// Authorisation rule attached to a guarded page.
///
/// The rule set is static and known at build time; see the route table in
/// the HTTP adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequirement {
    /// Any role ranking at or above the given role may view the page.
    MinimumRole(Role),
    /// Only superusers may view the page.
    SuperuserOnly,
}

/// Outcome of guarding a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested page.
    Allow,
    /// Navigate to the given path instead.
    RedirectTo(String),
}

/// Derive the single role used for authorisation decisions.
///
/// Priority order: superuser flag, then organization role, then flat role.
/// Role strings are matched case-insensitively; anything outside the closed
/// set falls back to [`Role::User`] rather than erroring, so a malformed
/// claim can never widen access.
///
/// # Errors
///
/// Returns [`AccessError::Unauthenticated`] when no user record is present.
///
/// # Examples
/// ```
/// use backend::domain::{resolve_effective_role, Role, User};
///
/// let user = User {
///     role: Some("Admin".to_owned()),
///     ..User::with_identity("1", "Ada", "ada@example.com")
/// };
/// assert_eq!(resolve_effective_role(Some(&user)), Ok(Role::Admin));
/// ```
pub fn resolve_effective_role(user: Option<&User>) -> Result<Role, AccessError> {
    let user = user.ok_or(AccessError::Unauthenticated)?;
    if user.is_superuser {
        return Ok(Role::Superadmin);
    }

    // Presence decides which claim is used; an unknown value in the chosen
    // claim fails closed to the lowest role rather than trying the other.
    let claimed = user
        .organization_role
        .as_deref()
        .or(user.role.as_deref())
        .and_then(Role::parse);

    Ok(claimed.unwrap_or(Role::User))
}

/// Whether `effective` is at least as privileged as `required`.
///
/// Unrecognised role strings never reach this check: the closed [`Role`] set
/// is established during effective-role derivation, which fails closed.
pub const fn has_required_role(effective: Role, required: Role) -> bool {
    effective.rank() >= required.rank()
}

/// Canonical dashboard path for a role.
///
/// Total function: every role has a home. Callers that start from a raw
/// string go through [`Role::parse`] first and default to [`Role::User`].
pub const fn dashboard_path(role: Role) -> &'static str {
    match role {
        Role::Superadmin => "/superadmin",
        Role::Admin => "/admin",
        Role::ProjectManager => "/organization/project/dashboard",
        Role::Developer => "/organization/developer/dashboard",
        Role::Verifier => "/organization/verifier/dashboard",
        Role::Salesperson => "/organization/sales/dashboard",
        Role::Support => "/organization/support/dashboard",
        Role::User => "/organization/user/dashboard",
    }
}

/// Decide whether the current user may view the current page, and where to
/// send them when not.
///
/// Superusers bypass every requirement, including [`RouteRequirement::SuperuserOnly`]
/// pages. A denied user is pointed at their own dashboard, unless the path
/// they are already on is a variant of that dashboard, in which case the
/// page is allowed so the decision can never flap between two redirects.
///
/// # Examples
/// ```
/// use backend::domain::{guard_page, GuardDecision, Role, RouteRequirement};
///
/// let decision = guard_page(None, RouteRequirement::MinimumRole(Role::User), "/admin");
/// assert_eq!(decision, GuardDecision::RedirectTo("/login".to_owned()));
/// ```
pub fn guard_page(
    user: Option<&User>,
    requirement: RouteRequirement,
    current_path: &str,
) -> GuardDecision {
    let Ok(effective) = resolve_effective_role(user) else {
        return GuardDecision::RedirectTo(LOGIN_PATH.to_owned());
    };

    if effective == Role::Superadmin {
        return GuardDecision::Allow;
    }

    let satisfied = match requirement {
        RouteRequirement::MinimumRole(required) => has_required_role(effective, required),
        RouteRequirement::SuperuserOnly => false,
    };
    if satisfied {
        return GuardDecision::Allow;
    }

    if is_dashboard_variant(current_path, effective) {
        // Already on the page we would redirect to; allowing breaks the loop.
        return GuardDecision::Allow;
    }
    GuardDecision::RedirectTo(dashboard_path(effective).to_owned())
}

/// Whether `current_path` is one of the accepted spellings of the role's
/// dashboard: the canonical path with or without a trailing `/dashboard`,
/// or the legacy form without the `/organization` prefix.
fn is_dashboard_variant(current_path: &str, role: Role) -> bool {
    let current = current_path.trim_end_matches('/');
    let canonical = dashboard_path(role);
    path_spellings(canonical).any(|variant| variant == current)
        || canonical
            .strip_prefix("/organization")
            .is_some_and(|legacy| path_spellings(legacy).any(|variant| variant == current))
}

/// The path itself plus its with/without `/dashboard` twin.
fn path_spellings(path: &str) -> impl Iterator<Item = String> + '_ {
    let bare = path.trim_end_matches('/');
    let twin = bare
        .strip_suffix("/dashboard")
        .map_or_else(|| format!("{bare}/dashboard"), ToOwned::to_owned);
    [bare.to_owned(), twin].into_iter()
}
