//! Domain primitives and the access resolver.
//!
//! Purpose: Define strongly typed domain entities used by the HTTP adapters
//! and the pure role-resolution logic that decides which dashboard a user
//! may view. Keep types immutable and document invariants in each type's
//! Rustdoc.
//!
//! Public surface:
//! - `Role` — closed role set with the rank hierarchy.
//! - `User` — identity claims held in the session.
//! - `guard_page` and friends — the access resolver.
//! - `Error`/`ErrorCode` — API error response payload.

pub mod access;
pub mod auth;
pub mod claims;
pub mod error;
pub mod ports;
pub mod role;
pub mod user;

pub use self::access::{
    dashboard_path, guard_page, has_required_role, resolve_effective_role, AccessError,
    GuardDecision, RouteRequirement, LOGIN_PATH,
};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::claims::{decode_access_token, AccessClaims, ClaimsError};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::ports::{AuthProvider, AuthProviderError, TokenPair};
pub use self::role::{Role, ALL_ROLES};
pub use self::user::{Organization, User};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
