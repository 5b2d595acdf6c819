//! Test helpers for inbound HTTP components.

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;

use crate::domain::User;

/// Build a session middleware configured for tests.
///
/// Generates a fresh signing/encryption key per invocation, names the cookie
/// `session`, and disables the `Secure` flag for local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Signed-in user fixture with the given organization role.
pub fn user_with_org_role(role: &str) -> User {
    User {
        organization_role: Some(role.to_owned()),
        ..User::with_identity("7", "Ada", "ada@example.com")
    }
}
