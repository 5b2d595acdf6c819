//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters.
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants instead of returning `anyhow::Result`.

use async_trait::async_trait;
use thiserror::Error;

use super::auth::LoginCredentials;

/// Access/refresh token pair issued by the auth backend on login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived access token carrying the identity claims.
    pub access: String,
    /// Longer-lived refresh token, when the backend issues one.
    pub refresh: Option<String>,
}

/// Errors surfaced by an auth provider adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthProviderError {
    /// The backend rejected the credentials.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The backend could not be reached or answered a server error.
    #[error("auth backend unavailable: {0}")]
    Unavailable(String),
    /// The backend answered something this gateway cannot interpret.
    #[error("auth backend protocol error: {0}")]
    Protocol(String),
}

/// Remote service that exchanges credentials for a token pair.
///
/// The real adapter speaks HTTP to the project-management backend; tests and
/// local development use [`FixtureAuthProvider`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchange login credentials for an access/refresh token pair.
    async fn login(&self, credentials: &LoginCredentials) -> Result<TokenPair, AuthProviderError>;
}

/// In-process auth provider for tests and keyless local development.
///
/// Accepts exactly one email/password pair and mints an unsigned token with
/// the configured claims. Anything else is rejected as invalid credentials.
pub struct FixtureAuthProvider {
    email: String,
    password: String,
    claims: serde_json::Value,
}

impl FixtureAuthProvider {
    /// Provider accepting `email`/`password` and issuing `claims`.
    ///
    /// An `exp` claim one hour in the future is added when the caller did
    /// not set one.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        mut claims: serde_json::Value,
    ) -> Self {
        if let Some(map) = claims.as_object_mut() {
            map.entry("exp").or_insert_with(|| {
                serde_json::Value::from((chrono::Utc::now() + chrono::Duration::hours(1)).timestamp())
            });
        }
        Self {
            email: email.into(),
            password: password.into(),
            claims,
        }
    }

    /// Provider for a stock development admin account.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ports::FixtureAuthProvider;
    ///
    /// let provider = FixtureAuthProvider::dev_admin();
    /// drop(provider);
    /// ```
    pub fn dev_admin() -> Self {
        Self::new(
            "admin@example.com",
            "password",
            serde_json::json!({
                "user_id": "1",
                "email": "admin@example.com",
                "name": "Admin User",
                "role": "admin",
                "is_superuser": true,
            }),
        )
    }
}

#[async_trait]
impl AuthProvider for FixtureAuthProvider {
    async fn login(&self, credentials: &LoginCredentials) -> Result<TokenPair, AuthProviderError> {
        if credentials.email() == self.email && credentials.password() == self.password {
            Ok(TokenPair {
                access: super::claims::unsigned_token_with_payload(&self.claims),
                refresh: None,
            })
        } else {
            Err(AuthProviderError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::decode_access_token;

    #[tokio::test]
    async fn fixture_accepts_only_its_configured_credentials() {
        let provider = FixtureAuthProvider::dev_admin();
        let good = LoginCredentials::try_from_parts("admin@example.com", "password")
            .expect("valid creds");
        let bad =
            LoginCredentials::try_from_parts("admin@example.com", "wrong").expect("valid shape");

        assert!(provider.login(&good).await.is_ok());
        assert_eq!(
            provider.login(&bad).await,
            Err(AuthProviderError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn fixture_tokens_decode_into_a_user() {
        let provider = FixtureAuthProvider::dev_admin();
        let creds = LoginCredentials::try_from_parts("admin@example.com", "password")
            .expect("valid creds");
        let pair = provider.login(&creds).await.expect("login succeeds");
        let user = decode_access_token(&pair.access, chrono::Utc::now()).expect("decodes");
        assert_eq!(user.email, "admin@example.com");
        assert!(user.is_superuser);
    }
}
