//! Reqwest-backed auth provider adapter.
//!
//! This adapter owns transport details only: request serialisation, timeout
//! and HTTP error mapping, and JSON decoding of the token response. The
//! remote service is the project-management backend's token endpoint
//! (`POST {"email", "password"}` answering `{"access", "refresh"}`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{AuthProvider, AuthProviderError, LoginCredentials, TokenPair};

const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_USER_AGENT: &str = "dashboard-gateway/0.1";

/// Token response body from the auth backend.
#[derive(Debug, Deserialize)]
struct TokenResponseDto {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// Auth provider adapter that POSTs credentials to one token endpoint.
pub struct UpstreamAuthClient {
    client: Client,
    token_endpoint: Url,
}

impl UpstreamAuthClient {
    /// Build an adapter using a reqwest client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(token_endpoint: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(token_endpoint, DEFAULT_LOGIN_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(token_endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            token_endpoint,
        })
    }
}

#[async_trait]
impl AuthProvider for UpstreamAuthClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<TokenPair, AuthProviderError> {
        let response = self
            .client
            .post(self.token_endpoint.clone())
            .json(&json!({
                "email": credentials.email(),
                "password": credentials.password(),
            }))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::BAD_REQUEST {
            // SimpleJWT answers 401 for bad credentials; older deployments 400.
            return Err(AuthProviderError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(AuthProviderError::Unavailable(format!(
                "token endpoint answered {status}"
            )));
        }

        let dto: TokenResponseDto = response
            .json()
            .await
            .map_err(|error| AuthProviderError::Protocol(error.to_string()))?;
        Ok(TokenPair {
            access: dto.access,
            refresh: dto.refresh,
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> AuthProviderError {
    if error.is_timeout() || error.is_connect() {
        AuthProviderError::Unavailable(error.to_string())
    } else {
        AuthProviderError::Protocol(error.to_string())
    }
}
