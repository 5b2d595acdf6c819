//! Session API handlers.
//!
//! ```text
//! POST /api/v1/login  {"email":"ada@example.com","password":"secret"}
//! POST /api/v1/logout
//! GET  /api/v1/me
//! ```
//!
//! Login exchanges credentials for tokens at the remote auth backend, decodes
//! the access-token claims into a [`User`] record, and stores that record in
//! the cookie session. The response tells the navigation layer where the
//! user's canonical dashboard lives.

use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    dashboard_path, decode_access_token, resolve_effective_role, AuthProvider, AuthProviderError,
    ClaimsError, Error, LoginCredentials, LoginValidationError, Role, User, LOGIN_PATH,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::ApiResult;

/// Shared handle to the configured auth provider.
pub type AuthProviderHandle = Arc<dyn AuthProvider>;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Email address used as the login identifier.
    pub email: String,
    /// Account password, forwarded verbatim to the auth backend.
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Login response telling the client where to navigate next.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Signed-in user record.
    pub user: User,
    /// Effective role used for authorisation decisions.
    pub effective_role: Role,
    /// Canonical dashboard path for the effective role.
    pub redirect: String,
}

/// Current-session response for `GET /api/v1/me`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    /// Signed-in user record.
    pub user: User,
    /// Effective role used for authorisation decisions.
    pub effective_role: Role,
    /// Human-readable label for the effective role.
    pub role_label: String,
    /// Canonical dashboard path for the effective role.
    pub dashboard: String,
}

/// Authenticate against the remote backend and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
         headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 502, description = "Auth backend unavailable", body = Error)
    ),
    tags = ["session"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    session: SessionContext,
    provider: web::Data<AuthProviderHandle>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;

    let tokens = provider
        .login(&credentials)
        .await
        .map_err(map_provider_error)?;
    let user = decode_access_token(&tokens.access, Utc::now()).map_err(map_claims_error)?;

    session.persist_user(&user)?;
    let effective_role =
        resolve_effective_role(Some(&user)).map_err(|_| Error::unauthorized("login required"))?;
    tracing::info!(user_id = %user.id, role = %effective_role, "session established");

    Ok(web::Json(LoginResponse {
        redirect: dashboard_path(effective_role).to_owned(),
        effective_role,
        user,
    }))
}

/// Terminate the session and point the client at the login page.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Session terminated")
    ),
    tags = ["session"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(json!({ "redirect": LOGIN_PATH }))
}

/// Describe the signed-in user and their canonical dashboard.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current session", body = MeResponse),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["session"],
    operation_id = "me"
)]
#[get("/me")]
pub async fn me(session: SessionContext) -> ApiResult<web::Json<MeResponse>> {
    let user = session.require_user()?;
    let effective_role =
        resolve_effective_role(Some(&user)).map_err(|_| Error::unauthorized("login required"))?;
    Ok(web::Json(MeResponse {
        effective_role,
        role_label: effective_role.display_name().to_owned(),
        dashboard: dashboard_path(effective_role).to_owned(),
        user,
    }))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::MalformedEmail => Error::invalid_request("email must be an address")
            .with_details(json!({ "field": "email", "code": "malformed_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

fn map_provider_error(err: AuthProviderError) -> Error {
    match err {
        AuthProviderError::InvalidCredentials => Error::unauthorized("invalid credentials"),
        AuthProviderError::Unavailable(reason) => {
            tracing::warn!(%reason, "auth backend unavailable");
            Error::upstream("auth backend unavailable")
        }
        AuthProviderError::Protocol(reason) => {
            tracing::error!(%reason, "auth backend protocol error");
            Error::upstream("auth backend answered an unexpected payload")
        }
    }
}

fn map_claims_error(err: ClaimsError) -> Error {
    match err {
        // An already-expired token straight from the issuer is a provider
        // fault, but the safe client-visible outcome is a failed login.
        ClaimsError::Expired => Error::unauthorized("session token expired"),
        ClaimsError::Malformed | ClaimsError::MissingSubject => {
            tracing::error!(error = %err, "undecodable access token from auth backend");
            Error::upstream("auth backend issued an undecodable token")
        }
    }
}
