//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated specification for the session API and
//! health probes. The guarded dashboard pages are browser navigation, not
//! API surface, so they are deliberately absent. Swagger UI serves the
//! document in debug builds only.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Organization, Role, User};
use crate::inbound::http::dashboards::DashboardView;
use crate::inbound::http::users::{LoginRequest, LoginResponse, MeResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the session API.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::me,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        User,
        Organization,
        DashboardView,
        LoginRequest,
        LoginResponse,
        MeResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "session", description = "Login, logout, and session introspection"),
        (name = "health", description = "Orchestration probes"),
    )
)]
pub struct ApiDoc;
