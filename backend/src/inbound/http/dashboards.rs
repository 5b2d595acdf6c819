//! Guarded dashboard pages.
//!
//! Every dashboard path is registered with a static authorisation rule; one
//! shared handler runs the access resolver and either renders a page stub or
//! answers `303 See Other` with the canonical redirect target. Real page
//! content comes from the remote backend; this gateway only decides who may
//! stand where.

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    dashboard_path, guard_page, resolve_effective_role, GuardDecision, Role, RouteRequirement,
    User, LOGIN_PATH,
};
use crate::inbound::http::session::SessionContext;

/// Static authorisation rule table: page path to required role.
///
/// Legacy spellings (`/<role>/dashboard`, paths without the trailing
/// `/dashboard`) stay registered so redirect-loop avoidance has somewhere to
/// land. The set is known at build time; nothing mutates it.
pub const ROUTE_RULES: &[(&str, RouteRequirement)] = &[
    ("/superadmin", RouteRequirement::SuperuserOnly),
    ("/admin", RouteRequirement::MinimumRole(Role::Admin)),
    ("/admin/dashboard", RouteRequirement::MinimumRole(Role::Admin)),
    (
        "/organization/project/dashboard",
        RouteRequirement::MinimumRole(Role::ProjectManager),
    ),
    (
        "/organization/project",
        RouteRequirement::MinimumRole(Role::ProjectManager),
    ),
    (
        "/project/dashboard",
        RouteRequirement::MinimumRole(Role::ProjectManager),
    ),
    (
        "/organization/developer/dashboard",
        RouteRequirement::MinimumRole(Role::Developer),
    ),
    (
        "/organization/developer",
        RouteRequirement::MinimumRole(Role::Developer),
    ),
    (
        "/developer/dashboard",
        RouteRequirement::MinimumRole(Role::Developer),
    ),
    (
        "/organization/verifier/dashboard",
        RouteRequirement::MinimumRole(Role::Verifier),
    ),
    (
        "/organization/verifier",
        RouteRequirement::MinimumRole(Role::Verifier),
    ),
    (
        "/verifier/dashboard",
        RouteRequirement::MinimumRole(Role::Verifier),
    ),
    (
        "/organization/sales/dashboard",
        RouteRequirement::MinimumRole(Role::Salesperson),
    ),
    (
        "/organization/sales",
        RouteRequirement::MinimumRole(Role::Salesperson),
    ),
    (
        "/sales/dashboard",
        RouteRequirement::MinimumRole(Role::Salesperson),
    ),
    (
        "/organization/support/dashboard",
        RouteRequirement::MinimumRole(Role::Support),
    ),
    (
        "/organization/support",
        RouteRequirement::MinimumRole(Role::Support),
    ),
    (
        "/support/dashboard",
        RouteRequirement::MinimumRole(Role::Support),
    ),
    (
        "/organization/user/dashboard",
        RouteRequirement::MinimumRole(Role::User),
    ),
    (
        "/organization/user",
        RouteRequirement::MinimumRole(Role::User),
    ),
    ("/user/dashboard", RouteRequirement::MinimumRole(Role::User)),
];

/// Page stub rendered when the guard allows the request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardView {
    /// Path of the page being rendered.
    pub page: String,
    /// Display name of the signed-in user.
    pub user: String,
    /// Effective role the guard resolved.
    pub effective_role: Role,
}

fn requirement_for(path: &str) -> RouteRequirement {
    ROUTE_RULES
        .iter()
        .find(|(rule_path, _)| *rule_path == path.trim_end_matches('/'))
        .map_or(RouteRequirement::MinimumRole(Role::User), |(_, rule)| *rule)
}

fn redirect_to(target: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, target.to_owned()))
        .finish()
}

fn render_allowed(path: &str, user: &User) -> HttpResponse {
    // Guard already passed; the unwrap_or is unreachable in practice but
    // keeps this path total.
    let effective_role = resolve_effective_role(Some(user)).unwrap_or(Role::User);
    HttpResponse::Ok().json(DashboardView {
        page: path.to_owned(),
        user: user.name.clone(),
        effective_role,
    })
}

/// Shared handler for every guarded dashboard route.
pub async fn dashboard(req: HttpRequest, session: SessionContext) -> HttpResponse {
    let user = session.current_user();
    let requirement = requirement_for(req.path());
    match guard_page(user.as_ref(), requirement, req.path()) {
        GuardDecision::Allow => match user {
            Some(user) => render_allowed(req.path(), &user),
            // Allow without a user cannot happen; guard redirects first.
            None => redirect_to(LOGIN_PATH),
        },
        GuardDecision::RedirectTo(target) => {
            tracing::debug!(path = %req.path(), %target, "navigation redirected");
            redirect_to(&target)
        }
    }
}

/// Root route: send the visitor to their dashboard, or to login.
pub async fn index(session: SessionContext) -> HttpResponse {
    let user = session.current_user();
    match resolve_effective_role(user.as_ref()) {
        Ok(role) => redirect_to(dashboard_path(role)),
        Err(_) => redirect_to(LOGIN_PATH),
    }
}

/// Login page stub; the real form is rendered by the frontend assets.
pub async fn login_page() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "page": LOGIN_PATH }))
}

/// Register the rule table plus the root and login routes on a scope-less app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route(LOGIN_PATH, web::get().to(login_page));
    for (path, _) in ROUTE_RULES {
        cfg.route(path, web::get().to(dashboard));
    }
}
