//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::AuthProvider;
use crate::inbound::http::dashboards;
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::users::{login, logout, me, AuthProviderHandle};
use crate::middleware::Trace;

fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(same_site)
        .build()
}

/// Assemble the application: session middleware, trace middleware, the
/// session API scope, the guarded dashboard routes, and health probes.
pub fn build_app(
    health_state: web::Data<HealthState>,
    auth_provider: Arc<dyn AuthProvider>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = session_middleware(key, cookie_secure, same_site);

    let api = web::scope("/api/v1").service(login).service(logout).service(me);

    let app = App::new()
        .app_data(health_state)
        .app_data(web::Data::new(auth_provider as AuthProviderHandle))
        .wrap(Trace)
        .wrap(session)
        .service(api)
        .configure(dashboards::configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app =
        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind and start the HTTP server from a [`ServerConfig`].
///
/// # Errors
///
/// Returns the bind error when the configured address is unavailable.
pub fn build_server(
    config: ServerConfig,
    health_state: web::Data<HealthState>,
) -> std::io::Result<Server> {
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        auth_provider,
    } = config;

    let server = HttpServer::new(move || {
        build_app(
            health_state.clone(),
            auth_provider.clone(),
            key.clone(),
            cookie_secure,
            same_site,
        )
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
