//! Gateway library modules: domain access resolver, HTTP adapters, and
//! server wiring for the project-management dashboard front door.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
