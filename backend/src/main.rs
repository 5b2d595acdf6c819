//! Gateway entry-point: wires session middleware, guarded dashboard routes,
//! and the session API over the remote auth backend.

use std::env;
use std::sync::Arc;

use actix_web::cookie::Key;
use actix_web::web;
use reqwest::Url;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use backend::domain::ports::FixtureAuthProvider;
use backend::domain::AuthProvider;
use backend::inbound::http::health::HealthState;
use backend::outbound::UpstreamAuthClient;
use backend::server::{build_server, ServerConfig};

fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

fn auth_provider() -> std::io::Result<Arc<dyn AuthProvider>> {
    match env::var("UPSTREAM_AUTH_URL") {
        Ok(raw) => {
            let endpoint: Url = raw
                .parse()
                .map_err(|e| std::io::Error::other(format!("invalid UPSTREAM_AUTH_URL: {e}")))?;
            let client = UpstreamAuthClient::new(endpoint)
                .map_err(|e| std::io::Error::other(format!("auth client: {e}")))?;
            Ok(Arc::new(client))
        }
        Err(_) => {
            if cfg!(debug_assertions) {
                warn!("UPSTREAM_AUTH_URL unset; using fixture auth provider (dev only)");
                Ok(Arc::new(FixtureAuthProvider::dev_admin()))
            } else {
                Err(std::io::Error::other("UPSTREAM_AUTH_URL must be set"))
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let bind_addr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let provider = auth_provider()?;
    let config = ServerConfig::new(key, cookie_secure, bind_addr, provider);

    let health_state = web::Data::new(HealthState::new());
    let server = build_server(config, health_state.clone())?;

    health_state.mark_ready();
    info!(%bind_addr, "dashboard gateway listening");
    server.await
}
