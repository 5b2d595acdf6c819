//! HTTP inbound adapter exposing the guarded pages and the session API.

pub mod dashboards;
pub mod error;
pub mod health;
pub mod session;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
