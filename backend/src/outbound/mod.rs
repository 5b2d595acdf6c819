//! Outbound adapters implementing domain ports against remote services.

pub mod upstream;

pub use upstream::UpstreamAuthClient;
