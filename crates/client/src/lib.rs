//! Typed HTTP client for the marketplace API.
//!
//! Boots from the generated `config.json`, attaches the optional bearer key,
//! and maps the `{ data }` / `{ data, meta }` envelopes to view models.

pub mod config;
pub mod views;
pub mod api;

pub use api::ApiClient;
pub use config::BootConfig;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },
}
