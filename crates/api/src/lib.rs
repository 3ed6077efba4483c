//! HTTP API: the `/api/movies` REST resource.

pub mod app;
pub mod config;
pub mod store;

pub use config::ApiConfig;
