//! Backend configuration, read once from the environment at startup.

use std::net::SocketAddr;

use anyhow::Context;

pub const BIND_ADDR_ENV: &str = "CINEDEX_BIND_ADDR";
pub const APP_NAME_ENV: &str = "CINEDEX_APP_NAME";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_APP_NAME: &str = "cinedexApp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Prefix of the `X-<app>-alert` / `X-<app>-params` response headers.
    pub app_name: String,
    /// Postgres connection string; the in-memory store is used when unset.
    pub database_url: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map instead of the
    /// process environment).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let raw_addr = lookup(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("{BIND_ADDR_ENV} is not a socket address: {raw_addr:?}"))?;

        let app_name = lookup(APP_NAME_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

        let database_url = lookup(DATABASE_URL_ENV).filter(|v| !v.trim().is_empty());

        Ok(Self {
            bind_addr,
            app_name,
            database_url,
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            app_name: DEFAULT_APP_NAME.to_string(),
            database_url: None,
        }
    }
}
