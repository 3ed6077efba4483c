//! Client configuration, read once from the environment.

use std::time::Duration;

use anyhow::Context;

pub const API_URL_ENV: &str = "CINEDEX_API_URL";
pub const AUTH_TOKEN_ENV: &str = "CINEDEX_AUTH_TOKEN";
pub const HTTP_TIMEOUT_ENV: &str = "CINEDEX_HTTP_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server root; the movies resource lives at `<api_url>/api/movies`.
    pub api_url: String,
    /// Sent as `Authorization: Bearer <token>` when present.
    pub auth_token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_url = lookup(API_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let auth_token = lookup(AUTH_TOKEN_ENV).filter(|v| !v.trim().is_empty());

        let timeout = match lookup(HTTP_TIMEOUT_ENV) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("{HTTP_TIMEOUT_ENV} is not a number of seconds: {raw:?}"))?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            api_url,
            auth_token,
            timeout,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}
