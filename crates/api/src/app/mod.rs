//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: movie service (identity rules over the store)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs
//! - `headers.rs`: alert and pagination headers
//! - `errors.rs`: consistent error responses
//! - `extract.rs`: extractors that reject with `ApiError`

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::store::{InMemoryMovieStore, MovieStore};

pub mod dto;
pub mod errors;
pub mod extract;
pub mod headers;
pub mod routes;
pub mod services;

/// Build the full HTTP router over an already-constructed store.
pub fn build_app(store: Arc<dyn MovieStore>, app_name: &str) -> anyhow::Result<Router> {
    let alerts = headers::AlertHeaders::new(app_name)
        .with_context(|| format!("app name {app_name:?} is not usable in a header name"))?;
    let services = services::AppServices {
        movies: services::MovieService::new(store),
        alerts,
    };

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services))))
}

/// Pick the store the configuration asks for.
pub async fn build_store(config: &ApiConfig) -> anyhow::Result<Arc<dyn MovieStore>> {
    match &config.database_url {
        #[cfg(feature = "postgres")]
        Some(url) => {
            tracing::info!("using postgres movie store");
            let store = crate::store::PostgresMovieStore::connect(url)
                .await
                .context("failed to connect to postgres")?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "postgres"))]
        Some(_) => {
            tracing::warn!("DATABASE_URL set but the `postgres` feature is off; using in-memory store");
            Ok(Arc::new(InMemoryMovieStore::new()))
        }
        None => {
            tracing::info!("using in-memory movie store");
            Ok(Arc::new(InMemoryMovieStore::new()))
        }
    }
}
