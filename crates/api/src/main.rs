use anyhow::Context;

use cinedex_api::{app, ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cinedex_observability::init();

    let config = ApiConfig::from_env()?;
    let store = app::build_store(&config).await?;
    let router = app::build_app(store, &config.app_name)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
