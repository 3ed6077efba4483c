//! Command-line host for the movies module: opens one route and prints it.
//!
//! Usage: `cinedex-client [path]` where `path` is a module route
//! (``, `new`, `{id}/view`, `{id}/edit`).

use std::sync::Arc;

use anyhow::Context;

use cinedex_client::form;
use cinedex_client::guard::DEFAULT_AUTHORITY;
use cinedex_client::{
    AuthorityGuard, ClientConfig, EventBus, History, HttpMovieService, MovieRouter, Page, Principal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cinedex_observability::init();

    let config = ClientConfig::from_env()?;
    let path = std::env::args().nth(1).unwrap_or_default();

    tracing::info!(api_url = %config.api_url, authenticated = config.auth_token.is_some(), "starting movies client");

    let transport = Arc::new(HttpMovieService::new(&config).context("failed to build HTTP client")?);
    let guard = AuthorityGuard::for_principal(Principal::new("cli").with_authority(DEFAULT_AUTHORITY));
    let router = MovieRouter::new(transport, Arc::new(History::new()), Arc::new(guard), EventBus::new());

    let page = router
        .navigate(&path)
        .await
        .with_context(|| format!("failed to open route {path:?}"))?;

    match page {
        Page::List(view) => {
            tracing::info!(total = ?view.total_count(), "movies listed");
            println!("{}", serde_json::to_string_pretty(view.movies())?);
        }
        Page::Detail(view) => {
            println!("{}", serde_json::to_string_pretty(&view.movie())?);
        }
        Page::Update(view) => {
            println!("{:#?}", form::extract(view.form()));
        }
        Page::NotFound => anyhow::bail!("no movie at {path:?}"),
        Page::AccessDenied => anyhow::bail!("access to {path:?} denied"),
    }

    Ok(())
}
