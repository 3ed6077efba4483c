//! Route-level data fetch for the detail, create and edit pages.

use std::sync::Arc;

use cinedex_core::{Movie, MovieId};

use crate::error::{ClientError, ClientResult};
use crate::navigation::{Navigator, NOT_FOUND_PAGE};
use crate::service::MovieTransport;

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No id in the route: the create flow.
    New,
    Found(Movie),
    /// The record is gone; navigation already moved to the not-found page.
    NotFound,
}

impl Resolution {
    pub fn into_movie(self) -> Option<Movie> {
        match self {
            Resolution::Found(movie) => Some(movie),
            Resolution::New | Resolution::NotFound => None,
        }
    }
}

#[derive(Clone)]
pub struct MovieResolver {
    transport: Arc<dyn MovieTransport>,
    navigator: Arc<dyn Navigator>,
}

impl MovieResolver {
    pub fn new(transport: Arc<dyn MovieTransport>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            transport,
            navigator,
        }
    }

    /// Resolve the `id` route parameter.
    ///
    /// Transport failures are returned as-is; only an empty body redirects.
    pub async fn resolve(&self, id_param: Option<&str>) -> ClientResult<Resolution> {
        let Some(raw) = id_param else {
            return Ok(Resolution::New);
        };
        let id: MovieId = raw.parse().map_err(|_| ClientError::InvalidId(raw.to_string()))?;

        match self.transport.find(id).await?.body {
            Some(movie) => Ok(Resolution::Found(movie)),
            None => {
                tracing::info!(%id, "movie not found, redirecting");
                self.navigator.navigate(NOT_FOUND_PAGE);
                Ok(Resolution::NotFound)
            }
        }
    }
}
