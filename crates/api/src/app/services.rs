//! Movie service: identity rules on top of a [`MovieStore`].

use std::sync::Arc;

use cinedex_core::{Movie, MovieCriteria, MovieId, Pageable};

use crate::app::dto::MovieRequest;
use crate::app::errors::ApiError;
use crate::app::headers::AlertHeaders;
use crate::store::{MoviePage, MovieStore};

/// Shared handler state (wired once in `build_app`).
#[derive(Clone)]
pub struct AppServices {
    pub movies: MovieService,
    pub alerts: AlertHeaders,
}

#[derive(Clone)]
pub struct MovieService {
    store: Arc<dyn MovieStore>,
}

impl MovieService {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self { store }
    }

    /// Create a record. The request must not carry an id.
    pub async fn create(&self, request: MovieRequest) -> Result<Movie, ApiError> {
        tracing::debug!(?request, "request to save movie");
        if request.id.is_some() {
            return Err(ApiError::id_exists());
        }
        Ok(self.store.insert(request.into_new()).await?)
    }

    /// Replace every field of the record at `id`.
    pub async fn update(&self, id: MovieId, request: MovieRequest) -> Result<Movie, ApiError> {
        tracing::debug!(%id, ?request, "request to update movie");
        self.check_identity(id, &request).await?;
        Ok(self.store.save(request.into_movie(id)).await?)
    }

    /// Merge the non-null fields of the request into the record at `id`.
    pub async fn partial_update(&self, id: MovieId, request: MovieRequest) -> Result<Movie, ApiError> {
        tracing::debug!(%id, ?request, "request to partially update movie");
        self.check_identity(id, &request).await?;

        let mut existing = self.store.find(id).await?.ok_or(ApiError::NotFound)?;
        existing.apply_patch(&request.into_patch(id));
        Ok(self.store.save(existing).await?)
    }

    pub async fn find(&self, id: MovieId) -> Result<Movie, ApiError> {
        tracing::debug!(%id, "request to get movie");
        self.store.find(id).await?.ok_or(ApiError::NotFound)
    }

    pub async fn find_page(
        &self,
        criteria: &MovieCriteria,
        pageable: &Pageable,
    ) -> Result<MoviePage, ApiError> {
        tracing::debug!(?criteria, ?pageable, "find movies by criteria");
        Ok(self.store.find_page(criteria, pageable).await?)
    }

    pub async fn count(&self, criteria: &MovieCriteria) -> Result<u64, ApiError> {
        tracing::debug!(?criteria, "count movies by criteria");
        Ok(self.store.count(criteria).await?)
    }

    pub async fn search(&self, keyword: &str) -> Result<Vec<Movie>, ApiError> {
        tracing::debug!(keyword, "search movies by name or category");
        Ok(self.store.search_by_name_or_category(keyword).await?)
    }

    /// Deleting a missing record is not an error.
    pub async fn delete(&self, id: MovieId) -> Result<(), ApiError> {
        tracing::debug!(%id, "request to delete movie");
        if !self.store.delete(id).await? {
            tracing::debug!(%id, "delete of unknown movie ignored");
        }
        Ok(())
    }

    /// The body id must be present, match the path id, and exist.
    async fn check_identity(&self, id: MovieId, request: &MovieRequest) -> Result<(), ApiError> {
        let body_id = request.id.ok_or_else(ApiError::id_null)?;
        if body_id != id {
            return Err(ApiError::id_invalid());
        }
        if !self.store.exists(id).await? {
            return Err(ApiError::id_not_found());
        }
        Ok(())
    }
}
