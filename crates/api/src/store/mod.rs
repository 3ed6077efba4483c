//! Persistence for Movies records.
//!
//! [`MovieStore`] is the seam between the HTTP layer and storage:
//! - [`InMemoryMovieStore`]: dev/test, process-local
//! - `PostgresMovieStore` (feature `postgres`): durable, via `sqlx`

use async_trait::async_trait;
use thiserror::Error;

use cinedex_core::{Movie, MovieCriteria, MovieId, NewMovie, Pageable};

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::InMemoryMovieStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresMovieStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("movie {0} not found")]
    NotFound(MovieId),

    /// Internal lock poisoning (in-memory store).
    #[error("store lock poisoned")]
    Poisoned,

    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq)]
pub struct MoviePage {
    pub items: Vec<Movie>,
    /// Number of records matching the criteria across all pages.
    pub total: u64,
}

#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Persist a new record; the store assigns the id.
    async fn insert(&self, movie: NewMovie) -> Result<Movie, StoreError>;

    /// Replace every field of an existing record.
    async fn save(&self, movie: Movie) -> Result<Movie, StoreError>;

    async fn find(&self, id: MovieId) -> Result<Option<Movie>, StoreError>;

    async fn exists(&self, id: MovieId) -> Result<bool, StoreError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: MovieId) -> Result<bool, StoreError>;

    async fn find_page(
        &self,
        criteria: &MovieCriteria,
        pageable: &Pageable,
    ) -> Result<MoviePage, StoreError>;

    async fn count(&self, criteria: &MovieCriteria) -> Result<u64, StoreError>;

    /// Records whose name or category starts with `keyword`, ignoring case.
    async fn search_by_name_or_category(&self, keyword: &str) -> Result<Vec<Movie>, StoreError>;
}
