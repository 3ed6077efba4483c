use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};

use cinedex_core::{Movie, MovieCriteria, MovieField, QueryOptions, SortOrder};

use crate::error::ClientResult;
use crate::events::{EventBus, MovieEvent};
use crate::service::MovieTransport;
use crate::views::{BusyFlag, DialogOutcome, MovieDeleteDialog};

/// Paged list of movies, always sorted by `id,asc`.
pub struct MovieListView {
    transport: Arc<dyn MovieTransport>,
    events: EventBus,
    deleted: broadcast::Receiver<MovieEvent>,
    criteria: MovieCriteria,
    page: Option<u32>,
    size: Option<u32>,
    movies: Vec<Movie>,
    total_count: Option<u64>,
    is_loading: BusyFlag,
}

impl MovieListView {
    pub fn new(transport: Arc<dyn MovieTransport>, events: EventBus) -> Self {
        let deleted = events.subscribe();
        Self {
            transport,
            events,
            deleted,
            criteria: MovieCriteria::default(),
            page: None,
            size: None,
            movies: Vec::new(),
            total_count: None,
            is_loading: BusyFlag::default(),
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.get()
    }

    pub fn loading_flag(&self) -> BusyFlag {
        self.is_loading.clone()
    }

    pub fn set_criteria(&mut self, criteria: MovieCriteria) {
        self.criteria = criteria;
    }

    pub fn set_page(&mut self, page: u32, size: u32) {
        self.page = Some(page);
        self.size = Some(size);
    }

    pub fn query_options(&self) -> QueryOptions {
        let mut options = QueryOptions::new()
            .criteria(self.criteria.clone())
            .sort(SortOrder::asc(MovieField::Id));
        options.page = self.page;
        options.size = self.size;
        options
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        let _loading = self.is_loading.raise();
        let response = self.transport.query(&self.query_options()).await?;
        self.total_count = response.total_count;
        self.movies = response.body.unwrap_or_default();
        tracing::debug!(rows = self.movies.len(), total = ?self.total_count, "movies loaded");
        Ok(())
    }

    /// Replace the rows with the records matching `keyword`.
    pub async fn search(&mut self, keyword: &str) -> ClientResult<()> {
        let _loading = self.is_loading.raise();
        let response = self.transport.search(keyword).await?;
        self.movies = response.body.unwrap_or_default();
        self.total_count = response.total_count;
        Ok(())
    }

    pub fn new_path(&self) -> &'static str {
        "new"
    }

    pub fn view_path(&self, movie: &Movie) -> String {
        format!("{}/view", movie.id)
    }

    pub fn edit_path(&self, movie: &Movie) -> String {
        format!("{}/edit", movie.id)
    }

    /// Open the delete confirmation for a row.
    pub fn delete(&self, movie: &Movie) -> MovieDeleteDialog {
        MovieDeleteDialog::new(self.transport.clone(), self.events.clone(), movie.clone())
    }

    /// Returns whether the list reloaded.
    pub async fn on_dialog_closed(&mut self, outcome: DialogOutcome) -> ClientResult<bool> {
        if !outcome.is_item_deleted() {
            return Ok(false);
        }
        // our own dialog published the signal too
        self.drain_deleted();
        self.load().await?;
        Ok(true)
    }

    /// Reload if any item-deleted signal arrived since the last check.
    pub async fn refresh_on_deleted(&mut self) -> ClientResult<bool> {
        if !self.drain_deleted() {
            return Ok(false);
        }
        self.load().await?;
        Ok(true)
    }

    fn drain_deleted(&mut self) -> bool {
        let mut seen = false;
        loop {
            match self.deleted.try_recv() {
                Ok(MovieEvent::ItemDeleted(_)) | Err(TryRecvError::Lagged(_)) => seen = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => return seen,
            }
        }
    }
}
