use std::sync::Arc;

use cinedex_core::{Movie, MovieId};

use crate::navigation::Navigator;
use crate::resolver::Resolution;

/// Read-only view of a resolved record.
pub struct MovieDetailView {
    movie: Option<Movie>,
    navigator: Arc<dyn Navigator>,
}

impl MovieDetailView {
    pub fn new(resolution: Resolution, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            movie: resolution.into_movie(),
            navigator,
        }
    }

    pub fn movie(&self) -> Option<&Movie> {
        self.movie.as_ref()
    }

    pub fn id(&self) -> Option<MovieId> {
        self.movie.as_ref().map(|m| m.id)
    }

    pub fn name(&self) -> Option<&str> {
        self.movie.as_ref().and_then(|m| m.name.as_deref())
    }

    pub fn category(&self) -> Option<&str> {
        self.movie.as_ref().and_then(|m| m.category.as_deref())
    }

    pub fn rating(&self) -> Option<f64> {
        self.movie.as_ref().and_then(|m| m.rating)
    }

    /// Edit link for the shown record.
    pub fn edit_path(&self) -> Option<String> {
        self.id().map(|id| format!("{id}/edit"))
    }

    pub fn previous_state(&self) {
        self.navigator.back();
    }
}
