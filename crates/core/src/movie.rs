//! Movies record shapes.
//!
//! - [`Movie`]: a persisted record (id always present)
//! - [`NewMovie`]: a record that has not been created yet (no id)
//! - [`MoviePatch`]: a partial update (id required, everything else optional)
//! - [`MovieDraft`]: what an edit form holds, either of the first two

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::MovieId;

/// A persisted Movies record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl Movie {
    /// A record with only the identifier set.
    pub fn with_id(id: MovieId) -> Self {
        Self {
            id,
            name: None,
            category: None,
            rating: None,
        }
    }

    /// Persist a new record under the id the store assigned.
    pub fn from_new(id: MovieId, new: NewMovie) -> Self {
        Self {
            id,
            name: new.name,
            category: new.category,
            rating: new.rating,
        }
    }

    /// Merge the non-empty fields of `patch` into this record.
    ///
    /// The identifier never changes; fields the patch leaves out keep their
    /// current value.
    pub fn apply_patch(&mut self, patch: &MoviePatch) {
        if let Some(name) = &patch.name {
            self.name = Some(name.clone());
        }
        if let Some(category) = &patch.category {
            self.category = Some(category.clone());
        }
        if let Some(rating) = patch.rating {
            self.rating = Some(rating);
        }
    }
}

impl Entity for Movie {
    type Id = MovieId;

    fn id(&self) -> MovieId {
        self.id
    }
}

/// A record that has not been persisted yet; the server assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMovie {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Partial update: only the supplied fields are changed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePatch {
    pub id: MovieId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl MoviePatch {
    pub fn new(id: MovieId) -> Self {
        Self {
            id,
            name: None,
            category: None,
            rating: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }
}

impl Entity for MoviePatch {
    type Id = MovieId;

    fn id(&self) -> MovieId {
        self.id
    }
}

/// The record an edit form currently describes.
#[derive(Debug, Clone, PartialEq)]
pub enum MovieDraft {
    /// Edit of a persisted record (saved with a full update).
    Existing(Movie),
    /// Not created yet (saved with a create).
    New(NewMovie),
}

impl MovieDraft {
    pub fn id(&self) -> Option<MovieId> {
        match self {
            MovieDraft::Existing(movie) => Some(movie.id),
            MovieDraft::New(_) => None,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, MovieDraft::New(_))
    }
}
