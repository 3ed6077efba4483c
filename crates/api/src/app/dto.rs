use serde::Deserialize;

use cinedex_core::{Movie, MovieId, MoviePatch, NewMovie};

// -------------------------
// Request DTOs
// -------------------------

/// Body of create/update/partial-update requests.
///
/// `id` is optional on the wire so the identity rules (must be absent on
/// create, must match the path on update) can be checked explicitly.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MovieRequest {
    #[serde(default)]
    pub id: Option<MovieId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl MovieRequest {
    pub fn into_new(self) -> NewMovie {
        NewMovie {
            name: self.name,
            category: self.category,
            rating: self.rating,
        }
    }

    pub fn into_movie(self, id: MovieId) -> Movie {
        Movie {
            id,
            name: self.name,
            category: self.category,
            rating: self.rating,
        }
    }

    pub fn into_patch(self, id: MovieId) -> MoviePatch {
        MoviePatch {
            id,
            name: self.name,
            category: self.category,
            rating: self.rating,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub keyword: String,
}
