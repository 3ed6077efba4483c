//! `cinedex-core`: shared model for the Movies resource.
//!
//! This crate contains **pure** types (no HTTP, no storage): the record shapes
//! exchanged over `/api/movies`, the query options used to list them and the
//! domain error model. Both the backend and the client depend on it.

pub mod criteria;
pub mod entity;
pub mod error;
pub mod id;
pub mod movie;

pub use criteria::{
    Direction, MovieCriteria, MovieField, Pageable, QueryOptions, RangeFilter, SortOrder,
    StringFilter,
};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::MovieId;
pub use movie::{Movie, MovieDraft, MoviePatch, NewMovie};
