//! `cinedex-client`
//!
//! **Responsibility:** the movies CRUD module as seen from a UI host.
//!
//! This crate provides:
//! - the REST transport for `/api/movies` (plus identity/merge helpers)
//! - the edit form adapter
//! - the route table, access guard and route resolver
//! - list, detail, update and delete-dialog view controllers
//!
//! Rendering stays with the host: views expose state and actions only.

pub mod config;
pub mod error;
pub mod events;
pub mod form;
pub mod guard;
pub mod navigation;
pub mod resolver;
pub mod routes;
pub mod service;
pub mod views;

#[cfg(test)]
mod testing;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use events::{EventBus, MovieEvent, ITEM_DELETED_EVENT};
pub use form::{FormError, FormField, MovieForm};
pub use guard::{AuthorityGuard, Principal, RouteGuard};
pub use navigation::{History, Navigator};
pub use resolver::{MovieResolver, Resolution};
pub use routes::{MovieRoute, MovieRouter, Page};
pub use service::{
    add_movies_to_collection_if_missing, compare_movies, EntityResponse, HttpMovieService,
    MovieTransport,
};
