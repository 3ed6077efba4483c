use axum::Router;

pub mod movies;
pub mod system;

/// Router for all `/api` endpoints.
pub fn router() -> Router {
    Router::new().nest("/api/movies", movies::router())
}
