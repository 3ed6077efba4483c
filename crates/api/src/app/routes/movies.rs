use axum::{
    extract::{Extension, OriginalUri},
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use cinedex_core::{MovieCriteria, MovieId, QueryOptions};

use crate::app::dto::{MovieRequest, SearchParams};
use crate::app::errors::ApiError;
use crate::app::extract::{ApiJson, ApiPath, ApiQuery};
use crate::app::headers::{self, Alert};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_movies).post(create_movie))
        .route("/count", get(count_movies))
        .route("/search", get(search_movies))
        .route(
            "/:id",
            get(get_movie)
                .put(update_movie)
                .patch(partial_update_movie)
                .delete(delete_movie),
        )
}

pub async fn create_movie(
    Extension(services): Extension<AppServices>,
    ApiJson(body): ApiJson<MovieRequest>,
) -> Result<Response, ApiError> {
    let created = services.movies.create(body).await?;

    let mut headers = services.alerts.for_entity(Alert::Created, created.id);
    if let Ok(location) = HeaderValue::from_str(&format!("/api/movies/{}", created.id)) {
        headers.insert(LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(created)).into_response())
}

pub async fn update_movie(
    Extension(services): Extension<AppServices>,
    ApiPath(id): ApiPath<MovieId>,
    ApiJson(body): ApiJson<MovieRequest>,
) -> Result<Response, ApiError> {
    let updated = services.movies.update(id, body).await?;
    let headers = services.alerts.for_entity(Alert::Updated, id);
    Ok((StatusCode::OK, headers, Json(updated)).into_response())
}

/// Accepts `application/json` and `application/merge-patch+json`.
pub async fn partial_update_movie(
    Extension(services): Extension<AppServices>,
    ApiPath(id): ApiPath<MovieId>,
    ApiJson(body): ApiJson<MovieRequest>,
) -> Result<Response, ApiError> {
    let updated = services.movies.partial_update(id, body).await?;
    let headers = services.alerts.for_entity(Alert::Updated, id);
    Ok((StatusCode::OK, headers, Json(updated)).into_response())
}

pub async fn list_movies(
    Extension(services): Extension<AppServices>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(pairs): ApiQuery<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let options = QueryOptions::from_pairs(&pairs)?;
    let pageable = options.pageable()?;

    let page = services.movies.find_page(&options.criteria, &pageable).await?;
    let headers = headers::pagination(uri.path(), uri.query(), &pageable, page.total);
    Ok((StatusCode::OK, headers, Json(page.items)).into_response())
}

pub async fn count_movies(
    Extension(services): Extension<AppServices>,
    ApiQuery(pairs): ApiQuery<Vec<(String, String)>>,
) -> Result<Json<u64>, ApiError> {
    let criteria = MovieCriteria::from_pairs(&pairs)?;
    Ok(Json(services.movies.count(&criteria).await?))
}

pub async fn search_movies(
    Extension(services): Extension<AppServices>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Response, ApiError> {
    let movies = services.movies.search(&params.keyword).await?;
    Ok(Json(movies).into_response())
}

pub async fn get_movie(
    Extension(services): Extension<AppServices>,
    ApiPath(id): ApiPath<MovieId>,
) -> Result<Response, ApiError> {
    let movie = services.movies.find(id).await?;
    Ok(Json(movie).into_response())
}

pub async fn delete_movie(
    Extension(services): Extension<AppServices>,
    ApiPath(id): ApiPath<MovieId>,
) -> Result<Response, ApiError> {
    services.movies.delete(id).await?;
    let headers = services.alerts.for_entity(Alert::Deleted, id);
    Ok((StatusCode::NO_CONTENT, headers).into_response())
}
