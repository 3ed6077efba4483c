//! Transport for the `/api/movies` resource.
//!
//! [`MovieTransport`] is the seam the resolver and views depend on;
//! [`HttpMovieService`] is the `reqwest` implementation. The identity helpers
//! [`compare_movies`] and [`add_movies_to_collection_if_missing`] work on any
//! [`Entity`] keyed by [`MovieId`].

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use cinedex_core::{Entity, Movie, MovieCriteria, MovieId, MoviePatch, NewMovie, QueryOptions};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

pub const RESOURCE_PATH: &str = "/api/movies";
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";
pub const MERGE_PATCH_JSON: &str = "application/merge-patch+json";

/// A decoded 2xx response.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityResponse<T> {
    pub status: u16,
    /// `X-Total-Count`, when the server sent it.
    pub total_count: Option<u64>,
    /// `None` when the response had no body.
    pub body: Option<T>,
}

impl<T> EntityResponse<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: 200,
            total_count: None,
            body: Some(body),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            total_count: None,
            body: None,
        }
    }

    pub fn with_total_count(mut self, total: u64) -> Self {
        self.total_count = Some(total);
        self
    }

    /// The body, or a decode error when the server sent none.
    pub fn require_body(self) -> ClientResult<T> {
        self.body
            .ok_or_else(|| ClientError::Decode(format!("empty response body (status {})", self.status)))
    }
}

/// HTTP operations on the movies resource.
#[async_trait]
pub trait MovieTransport: Send + Sync {
    async fn find(&self, id: MovieId) -> ClientResult<EntityResponse<Movie>>;

    async fn query(&self, options: &QueryOptions) -> ClientResult<EntityResponse<Vec<Movie>>>;

    async fn search(&self, keyword: &str) -> ClientResult<EntityResponse<Vec<Movie>>>;

    async fn count(&self, criteria: &MovieCriteria) -> ClientResult<EntityResponse<u64>>;

    async fn create(&self, movie: &NewMovie) -> ClientResult<EntityResponse<Movie>>;

    async fn update(&self, movie: &Movie) -> ClientResult<EntityResponse<Movie>>;

    async fn partial_update(&self, patch: &MoviePatch) -> ClientResult<EntityResponse<Movie>>;

    async fn delete(&self, id: MovieId) -> ClientResult<EntityResponse<()>>;
}

/// `reqwest` client for `<api_url>/api/movies`.
#[derive(Debug, Clone)]
pub struct HttpMovieService {
    http: reqwest::Client,
    resource_url: String,
    token: Option<String>,
}

impl HttpMovieService {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self {
            http,
            resource_url: format!("{}{RESOURCE_PATH}", config.api_url.trim_end_matches('/')),
            token: config.auth_token.clone(),
        })
    }

    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let req = self.http.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn item_url(&self, id: MovieId) -> String {
        format!("{}/{id}", self.resource_url)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<EntityResponse<T>> {
        let resp = req.send().await.map_err(|e| ClientError::Network(e.to_string()))?;
        let status = resp.status().as_u16();

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, %body, "movies request failed");
            return Err(ClientError::Api { status, body });
        }

        let total_count = resp
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());

        let bytes = resp.bytes().await.map_err(|e| ClientError::Network(e.to_string()))?;
        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            serde_json::from_slice::<Option<T>>(&bytes).map_err(|e| ClientError::Decode(e.to_string()))?
        };

        Ok(EntityResponse {
            status,
            total_count,
            body,
        })
    }
}

#[async_trait]
impl MovieTransport for HttpMovieService {
    async fn find(&self, id: MovieId) -> ClientResult<EntityResponse<Movie>> {
        tracing::debug!(%id, "GET movie");
        self.send(self.request(Method::GET, self.item_url(id))).await
    }

    async fn query(&self, options: &QueryOptions) -> ClientResult<EntityResponse<Vec<Movie>>> {
        let pairs = options.to_pairs();
        tracing::debug!(?pairs, "GET movies");
        self.send(self.request(Method::GET, self.resource_url.clone()).query(&pairs))
            .await
    }

    async fn search(&self, keyword: &str) -> ClientResult<EntityResponse<Vec<Movie>>> {
        tracing::debug!(keyword, "search movies");
        let url = format!("{}/search", self.resource_url);
        self.send(self.request(Method::GET, url).query(&[("keyword", keyword)]))
            .await
    }

    async fn count(&self, criteria: &MovieCriteria) -> ClientResult<EntityResponse<u64>> {
        let pairs = criteria.to_pairs();
        tracing::debug!(?pairs, "count movies");
        let url = format!("{}/count", self.resource_url);
        self.send(self.request(Method::GET, url).query(&pairs)).await
    }

    async fn create(&self, movie: &NewMovie) -> ClientResult<EntityResponse<Movie>> {
        tracing::debug!(?movie, "POST movie");
        self.send(self.request(Method::POST, self.resource_url.clone()).json(movie))
            .await
    }

    async fn update(&self, movie: &Movie) -> ClientResult<EntityResponse<Movie>> {
        tracing::debug!(?movie, "PUT movie");
        self.send(self.request(Method::PUT, self.item_url(movie.id)).json(movie))
            .await
    }

    async fn partial_update(&self, patch: &MoviePatch) -> ClientResult<EntityResponse<Movie>> {
        tracing::debug!(?patch, "PATCH movie");
        let body = serde_json::to_vec(patch).map_err(|e| ClientError::Decode(e.to_string()))?;
        let req = self
            .request(Method::PATCH, self.item_url(patch.id))
            .header(CONTENT_TYPE, MERGE_PATCH_JSON)
            .body(body);
        self.send(req).await
    }

    async fn delete(&self, id: MovieId) -> ClientResult<EntityResponse<()>> {
        tracing::debug!(%id, "DELETE movie");
        self.send(self.request(Method::DELETE, self.item_url(id))).await
    }
}

/// Identity equality: two absent values are equal, one absent value never
/// is, and two present values are equal when their ids are.
pub fn compare_movies<E: Entity>(a: Option<&E>, b: Option<&E>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.id() == b.id(),
        (None, None) => true,
        _ => false,
    }
}

/// Prepend every present candidate whose id is not in `collection` yet.
///
/// Candidates are deduplicated among themselves (first occurrence wins) and
/// keep their order ahead of the existing records. When nothing qualifies
/// the collection comes back unchanged.
pub fn add_movies_to_collection_if_missing<E, I>(collection: Vec<E>, candidates: I) -> Vec<E>
where
    E: Entity,
    I: IntoIterator<Item = Option<E>>,
{
    let mut seen: HashSet<E::Id> = collection.iter().map(|m| m.id()).collect();
    let mut merged: Vec<E> = candidates
        .into_iter()
        .flatten()
        .filter(|m| seen.insert(m.id()))
        .collect();

    if merged.is_empty() {
        return collection;
    }
    merged.extend(collection);
    merged
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn movie(id: i64) -> Movie {
        Movie::with_id(MovieId::new(id))
    }

    fn ids(movies: &[Movie]) -> Vec<i64> {
        movies.iter().map(|m| m.id.get()).collect()
    }

    #[test]
    fn compare_handles_absent_values() {
        assert!(compare_movies::<Movie>(None, None));
        assert!(!compare_movies(Some(&movie(1)), None));
        assert!(!compare_movies(None, Some(&movie(1))));
    }

    #[test]
    fn compare_uses_ids_only() {
        let mut renamed = movie(1);
        renamed.name = Some("Alien".into());
        assert!(compare_movies(Some(&movie(1)), Some(&renamed)));
        assert!(!compare_movies(Some(&movie(1)), Some(&movie(2))));
    }

    #[test]
    fn merge_into_empty_collection() {
        let merged = add_movies_to_collection_if_missing(Vec::new(), [Some(movie(1))]);
        assert_eq!(ids(&merged), vec![1]);
    }

    #[test]
    fn merge_skips_records_already_present() {
        let merged = add_movies_to_collection_if_missing(vec![movie(1)], [Some(movie(1))]);
        assert_eq!(ids(&merged), vec![1]);
    }

    #[test]
    fn merge_prepends_new_records() {
        let merged = add_movies_to_collection_if_missing(vec![movie(1)], [Some(movie(2))]);
        assert_eq!(ids(&merged), vec![2, 1]);
    }

    #[test]
    fn merge_keeps_the_first_of_duplicate_candidates() {
        let mut first = movie(2);
        first.name = Some("first".into());
        let mut second = movie(2);
        second.name = Some("second".into());

        let merged =
            add_movies_to_collection_if_missing(vec![movie(1)], [Some(first.clone()), Some(second)]);

        assert_eq!(ids(&merged), vec![2, 1]);
        assert_eq!(merged[0], first);
    }

    #[test]
    fn merge_ignores_absent_candidates() {
        let collection = vec![movie(1), movie(2)];
        let merged = add_movies_to_collection_if_missing(collection.clone(), [None, None]);
        assert_eq!(merged, collection);
    }

    #[test]
    fn require_body_rejects_empty_response() {
        let err = EntityResponse::<Movie>::empty(200).require_body().unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    proptest! {
        #[test]
        fn merge_never_duplicates_ids(
            existing in proptest::collection::btree_set(0i64..50, 0..10),
            candidates in proptest::collection::vec(proptest::option::of(0i64..50), 0..20),
        ) {
            let collection: Vec<Movie> = existing.iter().copied().map(movie).collect();
            let merged = add_movies_to_collection_if_missing(
                collection.clone(),
                candidates.iter().map(|c| c.map(movie)),
            );

            let merged_ids = ids(&merged);
            let unique: HashSet<i64> = merged_ids.iter().copied().collect();
            prop_assert_eq!(unique.len(), merged_ids.len());

            // every present candidate and every existing record survives
            for id in candidates.iter().flatten().chain(existing.iter()) {
                prop_assert!(unique.contains(id));
            }

            // existing records keep their order at the tail
            let tail = &merged_ids[merged_ids.len() - collection.len()..];
            let expected = ids(&collection);
            prop_assert_eq!(tail, expected.as_slice());
        }
    }
}
