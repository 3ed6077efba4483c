//! In-memory transport for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use cinedex_core::{Movie, MovieCriteria, MovieId, MoviePatch, NewMovie, QueryOptions};

use crate::error::{ClientError, ClientResult};
use crate::service::{EntityResponse, MovieTransport};
use crate::views::BusyFlag;

#[derive(Default)]
struct State {
    movies: Vec<Movie>,
    calls: Vec<String>,
    fail_status: Option<u16>,
    watched: Option<BusyFlag>,
    observed: Vec<bool>,
}

/// Records every call; optionally fails all of them with one status.
#[derive(Default)]
pub(crate) struct MockTransport {
    state: Mutex<State>,
}

impl MockTransport {
    pub(crate) fn with_movies(movies: Vec<Movie>) -> Self {
        let transport = Self::default();
        transport.state.lock().unwrap().movies = movies;
        transport
    }

    pub(crate) fn fail_with(&self, status: u16) {
        self.state.lock().unwrap().fail_status = Some(status);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Sample `flag` at every call.
    pub(crate) fn observe(&self, flag: BusyFlag) {
        self.state.lock().unwrap().watched = Some(flag);
    }

    pub(crate) fn observed(&self) -> Vec<bool> {
        self.state.lock().unwrap().observed.clone()
    }

    fn record(&self, call: String) -> ClientResult<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if let Some(flag) = state.watched.clone() {
            state.observed.push(flag.get());
        }
        match state.fail_status {
            Some(status) => Err(ClientError::Api {
                status,
                body: "mock failure".into(),
            }),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl MovieTransport for MockTransport {
    async fn find(&self, id: MovieId) -> ClientResult<EntityResponse<Movie>> {
        let state = self.record(format!("find {id}"))?;
        Ok(match state.movies.iter().find(|m| m.id == id) {
            Some(movie) => EntityResponse::ok(movie.clone()),
            None => EntityResponse::empty(200),
        })
    }

    async fn query(&self, options: &QueryOptions) -> ClientResult<EntityResponse<Vec<Movie>>> {
        let query = options
            .to_pairs()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        let state = self.record(format!("query {query}"))?;
        let total = state.movies.len() as u64;
        Ok(EntityResponse::ok(state.movies.clone()).with_total_count(total))
    }

    async fn search(&self, keyword: &str) -> ClientResult<EntityResponse<Vec<Movie>>> {
        let state = self.record(format!("search {keyword}"))?;
        let found = state
            .movies
            .iter()
            .filter(|m| m.name.as_deref().is_some_and(|n| n.starts_with(keyword)))
            .cloned()
            .collect();
        Ok(EntityResponse::ok(found))
    }

    async fn count(&self, criteria: &MovieCriteria) -> ClientResult<EntityResponse<u64>> {
        let state = self.record("count".to_string())?;
        let total = state.movies.iter().filter(|m| criteria.matches(m)).count() as u64;
        Ok(EntityResponse::ok(total))
    }

    async fn create(&self, movie: &NewMovie) -> ClientResult<EntityResponse<Movie>> {
        let mut state = self.record("create".to_string())?;
        let next = state.movies.iter().map(|m| m.id.get()).max().unwrap_or(0) + 1;
        let created = Movie::from_new(MovieId::new(next), movie.clone());
        state.movies.push(created.clone());
        Ok(EntityResponse::ok(created))
    }

    async fn update(&self, movie: &Movie) -> ClientResult<EntityResponse<Movie>> {
        let mut state = self.record(format!("update {}", movie.id))?;
        state.movies.retain(|m| m.id != movie.id);
        state.movies.push(movie.clone());
        Ok(EntityResponse::ok(movie.clone()))
    }

    async fn partial_update(&self, patch: &MoviePatch) -> ClientResult<EntityResponse<Movie>> {
        let mut state = self.record(format!("patch {}", patch.id))?;
        let Some(existing) = state.movies.iter_mut().find(|m| m.id == patch.id) else {
            return Err(ClientError::Api {
                status: 404,
                body: String::new(),
            });
        };
        existing.apply_patch(patch);
        Ok(EntityResponse::ok(existing.clone()))
    }

    async fn delete(&self, id: MovieId) -> ClientResult<EntityResponse<()>> {
        let mut state = self.record(format!("delete {id}"))?;
        state.movies.retain(|m| m.id != id);
        Ok(EntityResponse::empty(204))
    }
}
