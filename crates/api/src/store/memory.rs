use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use cinedex_core::{Movie, MovieCriteria, MovieId, NewMovie, Pageable};

use super::{MoviePage, MovieStore, StoreError};

#[derive(Debug)]
struct Inner {
    movies: BTreeMap<MovieId, Movie>,
    next_id: i64,
}

/// In-memory store for tests/dev.
///
/// Ids are assigned sequentially starting at 1 and never reused.
#[derive(Debug)]
pub struct InMemoryMovieStore {
    inner: RwLock<Inner>,
}

impl InMemoryMovieStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                movies: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn filtered(&self, criteria: &MovieCriteria) -> Result<Vec<Movie>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner
            .movies
            .values()
            .filter(|m| criteria.matches(m))
            .cloned()
            .collect())
    }
}

impl Default for InMemoryMovieStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MovieStore for InMemoryMovieStore {
    async fn insert(&self, movie: NewMovie) -> Result<Movie, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let id = MovieId::new(inner.next_id);
        inner.next_id += 1;

        let movie = Movie::from_new(id, movie);
        inner.movies.insert(id, movie.clone());
        Ok(movie)
    }

    async fn save(&self, movie: Movie) -> Result<Movie, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        match inner.movies.get_mut(&movie.id) {
            Some(existing) => {
                *existing = movie.clone();
                Ok(movie)
            }
            None => Err(StoreError::NotFound(movie.id)),
        }
    }

    async fn find(&self, id: MovieId) -> Result<Option<Movie>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.movies.get(&id).cloned())
    }

    async fn exists(&self, id: MovieId) -> Result<bool, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.movies.contains_key(&id))
    }

    async fn delete(&self, id: MovieId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.movies.remove(&id).is_some())
    }

    async fn find_page(
        &self,
        criteria: &MovieCriteria,
        pageable: &Pageable,
    ) -> Result<MoviePage, StoreError> {
        let mut matching = self.filtered(criteria)?;
        let total = matching.len() as u64;
        pageable.sort(&mut matching);

        let offset = usize::try_from(pageable.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(pageable.size as usize)
            .collect();

        Ok(MoviePage { items, total })
    }

    async fn count(&self, criteria: &MovieCriteria) -> Result<u64, StoreError> {
        Ok(self.filtered(criteria)?.len() as u64)
    }

    async fn search_by_name_or_category(&self, keyword: &str) -> Result<Vec<Movie>, StoreError> {
        let keyword = keyword.to_lowercase();
        let starts_with = |value: &Option<String>| {
            value
                .as_deref()
                .is_some_and(|v| v.to_lowercase().starts_with(&keyword))
        };

        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner
            .movies
            .values()
            .filter(|m| starts_with(&m.name) || starts_with(&m.category))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use cinedex_core::{MovieField, SortOrder};

    use super::*;

    fn new_movie(name: &str, category: &str, rating: f64) -> NewMovie {
        NewMovie {
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            rating: Some(rating),
        }
    }

    async fn seeded() -> InMemoryMovieStore {
        let store = InMemoryMovieStore::new();
        store.insert(new_movie("Heat", "Crime", 8.3)).await.unwrap();
        store.insert(new_movie("Alien", "Horror", 8.5)).await.unwrap();
        store.insert(new_movie("Arrival", "Sci-Fi", 7.9)).await.unwrap();
        store
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = InMemoryMovieStore::new();
        let a = store.insert(NewMovie::default()).await.unwrap();
        let b = store.insert(NewMovie::default()).await.unwrap();
        assert_eq!(a.id, MovieId::new(1));
        assert_eq!(b.id, MovieId::new(2));

        store.delete(b.id).await.unwrap();
        let c = store.insert(NewMovie::default()).await.unwrap();
        assert_eq!(c.id, MovieId::new(3));
    }

    #[tokio::test]
    async fn save_requires_existing_record() {
        let store = InMemoryMovieStore::new();
        let err = store.save(Movie::with_id(MovieId::new(9))).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == MovieId::new(9)));
    }

    #[tokio::test]
    async fn page_is_sorted_and_sliced_with_total() {
        let store = seeded().await;
        let pageable = Pageable {
            page: 0,
            size: 2,
            sort: vec![SortOrder::desc(MovieField::Rating)],
        };

        let page = store.find_page(&MovieCriteria::default(), &pageable).await.unwrap();
        assert_eq!(page.total, 3);
        let names: Vec<_> = page.items.iter().map(|m| m.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["Alien", "Heat"]);

        let second = Pageable { page: 1, ..pageable };
        let page = store.find_page(&MovieCriteria::default(), &second).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name.as_deref(), Some("Arrival"));
    }

    #[tokio::test]
    async fn search_matches_prefix_of_name_or_category() {
        let store = seeded().await;

        let hits = store.search_by_name_or_category("a").await.unwrap();
        let names: Vec<_> = hits.iter().map(|m| m.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["Alien", "Arrival"]);

        let hits = store.search_by_name_or_category("CRI").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name.as_deref(), Some("Heat"));

        // Prefix only: "eat" is inside "Heat" but does not start it.
        assert!(store.search_by_name_or_category("eat").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn count_applies_criteria() {
        let store = seeded().await;
        let mut criteria = MovieCriteria::default();
        criteria.rating.greater_than_or_equal = Some(8.3);
        assert_eq!(store.count(&criteria).await.unwrap(), 2);
    }
}
