use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::error::MovieError;
use super::model::Movie;
use super::repository::MovieStore;

/// In-memory store that enforces slug uniqueness the way the Postgres index does.
#[derive(Default)]
pub struct InMemoryMovieStore {
    movies: Mutex<HashMap<Uuid, Movie>>,
    writes: AtomicUsize,
    lose_updates: bool,
}

impl InMemoryMovieStore {
    pub fn with(movies: impl IntoIterator<Item = Movie>) -> Self {
        let store = Self::default();
        store
            .movies
            .lock()
            .unwrap()
            .extend(movies.into_iter().map(|m| (m.id, m)));
        store
    }

    /// A store whose `update` reports the row as absent even though it exists.
    pub fn losing_updates(movies: impl IntoIterator<Item = Movie>) -> Self {
        Self {
            lose_updates: true,
            ..Self::with(movies)
        }
    }

    pub fn snapshot(&self, id: Uuid) -> Option<Movie> {
        self.movies.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.movies.lock().unwrap().len()
    }

    /// Number of mutating calls that reached the store.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_cancel(cancel: &CancellationToken) -> Result<(), MovieError> {
        if cancel.is_cancelled() {
            return Err(MovieError::Cancelled);
        }
        Ok(())
    }

    fn slug_taken(movies: &HashMap<Uuid, Movie>, slug: &str, except: Uuid) -> bool {
        movies.values().any(|m| m.slug == slug && m.id != except)
    }
}

#[async_trait]
impl MovieStore for InMemoryMovieStore {
    async fn create(&self, movie: &Movie, cancel: &CancellationToken) -> Result<bool, MovieError> {
        Self::check_cancel(cancel)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut movies = self.movies.lock().unwrap();
        if movies.contains_key(&movie.id) {
            return Err(MovieError::Conflict("A movie with this id already exists".into()));
        }
        if Self::slug_taken(&movies, &movie.slug, movie.id) {
            return Err(MovieError::Conflict("A movie with this slug already exists".into()));
        }
        movies.insert(movie.id, movie.clone());
        Ok(true)
    }

    async fn get_by_id(&self, id: Uuid, cancel: &CancellationToken) -> Result<Option<Movie>, MovieError> {
        Self::check_cancel(cancel)?;
        Ok(self.snapshot(id))
    }

    async fn get_by_slug(&self, slug: &str, cancel: &CancellationToken) -> Result<Option<Movie>, MovieError> {
        Self::check_cancel(cancel)?;
        let movies = self.movies.lock().unwrap();
        Ok(movies.values().find(|m| m.slug == slug).cloned())
    }

    async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<Movie>, MovieError> {
        Self::check_cancel(cancel)?;
        let mut all: Vec<Movie> = self.movies.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn update(&self, movie: &Movie, cancel: &CancellationToken) -> Result<bool, MovieError> {
        Self::check_cancel(cancel)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.lose_updates {
            return Ok(false);
        }
        let mut movies = self.movies.lock().unwrap();
        if !movies.contains_key(&movie.id) {
            return Ok(false);
        }
        if Self::slug_taken(&movies, &movie.slug, movie.id) {
            return Err(MovieError::Conflict("A movie with this slug already exists".into()));
        }
        movies.insert(movie.id, movie.clone());
        Ok(true)
    }

    async fn delete_by_id(&self, id: Uuid, cancel: &CancellationToken) -> Result<bool, MovieError> {
        Self::check_cancel(cancel)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(self.movies.lock().unwrap().remove(&id).is_some())
    }

    async fn exists_by_id(&self, id: Uuid, cancel: &CancellationToken) -> Result<bool, MovieError> {
        Self::check_cancel(cancel)?;
        Ok(self.movies.lock().unwrap().contains_key(&id))
    }
}
