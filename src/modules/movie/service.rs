use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::error::MovieError;
use super::model::Movie;
use super::repository::MovieStore;
use super::validation::validate_movie;

/// Entry point for the HTTP handlers. Validates candidates and turns every store result
/// into a typed outcome.
#[derive(Clone)]
pub struct MovieService {
    store: Arc<dyn MovieStore>,
}

impl MovieService {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self { store }
    }

    #[instrument(skip_all, fields(movie_id = %movie.id, slug = %movie.slug))]
    pub async fn create(&self, movie: Movie, cancel: &CancellationToken) -> Result<Movie, MovieError> {
        validate_movie(&movie).map_err(MovieError::Validation)?;

        match self.store.create(&movie, cancel).await {
            Ok(true) => {
                info!("Movie created");
                Ok(movie)
            }
            Ok(false) => Err(MovieError::WriteFailed("movie row was not inserted".to_string())),
            Err(MovieError::Conflict(reason)) => {
                warn!(%reason, "Movie create rejected");
                Err(MovieError::Conflict(reason))
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip_all, fields(movie_id = %movie.id))]
    pub async fn update(&self, movie: Movie, cancel: &CancellationToken) -> Result<Movie, MovieError> {
        if !self.store.exists_by_id(movie.id, cancel).await? {
            return Err(MovieError::NotFound);
        }

        validate_movie(&movie).map_err(MovieError::Validation)?;

        // A concurrent delete can land between the probe and the write.
        if !self.store.update(&movie, cancel).await? {
            return Err(MovieError::WriteFailed(
                "movie was removed before the update was applied".to_string(),
            ));
        }

        info!("Movie updated");
        Ok(movie)
    }

    pub async fn delete(&self, id: Uuid, cancel: &CancellationToken) -> Result<bool, MovieError> {
        self.store.delete_by_id(id, cancel).await
    }

    pub async fn get_by_id(&self, id: Uuid, cancel: &CancellationToken) -> Result<Option<Movie>, MovieError> {
        self.store.get_by_id(id, cancel).await
    }

    pub async fn get_by_slug(&self, slug: &str, cancel: &CancellationToken) -> Result<Option<Movie>, MovieError> {
        self.store.get_by_slug(slug, cancel).await
    }

    /// Looks a movie up by id when the key parses as a UUID, by slug otherwise. A UUID-shaped
    /// key that matches no id is still tried as a slug, since titles of hex digits produce
    /// such slugs.
    pub async fn get_by_id_or_slug(&self, key: &str, cancel: &CancellationToken) -> Result<Option<Movie>, MovieError> {
        if let Ok(id) = Uuid::parse_str(key) {
            if let Some(movie) = self.get_by_id(id, cancel).await? {
                return Ok(Some(movie));
            }
        }
        self.get_by_slug(key, cancel).await
    }

    pub async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<Movie>, MovieError> {
        self.store.get_all(cancel).await
    }
}
