use std::future::Future;

use async_trait::async_trait;
use sqlx::{Connection, FromRow, PgConnection};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use super::error::MovieError;
use super::model::{Movie, GENRE_DELIMITER};
use crate::infrastructure::db::pool::DbPool;
use crate::infrastructure::db::provider::ConnectionProvider;

/// Persistence of the movie aggregate: one `movies` row plus its `genres` rows.
///
/// Every call takes the caller's cancellation token. Once it fires the outstanding query is
/// dropped, any open transaction rolls back, and the call returns [`MovieError::Cancelled`].
/// A unique-index violation surfaces as [`MovieError::Conflict`].
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Inserts the movie row and its genres in one transaction. `Ok(false)` when the movie
    /// row was not written.
    async fn create(&self, movie: &Movie, cancel: &CancellationToken) -> Result<bool, MovieError>;

    async fn get_by_id(&self, id: Uuid, cancel: &CancellationToken) -> Result<Option<Movie>, MovieError>;

    async fn get_by_slug(&self, slug: &str, cancel: &CancellationToken) -> Result<Option<Movie>, MovieError>;

    async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<Movie>, MovieError>;

    /// Replaces title, year, slug and the whole genre set. `Ok(false)` when no movie has
    /// this id, in which case nothing was written.
    async fn update(&self, movie: &Movie, cancel: &CancellationToken) -> Result<bool, MovieError>;

    /// Removes the genre rows and the movie row together. `Ok(false)` when no movie had this id.
    async fn delete_by_id(&self, id: Uuid, cancel: &CancellationToken) -> Result<bool, MovieError>;

    async fn exists_by_id(&self, id: Uuid, cancel: &CancellationToken) -> Result<bool, MovieError>;
}

#[derive(Debug, FromRow)]
struct MovieRow {
    id: Uuid,
    title: String,
    slug: String,
    yearofrelease: i32,
}

impl MovieRow {
    fn into_movie(self, genres: Vec<String>) -> Movie {
        Movie {
            id: self.id,
            title: self.title,
            slug: self.slug,
            year_of_release: self.yearofrelease,
            genres,
        }
    }
}

#[derive(Debug, FromRow)]
struct MovieListRow {
    id: Uuid,
    title: String,
    slug: String,
    yearofrelease: i32,
    genres: Option<String>,
}

impl From<MovieListRow> for Movie {
    fn from(row: MovieListRow) -> Self {
        let genres = parse_genre_aggregate(row.genres.as_deref());
        MovieRow {
            id: row.id,
            title: row.title,
            slug: row.slug,
            yearofrelease: row.yearofrelease,
        }
        .into_movie(genres)
    }
}

/// Splits a `string_agg` genre column. A movie without genres yields NULL from the left
/// join, and neither NULL nor an empty string may turn into a genre.
pub fn parse_genre_aggregate(aggregate: Option<&str>) -> Vec<String> {
    match aggregate {
        None | Some("") => Vec::new(),
        Some(joined) => joined.split(GENRE_DELIMITER).map(str::to_owned).collect(),
    }
}

async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, MovieError>
where
    F: Future<Output = Result<T, MovieError>>,
{
    cancel
        .run_until_cancelled(fut)
        .await
        .unwrap_or(Err(MovieError::Cancelled))
}

pub struct PgMovieRepository<P = DbPool> {
    provider: P,
}

impl<P: ConnectionProvider> PgMovieRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: ConnectionProvider> MovieStore for PgMovieRepository<P> {
    async fn create(&self, movie: &Movie, cancel: &CancellationToken) -> Result<bool, MovieError> {
        let mut conn = self.provider.acquire(cancel).await?;
        cancellable(cancel, insert_aggregate(&mut conn, movie)).await
    }

    async fn get_by_id(&self, id: Uuid, cancel: &CancellationToken) -> Result<Option<Movie>, MovieError> {
        let mut conn = self.provider.acquire(cancel).await?;
        cancellable(cancel, fetch_by_id(&mut conn, id)).await
    }

    async fn get_by_slug(&self, slug: &str, cancel: &CancellationToken) -> Result<Option<Movie>, MovieError> {
        let mut conn = self.provider.acquire(cancel).await?;
        cancellable(cancel, fetch_by_slug(&mut conn, slug)).await
    }

    async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<Movie>, MovieError> {
        let mut conn = self.provider.acquire(cancel).await?;
        cancellable(cancel, fetch_all(&mut conn)).await
    }

    async fn update(&self, movie: &Movie, cancel: &CancellationToken) -> Result<bool, MovieError> {
        let mut conn = self.provider.acquire(cancel).await?;
        cancellable(cancel, update_aggregate(&mut conn, movie)).await
    }

    async fn delete_by_id(&self, id: Uuid, cancel: &CancellationToken) -> Result<bool, MovieError> {
        let mut conn = self.provider.acquire(cancel).await?;
        cancellable(cancel, delete_aggregate(&mut conn, id)).await
    }

    async fn exists_by_id(&self, id: Uuid, cancel: &CancellationToken) -> Result<bool, MovieError> {
        let mut conn = self.provider.acquire(cancel).await?;
        cancellable(cancel, fetch_exists(&mut conn, id)).await
    }
}

async fn insert_genres(conn: &mut PgConnection, movie_id: Uuid, genres: &[String]) -> Result<(), sqlx::Error> {
    if genres.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO genres (movieid, name)
        SELECT $1, unnest($2::text[])
        "#,
    )
    .bind(movie_id)
    .bind(genres)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn load_genres(conn: &mut PgConnection, movie_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT name FROM genres WHERE movieid = $1")
        .bind(movie_id)
        .fetch_all(&mut *conn)
        .await
}

async fn insert_aggregate(conn: &mut PgConnection, movie: &Movie) -> Result<bool, MovieError> {
    let mut tx = conn.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO movies (id, title, slug, yearofrelease)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(movie.id)
    .bind(&movie.title)
    .bind(&movie.slug)
    .bind(movie.year_of_release)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() != 1 {
        tx.rollback().await?;
        return Ok(false);
    }

    insert_genres(&mut tx, movie.id, &movie.genres).await?;
    tx.commit().await?;

    debug!(movie_id = %movie.id, genres = movie.genres.len(), "Inserted movie aggregate");
    Ok(true)
}

async fn fetch_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Movie>, MovieError> {
    let row = sqlx::query_as::<_, MovieRow>(
        "SELECT id, title, slug, yearofrelease FROM movies WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => {
            let genres = load_genres(conn, row.id).await?;
            Ok(Some(row.into_movie(genres)))
        }
        None => Ok(None),
    }
}

async fn fetch_by_slug(conn: &mut PgConnection, slug: &str) -> Result<Option<Movie>, MovieError> {
    let row = sqlx::query_as::<_, MovieRow>(
        "SELECT id, title, slug, yearofrelease FROM movies WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => {
            let genres = load_genres(conn, row.id).await?;
            Ok(Some(row.into_movie(genres)))
        }
        None => Ok(None),
    }
}

async fn fetch_all(conn: &mut PgConnection) -> Result<Vec<Movie>, MovieError> {
    let rows = sqlx::query_as::<_, MovieListRow>(
        r#"
        SELECT m.id, m.title, m.slug, m.yearofrelease, string_agg(g.name, $1) AS genres
        FROM movies m
        LEFT JOIN genres g ON m.id = g.movieid
        GROUP BY m.id
        ORDER BY m.title ASC, m.id ASC
        "#,
    )
    .bind(GENRE_DELIMITER.to_string())
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(Movie::from).collect())
}

async fn update_aggregate(conn: &mut PgConnection, movie: &Movie) -> Result<bool, MovieError> {
    let mut tx = conn.begin().await?;

    // The movie row goes first so an unknown id aborts before any genre row is touched.
    let result = sqlx::query(
        r#"
        UPDATE movies
        SET title = $1, slug = $2, yearofrelease = $3
        WHERE id = $4
        "#,
    )
    .bind(&movie.title)
    .bind(&movie.slug)
    .bind(movie.year_of_release)
    .bind(movie.id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query("DELETE FROM genres WHERE movieid = $1")
        .bind(movie.id)
        .execute(&mut *tx)
        .await?;
    insert_genres(&mut tx, movie.id, &movie.genres).await?;
    tx.commit().await?;

    debug!(movie_id = %movie.id, genres = movie.genres.len(), "Replaced movie aggregate");
    Ok(true)
}

async fn delete_aggregate(conn: &mut PgConnection, id: Uuid) -> Result<bool, MovieError> {
    let mut tx = conn.begin().await?;

    sqlx::query("DELETE FROM genres WHERE movieid = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM movies WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    tx.commit().await?;
    debug!(movie_id = %id, "Deleted movie aggregate");
    Ok(true)
}

async fn fetch_exists(conn: &mut PgConnection, id: Uuid) -> Result<bool, MovieError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM movies WHERE id = $1)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}
