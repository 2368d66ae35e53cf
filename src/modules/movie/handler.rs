use super::dto::{CreateMovieRequest, MovieResponse, MoviesResponse, UpdateMovieRequest};
use super::error::MovieError;
use super::MOVIES_PATH;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tokio_util::sync::{CancellationToken, DropGuard};
use uuid::Uuid;

/// Token for the database work of one request. The guard cancels it when the handler
/// future is dropped, on client disconnect or request timeout.
fn request_token() -> (CancellationToken, DropGuard) {
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    (cancel, guard)
}

/// Create a movie
#[utoipa::path(
    post,
    path = "/api/v1/movies",
    request_body = CreateMovieRequest,
    responses(
        (status = 201, description = "Movie created", body = ApiResponse<MovieResponse>,
            headers(("Location" = String, description = "URL of the new movie"))),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Slug already taken")
    ),
    tag = "Movies"
)]
pub async fn create_movie(
    State(state): State<AppState>,
    payload: Result<Json<CreateMovieRequest>, JsonRejection>,
) -> impl IntoResponse {
    let (cancel, _guard) = request_token();

    let movie = match payload.map_err(MovieError::from).and_then(|Json(req)| req.into_movie()) {
        Ok(movie) => movie,
        Err(e) => return e.into_response(),
    };

    match state.movies.create(movie, &cancel).await {
        Ok(movie) => {
            let location = format!("{}/{}", MOVIES_PATH, movie.id);
            (
                [(header::LOCATION, location)],
                ApiSuccess(
                    ApiResponse::success(MovieResponse::from(movie), "Movie created successfully"),
                    StatusCode::CREATED,
                ),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// List all movies
#[utoipa::path(
    get,
    path = "/api/v1/movies",
    responses(
        (status = 200, description = "All movies with their genres", body = ApiResponse<MoviesResponse>)
    ),
    tag = "Movies"
)]
pub async fn list_movies(State(state): State<AppState>) -> impl IntoResponse {
    let (cancel, _guard) = request_token();

    match state.movies.get_all(&cancel).await {
        Ok(movies) => ApiSuccess(
            ApiResponse::success(MoviesResponse::from(movies), "Movies retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a movie by id or slug
#[utoipa::path(
    get,
    path = "/api/v1/movies/{id}",
    params(
        ("id" = String, Path, description = "Movie ID or slug")
    ),
    responses(
        (status = 200, description = "Movie details", body = ApiResponse<MovieResponse>),
        (status = 404, description = "Movie not found")
    ),
    tag = "Movies"
)]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> impl IntoResponse {
    let (cancel, _guard) = request_token();

    match state.movies.get_by_id_or_slug(&id_or_slug, &cancel).await {
        Ok(Some(movie)) => ApiSuccess(
            ApiResponse::success(MovieResponse::from(movie), "Movie retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Ok(None) => MovieError::NotFound.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Replace a movie
#[utoipa::path(
    put,
    path = "/api/v1/movies/{id}",
    params(
        ("id" = Uuid, Path, description = "Movie ID")
    ),
    request_body = UpdateMovieRequest,
    responses(
        (status = 200, description = "Movie updated", body = ApiResponse<MovieResponse>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Movie not found"),
        (status = 409, description = "Slug already taken")
    ),
    tag = "Movies"
)]
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateMovieRequest>, JsonRejection>,
) -> impl IntoResponse {
    let (cancel, _guard) = request_token();

    let movie = match payload.map_err(MovieError::from).and_then(|Json(req)| req.into_movie(id)) {
        Ok(movie) => movie,
        Err(e) => return e.into_response(),
    };

    match state.movies.update(movie, &cancel).await {
        Ok(movie) => ApiSuccess(
            ApiResponse::success(MovieResponse::from(movie), "Movie updated successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a movie
#[utoipa::path(
    delete,
    path = "/api/v1/movies/{id}",
    params(
        ("id" = Uuid, Path, description = "Movie ID")
    ),
    responses(
        (status = 204, description = "Movie deleted"),
        (status = 404, description = "Movie not found")
    ),
    tag = "Movies"
)]
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let (cancel, _guard) = request_token();

    match state.movies.delete(id, &cancel).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => MovieError::NotFound.into_response(),
        Err(e) => e.into_response(),
    }
}
