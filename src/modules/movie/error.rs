use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::common::response::{ApiError, ApiValidationError, FieldError};
use crate::infrastructure::db::provider::AcquireError;

pub const SLUG_INDEX: &str = "movies_slug_idx";

#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("Movie not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("Failed to write movie: {0}")]
    WriteFailed(String),
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Storage failure: {0}")]
    Storage(sqlx::Error),
}

impl From<sqlx::Error> for MovieError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                let message = match db.constraint() {
                    Some(SLUG_INDEX) => "A movie with this slug already exists",
                    _ => "A movie with this id already exists",
                };
                return MovieError::Conflict(message.to_string());
            }
        }
        MovieError::Storage(err)
    }
}

impl From<AcquireError> for MovieError {
    fn from(err: AcquireError) -> Self {
        match err {
            AcquireError::Cancelled => MovieError::Cancelled,
            AcquireError::Pool(e) => MovieError::Storage(e),
        }
    }
}

/// A body that is not valid JSON for the request shape is a validation failure on `body`.
impl From<JsonRejection> for MovieError {
    fn from(rejection: JsonRejection) -> Self {
        MovieError::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl MovieError {
    pub fn status(&self) -> StatusCode {
        match self {
            MovieError::Validation(_) => StatusCode::BAD_REQUEST,
            MovieError::NotFound => StatusCode::NOT_FOUND,
            MovieError::Conflict(_) => StatusCode::CONFLICT,
            MovieError::Cancelled => StatusCode::REQUEST_TIMEOUT,
            MovieError::WriteFailed(_) | MovieError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MovieError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            MovieError::Validation(errors) => ApiValidationError(errors).into_response(),
            MovieError::Storage(e) => {
                error!("Storage failure: {:?}", e);
                ApiError("Internal Server Error".to_string(), status).into_response()
            }
            other => ApiError(other.to_string(), status).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_outcomes_to_status_codes() {
        assert_eq!(MovieError::Validation(vec![]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(MovieError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(MovieError::Conflict("dup".into()).status(), StatusCode::CONFLICT);
        assert_eq!(MovieError::Cancelled.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            MovieError::WriteFailed("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn non_database_sqlx_errors_are_storage_failures() {
        let err = MovieError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, MovieError::Storage(sqlx::Error::PoolTimedOut)));
    }

    #[test]
    fn cancelled_acquire_is_a_cancellation() {
        assert!(matches!(MovieError::from(AcquireError::Cancelled), MovieError::Cancelled));
    }
}
