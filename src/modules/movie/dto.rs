use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::MovieError;
use super::model::Movie;
use super::slug::generate_slug;
use crate::common::response::FieldError;

/// Body fields are optional so that an absent or `null` field is reported as a field
/// error instead of a deserialization failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub year_of_release: Option<i32>,
    pub genres: Option<Vec<String>>,
}

impl CreateMovieRequest {
    /// Assigns a fresh id and derives the slug from the title.
    pub fn into_movie(self) -> Result<Movie, MovieError> {
        MovieFields::require(self.title, self.year_of_release, self.genres)
            .map(|fields| fields.into_movie(Uuid::new_v4()))
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub year_of_release: Option<i32>,
    pub genres: Option<Vec<String>>,
}

impl UpdateMovieRequest {
    pub fn into_movie(self, id: Uuid) -> Result<Movie, MovieError> {
        MovieFields::require(self.title, self.year_of_release, self.genres)
            .map(|fields| fields.into_movie(id))
    }
}

struct MovieFields {
    title: String,
    year_of_release: i32,
    genres: Vec<String>,
}

impl MovieFields {
    fn require(
        title: Option<String>,
        year_of_release: Option<i32>,
        genres: Option<Vec<String>>,
    ) -> Result<Self, MovieError> {
        match (title, year_of_release, genres) {
            (Some(title), Some(year_of_release), Some(genres)) => Ok(Self {
                title,
                year_of_release,
                genres,
            }),
            (title, year_of_release, genres) => {
                let mut missing = Vec::new();
                if genres.is_none() {
                    missing.push(FieldError::new("genres", "Genres are required"));
                }
                if title.is_none() {
                    missing.push(FieldError::new("title", "Title is required"));
                }
                if year_of_release.is_none() {
                    missing.push(FieldError::new("year_of_release", "Year of release is required"));
                }
                Err(MovieError::Validation(missing))
            }
        }
    }

    fn into_movie(self, id: Uuid) -> Movie {
        Movie {
            id,
            slug: generate_slug(&self.title),
            title: self.title,
            year_of_release: self.year_of_release,
            genres: self.genres,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MovieResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub year_of_release: i32,
    pub genres: Vec<String>,
}

impl From<Movie> for MovieResponse {
    fn from(m: Movie) -> Self {
        Self {
            id: m.id,
            title: m.title,
            slug: m.slug,
            year_of_release: m.year_of_release,
            genres: m.genres,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MoviesResponse {
    pub items: Vec<MovieResponse>,
}

impl From<Vec<Movie>> for MoviesResponse {
    fn from(movies: Vec<Movie>) -> Self {
        Self {
            items: movies.into_iter().map(MovieResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_derives_slug_and_id() {
        let req = CreateMovieRequest {
            title: Some("Nick the Greek".to_string()),
            year_of_release: Some(2023),
            genres: Some(vec!["Action".to_string()]),
        };

        let movie = req.into_movie().unwrap();

        assert_eq!(movie.slug, "nick-the-greek");
        assert_eq!(movie.title, "Nick the Greek");
        assert!(!movie.id.is_nil());
    }

    #[test]
    fn update_request_keeps_given_id() {
        let id = Uuid::new_v4();
        let req = UpdateMovieRequest {
            title: Some("Heat".to_string()),
            year_of_release: Some(1995),
            genres: Some(vec![]),
        };

        let movie = req.into_movie(id).unwrap();

        assert_eq!(movie.id, id);
        assert_eq!(movie.slug, "heat");
        assert!(movie.genres.is_empty());
    }

    #[test]
    fn absent_fields_are_field_errors() {
        let req: CreateMovieRequest =
            serde_json::from_str(r#"{ "title": "Heat", "genres": null }"#).unwrap();

        match req.into_movie() {
            Err(MovieError::Validation(errors)) => assert_eq!(
                errors,
                vec![
                    FieldError::new("genres", "Genres are required"),
                    FieldError::new("year_of_release", "Year of release is required"),
                ]
            ),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn empty_update_body_reports_every_field() {
        let err = UpdateMovieRequest::default().into_movie(Uuid::new_v4()).unwrap_err();

        match err {
            MovieError::Validation(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["genres", "title", "year_of_release"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
