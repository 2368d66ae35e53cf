use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Separator used by `string_agg` when genres are folded into one column.
pub const GENRE_DELIMITER: char = ',';

/// A movie together with its genre tags: the unit every store write persists atomically.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Validate, ToSchema)]
pub struct Movie {
    pub id: Uuid,
    #[validate(
        length(max = 200, message = "Title must be at most 200 characters"),
        custom(function = "validate_title")
    )]
    pub title: String,
    #[validate(range(min = 1888, max = 2100, message = "Year of release must be between 1888 and 2100"))]
    pub year_of_release: i32,
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
    #[validate(custom(function = "validate_genres"))]
    pub genres: Vec<String>,
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(invalid("required", "Title is required"));
    }
    Ok(())
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(invalid("required", "Slug is required"));
    }

    let well_formed = slug
        .split('-')
        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    if !well_formed {
        return Err(invalid(
            "slug",
            "Slug must be lowercase letters and digits separated by single hyphens",
        ));
    }
    Ok(())
}

fn validate_genres(genres: &[String]) -> Result<(), ValidationError> {
    if genres.iter().any(|g| g.trim().is_empty()) {
        return Err(invalid("blank_genre", "Genre names must not be blank"));
    }
    if genres.iter().any(|g| g.contains(GENRE_DELIMITER)) {
        return Err(invalid("genre_delimiter", "Genre names must not contain commas"));
    }
    Ok(())
}
