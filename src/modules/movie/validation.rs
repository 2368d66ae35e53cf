use validator::Validate;

use super::model::Movie;
use crate::common::response::FieldError;

/// Checks a candidate movie and reports every failing field, sorted by field name.
pub fn validate_movie(movie: &Movie) -> Result<(), Vec<FieldError>> {
    let Err(errors) = movie.validate() else {
        return Ok(());
    };

    let mut failures: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();

    failures.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    Err(failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn movie(title: &str, year: i32, slug: &str, genres: &[&str]) -> Movie {
        Movie {
            id: Uuid::new_v4(),
            title: title.to_string(),
            year_of_release: year,
            slug: slug.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn accepts_well_formed_movie() {
        let m = movie("Nick the Greek", 2023, "nick-the-greek", &["Action", "Comedy"]);
        assert!(validate_movie(&m).is_ok());
    }

    #[test]
    fn accepts_movie_without_genres() {
        let m = movie("Arrival", 2016, "arrival", &[]);
        assert!(validate_movie(&m).is_ok());
    }

    #[test]
    fn reports_every_failing_field() {
        let m = movie("   ", 1500, "Not A Slug", &[""]);
        let errors = validate_movie(&m).unwrap_err();
        assert_eq!(fields(&errors), vec!["genres", "slug", "title", "year_of_release"]);
    }

    #[test]
    fn rejects_empty_slug() {
        let m = movie("Heat", 1995, "", &[]);
        let errors = validate_movie(&m).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("slug", "Slug is required")]);
    }

    #[test]
    fn rejects_slug_with_doubled_hyphen() {
        let m = movie("Heat", 1995, "heat--1995", &[]);
        let errors = validate_movie(&m).unwrap_err();
        assert_eq!(fields(&errors), vec!["slug"]);
    }

    #[test]
    fn rejects_year_out_of_range() {
        let m = movie("Heat", 2101, "heat", &[]);
        let errors = validate_movie(&m).unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new("year_of_release", "Year of release must be between 1888 and 2100")]
        );
    }

    #[test]
    fn rejects_genre_containing_delimiter() {
        let m = movie("Heat", 1995, "heat", &["Crime,Drama"]);
        let errors = validate_movie(&m).unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new("genres", "Genre names must not contain commas")]
        );
    }

    #[test]
    fn rejects_overlong_title() {
        let title = "x".repeat(201);
        let m = movie(&title, 1995, "x", &[]);
        let errors = validate_movie(&m).unwrap_err();
        assert_eq!(fields(&errors), vec!["title"]);
    }
}
