use utoipa::OpenApi;
use crate::common::response::FieldError;
use crate::modules::movie::dto::{CreateMovieRequest, MovieResponse, MoviesResponse, UpdateMovieRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::movie::handler::create_movie,
        crate::modules::movie::handler::list_movies,
        crate::modules::movie::handler::get_movie,
        crate::modules::movie::handler::update_movie,
        crate::modules::movie::handler::delete_movie,
    ),
    components(
        schemas(
            CreateMovieRequest, UpdateMovieRequest, MovieResponse, MoviesResponse, FieldError,
        )
    ),
    tags(
        (name = "Movies", description = "Movie catalog")
    )
)]
pub struct ApiDoc;
