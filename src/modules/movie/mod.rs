use axum::Router;
use axum::routing::get;
use crate::state::AppState;

pub mod dto;
pub mod error;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;
pub mod slug;
pub mod validation;

#[cfg(test)]
pub mod testing;

pub const MOVIES_PATH: &str = "/api/v1/movies";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_movies).post(handler::create_movie))
        .route(
            "/{id}",
            get(handler::get_movie)
                .put(handler::update_movie)
                .delete(handler::delete_movie),
        )
}
