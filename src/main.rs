use std::sync::Arc;

use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;

use config::settings::AppConfig;
use infrastructure::db::{pool, schema};
use modules::movie::repository::PgMovieRepository;
use modules::movie::service::MovieService;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movies=debug,tower_http=info")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new();
    let db = pool::connect_to_db(&config).await?;
    schema::initialize(&db).await?;

    let movies = MovieService::new(Arc::new(PgMovieRepository::new(db)));
    let port = config.server_port;
    let app = app::create_app(AppState::new(config, movies));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
