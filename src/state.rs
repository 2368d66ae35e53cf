use crate::config::settings::AppConfig;
use crate::modules::movie::service::MovieService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub movies: MovieService,
}

impl AppState {
    pub fn new(config: AppConfig, movies: MovieService) -> Self {
        Self { config, movies }
    }
}
