use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use crate::state::AppState;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub fn create_app(state: AppState) -> Router {
    let timeout = request_timeout_layer(state.config.request_timeout());

    crate::routes::configure_routes()
        .layer(timeout)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Expiry answers 408 and drops the handler future, which cancels its in-flight database work.
fn request_timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}
