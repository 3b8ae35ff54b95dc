use axum::{
    routing::{get, post},
    Router,
};

pub mod detect;
pub mod system;

/// Router for every public endpoint.
///
/// `/api/detect-text` serves both routes at the path the web front-end calls.
pub fn router() -> Router {
    Router::new()
        .route("/detect", post(detect::detect))
        .route("/health", get(system::health))
        .route("/api/detect-text", post(detect::detect).get(system::health))
}
