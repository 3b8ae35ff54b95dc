//! HTTP API application wiring (Axum router + shared state).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use veritext_ai::{Classifier, ClassifierError, HttpClassifier};
use veritext_core::DEFAULT_SOURCE_LABEL;

use crate::config::ServiceConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Everything a handler needs. Immutable after startup; no per-request state lives here.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub source_label: String,
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            source_label: DEFAULT_SOURCE_LABEL.to_string(),
            expose_error_details: true,
        }
    }

    /// Wire the HTTP classifier described by `config`.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ClassifierError> {
        let classifier = HttpClassifier::new(config.classifier.clone())?;
        Ok(Self {
            classifier: Arc::new(classifier),
            source_label: config.source_label.clone(),
            expose_error_details: config.expose_error_details,
        })
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(state: AppState) -> Router {
    routes::router()
        .layer(Extension(state))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_span)))
}
