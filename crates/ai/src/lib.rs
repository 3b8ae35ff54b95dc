//! `veritext-ai`
//!
//! **Responsibility:** boundary to the external AI-text classifier.
//!
//! This crate owns every outbound call:
//! - It does not run inference itself; the classifier is a separate service.
//! - It turns raw classifier replies into typed `veritext-core` values.
//! - It reports classifier reachability for health checks.

pub mod client;
pub mod config;
pub mod error;
pub mod health;

pub use client::{Classification, Classifier, HttpClassifier};
pub use config::ClassifierConfig;
pub use error::{CallOutcome, ClassifierError};
pub use health::{HealthReport, HealthStatus, UpstreamLink};
