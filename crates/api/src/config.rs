//! Service configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use veritext_ai::{ClassifierConfig, ClassifierError};
use veritext_core::DEFAULT_SOURCE_LABEL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub classifier: ClassifierConfig,
    /// Reported as `details.source` in every analysis result.
    pub source_label: String,
    /// When false, internal error detail is withheld from 500/502 bodies.
    pub expose_error_details: bool,
}

impl ServiceConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` (variable name -> value).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_var(
            "BIND_ADDR",
            get("BIND_ADDR").as_deref().unwrap_or(DEFAULT_BIND_ADDR),
            "a socket address such as 0.0.0.0:8080",
            |v| v.parse::<SocketAddr>().ok(),
        )?;

        let mut classifier = match get("CLASSIFIER_BASE_URL") {
            Some(url) => ClassifierConfig::new(url.trim())?,
            None => ClassifierConfig::default(),
        };
        if let Some(v) = get("CLASSIFIER_TIMEOUT_MS") {
            classifier = classifier.with_request_timeout(parse_millis("CLASSIFIER_TIMEOUT_MS", &v)?);
        }
        if let Some(v) = get("HEALTH_TIMEOUT_MS") {
            classifier = classifier.with_health_timeout(parse_millis("HEALTH_TIMEOUT_MS", &v)?);
        }

        let source_label = get("CLASSIFIER_SOURCE_LABEL")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_SOURCE_LABEL.to_string());

        let expose_error_details = match get("EXPOSE_ERROR_DETAILS") {
            Some(v) => parse_var("EXPOSE_ERROR_DETAILS", &v, "true or false", parse_bool)?,
            None => true,
        };

        Ok(Self {
            bind_addr,
            classifier,
            source_label,
            expose_error_details,
        })
    }
}

fn parse_var<T>(
    var: &'static str,
    value: &str,
    expected: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    parse(value.trim()).ok_or_else(|| ConfigError::Invalid {
        var,
        expected,
        value: value.to_string(),
    })
}

fn parse_millis(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    parse_var(var, value, "a positive number of milliseconds", |v| {
        v.parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    })
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
