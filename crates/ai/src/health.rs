//! Classifier liveness probe.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;

const LIVENESS_PATH: &str = "/";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Reachable and answering with a success status.
    Healthy,
    /// Reachable but answering with a non-success status.
    Degraded,
    /// Not reachable at all (connection error, timeout).
    Unhealthy,
}

/// How the classifier link looked from our side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamLink {
    Connected,
    Error,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub message: String,
    #[serde(rename = "flaskApi")]
    pub upstream: UpstreamLink,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: "AI detection API is running".to_string(),
            upstream: UpstreamLink::Connected,
            error: None,
        }
    }

    pub fn degraded(status: u16) -> Self {
        Self {
            status: HealthStatus::Degraded,
            message: "Flask API is not responding correctly".to_string(),
            upstream: UpstreamLink::Error,
            error: Some(format!("liveness check returned status {status}")),
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            message: "Flask API is not accessible".to_string(),
            upstream: UpstreamLink::Disconnected,
            error: Some(error.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// One bounded GET against the classifier's liveness path.
pub(crate) async fn probe(client: &Client, config: &ClassifierConfig) -> HealthReport {
    let url = config.endpoint(LIVENESS_PATH);

    let report = match client.get(&url).timeout(config.health_timeout).send().await {
        Ok(resp) if resp.status().is_success() => HealthReport::healthy(),
        Ok(resp) => HealthReport::degraded(resp.status().as_u16()),
        Err(e) if e.is_timeout() => HealthReport::unhealthy(format!(
            "no answer within {}ms",
            config.health_timeout.as_millis()
        )),
        Err(e) => HealthReport::unhealthy(e.to_string()),
    };

    if !report.is_healthy() {
        tracing::warn!(url = %url, status = ?report.status, error = ?report.error, "classifier health check failed");
    }

    report
}
