use std::time::Duration;

use reqwest::Url;

use crate::error::ClassifierError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the classifier lives and how long we wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    base_url: String,
    /// Bound on the combined predict + predict_proba call.
    pub request_timeout: Duration,
    /// Bound on the liveness probe.
    pub health_timeout: Duration,
}

impl ClassifierConfig {
    /// Build a config for `base_url` with default timeouts.
    ///
    /// The URL must be absolute `http`/`https`. A trailing `/` is dropped so
    /// endpoint paths can be appended directly.
    pub fn new(base_url: &str) -> Result<Self, ClassifierError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ClassifierError::Config(format!("invalid base url {base_url:?}: {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClassifierError::Config(format!(
                "base url must use http or https, got {:?}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }
}
