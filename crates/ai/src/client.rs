//! Classifier client: dual concurrent fetch against the external classifier.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tokio::time::{error::Elapsed, timeout_at, Instant};

use veritext_core::{Prediction, ProbabilityPair, ValidText};

use crate::config::ClassifierConfig;
use crate::error::{CallOutcome, ClassifierError};
use crate::health::{self, HealthReport};

const PREDICT_PATH: &str = "/predict";
const PREDICT_PROBA_PATH: &str = "/predict_proba";

/// Normalized classifier answer for one text.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Classification {
    pub prediction: Prediction,
    pub probabilities: ProbabilityPair,
}

/// Anything that can classify a text and report its own reachability.
///
/// The HTTP implementation is [`HttpClassifier`]; handlers only see this trait.
#[async_trait]
pub trait Classifier: Send + Sync + 'static {
    async fn classify(&self, text: &ValidText) -> Result<Classification, ClassifierError>;

    /// Never fails: unreachability is itself a health result.
    async fn probe(&self) -> HealthReport;

    /// Human-readable location of the classifier, for operator messages.
    fn location(&self) -> &str;
}

#[derive(Serialize)]
struct TextPayload<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct PredictReply {
    predictions: Vec<JsonValue>,
}

#[derive(Deserialize)]
struct PredictProbaReply {
    probabilities: Vec<JsonValue>,
}

/// Result of one POST: its outcome, plus the body when the outcome was a success.
struct EndpointReply {
    outcome: CallOutcome,
    body: Option<String>,
}

impl EndpointReply {
    fn failed(outcome: CallOutcome) -> Self {
        Self { outcome, body: None }
    }

    fn cancelled() -> Self {
        Self::failed(CallOutcome::Cancelled)
    }

    /// Deadline expiry counts against this call only.
    fn settle(reply: Result<EndpointReply, Elapsed>) -> Self {
        reply.unwrap_or_else(|_| Self::failed(CallOutcome::TimedOut))
    }
}

pub struct HttpClassifier {
    client: Client,
    config: ClassifierConfig,
}

impl HttpClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClassifierError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    async fn post_text(&self, path: &'static str, text: &str) -> EndpointReply {
        let url = self.config.endpoint(path);
        tracing::debug!(url = %url, "calling classifier");

        let response = match self.client.post(&url).json(&TextPayload { text }).send().await {
            Ok(r) => r,
            Err(e) => return EndpointReply::failed(CallOutcome::Transport(e.to_string())),
        };

        let outcome = CallOutcome::Status(response.status().as_u16());
        if !outcome.is_success() {
            return EndpointReply::failed(outcome);
        }

        match response.text().await {
            Ok(body) => EndpointReply {
                outcome,
                body: Some(body),
            },
            Err(e) => EndpointReply::failed(CallOutcome::Transport(format!("reading body: {e}"))),
        }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, text: &ValidText) -> Result<Classification, ClassifierError> {
        let submitted = text.submitted();

        // Both calls in flight at once under a shared deadline. Each call keeps its
        // own outcome; the first failure ends the wait and cancels the other call.
        let deadline = Instant::now() + self.config.request_timeout;
        let predict_call = timeout_at(deadline, self.post_text(PREDICT_PATH, submitted));
        let proba_call = timeout_at(deadline, self.post_text(PREDICT_PROBA_PATH, submitted));
        tokio::pin!(predict_call, proba_call);

        let mut predict: Option<EndpointReply> = None;
        let mut proba: Option<EndpointReply> = None;

        while predict.is_none() || proba.is_none() {
            tokio::select! {
                reply = &mut predict_call, if predict.is_none() => {
                    predict = Some(EndpointReply::settle(reply));
                }
                reply = &mut proba_call, if proba.is_none() => {
                    proba = Some(EndpointReply::settle(reply));
                }
            }

            let failed = [&predict, &proba]
                .into_iter()
                .flatten()
                .any(|reply| reply.body.is_none());
            if failed {
                break;
            }
        }

        let predict = predict.unwrap_or_else(EndpointReply::cancelled);
        let proba = proba.unwrap_or_else(EndpointReply::cancelled);

        if predict.outcome == CallOutcome::TimedOut || proba.outcome == CallOutcome::TimedOut {
            tracing::warn!(
                timeout_ms = self.config.request_timeout.as_millis() as u64,
                "classifier call timed out"
            );
        }

        let (Some(predict_body), Some(proba_body)) = (predict.body, proba.body) else {
            return Err(ClassifierError::UpstreamUnavailable {
                predict: predict.outcome,
                predict_proba: proba.outcome,
            });
        };

        let classification = Classification {
            prediction: decode_prediction(&predict_body)?,
            probabilities: decode_probabilities(&proba_body)?,
        };

        tracing::debug!(
            prediction = classification.prediction.label(),
            p_human = classification.probabilities.human(),
            p_ai = classification.probabilities.ai(),
            "classifier replied"
        );

        Ok(classification)
    }

    async fn probe(&self) -> HealthReport {
        health::probe(&self.client, &self.config).await
    }

    fn location(&self) -> &str {
        self.config.base_url()
    }
}

/// Only the first element of the batch is read; we always send a batch of one.
fn decode_prediction(body: &str) -> Result<Prediction, ClassifierError> {
    const ENDPOINT: &str = "predict";

    let reply: PredictReply =
        serde_json::from_str(body).map_err(|e| ClassifierError::malformed(ENDPOINT, e.to_string()))?;
    let first = reply
        .predictions
        .first()
        .ok_or_else(|| ClassifierError::malformed(ENDPOINT, "empty predictions array"))?;

    Prediction::from_json(first).map_err(|e| ClassifierError::malformed(ENDPOINT, e.to_string()))
}

fn decode_probabilities(body: &str) -> Result<ProbabilityPair, ClassifierError> {
    const ENDPOINT: &str = "predict_proba";

    let reply: PredictProbaReply =
        serde_json::from_str(body).map_err(|e| ClassifierError::malformed(ENDPOINT, e.to_string()))?;
    let first = reply
        .probabilities
        .first()
        .ok_or_else(|| ClassifierError::malformed(ENDPOINT, "empty probabilities array"))?;

    ProbabilityPair::from_json(first).map_err(|e| ClassifierError::malformed(ENDPOINT, e.to_string()))
}
