//! Reconciling a prediction and a probability pair into one verdict.

use serde::{Deserialize, Serialize};

use crate::text::ValidText;
use crate::verdict::{Prediction, ProbabilityPair};

/// Value of `details.source` when the deployment does not override it.
pub const DEFAULT_SOURCE_LABEL: &str = "Flask ML Model";

/// Final answer returned to the caller.
///
/// Built once per request and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(rename = "isAI")]
    pub is_ai: bool,

    /// Rounded percentage of the probability aligned with `prediction`.
    pub confidence: u8,

    pub prediction: Prediction,

    pub probabilities: PercentPair,

    pub details: AnalysisDetails,
}

/// Independently rounded percentages; they may not add up to 100.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentPair {
    pub human: u8,
    pub ai: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetails {
    /// Whitespace-delimited tokens in the trimmed text (not characters).
    pub text_length: usize,
    pub reason: String,
    pub source: String,
}

impl AnalysisResult {
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.details.source = source.into();
        self
    }
}

/// Merge the classifier's two answers into an [`AnalysisResult`].
///
/// Pure and infallible: the inputs are already typed, so every combination has
/// a well-defined result.
pub fn reconcile(
    prediction: Prediction,
    probabilities: ProbabilityPair,
    text: &ValidText,
) -> AnalysisResult {
    let confidence = to_percent(probabilities.aligned_with(prediction));

    let reason = match prediction {
        Prediction::Ai => format!("Text classified as AI-generated with {confidence}% confidence"),
        Prediction::Human => {
            format!("Text classified as human-written with {confidence}% confidence")
        }
    };

    AnalysisResult {
        is_ai: prediction.is_ai(),
        confidence,
        prediction,
        probabilities: PercentPair {
            human: to_percent(probabilities.human()),
            ai: to_percent(probabilities.ai()),
        },
        details: AnalysisDetails {
            text_length: text.token_count(),
            reason,
            source: DEFAULT_SOURCE_LABEL.to_string(),
        },
    }
}

/// `p` is in `[0, 1]`, guaranteed by `ProbabilityPair`.
fn to_percent(p: f64) -> u8 {
    (p * 100.0).round().clamp(0.0, 100.0) as u8
}
