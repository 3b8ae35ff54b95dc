use std::fmt;

use thiserror::Error;

/// What happened to one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// A response arrived with this status (success or not).
    Status(u16),
    /// The request could not be sent or its body could not be read.
    Transport(String),
    /// No response before the shared deadline.
    TimedOut,
    /// Dropped unanswered because the other call had already failed.
    Cancelled,
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Status(s) if (200..300).contains(s))
    }
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallOutcome::Status(s) => write!(f, "status {s}"),
            CallOutcome::Transport(e) => write!(f, "transport error: {e}"),
            CallOutcome::TimedOut => f.write_str("timed out"),
            CallOutcome::Cancelled => f.write_str("cancelled after the other call failed"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Either endpoint was unreachable or answered with a non-success status.
    ///
    /// Both outcomes are kept, even when only one call failed.
    #[error("classifier unavailable (predict: {predict}, predict_proba: {predict_proba})")]
    UpstreamUnavailable {
        predict: CallOutcome,
        predict_proba: CallOutcome,
    },

    /// A 2xx reply whose body does not match the agreed shape.
    #[error("malformed reply from {endpoint}: {reason}")]
    MalformedUpstreamResponse {
        endpoint: &'static str,
        reason: String,
    },

    #[error("invalid classifier configuration: {0}")]
    Config(String),
}

impl ClassifierError {
    pub(crate) fn malformed(endpoint: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedUpstreamResponse {
            endpoint,
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            ClassifierError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ClassifierError::MalformedUpstreamResponse { .. } => "malformed_upstream_response",
            ClassifierError::Config(_) => "classifier_config",
        }
    }
}
