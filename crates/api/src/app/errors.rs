use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use veritext_ai::ClassifierError;
use veritext_core::ValidationError;

use crate::app::dto::ErrorBody;

const UNAVAILABLE_DETAILS: &str = "Connection failed to classifier service";
const MALFORMED_MESSAGE: &str =
    "The AI detection service returned an unexpected response. Please try again.";
const INTERNAL_MESSAGE: &str = "An error occurred during text analysis. Please try again.";
const WITHHELD_DETAILS: &str = "internal error";

/// Every way a detect request can fail, already carrying what the response needs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body is not a JSON object (400).
    #[error("invalid request body: {0}")]
    BadRequest(String),

    /// Submission rejected before any outbound call (400).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Classifier unreachable or answered with a non-success status (503).
    #[error("{source}")]
    UpstreamUnavailable {
        location: String,
        source: ClassifierError,
    },

    /// Classifier answered 2xx with a body that breaks the contract (502).
    #[error("{0}")]
    MalformedUpstream(ClassifierError),

    /// Anything else (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn from_classifier(err: ClassifierError, location: &str) -> Self {
        match err {
            ClassifierError::UpstreamUnavailable { .. } => ApiError::UpstreamUnavailable {
                location: location.to_string(),
                source: err,
            },
            ClassifierError::MalformedUpstreamResponse { .. } => ApiError::MalformedUpstream(err),
            ClassifierError::Config(msg) => ApiError::Internal(msg),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::MalformedUpstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Validation(e) => e.code(),
            ApiError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ApiError::MalformedUpstream(_) => "malformed_upstream_response",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn body(&self, expose_details: bool) -> ErrorBody {
        let internal = |detail: String| {
            if expose_details {
                detail
            } else {
                WITHHELD_DETAILS.to_string()
            }
        };

        match self {
            ApiError::BadRequest(detail) => {
                ErrorBody::new("Request body must be a JSON object").with_details(detail.clone())
            }
            ApiError::Validation(e) => ErrorBody::new(e.to_string()),
            ApiError::UpstreamUnavailable { location, .. } => ErrorBody::new(format!(
                "AI detection service is currently unavailable. Please make sure the classifier service is running and reachable at {location}"
            ))
            .with_details(UNAVAILABLE_DETAILS),
            ApiError::MalformedUpstream(e) => {
                ErrorBody::new(MALFORMED_MESSAGE).with_details(internal(e.to_string()))
            }
            ApiError::Internal(msg) => {
                ErrorBody::new(INTERNAL_MESSAGE).with_details(internal(msg.clone()))
            }
        }
    }

    /// Log the error, then turn it into the response envelope.
    ///
    /// `expose_details` controls whether internal detail reaches the caller;
    /// the log line always has it.
    pub fn into_response_with(self, expose_details: bool) -> axum::response::Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(
                error_kind = self.kind(),
                status = status.as_u16(),
                error = %self,
                "detect request failed"
            );
        } else {
            tracing::warn!(
                error_kind = self.kind(),
                status = status.as_u16(),
                error = %self,
                "detect request rejected"
            );
        }

        (status, Json(self.body(expose_details))).into_response()
    }
}
