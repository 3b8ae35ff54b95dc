use axum::{
    body::Bytes,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value as JsonValue;

use veritext_core::{AnalysisResult, reconcile, validate};

use crate::app::errors::ApiError;
use crate::app::AppState;

/// `POST /detect`: validate, classify, reconcile.
///
/// The body is read as raw bytes so that every decoding failure gets the same
/// JSON error envelope as the other failures.
pub async fn detect(Extension(state): Extension<AppState>, body: Bytes) -> axum::response::Response {
    match analyze(&state, &body).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => e.into_response_with(state.expose_error_details),
    }
}

async fn analyze(state: &AppState, body: &[u8]) -> Result<AnalysisResult, ApiError> {
    let payload: JsonValue =
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let fields = payload
        .as_object()
        .ok_or_else(|| ApiError::BadRequest("expected a JSON object".to_string()))?;

    // Nothing is sent upstream unless this passes.
    let text = validate(fields.get("text"))?;

    let classification = state
        .classifier
        .classify(&text)
        .await
        .map_err(|e| ApiError::from_classifier(e, state.classifier.location()))?;

    let result = reconcile(classification.prediction, classification.probabilities, &text)
        .with_source(state.source_label.as_str());

    tracing::info!(
        is_ai = result.is_ai,
        confidence = result.confidence,
        text_length = result.details.text_length,
        "text analyzed"
    );

    Ok(result)
}
