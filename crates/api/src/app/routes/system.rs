use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::AppState;

/// Liveness of this service as seen through its classifier dependency.
///
/// 200 only when the classifier answers its liveness path with success.
pub async fn health(Extension(state): Extension<AppState>) -> axum::response::Response {
    let report = state.classifier.probe().await;

    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report)).into_response()
}
