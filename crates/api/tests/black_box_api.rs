use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode as AxumStatus,
    routing::{get, post},
    Json, Router,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

use veritext_ai::{Classification, Classifier, ClassifierError, HealthReport};
use veritext_api::app::{build_app, AppState};
use veritext_api::config::ServiceConfig;
use veritext_core::ValidText;

const SAMPLE: &str = "This is a sufficiently long test sentence for analysis.";

// -------------------------
// Fake classifier service
// -------------------------

#[derive(Clone)]
struct Upstream {
    predict: (AxumStatus, Value),
    proba: (AxumStatus, Value),
    root: AxumStatus,
    hits: Arc<AtomicUsize>,
}

impl Upstream {
    fn answering(prediction: u8, human: f64, ai: f64) -> Self {
        Self {
            predict: (AxumStatus::OK, json!({ "predictions": [prediction] })),
            proba: (AxumStatus::OK, json!({ "probabilities": [[human, ai]] })),
            root: AxumStatus::OK,
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }
}

async fn fake_predict(State(up): State<Upstream>) -> (AxumStatus, Json<Value>) {
    up.hits.fetch_add(1, Ordering::SeqCst);
    (up.predict.0, Json(up.predict.1))
}

async fn fake_predict_proba(State(up): State<Upstream>) -> (AxumStatus, Json<Value>) {
    up.hits.fetch_add(1, Ordering::SeqCst);
    (up.proba.0, Json(up.proba.1))
}

async fn fake_root(State(up): State<Upstream>) -> AxumStatus {
    up.root
}

async fn spawn_upstream(up: Upstream) -> (String, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route("/", get(fake_root))
        .route("/predict", post(fake_predict))
        .route("/predict_proba", post(fake_predict_proba))
        .with_state(up);
    serve(app).await
}

async fn serve(app: Router) -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (base_url, handle)
}

/// An address nothing listens on.
async fn refused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// -------------------------
// Service under test
// -------------------------

struct TestServer {
    base_url: String,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Same router as prod, configured through the same variables, on an ephemeral port.
    async fn spawn(classifier_url: &str, extra: &[(&str, &str)]) -> Self {
        let mut vars: Vec<(String, String)> =
            vec![("CLASSIFIER_BASE_URL".into(), classifier_url.into())];
        vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));

        let config = ServiceConfig::from_lookup(|key| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .expect("valid test config");

        Self::with_state(AppState::from_config(&config).expect("classifier client")).await
    }

    async fn against(upstream: Upstream) -> Self {
        let (url, upstream_handle) = spawn_upstream(upstream).await;
        let mut srv = Self::spawn(&url, &[]).await;
        srv.handles.push(upstream_handle);
        srv
    }

    async fn with_state(state: AppState) -> Self {
        let (base_url, handle) = serve(build_app(state)).await;
        Self {
            base_url,
            handles: vec![handle],
        }
    }

    async fn detect(&self, body: Value) -> (StatusCode, Value) {
        let res = reqwest::Client::new()
            .post(format!("{}/detect", self.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }

    async fn health(&self) -> (StatusCode, Value) {
        let res = reqwest::get(format!("{}/health", self.base_url)).await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

// -------------------------
// Detect
// -------------------------

#[tokio::test]
async fn ai_verdict_end_to_end() {
    let srv = TestServer::against(Upstream::answering(1, 0.2, 0.8)).await;

    let (status, body) = srv.detect(json!({ "text": SAMPLE })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "isAI": true,
            "confidence": 80,
            "prediction": 1,
            "probabilities": { "human": 20, "ai": 80 },
            "details": {
                "textLength": 9,
                "reason": "Text classified as AI-generated with 80% confidence",
                "source": "Flask ML Model"
            }
        })
    );
}

#[tokio::test]
async fn human_verdict_end_to_end() {
    let srv = TestServer::against(Upstream::answering(0, 0.73, 0.27)).await;

    let (status, body) = srv.detect(json!({ "text": "  I wrote this one myself, honestly.  " })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isAI"], false);
    assert_eq!(body["confidence"], 73);
    assert_eq!(body["details"]["textLength"], 6);
    assert_eq!(
        body["details"]["reason"],
        "Text classified as human-written with 73% confidence"
    );
}

#[tokio::test]
async fn short_text_is_rejected_without_calling_the_classifier() {
    let upstream = Upstream::answering(1, 0.2, 0.8);
    let hits = upstream.hits.clone();
    let srv = TestServer::against(upstream).await;

    let (status, body) = srv.detect(json!({ "text": "hi" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "Text is too short. Please enter at least 10 characters." })
    );
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_or_wrong_typed_text_is_rejected() {
    let upstream = Upstream::answering(1, 0.2, 0.8);
    let hits = upstream.hits.clone();
    let srv = TestServer::against(upstream).await;

    for body in [json!({}), json!({ "text": null }), json!({ "text": 42 }), json!({ "text": "" })] {
        let (status, reply) = srv.detect(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply, json!({ "error": "Text is required and must be a string" }));
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let srv = TestServer::against(Upstream::answering(1, 0.2, 0.8)).await;
    let client = reqwest::Client::new();

    for raw in ["{not json", "[\"This is long enough text\"]"] {
        let res = client
            .post(format!("{}/detect", srv.base_url))
            .header("content-type", "application/json")
            .body(raw)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "Request body must be a JSON object");
        assert!(body["details"].is_string());
    }
}

#[tokio::test]
async fn unreachable_classifier_is_service_unavailable() {
    let url = refused_base_url().await;
    let srv = TestServer::spawn(&url, &[]).await;

    let (status, body) = srv.detect(json!({ "text": SAMPLE })).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains(&url));
    assert_eq!(body["details"], "Connection failed to classifier service");
}

#[tokio::test]
async fn upstream_server_error_is_not_passed_through() {
    let mut upstream = Upstream::answering(1, 0.2, 0.8);
    upstream.proba = (AxumStatus::INTERNAL_SERVER_ERROR, json!({ "error": "model crashed" }));
    let srv = TestServer::against(upstream).await;

    let (status, _) = srv.detect(json!({ "text": SAMPLE })).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn predict_server_error_is_service_unavailable() {
    let mut upstream = Upstream::answering(1, 0.2, 0.8);
    upstream.predict = (AxumStatus::BAD_GATEWAY, json!({ "error": "worker gone" }));
    let srv = TestServer::against(upstream).await;

    let (status, body) = srv.detect(json!({ "text": SAMPLE })).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["details"], "Connection failed to classifier service");
}

#[tokio::test]
async fn malformed_upstream_reply_is_bad_gateway() {
    let mut upstream = Upstream::answering(1, 0.2, 0.8);
    upstream.predict = (AxumStatus::OK, json!({ "predictions": [7] }));
    let srv = TestServer::against(upstream).await;

    let (status, body) = srv.detect(json!({ "text": SAMPLE })).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["details"].as_str().unwrap().contains("predict"));
}

#[tokio::test]
async fn identical_requests_get_identical_answers() {
    let upstream = Upstream::answering(1, 0.35, 0.65);
    let hits = upstream.hits.clone();
    let srv = TestServer::against(upstream).await;

    let first = srv.detect(json!({ "text": SAMPLE })).await;
    let second = srv.detect(json!({ "text": SAMPLE })).await;

    assert_eq!(first, second);
    // No caching: both requests reached both endpoints.
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn source_label_comes_from_configuration() {
    let (url, upstream) = spawn_upstream(Upstream::answering(1, 0.2, 0.8)).await;
    let mut srv = TestServer::spawn(&url, &[("CLASSIFIER_SOURCE_LABEL", "Staging Detector")]).await;
    srv.handles.push(upstream);

    let (_, body) = srv.detect(json!({ "text": SAMPLE })).await;

    assert_eq!(body["details"]["source"], "Staging Detector");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let srv = TestServer::against(Upstream::answering(1, 0.2, 0.8)).await;

    let res = reqwest::Client::new()
        .post(format!("{}/detect", srv.base_url))
        .json(&json!({ "text": "hi" }))
        .send()
        .await
        .unwrap();

    let id = res.headers().get("x-request-id").expect("request id header");
    assert_eq!(id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn front_end_path_serves_detect_and_health() {
    let srv = TestServer::against(Upstream::answering(0, 0.9, 0.1)).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/detect-text", srv.base_url))
        .json(&json!({ "text": SAMPLE }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/detect-text", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

// -------------------------
// Internal errors
// -------------------------

/// Classifier that always fails with a non-network error.
struct BrokenClassifier;

#[async_trait::async_trait]
impl Classifier for BrokenClassifier {
    async fn classify(&self, _text: &ValidText) -> Result<Classification, ClassifierError> {
        Err(ClassifierError::Config("client was torn down".into()))
    }

    async fn probe(&self) -> HealthReport {
        HealthReport::healthy()
    }

    fn location(&self) -> &str {
        "stub"
    }
}

#[tokio::test]
async fn unexpected_failure_is_internal_error_with_details() {
    let srv = TestServer::with_state(AppState::new(Arc::new(BrokenClassifier))).await;

    let (status, body) = srv.detect(json!({ "text": SAMPLE })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "An error occurred during text analysis. Please try again."
    );
    assert_eq!(body["details"], "client was torn down");
}

#[tokio::test]
async fn internal_details_can_be_withheld() {
    let mut state = AppState::new(Arc::new(BrokenClassifier));
    state.expose_error_details = false;
    let srv = TestServer::with_state(state).await;

    let (status, body) = srv.detect(json!({ "text": SAMPLE })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["details"], "internal error");
}

// -------------------------
// Health
// -------------------------

#[tokio::test]
async fn health_is_healthy_when_classifier_answers() {
    let srv = TestServer::against(Upstream::answering(1, 0.2, 0.8)).await;

    let (status, body) = srv.health().await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "healthy",
            "message": "AI detection API is running",
            "flaskApi": "connected"
        })
    );
}

#[tokio::test]
async fn health_is_degraded_on_error_status() {
    let mut upstream = Upstream::answering(1, 0.2, 0.8);
    upstream.root = AxumStatus::INTERNAL_SERVER_ERROR;
    let srv = TestServer::against(upstream).await;

    let (status, body) = srv.health().await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["flaskApi"], "error");
}

#[tokio::test]
async fn health_is_unhealthy_when_unreachable() {
    let url = refused_base_url().await;
    let srv = TestServer::spawn(&url, &[("HEALTH_TIMEOUT_MS", "500")]).await;

    let (status, body) = srv.health().await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["flaskApi"], "disconnected");
    assert!(body["error"].is_string());
}
