#![deny(unsafe_code)]

pub mod export;
pub mod questions;
pub mod storage;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use prakriti::submission::{self, PERSISTENCE_FAILURE};
use prakriti::wire::{ErrorBody, FETCH_FAILED, INVALID_JSON, MessageBody, NO_RESPONSES, SubmitResponse};
use prakriti::{QuestionBank, ResponseStore, SourceError, StoreError, SubmitError};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub use questions::QuestionsConfig;
pub use storage::StorageConfig;

#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub storage: StorageConfig,
    pub questions: QuestionsConfig,
}

#[derive(Clone)]
pub struct ServiceState {
    pub store: Arc<dyn ResponseStore>,
    pub bank: Arc<QuestionBank>,
}

impl ServiceState {
    pub fn new(store: Arc<dyn ResponseStore>, bank: QuestionBank) -> Self {
        Self {
            store,
            bank: Arc::new(bank),
        }
    }

    pub async fn bootstrap(config: ServiceConfig) -> Result<Self, ServiceError> {
        let ServiceConfig { storage, questions } = config;
        let bank = questions.load()?;
        info!(questions = bank.len(), "question bank loaded");
        let store = storage.open().await?;
        info!(backend = store.label(), "response store ready");
        Ok(Self::new(store, bank))
    }
}

pub fn build_router(state: ServiceState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(health))
        .route("/api/questions", get(list_questions))
        .route("/api/submit", get(submit_info).post(submit))
        .route("/api/export-csv", get(export_csv))
        .route("/api/test", get(echo_get).post(echo_post))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API on a bound listener until the server stops.
pub async fn serve(listener: tokio::net::TcpListener, state: ServiceState) -> std::io::Result<()> {
    axum::serve(listener, build_router(state)).await
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("question source error: {0}")]
    Questions(#[from] SourceError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Http { status: StatusCode, message: String },
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self::Http {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Http { status, message } => {
                (status, Json(ErrorBody::new(message))).into_response()
            }
            ApiError::Submit(SubmitError::Malformed(err)) => {
                warn!(reason = err.reason(), "malformed submission");
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(INVALID_JSON))).into_response()
            }
            ApiError::Submit(SubmitError::Rejected(rejection)) => {
                info!(problems = rejection.messages().len(), "submission rejected");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody::validation(rejection.into_messages())),
                )
                    .into_response()
            }
            ApiError::Submit(SubmitError::Persistence(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(PERSISTENCE_FAILURE)),
            )
                .into_response(),
            ApiError::Store(err) => {
                error!(error = %err, "failed to fetch survey responses");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new(FETCH_FAILED)),
                )
                    .into_response()
            }
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    storage_backend: &'static str,
    questions: usize,
}

async fn health(State(state): State<ServiceState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "prakriti-server",
        storage_backend: state.store.label(),
        questions: state.bank.len(),
    })
}

async fn list_questions(State(state): State<ServiceState>) -> Json<QuestionBank> {
    Json(state.bank.as_ref().clone())
}

#[derive(Debug, Clone, Serialize)]
struct InfoResponse {
    message: &'static str,
    timestamp: String,
}

async fn submit_info() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "Submit API is working. Use POST method to submit survey data.",
        timestamp: now(),
    })
}

async fn submit(
    State(state): State<ServiceState>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError> {
    let assessment = submission::submit_json(state.store.as_ref(), &body, state.bank.len()).await?;
    Ok(Json(SubmitResponse::from(&assessment)))
}

async fn export_csv(State(state): State<ServiceState>) -> Result<Response, ApiError> {
    let records = state.store.list_newest_first().await?;
    if records.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(MessageBody {
                message: NO_RESPONSES.to_string(),
            }),
        )
            .into_response());
    }
    info!(rows = records.len(), "exporting survey responses");

    let disposition = format!("attachment; filename=\"{}\"", export::FILENAME);
    let mut response = export::render(&records).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}

#[derive(Debug, Clone, Serialize)]
struct EchoResponse {
    message: &'static str,
    timestamp: String,
    method: &'static str,
    #[serde(rename = "receivedData", skip_serializing_if = "Option::is_none")]
    received_data: Option<serde_json::Value>,
}

async fn echo_get() -> Json<EchoResponse> {
    Json(EchoResponse {
        message: "API routes are working correctly",
        timestamp: now(),
        method: "GET",
        received_data: None,
    })
}

async fn echo_post(body: Bytes) -> Result<Json<EchoResponse>, ApiError> {
    let data: serde_json::Value =
        serde_json::from_slice(&body).map_err(|_| ApiError::bad_request("Failed to parse JSON"))?;
    Ok(Json(EchoResponse {
        message: "POST request successful",
        timestamp: now(),
        method: "POST",
        received_data: Some(data),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use prakriti::{MemoryStore, Question, ResponseRecord};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct BrokenStore;

    #[async_trait]
    impl ResponseStore for BrokenStore {
        fn label(&self) -> &'static str {
            "broken"
        }

        async fn insert(&self, _record: &ResponseRecord) -> Result<(), StoreError> {
            Err(StoreError::backend(anyhow::anyhow!("disk full")))
        }

        async fn list_newest_first(&self) -> Result<Vec<ResponseRecord>, StoreError> {
            Err(StoreError::backend(anyhow::anyhow!("disk full")))
        }
    }

    fn small_bank() -> QuestionBank {
        QuestionBank::new(
            (0..3)
                .map(|i| Question::new(format!("Question {i}"), ["x", "y", "z"]))
                .collect(),
        )
    }

    fn app_with(store: Arc<dyn ResponseStore>) -> Router {
        build_router(ServiceState::new(store, small_bank()))
    }

    fn valid_body() -> Value {
        json!({
            "q0": "b", "q1": "b", "q2": "a",
            "name": "Asha Patel", "gender": "Female", "phone": "9876543210",
            "email": "asha@example.com", "city": "Surat"
        })
    }

    fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn questions_endpoint_serves_bank() {
        let response = app_with(Arc::new(MemoryStore::new()))
            .oneshot(get("/api/questions"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["questions"].as_array().unwrap().len(), 3);
        assert_eq!(body["questions"][0]["question"], "Question 0");
        assert_eq!(body["questions"][0]["options"][2], "z");
    }

    #[tokio::test]
    async fn submit_stores_and_classifies() {
        let store = Arc::new(MemoryStore::new());
        let response = app_with(store.clone())
            .oneshot(post("/api/submit", valid_body().to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: SubmitResponse = serde_json::from_value(json_body(response).await).unwrap();
        assert_eq!(body.result, "Pitta-Vata");
        assert_eq!(body.counts.pitta, 2);
        assert_eq!(body.counts.vata, 1);

        let records = store.list_newest_first().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].scores, "Vata: 1, Pitta: 2, Kapha: 0");
    }

    #[tokio::test]
    async fn submit_rejects_invalid_fields() {
        let store = Arc::new(MemoryStore::new());
        let mut body = valid_body();
        body["phone"] = json!("1234567890");
        body["name"] = json!("");

        let response = app_with(store.clone())
            .oneshot(post("/api/submit", body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(
            body["details"],
            json!(["Name is required.", "Phone number must start with 6, 7, 8 or 9."])
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn submit_rejects_malformed_body() {
        let store = Arc::new(MemoryStore::new());
        for raw in ["{ nope", "[1, 2]", "\"text\""] {
            let response = app_with(store.clone())
                .oneshot(post("/api/submit", raw))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(json_body(response).await, json!({ "error": "Invalid JSON format" }));
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn submit_reports_persistence_failure() {
        let response = app_with(Arc::new(BrokenStore))
            .oneshot(post("/api/submit", valid_body().to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({ "error": PERSISTENCE_FAILURE })
        );
    }

    #[tokio::test]
    async fn submit_get_explains_usage() {
        let response = app_with(Arc::new(MemoryStore::new()))
            .oneshot(get("/api/submit"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["message"].as_str().unwrap().contains("POST"));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn export_without_records_is_not_found() {
        let response = app_with(Arc::new(MemoryStore::new()))
            .oneshot(get("/api/export-csv"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({ "message": "No survey responses found." })
        );
    }

    #[tokio::test]
    async fn export_failure_is_server_error() {
        let response = app_with(Arc::new(BrokenStore))
            .oneshot(get("/api/export-csv"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Failed to fetch survey responses." })
        );
    }

    #[tokio::test]
    async fn export_returns_csv_attachment() {
        let store: Arc<dyn ResponseStore> = Arc::new(MemoryStore::new());
        let app = app_with(store.clone());
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(post("/api/submit", valid_body().to_string()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.oneshot(get("/api/export-csv")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"survey_responses.csv\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], export::HEADERS.join(","));
        assert!(lines[1].contains(",Asha Patel,Female,9876543210,"));
    }

    #[tokio::test]
    async fn echo_endpoints() {
        let app = app_with(Arc::new(MemoryStore::new()));

        let response = app.clone().oneshot(get("/api/test")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["method"], "GET");
        assert!(body.get("receivedData").is_none());

        let response = app
            .clone()
            .oneshot(post("/api/test", r#"{ "ping": 1 }"#))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["method"], "POST");
        assert_eq!(body["receivedData"], json!({ "ping": 1 }));

        let response = app.oneshot(post("/api/test", "{")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Failed to parse JSON");
    }

    #[tokio::test]
    async fn health_reports_backend() {
        let response = app_with(Arc::new(MemoryStore::new()))
            .oneshot(get("/health"))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage_backend"], "memory");
        assert_eq!(body["questions"], 3);
    }

    #[tokio::test]
    async fn cors_preflight_is_allowed() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/submit")
            .header("origin", "https://survey.example")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = app_with(Arc::new(MemoryStore::new()))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn bootstrap_with_defaults() {
        let state = ServiceState::bootstrap(ServiceConfig::default()).await.unwrap();
        assert_eq!(state.store.label(), "memory");
        assert_eq!(state.bank.len(), 10);
    }
}
