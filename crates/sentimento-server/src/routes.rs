//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{Duration, Instant};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::config::CorsConfig;
use crate::state::AppState;
use sentimento_classifiers::LoadFailure;
use sentimento_core::{InferenceRequest, InferenceResult, ModelKey, PredictionResponse};

pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/models", get(list_models))
        .route("/predict", post(predict))
        .route("/compare", post(compare))
        .fallback(fallback)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors)),
        )
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    models_loaded: usize,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        models_loaded: state.router.registry().model_count(),
    })
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
struct ModelsResponse {
    models: Vec<ModelKey>,
    failures: Vec<LoadFailure>,
}

async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.router.registry().available_models(),
        failures: state.load_report.failures.clone(),
    })
}

/// Single-algorithm prediction
async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<InferenceRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, AppError> {
    let Json(req) = payload?;
    debug!("Received prediction request for algorithm '{}'", req.algorithm);

    let start = Instant::now();
    let result = state.router.route(&req.text, &req.algorithm)?;
    record_inference(&result, start.elapsed());

    Ok(Json(result.into()))
}

#[derive(Debug, Deserialize)]
struct CompareRequest {
    text: String,
}

/// Every algorithm loaded for the text's language
async fn compare(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<Vec<PredictionResponse>>, AppError> {
    let Json(req) = payload?;

    let start = Instant::now();
    let results = state.router.compare(&req.text)?;
    let elapsed = start.elapsed();
    for result in &results {
        record_inference(result, elapsed);
    }

    Ok(Json(results.into_iter().map(Into::into).collect()))
}

fn record_inference(result: &InferenceResult, elapsed: Duration) {
    metrics::counter!(
        "sentimento_requests_total",
        "algorithm" => result.algorithm.name(),
        "language" => result.language.code()
    )
    .increment(1);
    metrics::histogram!("sentimento_inference_latency_us").record(elapsed.as_micros() as f64);

    debug!(
        "{}/{} -> {} ({:.3}) in {}us",
        result.algorithm,
        result.language,
        result.label,
        result.confidence,
        elapsed.as_micros()
    );
}

async fn fallback() -> Response {
    let body = json!({
        "error": {
            "message": "Not found",
            "type": "not_found",
        }
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    Inference(sentimento_core::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<sentimento_core::Error> for AppError {
    fn from(err: sentimento_core::Error) -> Self {
        AppError::Inference(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request_error", msg),
            AppError::Inference(err) => {
                let status = match &err {
                    sentimento_core::Error::NoModelsLoaded => StatusCode::SERVICE_UNAVAILABLE,
                    err if err.is_client_error() => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.kind(), err.to_string())
            }
        };

        metrics::counter!("sentimento_errors_total", "kind" => kind).increment(1);
        debug!("Request failed ({}): {}", status, message);

        let body = json!({
            "error": {
                "message": message,
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
