use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::warn;
use udf_harness_protocol::{HEALTH_PATH, HealthStatus, INVOKE_PATH};
use udf_harness_runtime::UdfExecutor;

/// Build the harness router around `executor`.
pub fn router(executor: Arc<UdfExecutor>) -> Router {
  Router::new()
    .route(
      HEALTH_PATH,
      get(health).fallback(|| method_not_allowed(HEALTH_PATH)),
    )
    .route(
      INVOKE_PATH,
      post(invoke).fallback(|| method_not_allowed(INVOKE_PATH)),
    )
    .fallback(not_found)
    // Invocation payloads are not size limited.
    .layer(DefaultBodyLimit::disable())
    .layer(TraceLayer::new_for_http())
    .with_state(executor)
}

async fn health() -> Json<HealthStatus> {
  Json(HealthStatus::READY)
}

async fn invoke(State(executor): State<Arc<UdfExecutor>>, body: Bytes) -> Response {
  match executor.invoke_json(&body).await {
    Ok(response) => Json(response).into_response(),
    Err(e) => {
      warn!(error = %e, "rejected invocation");
      (StatusCode::BAD_REQUEST, e.to_string()).into_response()
    }
  }
}

async fn method_not_allowed(path: &'static str) -> (StatusCode, String) {
  (
    StatusCode::METHOD_NOT_ALLOWED,
    format!("method not allowed for {path}"),
  )
}

async fn not_found(uri: Uri) -> (StatusCode, String) {
  (StatusCode::NOT_FOUND, format!("{} not found", uri.path()))
}
