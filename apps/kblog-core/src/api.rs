use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::app::SharedState;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics))
        .route("/api/generate", post(generate))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(origin = %o, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    kblog_telemetry::inc_api_request("/health");
    Json(Health { status: "ok", version: state.version })
}

async fn ready() -> impl IntoResponse {
    kblog_telemetry::inc_api_request("/ready");
    StatusCode::OK
}

async fn metrics(State(state): State<SharedState>) -> impl IntoResponse {
    kblog_telemetry::inc_api_request("/metrics");
    let body = kblog_telemetry::gather_prometheus(state.version);
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

#[derive(Deserialize)]
struct GenerateReq {
    #[serde(default)]
    keyword: String,
}

/// The body is read as JSON whatever its content type; unreadable bodies count as a missing keyword.
fn keyword_from_body(body: &[u8]) -> String {
    match serde_json::from_slice::<GenerateReq>(body) {
        Ok(req) => req.keyword,
        Err(e) => {
            tracing::debug!(error = %e, "unreadable generate request body");
            String::new()
        }
    }
}

async fn generate(State(state): State<SharedState>, body: Bytes) -> Response {
    kblog_telemetry::inc_api_request("/api/generate");
    let keyword = keyword_from_body(&body);
    match state.generator.run(&keyword).await {
        Ok(post) => {
            kblog_telemetry::inc_generation("ok");
            Json(post).into_response()
        }
        Err(e) => {
            kblog_telemetry::inc_generation(e.kind());
            e.into_response()
        }
    }
}
