#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use kblog_core::{api, app, config::Config};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

pub enum SearchReply {
    Results(Vec<Value>),
    Status(u16),
    /// 200 with a body that is not JSON.
    Garbage,
}

pub enum CompletionReply {
    Content(String),
    NoChoices,
    Error(u16, Value),
}

/// What the fake providers saw.
#[derive(Clone, Default)]
pub struct Recorder {
    pub search_calls: Arc<AtomicUsize>,
    pub completion_calls: Arc<AtomicUsize>,
    pub search_query: Arc<Mutex<Vec<(String, String)>>>,
    pub search_token: Arc<Mutex<Option<String>>>,
    pub completion_auth: Arc<Mutex<Option<String>>>,
    pub completion_body: Arc<Mutex<Option<Value>>>,
}

impl Recorder {
    pub fn searches(&self) -> usize { self.search_calls.load(Ordering::SeqCst) }
    pub fn completions(&self) -> usize { self.completion_calls.load(Ordering::SeqCst) }

    pub fn query_param(&self, name: &str) -> Option<String> {
        self.search_query.lock().unwrap().iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
    }

    pub fn user_message(&self) -> String {
        let body = self.completion_body.lock().unwrap().clone().expect("completion request recorded");
        body["messages"][1]["content"].as_str().unwrap_or_default().to_string()
    }
}

#[derive(Clone)]
struct MockState {
    search: Arc<SearchReply>,
    completion: Arc<CompletionReply>,
    rec: Recorder,
}

async fn search_handler(State(s): State<MockState>, headers: HeaderMap, Query(q): Query<Vec<(String, String)>>) -> Response {
    s.rec.search_calls.fetch_add(1, Ordering::SeqCst);
    *s.rec.search_query.lock().unwrap() = q;
    *s.rec.search_token.lock().unwrap() = headers.get("x-subscription-token").and_then(|v| v.to_str().ok()).map(String::from);
    match s.search.as_ref() {
        SearchReply::Results(items) => Json(json!({"type": "search", "web": {"type": "search", "results": items}})).into_response(),
        SearchReply::Status(code) => (StatusCode::from_u16(*code).unwrap(), "search unavailable").into_response(),
        SearchReply::Garbage => ([("content-type", "application/json")], "<html>captcha</html>").into_response(),
    }
}

async fn completion_handler(State(s): State<MockState>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    s.rec.completion_calls.fetch_add(1, Ordering::SeqCst);
    *s.rec.completion_auth.lock().unwrap() = headers.get("authorization").and_then(|v| v.to_str().ok()).map(String::from);
    *s.rec.completion_body.lock().unwrap() = Some(body);
    match s.completion.as_ref() {
        CompletionReply::Content(text) => Json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}]
        }))
        .into_response(),
        CompletionReply::NoChoices => Json(json!({"id": "chatcmpl-test", "choices": []})).into_response(),
        CompletionReply::Error(code, body) => (StatusCode::from_u16(*code).unwrap(), Json(body.clone())).into_response(),
    }
}

/// Starts fake search + completion endpoints on an ephemeral port and returns a config pointing at them.
pub async fn spawn_providers(search: SearchReply, completion: CompletionReply) -> (Config, Recorder) {
    let rec = Recorder::default();
    let state = MockState { search: Arc::new(search), completion: Arc::new(completion), rec: rec.clone() };
    let mock = Router::new()
        .route("/res/v1/web/search", get(search_handler))
        .route("/v1/chat/completions", post(completion_handler))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, mock).await.unwrap(); });

    let mut cfg = Config::default();
    cfg.search.base_url = format!("http://{}/res/v1/web/search", addr);
    cfg.search.api_key = Some("brave-test".into());
    cfg.generation.base_url = format!("http://{}/v1", addr);
    cfg.generation.api_key = Some("sk-test".into());
    (cfg, rec)
}

/// An address nothing listens on: bound once to get a free port, then released.
pub async fn unbound_url() -> String {
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/res/v1/web/search", addr)
}

pub fn search_hit(title: &str, description: &str, url: &str, extra: &[&str]) -> Value {
    json!({"title": title, "url": url, "description": description, "extra_snippets": extra})
}

/// A complete post with three titles, ten tags and a body over 1500 characters.
pub fn valid_post() -> Value {
    let paragraph = "제주도에 가면 꼭 들러야 하는 맛집들이 있더라고요. 참고 자료에 나온 곳 위주로 정리해봤어요. ";
    let mut body = String::from("여행 가기 전에 맛집 찾느라 고생하셨죠?\n\n## 흑돼지 맛집\n");
    while body.chars().count() < 1600 {
        body.push_str(paragraph);
        body.push_str("\n\n[이미지]\n\n");
    }
    body.push_str("## 마무리\n저장해두고 여행 가실 때 꼭 써보세요!");
    json!({
        "titles": ["제주도 맛집 추천 BEST 5", "제주도 맛집 추천, 현지인 단골집", "제주도 맛집 추천 총정리"],
        "body": body,
        "tags": ["제주도", "제주맛집", "제주도맛집", "흑돼지", "고기국수", "제주여행", "맛집추천", "제주도여행", "서귀포맛집", "제주시맛집"],
        "seoScore": 87,
        "seoAnalysis": {
            "keywordDensity": "적정",
            "titleOptimization": "우수",
            "contentLength": "1650자",
            "readability": "우수",
            "ctaPresence": "포함"
        }
    })
}

pub fn router(cfg: Config) -> Router {
    api::build_router(app::AppState::new(cfg).unwrap())
}

pub async fn post_json(router: &Router, uri: &str, body: String) -> (StatusCode, Value) {
    post_raw(router, uri, Some("application/json"), body).await
}

pub async fn post_raw(router: &Router, uri: &str, content_type: Option<&str>, body: String) -> (StatusCode, Value) {
    let mut req = Request::builder().method("POST").uri(uri);
    if let Some(ct) = content_type {
        req = req.header("content-type", ct);
    }
    let resp = router.clone().oneshot(req.body(Body::from(body)).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let v: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, v)
}

pub async fn generate(router: &Router, keyword: &str) -> (StatusCode, Value) {
    post_json(router, "/api/generate", json!({ "keyword": keyword }).to_string()).await
}
