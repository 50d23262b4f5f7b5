#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use tutor_api::config::{LogFormat, ServerConfig};
use tutor_api::router::build_app_router;
use tutor_api::state::AppState;
use tutor_core::chat::RawReply;
use tutor_db::MemoryStore;
use tutor_llm::{GatewayError, LlmGateway};

pub const ADMIN_KEY: &str = "test-admin-key";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        database_url: "postgres://unused".to_string(),
        admin_key: ADMIN_KEY.to_string(),
        gemini_api_key: "unused".to_string(),
        gemini_model: "gemini-test".to_string(),
        gemini_base_url: "http://127.0.0.1:9".to_string(),
        gemini_max_output_tokens: 64,
        gateway_timeout_secs: 1,
        log_format: LogFormat::Pretty,
    }
}

// ---------------------------------------------------------------------------
// Stub gateway
// ---------------------------------------------------------------------------

pub enum StubBehaviour {
    Reply(RawReply),
    /// Never answers.
    Hang,
    Fail { status: u16 },
}

/// Gateway double that records how often it was called.
pub struct StubGateway {
    calls: AtomicUsize,
    behaviour: StubBehaviour,
}

impl StubGateway {
    pub fn new(behaviour: StubBehaviour) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            behaviour,
        }
    }

    /// A gateway answering with a complete three-language reply.
    pub fn replying() -> Self {
        Self::new(StubBehaviour::Reply(RawReply {
            english: Some("Welcome, child!".into()),
            roman: Some("Ji aayan nu, puttar!".into()),
            gurmukhi: Some("ਜੀ ਆਇਆਂ ਨੂੰ, ਪੁੱਤਰ!".into()),
            expression: Some("happy".into()),
        }))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmGateway for StubGateway {
    async fn generate(&self, _prompt: &str) -> Result<RawReply, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behaviour {
            StubBehaviour::Reply(reply) => Ok(reply.clone()),
            StubBehaviour::Hang => std::future::pending().await,
            StubBehaviour::Fail { status } => Err(GatewayError::Api {
                status: *status,
                body: "upstream failure".into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub gateway: Arc<StubGateway>,
}

/// Build the full application router over an in-memory store and a
/// replying stub gateway.
pub fn build_test_app() -> TestApp {
    build_test_app_with(StubGateway::replying())
}

pub fn build_test_app_with(gateway: StubGateway) -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let gateway = Arc::new(gateway);
    let state = AppState::new(config.clone(), store.clone(), gateway.clone());
    TestApp {
        router: build_app_router(state, &config),
        store,
        gateway,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    admin_key: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = admin_key {
        builder = builder.header("x-admin-key", key);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), None).await
}

pub async fn admin_get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(ADMIN_KEY)).await
}

pub async fn admin_post(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(ADMIN_KEY)).await
}

pub async fn admin_put(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(ADMIN_KEY)).await
}

pub async fn admin_delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(ADMIN_KEY)).await
}

pub async fn with_key(app: &Router, method: Method, uri: &str, key: &str) -> Response<Body> {
    send(app, method, uri, None, Some(key)).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a character through the admin API.
pub async fn create_character(app: &Router, id: &str, name: &str) {
    let response = admin_post(
        app,
        "/admin/characters",
        serde_json::json!({
            "id": id,
            "name": name,
            "name_gurmukhi": "ਬੀਬੀ",
            "role": "grandmother",
            "persona": "Warm and patient."
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "creating character {id}");
}

/// Append a lesson with the given id and a single info step.
pub async fn create_lesson(app: &Router, character_id: &str, id: &str) {
    let response = admin_post(
        app,
        "/admin/lessons",
        serde_json::json!({
            "id": id,
            "character_id": character_id,
            "title": format!("Lesson {id}"),
            "steps": [{ "kind": "info", "text": { "english": "Hello" } }]
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "creating lesson {id}");
}

/// `(id, position)` pairs of a lesson list response.
pub fn order(lessons: &Value) -> Vec<(String, i64)> {
    lessons
        .as_array()
        .unwrap()
        .iter()
        .map(|l| {
            (
                l["id"].as_str().unwrap().to_string(),
                l["position"].as_i64().unwrap(),
            )
        })
        .collect()
}

pub fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
