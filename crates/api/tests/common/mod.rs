//! Shared harness for API integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use quizimg_api::config::ServerConfig;
use quizimg_api::router::build_app_router;
use quizimg_api::state::AppState;
use quizimg_api::ws::WsManager;
use quizimg_db::MemoryStore;
use quizimg_events::EventBus;
use quizimg_workers::{WorkerClient, WorkerConfig};

/// Build a test `ServerConfig` with safe defaults: open token gate, dev CORS
/// origin, short worker probe deadline.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        api_token: None,
        link_finder_url: "http://127.0.0.1:1".to_string(),
        compressor_url: "http://127.0.0.1:1".to_string(),
        link_finder_api_key: "test-key".to_string(),
        compressor_api_key: "test-key".to_string(),
        worker_connect_timeout_secs: 1,
        batch_concurrency: 5,
        ws_ping_interval_secs: 30,
        ingest_addr: "127.0.0.1:0".to_string(),
        ingest_secret: None,
    }
}

/// Everything a test needs: the app, the store behind it, and the bus.
pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub bus: Arc<EventBus>,
}

/// Build the full application router over an in-memory store.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses. Worker clients point at
/// `config.link_finder_url` / `config.compressor_url`; pass a stub worker's
/// address there, or leave the defaults for tests that never reach a worker.
pub async fn build_test_app(config: ServerConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let bus = Arc::new(EventBus::default());

    let link_finder = Arc::new(
        WorkerClient::connect(WorkerConfig {
            base_url: config.link_finder_url.clone(),
            api_key: config.link_finder_api_key.clone(),
            connect_timeout: Duration::from_millis(200),
        })
        .await,
    );
    let compressor = Arc::new(
        WorkerClient::connect(WorkerConfig {
            base_url: config.compressor_url.clone(),
            api_key: config.compressor_api_key.clone(),
            connect_timeout: Duration::from_millis(200),
        })
        .await,
    );

    let state = AppState {
        questions: store.clone(),
        pairs: store.clone(),
        config: Arc::new(config.clone()),
        ws_manager: Arc::new(WsManager::new()),
        link_finder,
        compressor,
        event_bus: bus.clone(),
    };

    TestApp {
        app: build_app_router(state, &config),
        store,
        bus,
    }
}

/// Spawn a stub worker on an ephemeral port and return its base URL.
///
/// Implements the slice of the worker job API the coordinator calls:
/// `POST /jobs` answers with a job id derived from the correlation header,
/// and `/healthz` satisfies the readiness probe.
pub async fn spawn_stub_worker() -> String {
    async fn create_job(headers: axum::http::HeaderMap) -> Json<Value> {
        let question_id = headers
            .get("x-question-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none");
        Json(json!({ "id": format!("job-for-{question_id}"), "status": "queued" }))
    }

    let router = Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/jobs", post(create_job));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub worker");
    let addr = listener.local_addr().expect("stub worker addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub worker");
    });

    format!("http://{addr}")
}
