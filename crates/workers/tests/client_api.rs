//! Integration tests for `WorkerClient` against a stub worker service.
//!
//! The stub is a real axum listener bound to an ephemeral port, so these
//! tests exercise the full HTTP path including auth headers and the error
//! translation boundary.

use assert_matches::assert_matches;
use std::time::Duration;

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use quizimg_workers::{JobFilter, JobStatus, WorkerClient, WorkerConfig, WorkerError};

const API_KEY: &str = "test-key";

fn check_auth(headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if token == format!("Bearer {API_KEY}") {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid api key"})),
        ))
    }
}

fn stub_router() -> Router {
    Router::new()
        .route("/healthz", get(|| async { StatusCode::OK }))
        .route(
            "/jobs",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                check_auth(&headers)?;
                if body.get("type").is_none() && body.get("url").is_none() {
                    return Err((
                        StatusCode::BAD_REQUEST,
                        Json(json!({"error": "missing request type"})),
                    ));
                }
                let question_id = headers
                    .get("x-question-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Ok::<_, (StatusCode, Json<Value>)>(Json(json!({
                    "id": format!("job-for-{question_id}"),
                    "status": "queued",
                })))
            })
            .get(
                |headers: HeaderMap,
                 axum::extract::Query(params): axum::extract::Query<Value>| async move {
                    check_auth(&headers)?;
                    let limit = params["limit"].as_str().unwrap_or("20").parse::<u32>().unwrap();
                    let page = params["page"].as_str().unwrap_or("1").parse::<u32>().unwrap();
                    Ok::<_, (StatusCode, Json<Value>)>(Json(json!({
                        "jobs": [],
                        "page": page,
                        "limit": limit,
                        "total": 0,
                        "pages": 0,
                    })))
                },
            ),
        )
        .route(
            "/jobs/{id}",
            get(|headers: HeaderMap, Path(id): Path<String>| async move {
                check_auth(&headers)?;
                if id != "j1" {
                    return Err((
                        StatusCode::NOT_FOUND,
                        Json(json!({"error": "Job not found"})),
                    ));
                }
                Ok::<_, (StatusCode, Json<Value>)>(Json(json!({
                    "id": "j1",
                    "status": "processing",
                    "createdAt": 1_700_000_000_000_i64,
                    "updatedAt": 1_700_000_060_000_i64,
                    "questionId": "q1",
                })))
            }),
        )
        .route(
            "/jobs/{id}/result",
            get(|headers: HeaderMap, Path(id): Path<String>| async move {
                check_auth(&headers)?;
                match id.as_str() {
                    "j1" => Ok(Json(json!({"summary": "5 links found"}))),
                    "pending" => Err((
                        StatusCode::PRECONDITION_FAILED,
                        Json(json!({"error": "job is not finished"})),
                    )),
                    _ => Err((
                        StatusCode::NOT_FOUND,
                        Json(json!({"error": "Job not found"})),
                    )),
                }
            }),
        )
}

async fn spawn_stub() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub_router()).await.unwrap();
    });
    format!("http://{addr}")
}

async fn connect(base_url: String) -> WorkerClient {
    WorkerClient::connect(WorkerConfig {
        base_url,
        api_key: API_KEY.to_string(),
        connect_timeout: Duration::from_secs(2),
    })
    .await
}

#[tokio::test]
async fn create_job_attaches_correlation_header() {
    let client = connect(spawn_stub().await).await;
    assert!(client.is_ready());

    let created = client
        .create_job(&json!({"type": "CHOICE"}), Some("q42"))
        .await
        .unwrap();
    assert_eq!(created.id, "job-for-q42");
    assert_eq!(created.status, JobStatus::Queued);
}

#[tokio::test]
async fn get_job_translates_not_found() {
    let client = connect(spawn_stub().await).await;

    let job = client.get_job("j1").await.unwrap();
    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.question_id.as_deref(), Some("q1"));

    let err = client.get_job("missing").await.unwrap_err();
    assert_matches!(err, WorkerError::NotFound(_));
}

#[tokio::test]
async fn job_result_translates_precondition_failure() {
    let client = connect(spawn_stub().await).await;

    let result = client.get_job_result("j1").await.unwrap();
    assert_eq!(result["summary"], "5 links found");

    let err = client.get_job_result("pending").await.unwrap_err();
    assert_matches!(err, WorkerError::FailedPrecondition(_));
}

#[tokio::test]
async fn list_jobs_echoes_pagination() {
    let client = connect(spawn_stub().await).await;

    let page = client
        .list_jobs(&JobFilter {
            limit: 50,
            page: 3,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.limit, 50);
    assert_eq!(page.page, 3);
}

#[tokio::test]
async fn unreachable_worker_yields_not_ready_client() {
    // Nothing listens on this port; the probe must fail without panicking.
    let client = WorkerClient::connect(WorkerConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        api_key: API_KEY.to_string(),
        connect_timeout: Duration::from_millis(200),
    })
    .await;

    assert!(!client.is_ready());
    let err = client.get_job("j1").await.unwrap_err();
    assert_matches!(err, WorkerError::Unavailable(_));
}

#[tokio::test]
async fn bad_request_translates_to_invalid_argument() {
    let client = connect(spawn_stub().await).await;

    let err = client
        .create_job(&json!({"unexpected": true}), None)
        .await
        .unwrap_err();
    assert_matches!(err, WorkerError::InvalidArgument(_));
}
