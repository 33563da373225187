//! HTTP client for a single worker service.
//!
//! One [`WorkerClient`] is created per worker at process start and shared
//! read-only for the process lifetime. Construction never fails the process:
//! if the readiness probe does not answer within the configured deadline the
//! client is marked not ready and every call returns
//! [`WorkerError::Unavailable`] until restart.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;

use crate::error::WorkerError;
use crate::types::{CreatedJob, Job, JobFilter, JobPage};

/// Correlation header carrying the owning question's id, echoed back by the
/// worker in its ingest callbacks.
pub const QUESTION_ID_HEADER: &str = "x-question-id";

/// Connection settings for one worker service.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Base HTTP URL, e.g. `http://localhost:50031`.
    pub base_url: String,
    /// Bearer credential attached to every call.
    pub api_key: String,
    /// Bounded wait-for-ready deadline for the initial probe.
    pub connect_timeout: Duration,
}

/// Typed, authenticated call surface to one job-oriented worker.
pub struct WorkerClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    ready: bool,
}

impl WorkerClient {
    /// Probe the worker and build the client.
    ///
    /// A failed probe does not return an error; it yields a client whose
    /// calls all answer `Unavailable`, so a worker being down at boot never
    /// takes the coordinator down with it.
    pub async fn connect(config: WorkerConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .unwrap_or_default();

        let probe = client
            .get(format!("{}/healthz", config.base_url))
            .timeout(config.connect_timeout)
            .send()
            .await;

        let ready = match probe {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                tracing::warn!(
                    base_url = %config.base_url,
                    status = resp.status().as_u16(),
                    "Worker readiness probe answered with an error status",
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    base_url = %config.base_url,
                    error = %e,
                    "Worker unreachable at startup; client marked not ready",
                );
                false
            }
        };

        if ready {
            tracing::info!(base_url = %config.base_url, "Worker client initialized");
        }

        Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
            ready,
        }
    }

    /// Whether the initial readiness probe succeeded.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Create a job on the worker.
    ///
    /// `question_id`, when present, is attached as the correlation header so
    /// the worker can include it in its ingest callbacks.
    pub async fn create_job<R: Serialize>(
        &self,
        request: &R,
        question_id: Option<&str>,
    ) -> Result<CreatedJob, WorkerError> {
        self.require_ready()?;

        let mut builder = self
            .authed(self.client.post(format!("{}/jobs", self.base_url)))
            .json(request);
        if let Some(qid) = question_id {
            builder = builder.header(QUESTION_ID_HEADER, qid);
        }

        let response = builder.send().await.map_err(transport_error)?;
        Self::parse(response).await
    }

    /// Fetch a job's current status.
    pub async fn get_job(&self, job_id: &str) -> Result<Job, WorkerError> {
        self.require_ready()?;
        let response = self
            .authed(self.client.get(format!("{}/jobs/{job_id}", self.base_url)))
            .send()
            .await
            .map_err(transport_error)?;
        Self::parse(response).await
    }

    /// Fetch the result payload of a terminal job.
    ///
    /// Fails with `FailedPrecondition` when the job has not finished yet.
    pub async fn get_job_result(&self, job_id: &str) -> Result<serde_json::Value, WorkerError> {
        self.require_ready()?;
        let response = self
            .authed(
                self.client
                    .get(format!("{}/jobs/{job_id}/result", self.base_url)),
            )
            .send()
            .await
            .map_err(transport_error)?;
        Self::parse(response).await
    }

    /// List jobs with offset/limit pagination and filters.
    pub async fn list_jobs(&self, filter: &JobFilter) -> Result<JobPage, WorkerError> {
        self.require_ready()?;
        let response = self
            .authed(self.client.get(format!("{}/jobs", self.base_url)))
            .query(filter)
            .send()
            .await
            .map_err(transport_error)?;
        Self::parse(response).await
    }

    // ---- private helpers ----

    fn require_ready(&self) -> Result<(), WorkerError> {
        if self.ready {
            Ok(())
        } else {
            Err(WorkerError::Unavailable(format!(
                "worker client for {} is not initialized",
                self.base_url
            )))
        }
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.api_key)
    }

    /// Translate the response into either the expected payload or a
    /// [`WorkerError`]. This is the only place worker status codes exist.
    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, WorkerError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| WorkerError::Internal(format!("malformed worker response: {e}")));
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = extract_message(&body);

        Err(match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                WorkerError::InvalidArgument(message)
            }
            StatusCode::NOT_FOUND => WorkerError::NotFound(message),
            StatusCode::PRECONDITION_FAILED | StatusCode::CONFLICT => {
                WorkerError::FailedPrecondition(message)
            }
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
                WorkerError::Unavailable(message)
            }
            _ => WorkerError::Internal(format!("worker answered {status}: {message}")),
        })
    }
}

/// Map a reqwest failure (network, DNS, timeout) to the taxonomy.
fn transport_error(err: reqwest::Error) -> WorkerError {
    if err.is_connect() || err.is_timeout() {
        WorkerError::Unavailable(err.to_string())
    } else {
        WorkerError::Internal(err.to_string())
    }
}

/// Pull a human-readable message out of a worker error body, which is either
/// `{"error": "..."}` JSON or plain text.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
