//! Read-through proxies for worker job state.
//!
//! Job state lives on the workers; the coordinator holds none of it. These
//! handlers forward to the selected worker and translate its answers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use quizimg_workers::{Job, JobFilter, JobPage, WorkerClient};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Hard cap on page size regardless of what the caller asks for.
const MAX_PAGE_LIMIT: u32 = 100;

/// Selects which worker a job query goes to. Defaults to the link-finder.
#[derive(Debug, Default, Deserialize)]
pub struct WorkerParam {
    pub worker: Option<String>,
}

fn select_worker<'a>(
    state: &'a AppState,
    worker: Option<&str>,
) -> Result<&'a Arc<WorkerClient>, AppError> {
    match worker {
        None | Some("link-finder") => Ok(&state.link_finder),
        Some("compressor") => Ok(&state.compressor),
        Some(other) => Err(AppError::BadRequest(format!(
            "unknown worker \"{other}\", expected \"link-finder\" or \"compressor\""
        ))),
    }
}

/// GET /api/v1/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(param): Query<WorkerParam>,
    Query(mut filter): Query<JobFilter>,
) -> AppResult<Json<DataResponse<JobPage>>> {
    let worker = select_worker(&state, param.worker.as_deref())?;

    filter.limit = filter.limit.clamp(1, MAX_PAGE_LIMIT);
    filter.page = filter.page.max(1);

    let page = worker.list_jobs(&filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(param): Query<WorkerParam>,
) -> AppResult<Json<DataResponse<Job>>> {
    let worker = select_worker(&state, param.worker.as_deref())?;
    let job = worker.get_job(&id).await?;
    Ok(Json(DataResponse { data: job }))
}

/// GET /api/v1/jobs/{id}/result
///
/// Answers 400 `FAILED_PRECONDITION` while the job is still running.
pub async fn get_job_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(param): Query<WorkerParam>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let worker = select_worker(&state, param.worker.as_deref())?;
    let result = worker.get_job_result(&id).await?;
    Ok(Json(DataResponse { data: result }))
}
