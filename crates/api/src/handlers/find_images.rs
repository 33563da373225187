//! Handlers for dispatching worker jobs from questions.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use quizimg_core::mapper::PlanOptions;
use quizimg_workers::{CompressJobRequest, CreatedJob};

use crate::dispatcher::{dispatch_find_images, BatchOutcome};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /questions/find-images`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindImagesRequest {
    pub question_ids: Vec<String>,
    #[serde(default)]
    pub options: PlanOptions,
}

/// Body of `POST /questions/{question_id}/accept-image`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptImageRequest {
    /// Source URL of the image the operator accepted.
    pub url: String,
    pub name: Option<String>,
    pub high_width: Option<u32>,
    pub low_width: Option<u32>,
    pub quality: Option<u8>,
}

/// POST /api/v1/questions/find-images
///
/// Dispatches one link-finding job per question with bounded concurrency.
/// Always answers 200 with per-question outcomes; a question that cannot be
/// dispatched is a failed item, not a failed request.
pub async fn find_images(
    State(state): State<AppState>,
    Json(input): Json<FindImagesRequest>,
) -> AppResult<Json<DataResponse<BatchOutcome>>> {
    if input.question_ids.is_empty() {
        return Err(AppError::BadRequest(
            "questionIds must be a non-empty array".into(),
        ));
    }

    let outcome = dispatch_find_images(&state, input.question_ids, input.options).await;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/questions/{question_id}/accept-image
///
/// Submits a compression job for the accepted source image. The compressor
/// pushes the finished variant pair back through the ingest surface.
pub async fn accept_image(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    Json(input): Json<AcceptImageRequest>,
) -> AppResult<Json<DataResponse<CreatedJob>>> {
    if input.url.trim().is_empty() {
        return Err(AppError::BadRequest("url is required".into()));
    }

    // Fail before talking to the worker if the question does not exist;
    // otherwise the pushed result would be rejected at ingest much later.
    if state.questions.find_by_id(&question_id).await?.is_none() {
        return Err(quizimg_core::CoreError::not_found("Question", &question_id).into());
    }

    let request = CompressJobRequest {
        question_id: question_id.clone(),
        url: input.url,
        name: input.name,
        high_width: input.high_width,
        low_width: input.low_width,
        quality: input.quality,
    };

    let created = state
        .compressor
        .create_job(&request, Some(&question_id))
        .await?;

    tracing::info!(
        question_id = %question_id,
        job_id = %created.id,
        "Compression job submitted",
    );

    Ok(Json(DataResponse { data: created }))
}
