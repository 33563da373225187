//! Handlers for the suggested-links collection on a question.
//!
//! Operator-submitted links go through the same dedup path as worker
//! deliveries, and fan out to live subscribers the same way.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use quizimg_core::question::{FoundLink, SuggestedImageLink};
use quizimg_events::FoundLinksEvent;
use quizimg_ingest::ingest_found_links;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /questions/{question_id}/suggested-links`.
#[derive(Debug, Deserialize)]
pub struct AddLinksRequest {
    pub links: Vec<FoundLink>,
    #[serde(default)]
    pub origin: Option<String>,
}

/// Response payload for link insertion.
#[derive(Debug, Serialize)]
pub struct AddLinksResponse {
    pub inserted: usize,
    pub total: usize,
    pub items: Vec<SuggestedImageLink>,
}

/// GET /api/v1/questions/{question_id}/suggested-links
pub async fn list(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<SuggestedImageLink>>>> {
    let links = state.questions.suggested_links(&question_id).await?;
    Ok(Json(DataResponse { data: links }))
}

/// POST /api/v1/questions/{question_id}/suggested-links
///
/// Unlike the ingest surface, a storage failure here fails the request:
/// the operator is present and can retry.
pub async fn add(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    Json(input): Json<AddLinksRequest>,
) -> AppResult<Json<DataResponse<AddLinksResponse>>> {
    if input.links.is_empty() {
        return Err(AppError::BadRequest(
            "links must be a non-empty array".into(),
        ));
    }

    let outcome = ingest_found_links(
        state.questions.as_ref(),
        &question_id,
        &input.links,
        input.origin.as_deref(),
    )
    .await?;

    // Live subscribers learn about manual additions too.
    state.event_bus.publish(FoundLinksEvent::new(
        question_id,
        input.links,
        input.origin,
    ));

    Ok(Json(DataResponse {
        data: AddLinksResponse {
            inserted: outcome.inserted,
            total: outcome.total,
            items: outcome.items,
        },
    }))
}

/// DELETE /api/v1/questions/{question_id}/suggested-links/{link_id}
pub async fn remove(
    State(state): State<AppState>,
    Path((question_id, link_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    state
        .questions
        .remove_suggested_link(&question_id, &link_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
