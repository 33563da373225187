//! Question deletion with its explicit image cascade.

use axum::extract::{Path, State};
use axum::http::StatusCode;

use quizimg_core::CoreError;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// DELETE /api/v1/questions/{question_id}
///
/// Removes the question and, when it owns a variant pair, the pair as well.
/// The cascade is explicit: the store deletes nothing it was not asked to.
pub async fn delete(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
) -> AppResult<StatusCode> {
    let removed = state
        .questions
        .delete(&question_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Question", &question_id)))?;

    if let Some(pair_id) = removed.image_id {
        let deleted = state.pairs.delete(&pair_id).await?;
        if !deleted {
            // The reference can outlive the pair when a concurrent delivery
            // relinked between our two store calls. Nothing to clean up.
            tracing::warn!(
                question_id = %question_id,
                pair_id = %pair_id,
                "Question referenced a variant pair that no longer exists",
            );
        }
    }

    tracing::info!(question_id = %question_id, "Question deleted");
    Ok(StatusCode::NO_CONTENT)
}
