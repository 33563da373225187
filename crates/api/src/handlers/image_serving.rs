//! Conditional serving of stored image variants.
//!
//! Variants are addressed through the owning question, not the pair id, so
//! clients never track the relink that happens when a new pair is delivered.
//! The ETag is derived from the content hash, the variant label, and the
//! payload size; a matching `If-None-Match` short-circuits to 304 before any
//! bytes are materialized.

use axum::extract::{Path, State};
use axum::http::header::{
    CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE, ETAG, IF_NONE_MATCH, LAST_MODIFIED,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use quizimg_core::etag::etag_for;
use quizimg_core::image::VariantKind;
use quizimg_core::CoreError;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// How long browsers may cache a served variant, in seconds (one day).
const CACHE_MAX_AGE_SECS: u64 = 86_400;

/// GET /api/v1/images/questions/{question_id}/image/{variant}
pub async fn serve_variant(
    State(state): State<AppState>,
    Path((question_id, variant)): Path<(String, String)>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let kind: VariantKind = variant.parse().map_err(AppError::Core)?;

    let pair_id = state
        .questions
        .image_id(&question_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Image", &question_id))?;

    let projection = state
        .pairs
        .find_variant(&pair_id, kind)
        .await?
        .ok_or_else(|| CoreError::not_found("ImageVariantPair", &pair_id))?;

    let size = projection.variant.data.len();
    let etag = etag_for(&projection.hash, kind, size);

    let cache_headers = build_cache_headers(&etag, &projection.updated_at)?;

    // Conditional request: answer 304 without touching the payload.
    if if_none_match_hits(&headers, &etag) {
        return Ok((StatusCode::NOT_MODIFIED, cache_headers).into_response());
    }

    let bytes = projection.variant.data.into_bytes()?;
    let metadata = projection.variant.metadata;

    let mut response_headers = cache_headers;
    response_headers.insert(CONTENT_TYPE, header_value(&metadata.format.mime)?);
    response_headers.insert(
        CONTENT_DISPOSITION,
        header_value(&format!(
            "inline; filename=\"{}-{}.{}\"",
            projection.name,
            kind.as_str(),
            metadata.format.ext
        ))?,
    );

    Ok((StatusCode::OK, response_headers, bytes).into_response())
}

/// Headers shared by the 200 and 304 answers.
fn build_cache_headers(
    etag: &str,
    updated_at: &quizimg_core::types::Timestamp,
) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(ETAG, header_value(etag)?);
    headers.insert(
        CACHE_CONTROL,
        header_value(&format!("public, max-age={CACHE_MAX_AGE_SECS}"))?,
    );
    // Variants are embedded cross-origin by the quiz frontends.
    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("cross-origin"),
    );
    headers.insert(
        LAST_MODIFIED,
        header_value(&updated_at.format("%a, %d %b %Y %H:%M:%S GMT").to_string())?,
    );
    Ok(headers)
}

/// Whether the request's `If-None-Match` carries our current ETag.
fn if_none_match_hits(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').any(|candidate| candidate.trim() == etag))
        .unwrap_or(false)
}

fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::InternalError(format!("invalid header value: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn if_none_match_handles_lists() {
        let mut headers = HeaderMap::new();
        headers.insert(
            IF_NONE_MATCH,
            HeaderValue::from_static("\"aaa-low-1\", \"bbb-high-2\""),
        );
        assert!(if_none_match_hits(&headers, "\"bbb-high-2\""));
        assert!(!if_none_match_hits(&headers, "\"ccc-low-3\""));
    }

    #[test]
    fn missing_header_never_hits() {
        assert!(!if_none_match_hits(&HeaderMap::new(), "\"x-low-1\""));
    }
}
