//! Handlers for the two delivery kinds.

use axum::extract::State;
use axum::Json;

use quizimg_events::FoundLinksEvent;

use crate::payload::{Ack, CompressedImageDelivery, FoundLinksDelivery};
use crate::server::IngestState;
use crate::service;

/// POST /ingest/found-links
///
/// Fan-out happens first and unconditionally, so live viewers are never
/// blocked on storage latency. A persistence failure is logged but does not
/// fail the acknowledgment; the worker cannot fix a storage-layer problem
/// by retrying.
pub async fn accept_found_links(
    State(state): State<IngestState>,
    Json(delivery): Json<FoundLinksDelivery>,
) -> Json<Ack> {
    let count = delivery.links.len();
    tracing::info!(
        question_id = %delivery.question_id,
        origin = delivery.origin.as_deref().unwrap_or("image-links"),
        count,
        "found-links delivery received",
    );

    state.bus.publish(FoundLinksEvent::new(
        delivery.question_id.clone(),
        delivery.links.clone(),
        delivery.origin.clone(),
    ));

    match service::ingest_found_links(
        state.questions.as_ref(),
        &delivery.question_id,
        &delivery.links,
        delivery.origin.as_deref(),
    )
    .await
    {
        Ok(outcome) => Json(Ack::ok(format!(
            "received {count} link(s), {} new",
            outcome.inserted
        ))),
        Err(e) => {
            tracing::warn!(
                question_id = %delivery.question_id,
                error = %e,
                "found-links persistence failed; fan-out already delivered",
            );
            Json(Ack::ok(format!("received {count} link(s)")))
        }
    }
}

/// POST /ingest/compressed-image
///
/// Storage success is the whole point of this call, so any failure is
/// reported back (`ok=false`) and the worker may retry.
pub async fn accept_compressed_image(
    State(state): State<IngestState>,
    Json(delivery): Json<CompressedImageDelivery>,
) -> Json<Ack> {
    tracing::info!(
        question_id = %delivery.question_id,
        name = %delivery.name,
        "compressed-image delivery received",
    );

    match service::store_compressed_pair(
        state.questions.as_ref(),
        state.pairs.as_ref(),
        &delivery,
    )
    .await
    {
        Ok(pair_id) => Json(Ack::ok(format!("stored pair {pair_id}"))),
        Err(e) => {
            tracing::warn!(
                question_id = %delivery.question_id,
                error = %e,
                "compressed-image delivery rejected",
            );
            Json(Ack::failed(e.to_string()))
        }
    }
}
