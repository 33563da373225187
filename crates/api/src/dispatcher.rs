//! Bounded-concurrency batch dispatch.
//!
//! A batch of question ids is resolved against the document store in one
//! bulk lookup, then fanned out to the link-finder with a shared atomic
//! cursor: a fixed set of workers repeatedly claims the next index until the
//! list is exhausted. At most `min(ceiling, len)` requests are in flight at
//! any moment, and results come back positionally aligned with the input so
//! callers can zip them against what they submitted.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use quizimg_core::mapper::{map_question, PlanOptions};
use quizimg_core::question::Question;
use quizimg_db::SharedQuestionStore;
use quizimg_workers::{JobStatus, WorkerClient};

use crate::state::AppState;

/// Default concurrency ceiling when none is configured.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 5;

/// Run `task` over every item with bounded concurrency.
///
/// The output has exactly one slot per input item, in input order. A slot is
/// `None` only when its task never produced a result (the pool worker that
/// claimed it panicked, or died before claiming it). Finished results are
/// handed off through a channel as they complete, so one crashing worker
/// cannot take already-completed results down with it.
///
/// A ceiling of zero is treated as one. Items are claimed through an atomic
/// cursor, so a slow item never blocks workers from draining the rest of the
/// list.
pub async fn run_indexed<T, R, F, Fut>(items: Vec<T>, ceiling: usize, task: F) -> Vec<Option<R>>
where
    T: Clone + Send + Sync + 'static,
    R: Send + 'static,
    F: Fn(usize, T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let len = items.len();
    if len == 0 {
        return Vec::new();
    }

    let items = Arc::new(items);
    let task = Arc::new(task);
    let cursor = Arc::new(AtomicUsize::new(0));
    let workers = ceiling.max(1).min(len);

    let (tx, mut rx) = mpsc::unbounded_channel();

    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let items = Arc::clone(&items);
            let task = Arc::clone(&task);
            let cursor = Arc::clone(&cursor);
            let tx = tx.clone();
            tokio::spawn(async move {
                loop {
                    let idx = cursor.fetch_add(1, Ordering::SeqCst);
                    if idx >= items.len() {
                        break;
                    }
                    let item = items[idx].clone();
                    let result = task(idx, item).await;
                    if tx.send((idx, result)).is_err() {
                        break;
                    }
                }
            })
        })
        .collect();
    drop(tx);

    // The channel closes once every worker has exited or panicked.
    let mut slots: Vec<Option<R>> = (0..len).map(|_| None).collect();
    while let Some((idx, result)) = rx.recv().await {
        slots[idx] = Some(result);
    }

    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Batch pool worker crashed");
        }
    }

    slots
}

/// Per-question outcome of a batch dispatch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResultItem {
    pub question_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate outcome of a batch dispatch.
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub ok: usize,
    pub failed: usize,
    pub results: Vec<BatchResultItem>,
}

/// Dispatch link-finding jobs for a batch of questions.
///
/// Every question is handled independently: one that is missing or cannot be
/// mapped to a request contributes a failed item instead of aborting the
/// batch. The items come back in input order.
pub async fn dispatch_find_images(
    state: &AppState,
    question_ids: Vec<String>,
    options: PlanOptions,
) -> BatchOutcome {
    dispatch_batch(
        Arc::clone(&state.questions),
        Arc::clone(&state.link_finder),
        state.config.batch_concurrency,
        question_ids,
        options,
    )
    .await
}

async fn dispatch_batch(
    questions: SharedQuestionStore,
    link_finder: Arc<WorkerClient>,
    ceiling: usize,
    question_ids: Vec<String>,
    options: PlanOptions,
) -> BatchOutcome {
    let total = question_ids.len();
    tracing::info!(total, ceiling, "Dispatching find-images batch");

    // One bulk lookup for the whole batch; ids the store does not return
    // become per-item "not found" failures below.
    let resolved: HashMap<String, Question> = match questions.find_by_ids(&question_ids).await {
        Ok(found) => found.into_iter().map(|q| (q.id.clone(), q)).collect(),
        Err(e) => {
            tracing::error!(error = %e, "Bulk question lookup failed");
            let message = e.to_string();
            return summarize(
                question_ids
                    .into_iter()
                    .map(|id| failed_item(id, message.clone()))
                    .collect(),
            );
        }
    };

    let work: Vec<(String, Option<Question>)> = question_ids
        .iter()
        .map(|id| (id.clone(), resolved.get(id).cloned()))
        .collect();

    let slots = run_indexed(work, ceiling, move |_, (question_id, question)| {
        let link_finder = Arc::clone(&link_finder);
        let options = options.clone();
        async move { dispatch_one(link_finder, question_id, question, options).await }
    })
    .await;

    let results = question_ids
        .into_iter()
        .zip(slots)
        .map(|(id, slot)| slot.unwrap_or_else(|| failed_item(id, "Dispatch task failed".into())))
        .collect();

    summarize(results)
}

/// Map and submit a single pre-resolved question.
async fn dispatch_one(
    link_finder: Arc<WorkerClient>,
    question_id: String,
    question: Option<Question>,
    options: PlanOptions,
) -> BatchResultItem {
    let Some(question) = question else {
        return failed_item(question_id, "Question not found".into());
    };

    let request = match map_question(&question, &options) {
        Ok(r) => r,
        Err(e) => return failed_item(question_id, e.to_string()),
    };

    match link_finder.create_job(&request, Some(&question_id)).await {
        Ok(created) => BatchResultItem {
            question_id,
            job_id: Some(created.id),
            status: Some(created.status),
            error: None,
        },
        Err(e) => failed_item(question_id, e.to_string()),
    }
}

fn failed_item(question_id: String, error: String) -> BatchResultItem {
    BatchResultItem {
        question_id,
        job_id: None,
        status: None,
        error: Some(error),
    }
}

fn summarize(results: Vec<BatchResultItem>) -> BatchOutcome {
    let ok = results.iter().filter(|r| r.error.is_none()).count();
    let failed = results.len() - ok;
    tracing::info!(ok, failed, "Batch dispatch finished");
    BatchOutcome {
        ok,
        failed,
        results,
    }
}
