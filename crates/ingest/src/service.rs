//! Ingestion operations shared by the ingest server and the control-plane
//! API (explicit link submission uses the same dedup path).

use base64::Engine as _;

use quizimg_core::error::CoreError;
use quizimg_core::etag::sha256_hex;
use quizimg_core::image::{ImageVariant, ImageVariantPair, StoredBytes, VariantMetadata};
use quizimg_core::question::{FoundLink, SuggestedImageLink, DEFAULT_LINK_ORIGIN};
use quizimg_db::{ImagePairStore, QuestionStore};

use crate::payload::{CompressedImageDelivery, VariantPayload};

/// Result of one link-ingestion call.
#[derive(Debug, Clone)]
pub struct LinkInsertOutcome {
    /// How many links were actually new.
    pub inserted: usize,
    /// Total stored links for the question after the call.
    pub total: usize,
    /// The newly stored links.
    pub items: Vec<SuggestedImageLink>,
}

/// Persist a found-links delivery, deduplicating by URL against the links
/// already stored for the question. Re-ingesting a previously seen URL is a
/// no-op, which makes concurrent deliveries for the same question safe.
pub async fn ingest_found_links(
    store: &dyn QuestionStore,
    question_id: &str,
    links: &[FoundLink],
    origin: Option<&str>,
) -> Result<LinkInsertOutcome, CoreError> {
    if question_id.is_empty() {
        return Err(CoreError::Validation("questionId is required".into()));
    }
    if links.is_empty() {
        return Err(CoreError::Validation("links must be a non-empty array".into()));
    }

    let existing = store.suggested_links(question_id).await?;
    let mut seen: std::collections::HashSet<String> =
        existing.iter().map(|l| l.url.trim().to_string()).collect();

    let origin = origin.unwrap_or(DEFAULT_LINK_ORIGIN);
    let now = chrono::Utc::now();

    let to_insert: Vec<SuggestedImageLink> = links
        .iter()
        .filter_map(|l| {
            let url = l.url.trim().to_string();
            if url.is_empty() || !seen.insert(url.clone()) {
                return None;
            }
            Some(SuggestedImageLink {
                id: uuid::Uuid::new_v4().to_string(),
                url,
                title: l.title.clone(),
                source: l.source.clone(),
                origin: origin.to_string(),
                created_at: now,
            })
        })
        .collect();

    if to_insert.is_empty() {
        return Ok(LinkInsertOutcome {
            inserted: 0,
            total: existing.len(),
            items: vec![],
        });
    }

    let total = store.push_suggested_links(question_id, &to_insert).await?;

    tracing::info!(
        question_id,
        added = to_insert.len(),
        total,
        "suggested links saved",
    );

    Ok(LinkInsertOutcome {
        inserted: to_insert.len(),
        total,
        items: to_insert,
    })
}

/// Store a delivered variant pair as a new immutable record and relink the
/// question to it. Replacement is always a new pair id; concurrent
/// deliveries degrade to last-write-wins on the question's reference.
pub async fn store_compressed_pair(
    questions: &dyn QuestionStore,
    pairs: &dyn ImagePairStore,
    delivery: &CompressedImageDelivery,
) -> Result<String, CoreError> {
    if delivery.question_id.is_empty() {
        return Err(CoreError::Validation("questionId is required".into()));
    }

    let high = decode_variant(&delivery.high, "high")?;
    let low = decode_variant(&delivery.low, "low")?;

    if questions.find_by_id(&delivery.question_id).await?.is_none() {
        return Err(CoreError::not_found("Question", &delivery.question_id));
    }

    let name = if delivery.name.is_empty() {
        delivery.question_id.clone()
    } else {
        delivery.name.clone()
    };
    let hash = if delivery.hash.is_empty() {
        // Workers normally hash the source image; fall back to hashing the
        // high variant so the ETag stays content-derived.
        match &high.data {
            StoredBytes::Raw(bytes) => sha256_hex(bytes),
            _ => unreachable!("decode_variant always produces raw bytes"),
        }
    } else {
        delivery.hash.clone()
    };

    let pair = ImageVariantPair::new(name, hash, high, low);
    let pair_id = pair.id.clone();

    pairs.insert(pair).await?;
    questions
        .link_image_pair(&delivery.question_id, &pair_id)
        .await?;

    tracing::info!(
        question_id = %delivery.question_id,
        pair_id = %pair_id,
        "compressed variant pair stored and linked",
    );

    Ok(pair_id)
}

/// Decode one variant payload into its canonical in-memory form.
fn decode_variant(payload: &VariantPayload, which: &str) -> Result<ImageVariant, CoreError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.data.as_bytes())
        .map_err(|e| CoreError::Validation(format!("{which} variant is not valid base64: {e}")))?;

    if bytes.is_empty() {
        return Err(CoreError::Validation(format!(
            "{which} variant must not be empty"
        )));
    }

    Ok(ImageVariant {
        metadata: VariantMetadata {
            format: payload.format.clone(),
            width: payload.width,
            height: payload.height,
            size_bytes: bytes.len() as u64,
        },
        data: StoredBytes::Raw(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use quizimg_core::image::VariantFormat;
    use quizimg_core::question::{Question, QuestionType};
    use quizimg_db::MemoryStore;

    fn question(id: &str) -> Question {
        Question {
            id: id.into(),
            qtype: QuestionType::Choice,
            locales: vec![],
            image_id: None,
            suggested_images: vec![],
        }
    }

    fn link(url: &str) -> FoundLink {
        FoundLink {
            url: url.into(),
            title: None,
            source: None,
        }
    }

    fn variant_payload(bytes: &[u8]) -> VariantPayload {
        VariantPayload {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            format: VariantFormat {
                ext: "webp".into(),
                mime: "image/webp".into(),
            },
            width: 64,
            height: 64,
        }
    }

    #[tokio::test]
    async fn ingesting_same_url_twice_is_idempotent() {
        let store = MemoryStore::new();
        store.insert_question(question("q1")).await;

        let first = ingest_found_links(&store, "q1", &[link("https://a")], None)
            .await
            .unwrap();
        assert_eq!(first.inserted, 1);

        let second = ingest_found_links(&store, "q1", &[link("https://a")], None)
            .await
            .unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.total, 1);
    }

    #[tokio::test]
    async fn distinct_urls_are_both_stored() {
        let store = MemoryStore::new();
        store.insert_question(question("q1")).await;

        let outcome = ingest_found_links(
            &store,
            "q1",
            &[link("https://a"), link("https://b"), link("https://a")],
            Some("wiki"),
        )
        .await
        .unwrap();

        assert_eq!(outcome.inserted, 2);
        assert_eq!(outcome.total, 2);
        assert!(outcome.items.iter().all(|l| l.origin == "wiki"));
    }

    #[tokio::test]
    async fn unknown_question_is_not_found() {
        let store = MemoryStore::new();
        let err = ingest_found_links(&store, "missing", &[link("https://a")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn storing_pair_links_question() {
        let store = MemoryStore::new();
        store.insert_question(question("q1")).await;

        let delivery = CompressedImageDelivery {
            question_id: "q1".into(),
            name: "mountain".into(),
            hash: "h1".into(),
            high: variant_payload(b"high-bytes"),
            low: variant_payload(b"low-bytes"),
            origin: None,
        };

        let pair_id = store_compressed_pair(&store, &store, &delivery)
            .await
            .unwrap();

        assert_eq!(
            store.image_id("q1").await.unwrap().as_deref(),
            Some(pair_id.as_str())
        );
        assert_eq!(store.pair_count().await, 1);
    }

    #[tokio::test]
    async fn replacement_stores_new_pair_and_relinks() {
        let store = MemoryStore::new();
        store.insert_question(question("q1")).await;

        let delivery = CompressedImageDelivery {
            question_id: "q1".into(),
            name: "mountain".into(),
            hash: "h1".into(),
            high: variant_payload(b"one"),
            low: variant_payload(b"one"),
            origin: None,
        };

        let first = store_compressed_pair(&store, &store, &delivery).await.unwrap();
        let second = store_compressed_pair(&store, &store, &delivery).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(
            store.image_id("q1").await.unwrap().as_deref(),
            Some(second.as_str())
        );
        // The first pair is untouched: pairs are immutable once stored.
        assert_eq!(store.pair_count().await, 2);
    }

    #[tokio::test]
    async fn unknown_question_stores_nothing() {
        let store = MemoryStore::new();
        let delivery = CompressedImageDelivery {
            question_id: "missing".into(),
            name: String::new(),
            hash: String::new(),
            high: variant_payload(b"x"),
            low: variant_payload(b"y"),
            origin: None,
        };

        let err = store_compressed_pair(&store, &store, &delivery)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert_eq!(store.pair_count().await, 0);
    }
}
