//! Contract tests exercising the store traits through trait objects, the way
//! the API and ingest layers consume them.

use std::sync::Arc;

use quizimg_core::error::CoreError;
use quizimg_core::image::{
    ImageVariant, ImageVariantPair, StoredBytes, VariantFormat, VariantKind, VariantMetadata,
};
use quizimg_core::question::{Question, QuestionType, SuggestedImageLink};
use quizimg_db::{MemoryStore, SharedImagePairStore, SharedQuestionStore};

fn question(id: &str) -> Question {
    Question {
        id: id.into(),
        qtype: QuestionType::Choice,
        locales: vec![],
        image_id: None,
        suggested_images: vec![],
    }
}

fn link(id: &str, url: &str) -> SuggestedImageLink {
    SuggestedImageLink {
        id: id.into(),
        url: url.into(),
        title: None,
        source: None,
        origin: "image-links".into(),
        created_at: chrono::Utc::now(),
    }
}

fn variant(bytes: &[u8]) -> ImageVariant {
    ImageVariant {
        data: StoredBytes::Raw(bytes.to_vec()),
        metadata: VariantMetadata {
            format: VariantFormat {
                ext: "webp".into(),
                mime: "image/webp".into(),
            },
            width: 4,
            height: 4,
            size_bytes: bytes.len() as u64,
        },
    }
}

#[tokio::test]
async fn link_lifecycle_through_trait_objects() {
    let store = Arc::new(MemoryStore::new());
    store.insert_question(question("q1")).await;
    let questions: SharedQuestionStore = store;

    let total = questions
        .push_suggested_links("q1", &[link("l1", "https://a"), link("l2", "https://b")])
        .await
        .unwrap();
    assert_eq!(total, 2);

    let remaining = questions.remove_suggested_link("q1", "l1").await.unwrap();
    assert_eq!(remaining, 1);

    let links = questions.suggested_links("q1").await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].id, "l2");
}

#[tokio::test]
async fn delete_returns_the_document_for_cascading() {
    let store = Arc::new(MemoryStore::new());
    store.insert_question(question("q1")).await;

    let questions: SharedQuestionStore = store.clone();
    let pairs: SharedImagePairStore = store;

    let pair = ImageVariantPair::new("pic".into(), "h".into(), variant(b"hi"), variant(b"lo"));
    let pair_id = pair.id.clone();
    pairs.insert(pair).await.unwrap();
    questions.link_image_pair("q1", &pair_id).await.unwrap();

    let removed = questions.delete("q1").await.unwrap().unwrap();
    assert_eq!(removed.image_id.as_deref(), Some(pair_id.as_str()));

    // The pair is untouched until the caller cascades.
    assert!(pairs.delete(&pair_id).await.unwrap());
    assert!(!pairs.delete(&pair_id).await.unwrap());
}

#[tokio::test]
async fn operations_on_missing_questions_are_not_found() {
    let store = Arc::new(MemoryStore::new());
    let questions: SharedQuestionStore = store;

    let err = questions
        .push_suggested_links("ghost", &[link("l1", "https://a")])
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));

    let err = questions.link_image_pair("ghost", "p1").await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));

    // Delete of a missing document is a clean None, not an error.
    assert!(questions.delete("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn variant_projection_is_absent_for_unknown_pairs() {
    let store = Arc::new(MemoryStore::new());
    let pairs: SharedImagePairStore = store;
    let found = pairs.find_variant("nope", VariantKind::Low).await.unwrap();
    assert!(found.is_none());
}
