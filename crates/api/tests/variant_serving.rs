//! Integration tests for conditional image variant serving.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use quizimg_core::image::{
    ImageVariant, ImageVariantPair, StoredBytes, VariantFormat, VariantMetadata,
};
use quizimg_core::question::{Question, QuestionType};
use quizimg_db::{ImagePairStore, QuestionStore};

use common::{build_test_app, test_config, TestApp};

const HIGH_BYTES: &[u8] = b"high-resolution-payload";
const LOW_BYTES: &[u8] = b"low-payload";

fn variant(data: StoredBytes, size: usize) -> ImageVariant {
    ImageVariant {
        data,
        metadata: VariantMetadata {
            format: VariantFormat {
                ext: "webp".into(),
                mime: "image/webp".into(),
            },
            width: 640,
            height: 480,
            size_bytes: size as u64,
        },
    }
}

/// App with one question ("q1") linked to a stored pair. The low variant is
/// stored length-prefixed so serving exercises normalization.
async fn app_with_image() -> TestApp {
    let test = build_test_app(test_config()).await;

    test.store
        .insert_question(Question {
            id: "q1".into(),
            qtype: QuestionType::Choice,
            locales: vec![],
            image_id: None,
            suggested_images: vec![],
        })
        .await;

    let pair = ImageVariantPair::new(
        "everest".into(),
        "abc123".into(),
        variant(StoredBytes::Raw(HIGH_BYTES.to_vec()), HIGH_BYTES.len()),
        variant(StoredBytes::to_length_prefixed(LOW_BYTES), LOW_BYTES.len()),
    );
    let pair_id = pair.id.clone();
    test.store.insert(pair).await.unwrap();
    test.store.link_image_pair("q1", &pair_id).await.unwrap();

    test
}

fn get(path: &str, if_none_match: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(tag) = if_none_match {
        builder = builder.header("if-none-match", tag);
    }
    builder.body(Body::empty()).unwrap()
}

fn low_etag() -> String {
    format!("\"abc123-low-{}\"", LOW_BYTES.len())
}

#[tokio::test]
async fn serves_variant_with_full_header_set() {
    let test = app_with_image().await;

    let response = test
        .app
        .oneshot(get("/api/v1/images/questions/q1/image/low", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers().clone();
    assert_eq!(headers["content-type"], "image/webp");
    assert_eq!(headers["etag"], low_etag().as_str());
    assert_eq!(headers["cache-control"], "public, max-age=86400");
    assert_eq!(headers["cross-origin-resource-policy"], "cross-origin");
    assert!(headers.contains_key("last-modified"));
    assert_eq!(
        headers["content-disposition"],
        "inline; filename=\"everest-low.webp\""
    );
    assert_eq!(
        headers["content-length"],
        LOW_BYTES.len().to_string().as_str()
    );

    // The length prefix never reaches the client.
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], LOW_BYTES);
}

#[tokio::test]
async fn matching_if_none_match_answers_304_without_a_body() {
    let test = app_with_image().await;

    let response = test
        .app
        .oneshot(get(
            "/api/v1/images/questions/q1/image/low",
            Some(&low_etag()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(response.headers()["etag"], low_etag().as_str());
    assert_eq!(
        response.headers()["cache-control"],
        "public, max-age=86400"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test]
async fn stale_if_none_match_serves_the_payload() {
    let test = app_with_image().await;

    let response = test
        .app
        .oneshot(get(
            "/api/v1/images/questions/q1/image/high",
            Some("\"old-tag-high-1\""),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], HIGH_BYTES);
}

#[tokio::test]
async fn unknown_variant_label_is_400() {
    let test = app_with_image().await;

    let response = test
        .app
        .oneshot(get("/api/v1/images/questions/q1/image/medium", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn question_without_an_image_is_404() {
    let test = build_test_app(test_config()).await;
    test.store
        .insert_question(Question {
            id: "bare".into(),
            qtype: QuestionType::Choice,
            locales: vec![],
            image_id: None,
            suggested_images: vec![],
        })
        .await;

    let response = test
        .app
        .oneshot(get("/api/v1/images/questions/bare/image/low", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_question_is_404() {
    let test = build_test_app(test_config()).await;

    let response = test
        .app
        .oneshot(get("/api/v1/images/questions/ghost/image/low", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
