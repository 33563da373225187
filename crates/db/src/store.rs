//! Store traits consumed by the API, ingest, and dispatcher layers.
//!
//! Every method is a single round-trip to the document store. Projections
//! exist so callers never transfer bytes they will not use: the variant
//! serving path loads exactly one of the two variants.

use async_trait::async_trait;
use std::sync::Arc;

use quizimg_core::error::CoreError;
use quizimg_core::image::{ImageVariant, ImageVariantPair, VariantKind};
use quizimg_core::question::{Question, SuggestedImageLink};
use quizimg_core::types::{EntityId, Timestamp};

/// Projection of one variant out of a stored pair, together with the pair
/// fields needed to build cache headers.
#[derive(Debug, Clone)]
pub struct VariantProjection {
    pub pair_id: EntityId,
    pub name: String,
    pub hash: String,
    pub updated_at: Timestamp,
    pub variant: ImageVariant,
}

/// Access to question documents.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Full document by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Question>, CoreError>;

    /// Bulk lookup; missing ids are simply absent from the result.
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Question>, CoreError>;

    /// Projection: the question's current suggested links.
    /// `NotFound` if the question does not exist.
    async fn suggested_links(&self, id: &str) -> Result<Vec<SuggestedImageLink>, CoreError>;

    /// Append links to the question's collection. Callers are responsible
    /// for URL dedup; the store appends what it is given.
    async fn push_suggested_links(
        &self,
        id: &str,
        links: &[SuggestedImageLink],
    ) -> Result<usize, CoreError>;

    /// Remove one link by its id. Returns the remaining link count, or
    /// `NotFound` if the question does not exist.
    async fn remove_suggested_link(&self, id: &str, link_id: &str) -> Result<usize, CoreError>;

    /// Projection: the question's linked variant-pair id.
    /// `NotFound` if the question does not exist.
    async fn image_id(&self, id: &str) -> Result<Option<EntityId>, CoreError>;

    /// Point the question at a new variant pair (last write wins).
    async fn link_image_pair(&self, id: &str, pair_id: &str) -> Result<(), CoreError>;

    /// Delete the question, returning the removed document so the caller
    /// can cascade to owned records. Cascades are explicit, not automatic.
    async fn delete(&self, id: &str) -> Result<Option<Question>, CoreError>;
}

/// Access to image-variant-pair documents.
#[async_trait]
pub trait ImagePairStore: Send + Sync {
    /// Store a new immutable pair.
    async fn insert(&self, pair: ImageVariantPair) -> Result<(), CoreError>;

    /// Load one variant's projection; never both.
    async fn find_variant(
        &self,
        pair_id: &str,
        kind: VariantKind,
    ) -> Result<Option<VariantProjection>, CoreError>;

    /// Delete a pair (used by the question cascade).
    async fn delete(&self, pair_id: &str) -> Result<bool, CoreError>;
}

pub type SharedQuestionStore = Arc<dyn QuestionStore>;
pub type SharedImagePairStore = Arc<dyn ImagePairStore>;
