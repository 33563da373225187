//! In-memory reference implementation of the store traits.
//!
//! Backed by `tokio::sync::RwLock<HashMap>`; suitable for tests and for
//! running the coordinator without an external document store. Binary
//! payloads are kept in whatever [`StoredBytes`] encoding they were given,
//! which keeps the serving path's normalization honest.
//!
//! [`StoredBytes`]: quizimg_core::image::StoredBytes

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quizimg_core::error::CoreError;
use quizimg_core::image::{ImageVariantPair, VariantKind};
use quizimg_core::question::{Question, SuggestedImageLink};
use quizimg_core::types::EntityId;

use crate::store::{ImagePairStore, QuestionStore, VariantProjection};

/// Thread-safe in-memory document store for questions and variant pairs.
#[derive(Default)]
pub struct MemoryStore {
    questions: RwLock<HashMap<EntityId, Question>>,
    pairs: RwLock<HashMap<EntityId, ImageVariantPair>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a question document (test and dev helper).
    pub async fn insert_question(&self, question: Question) {
        self.questions
            .write()
            .await
            .insert(question.id.clone(), question);
    }

    pub async fn question_count(&self) -> usize {
        self.questions.read().await.len()
    }

    pub async fn pair_count(&self) -> usize {
        self.pairs.read().await.len()
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Question>, CoreError> {
        Ok(self.questions.read().await.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Question>, CoreError> {
        let questions = self.questions.read().await;
        Ok(ids.iter().filter_map(|id| questions.get(id).cloned()).collect())
    }

    async fn suggested_links(&self, id: &str) -> Result<Vec<SuggestedImageLink>, CoreError> {
        let questions = self.questions.read().await;
        let question = questions
            .get(id)
            .ok_or_else(|| CoreError::not_found("Question", id))?;
        Ok(question.suggested_images.clone())
    }

    async fn push_suggested_links(
        &self,
        id: &str,
        links: &[SuggestedImageLink],
    ) -> Result<usize, CoreError> {
        let mut questions = self.questions.write().await;
        let question = questions
            .get_mut(id)
            .ok_or_else(|| CoreError::not_found("Question", id))?;
        question.suggested_images.extend_from_slice(links);
        Ok(question.suggested_images.len())
    }

    async fn remove_suggested_link(&self, id: &str, link_id: &str) -> Result<usize, CoreError> {
        let mut questions = self.questions.write().await;
        let question = questions
            .get_mut(id)
            .ok_or_else(|| CoreError::not_found("Question", id))?;
        question.suggested_images.retain(|l| l.id != link_id);
        Ok(question.suggested_images.len())
    }

    async fn image_id(&self, id: &str) -> Result<Option<EntityId>, CoreError> {
        let questions = self.questions.read().await;
        let question = questions
            .get(id)
            .ok_or_else(|| CoreError::not_found("Question", id))?;
        Ok(question.image_id.clone())
    }

    async fn link_image_pair(&self, id: &str, pair_id: &str) -> Result<(), CoreError> {
        let mut questions = self.questions.write().await;
        let question = questions
            .get_mut(id)
            .ok_or_else(|| CoreError::not_found("Question", id))?;
        question.image_id = Some(pair_id.to_string());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<Option<Question>, CoreError> {
        Ok(self.questions.write().await.remove(id))
    }
}

#[async_trait]
impl ImagePairStore for MemoryStore {
    async fn insert(&self, pair: ImageVariantPair) -> Result<(), CoreError> {
        self.pairs.write().await.insert(pair.id.clone(), pair);
        Ok(())
    }

    async fn find_variant(
        &self,
        pair_id: &str,
        kind: VariantKind,
    ) -> Result<Option<VariantProjection>, CoreError> {
        let pairs = self.pairs.read().await;
        Ok(pairs.get(pair_id).map(|pair| VariantProjection {
            pair_id: pair.id.clone(),
            name: pair.name.clone(),
            hash: pair.hash.clone(),
            updated_at: pair.updated_at,
            variant: pair.variant(kind).clone(),
        }))
    }

    async fn delete(&self, pair_id: &str) -> Result<bool, CoreError> {
        Ok(self.pairs.write().await.remove(pair_id).is_some())
    }
}
