//! Document-store seam for the question-image pipeline.
//!
//! Persistent storage of domain entities is an external collaborator; this
//! crate defines the narrow trait surface the coordinator needs (find/update
//! by id, field-level projections, explicit cascade hooks) plus the
//! in-memory reference implementation used by the default wiring and tests.

pub mod memory;
pub mod store;

pub use memory::MemoryStore;
pub use store::{
    ImagePairStore, QuestionStore, SharedImagePairStore, SharedQuestionStore, VariantProjection,
};
