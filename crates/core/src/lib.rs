//! Domain types and pure logic for the question-image pipeline.
//!
//! This crate has no I/O. It provides:
//!
//! - [`error::CoreError`]: the closed error taxonomy shared by every layer.
//! - [`question`]: the question entity, its locales, and suggested links.
//! - [`image`]: image variant pairs and stored-binary normalization.
//! - [`mapper`]: the pure question to find-links request translation.
//! - [`etag`]: content-derived cache validation tags and hashing.

pub mod error;
pub mod etag;
pub mod image;
pub mod mapper;
pub mod question;
pub mod types;

pub use error::CoreError;
