//! Content-derived cache validation tags.
//!
//! ETags are derived deterministically from `{content hash, variant, size}`
//! so that re-serving unchanged content always yields the same tag, and
//! repeated ingestion of identical bytes stays cache-stable.

use sha2::{Digest, Sha256};

use crate::image::VariantKind;

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Derive the strong ETag for one stored variant.
pub fn etag_for(content_hash: &str, variant: VariantKind, size_bytes: usize) -> String {
    format!("\"{content_hash}-{}-{size_bytes}\"", variant.as_str())
}
