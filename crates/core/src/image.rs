//! Image variant pairs and stored-binary normalization.
//!
//! A question owns at most one [`ImageVariantPair`]: two renditions (`low`,
//! `high`) stored together under a generated id and linked back from the
//! question document. Pairs are immutable once stored; replacing variants
//! means storing a new pair and relinking.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

/// Selector for one of the two renditions in a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    Low,
    High,
}

impl VariantKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariantKind::Low => "low",
            VariantKind::High => "high",
        }
    }
}

impl std::str::FromStr for VariantKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(VariantKind::Low),
            "high" => Ok(VariantKind::High),
            other => Err(CoreError::Validation(format!(
                "variant must be \"low\" or \"high\", got \"{other}\""
            ))),
        }
    }
}

impl std::fmt::Display for VariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File format of one variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantFormat {
    pub ext: String,
    pub mime: String,
}

/// Dimensions and size metadata for one variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantMetadata {
    pub format: VariantFormat,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

/// One rendition of a stored image: binary payload plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageVariant {
    pub data: StoredBytes,
    pub metadata: VariantMetadata,
}

/// Two immutable variants stored as one record, keyed by a generated id and
/// linked back from the owning question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageVariantPair {
    pub id: EntityId,
    /// Display name used when building download filenames.
    pub name: String,
    /// Content hash of the source image, used for ETag derivation.
    pub hash: String,
    pub high: ImageVariant,
    pub low: ImageVariant,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ImageVariantPair {
    /// Build a new pair with a generated id and current timestamps.
    pub fn new(name: String, hash: String, high: ImageVariant, low: ImageVariant) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            hash,
            high,
            low,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn variant(&self, kind: VariantKind) -> &ImageVariant {
        match kind {
            VariantKind::Low => &self.low,
            VariantKind::High => &self.high,
        }
    }
}

/// Binary payload as it comes back from the document store.
///
/// The storage layer may hand bytes back raw, wrapped in a length-prefixed
/// buffer, or as a base64 string inside a generic binary wrapper. Everything
/// downstream of a read normalizes through [`StoredBytes::into_bytes`]
/// immediately instead of branching on representation along the serving path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "repr", content = "value", rename_all = "snake_case")]
pub enum StoredBytes {
    /// The canonical in-memory representation.
    Raw(Vec<u8>),
    /// A 4-byte little-endian length header followed by the payload.
    LengthPrefixed(Vec<u8>),
    /// Base64-encoded payload from a generic binary wrapper.
    Base64(String),
}

impl StoredBytes {
    /// Normalize into a canonical byte sequence.
    pub fn into_bytes(self) -> Result<Vec<u8>, CoreError> {
        match self {
            StoredBytes::Raw(bytes) => Ok(bytes),
            StoredBytes::LengthPrefixed(buf) => {
                if buf.len() < 4 {
                    return Err(CoreError::Internal(
                        "length-prefixed payload shorter than its header".into(),
                    ));
                }
                let declared =
                    u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
                let payload = &buf[4..];
                if payload.len() != declared {
                    return Err(CoreError::Internal(format!(
                        "length prefix {declared} does not match payload length {}",
                        payload.len()
                    )));
                }
                Ok(payload.to_vec())
            }
            StoredBytes::Base64(s) => {
                use base64::Engine as _;
                base64::engine::general_purpose::STANDARD
                    .decode(s.as_bytes())
                    .map_err(|e| CoreError::Internal(format!("invalid base64 payload: {e}")))
            }
        }
    }

    /// Payload length without materializing a copy.
    pub fn len(&self) -> usize {
        match self {
            StoredBytes::Raw(b) => b.len(),
            StoredBytes::LengthPrefixed(b) => b.len().saturating_sub(4),
            StoredBytes::Base64(s) => {
                use base64::Engine as _;
                base64::engine::general_purpose::STANDARD
                    .decode(s.as_bytes())
                    .map(|b| b.len())
                    .unwrap_or(0)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wrap raw bytes in the length-prefixed encoding. Used by the in-memory
    /// store and tests to exercise normalization.
    pub fn to_length_prefixed(bytes: &[u8]) -> Self {
        let mut buf = Vec::with_capacity(bytes.len() + 4);
        buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        buf.extend_from_slice(bytes);
        StoredBytes::LengthPrefixed(buf)
    }
}
