//! Wire types for the ingest endpoints.

use serde::{Deserialize, Serialize};

use quizimg_core::image::VariantFormat;
use quizimg_core::question::FoundLink;

/// Acknowledgment returned for every delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
    pub message: String,
}

impl Ack {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Discovered links for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundLinksDelivery {
    pub question_id: String,
    #[serde(default)]
    pub links: Vec<FoundLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// One compressed rendition: base64 bytes plus format metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantPayload {
    /// Base64-encoded image bytes.
    pub data: String,
    pub format: VariantFormat,
    pub width: u32,
    pub height: u32,
}

/// A finished pair of compressed variants for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedImageDelivery {
    pub question_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hash: String,
    pub high: VariantPayload,
    pub low: VariantPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}
