//! The question entity as seen by this coordinator.
//!
//! Questions live in an external document store; this crate only models the
//! fields the pipeline reads (type, locales) and the fields it owns on the
//! question document (the suggested-link collection and the variant-pair
//! reference).

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

/// Origin label used when a found-links delivery carries no origin.
pub const DEFAULT_LINK_ORIGIN: &str = "image-links";

/// Declared question type. May disagree with the shape of the correct
/// answer; the mapper reconciles the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Choice,
    Numerical,
    Map,
}

/// The canonical-locale correct answer, discriminated by JSON shape:
/// a string, a number, or a two-element coordinate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Text(String),
    Number(f64),
    Coords([f64; 2]),
}

/// One localized rendition of a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locale {
    pub language: String,
    pub question: String,
    pub correct: CorrectAnswer,
    #[serde(default)]
    pub wrong: Vec<String>,
}

/// A candidate image link discovered for a question.
///
/// Unique by `url` within the owning question; re-ingesting a previously
/// seen url is a no-op. Never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedImageLink {
    pub id: EntityId,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub origin: String,
    pub created_at: Timestamp,
}

/// A link as delivered by the link-finder worker, before it is assigned an
/// id and an origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoundLink {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// The question document, projected to the fields this pipeline touches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub qtype: QuestionType,
    #[serde(default)]
    pub locales: Vec<Locale>,
    /// Reference to the question's current [`ImageVariantPair`], if any.
    ///
    /// [`ImageVariantPair`]: crate::image::ImageVariantPair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<EntityId>,
    #[serde(default)]
    pub suggested_images: Vec<SuggestedImageLink>,
}

impl Question {
    /// Pick the locale used for outbound requests: `en` if present,
    /// otherwise the first available one.
    pub fn canonical_locale(&self) -> Option<&Locale> {
        self.locales
            .iter()
            .find(|l| l.language.eq_ignore_ascii_case("en"))
            .or_else(|| self.locales.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(lang: &str) -> Locale {
        Locale {
            language: lang.to_string(),
            question: format!("question in {lang}"),
            correct: CorrectAnswer::Text("answer".into()),
            wrong: vec![],
        }
    }

    fn question(locales: Vec<Locale>) -> Question {
        Question {
            id: "q1".into(),
            qtype: QuestionType::Choice,
            locales,
            image_id: None,
            suggested_images: vec![],
        }
    }

    #[test]
    fn canonical_locale_prefers_en() {
        let q = question(vec![locale("de"), locale("EN"), locale("fr")]);
        assert_eq!(q.canonical_locale().unwrap().language, "EN");
    }

    #[test]
    fn canonical_locale_falls_back_to_first() {
        let q = question(vec![locale("de"), locale("fr")]);
        assert_eq!(q.canonical_locale().unwrap().language, "de");
    }

    #[test]
    fn canonical_locale_none_when_empty() {
        assert!(question(vec![]).canonical_locale().is_none());
    }

    #[test]
    fn correct_answer_deserializes_by_shape() {
        let text: CorrectAnswer = serde_json::from_str("\"Paris\"").unwrap();
        let number: CorrectAnswer = serde_json::from_str("42.5").unwrap();
        let coords: CorrectAnswer = serde_json::from_str("[48.85, 2.35]").unwrap();

        assert_eq!(text, CorrectAnswer::Text("Paris".into()));
        assert_eq!(number, CorrectAnswer::Number(42.5));
        assert_eq!(coords, CorrectAnswer::Coords([48.85, 2.35]));
    }
}
