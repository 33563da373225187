//! Pure translation from a question to an outbound find-links request.
//!
//! Selection is driven by the declared [`QuestionType`] first; the shape of
//! the canonical locale's correct answer only resolves what the declaration
//! leaves open. A declared MAP question with a non-coordinate answer is a
//! mapping failure, never a silent fallback to another shape.
//!
//! Mapping failures are per-item: the batch dispatcher reports them on the
//! failing item and keeps going.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::question::{CorrectAnswer, Question, QuestionType};

/// Caller-supplied knobs forwarded verbatim to the link-finder worker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<bool>,
}

/// Geographic answer for MAP requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// The closed set of request shapes accepted by the link-finder worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FindLinksRequest {
    #[serde(rename = "CHOICE", rename_all = "camelCase")]
    Choice {
        language: String,
        question: String,
        correct_text: String,
        wrong: Vec<String>,
        question_id: String,
        #[serde(flatten)]
        options: PlanOptions,
    },
    #[serde(rename = "NUMERICAL", rename_all = "camelCase")]
    Numerical {
        language: String,
        question: String,
        correct_number: f64,
        question_id: String,
        #[serde(flatten)]
        options: PlanOptions,
    },
    #[serde(rename = "MAP", rename_all = "camelCase")]
    Map {
        language: String,
        question: String,
        correct_coords: GeoPoint,
        question_id: String,
        #[serde(flatten)]
        options: PlanOptions,
    },
}

/// Map a question to its outbound request. Deterministic, no I/O.
pub fn map_question(
    question: &Question,
    options: &PlanOptions,
) -> Result<FindLinksRequest, CoreError> {
    let locale = question
        .canonical_locale()
        .ok_or_else(|| CoreError::Validation("Question has no locales".into()))?;

    let language = locale.language.clone();
    let text = locale.question.trim().to_string();

    match (question.qtype, &locale.correct) {
        (QuestionType::Numerical, CorrectAnswer::Number(n))
        | (QuestionType::Choice, CorrectAnswer::Number(n)) => {
            if !n.is_finite() {
                return Err(CoreError::Validation(
                    "Numerical question must have a finite correct number".into(),
                ));
            }
            require_text(&text)?;
            Ok(FindLinksRequest::Numerical {
                language,
                question: text,
                correct_number: *n,
                question_id: question.id.clone(),
                options: options.clone(),
            })
        }
        (QuestionType::Choice, CorrectAnswer::Text(correct)) => {
            let correct_text = correct.trim().to_string();
            if correct_text.is_empty() {
                return Err(CoreError::Validation(
                    "Choice question has empty correct text".into(),
                ));
            }
            require_text(&text)?;
            Ok(FindLinksRequest::Choice {
                language,
                question: text,
                correct_text,
                wrong: locale.wrong.clone(),
                question_id: question.id.clone(),
                options: options.clone(),
            })
        }
        (QuestionType::Map, CorrectAnswer::Coords(pair))
        | (QuestionType::Choice, CorrectAnswer::Coords(pair))
        | (QuestionType::Numerical, CorrectAnswer::Coords(pair)) => {
            let [lat, lon] = *pair;
            if !lat.is_finite() || !lon.is_finite() {
                return Err(CoreError::Validation(
                    "Map question must have finite [lat, lon] coordinates".into(),
                ));
            }
            Ok(FindLinksRequest::Map {
                language,
                question: if text.is_empty() {
                    "Locate on map".to_string()
                } else {
                    text
                },
                correct_coords: GeoPoint { lat, lon },
                question_id: question.id.clone(),
                options: options.clone(),
            })
        }
        (QuestionType::Map, _) => Err(CoreError::Validation(
            "Map question must have [lat, lon] in its correct answer".into(),
        )),
        (QuestionType::Numerical, CorrectAnswer::Text(s)) => {
            // A declared numerical question whose answer is a numeric string
            // still maps cleanly; anything else is malformed.
            let n: f64 = s.trim().parse().map_err(|_| {
                CoreError::Validation("Numerical question must have a numeric correct answer".into())
            })?;
            require_text(&text)?;
            Ok(FindLinksRequest::Numerical {
                language,
                question: text,
                correct_number: n,
                question_id: question.id.clone(),
                options: options.clone(),
            })
        }
    }
}

fn require_text(question_text: &str) -> Result<(), CoreError> {
    if question_text.is_empty() {
        return Err(CoreError::Validation("Question text is empty".into()));
    }
    Ok(())
}
