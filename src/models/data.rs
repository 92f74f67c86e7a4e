use serde::{Deserialize, Serialize};

use crate::models::rules::PassKind;

/// Which part of the card a validation call inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// OCR over the whole card, format scoring included.
    FullDocument,
    /// OCR over the name field only; format detection is assumed.
    NameRegion,
}

/// Outcome of one validation call.
///
/// Built once by the validator and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub image_format_valid: bool,
    pub name_matches: bool,
    pub document_format_detected: bool,
    pub extracted_text: String,
    pub message: String,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.image_format_valid && self.name_matches && self.document_format_detected
    }

    pub(crate) fn failed(message: String) -> Self {
        ValidationResult {
            image_format_valid: false,
            name_matches: false,
            document_format_detected: false,
            extracted_text: String::new(),
            message,
        }
    }
}

/// Best text produced by the OCR escalation, with its quality figures.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrAttemptResult {
    /// Normalized text.
    pub text: String,
    /// Share of alphanumeric, CJK and whitespace characters in `text`.
    pub quality_score: f64,
    /// Pass that produced `text`.
    pub pass: PassKind,
    /// Whether `text` cleared the garbage gate.
    pub reliable: bool,
}

impl OcrAttemptResult {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// What a free-form reading is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecognitionTarget {
    General,
    IdNumber,
}

/// Result of a free-form (non-validating) OCR reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrReading {
    pub text: String,
    pub confidence: f64,
    pub message: String,
}

impl OcrReading {
    pub(crate) fn empty(message: String) -> Self {
        OcrReading {
            text: String::new(),
            confidence: 0.0,
            message,
        }
    }
}
