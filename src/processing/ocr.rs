use image::GrayImage;
use log::{debug, info, warn};

use crate::config::OcrGateConfig;
use crate::models::{OcrAttemptResult, OcrPassConfig, PassKind};
use crate::processing::normalize::TextNormalizer;
use crate::utils::IdCardError;

/// Text recognition capability.
///
/// Implementations receive the full pass settings on every call and are
/// responsible for applying and reverting them; callers never touch engine
/// state directly.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &GrayImage, pass: &OcrPassConfig) -> Result<String, IdCardError>;
}

/// Share of characters that are alphanumeric, CJK ideographs or whitespace.
pub fn quality_score(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let valid = text
        .chars()
        .filter(|&c| c.is_alphanumeric() || ('\u{4E00}'..='\u{9FFF}').contains(&c) || c.is_whitespace())
        .count();
    valid as f64 / total as f64
}

/// Heuristic confidence for a single free-form reading.
pub fn estimate_confidence(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    let mut confidence: f64 = 0.5;
    if text.chars().any(|c| ('\u{4E00}'..='\u{9FA5}').contains(&c)) {
        confidence += 0.2;
    }
    if text.chars().any(|c| c.is_ascii_digit()) {
        confidence += 0.1;
    }
    let length = text.chars().count();
    if (2..=50).contains(&length) {
        confidence += 0.1;
    }
    let special = text
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
        .count();
    if special as f64 <= length as f64 * 0.2 {
        confidence += 0.1;
    }
    confidence.min(1.0)
}

/// Runs the engine through increasingly constrained passes until the text
/// clears the garbage gate, keeping the longest normalized result.
pub struct OcrOrchestrator {
    engine: Box<dyn OcrEngine>,
    normalizer: TextNormalizer,
    passes: Vec<OcrPassConfig>,
    gate: OcrGateConfig,
}

impl OcrOrchestrator {
    pub fn new(engine: Box<dyn OcrEngine>, normalizer: TextNormalizer, gate: OcrGateConfig) -> Self {
        OcrOrchestrator {
            engine,
            normalizer,
            passes: OcrPassConfig::escalation(),
            gate,
        }
    }

    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Whether `text` clears the minimum length and quality.
    pub fn is_reliable(&self, text: &str) -> bool {
        text.chars().count() >= self.gate.min_text_length
            && quality_score(text) >= self.gate.min_quality
    }

    /// Run one pass and normalize its text. Engine errors count as empty
    /// text for this pass only.
    pub fn run_pass(&self, image: &GrayImage, pass: &OcrPassConfig) -> OcrAttemptResult {
        let raw = match self.engine.recognize(image, pass) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("OCR pass '{}' failed: {}", pass.kind, e);
                String::new()
            }
        };
        let text = self.normalizer.normalize(&raw);
        let quality_score = quality_score(&text);
        let reliable = self.is_reliable(&text);

        debug!(
            "OCR pass '{}': {} chars, quality {:.2}, reliable {}",
            pass.kind,
            text.chars().count(),
            quality_score,
            reliable
        );

        OcrAttemptResult {
            text,
            quality_score,
            pass: pass.kind,
            reliable,
        }
    }

    /// Best attempt over the escalation passes. Never fails: a weak result
    /// is returned with `reliable == false`.
    pub fn extract(&self, image: &GrayImage) -> OcrAttemptResult {
        let mut passes = self.passes.iter();
        let mut best = match passes.next() {
            Some(first) => self.run_pass(image, first),
            None => {
                return OcrAttemptResult {
                    text: String::new(),
                    quality_score: 0.0,
                    pass: PassKind::Default,
                    reliable: false,
                }
            }
        };

        for pass in passes {
            if best.reliable {
                break;
            }
            info!(
                "OCR result from '{}' is weak, escalating to '{}'",
                best.pass, pass.kind
            );
            let attempt = self.run_pass(image, pass);
            if attempt.char_len() > best.char_len() {
                best = attempt;
            }
        }

        info!(
            "OCR extracted {} chars via '{}' (quality {:.2}{})",
            best.char_len(),
            best.pass,
            best.quality_score,
            if best.reliable { "" } else { ", low confidence" }
        );
        best
    }

    /// Raw engine call for callers that manage their own pass, e.g. free-form
    /// readings.
    pub fn recognize_raw(&self, image: &GrayImage, pass: &OcrPassConfig) -> Result<String, IdCardError> {
        self.engine.recognize(image, pass)
    }
}
