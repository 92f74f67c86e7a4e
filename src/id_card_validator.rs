use image::RgbImage;
use log::{info, warn};
use std::path::Path;

use crate::config::ValidatorConfig;
use crate::models::*;
use crate::processing::confusion::{ConfusionTable, SimilarCharGroups};
use crate::processing::ocr::{estimate_confidence, OcrEngine, OcrOrchestrator};
use crate::processing::{ImagePreprocessor, RegionExtractor, TextNormalizer};
use crate::utils::IdCardError;
use crate::validation::{is_id_number_format, FormatScorer, NameMatcher};

const WEAK_EXTRACTION_NOTE: &str =
    "Text extraction was weak; try a sharper, evenly lit photo of the card";

/// Checks a photographed national ID card against an expected name.
///
/// Construction wires the pipeline once; every call then decodes the bytes,
/// binarizes the card (or its name field), runs the OCR escalation and
/// applies the name and format checks. Calls never fail: problems end up in
/// the returned result's message.
pub struct IdCardValidator {
    config: ValidatorConfig,
    preprocessor: ImagePreprocessor,
    orchestrator: OcrOrchestrator,
    matcher: NameMatcher,
    scorer: FormatScorer,
}

impl IdCardValidator {
    pub fn new(engine: Box<dyn OcrEngine>) -> Self {
        Self::build(engine, ValidatorConfig::default())
    }

    pub fn with_config(engine: Box<dyn OcrEngine>, config: ValidatorConfig) -> Result<Self, IdCardError> {
        config.validate()?;
        Ok(Self::build(engine, config))
    }

    fn build(engine: Box<dyn OcrEngine>, config: ValidatorConfig) -> Self {
        let orchestrator = OcrOrchestrator::new(engine, TextNormalizer::default(), config.ocr.clone());
        let matcher = NameMatcher::new(
            ConfusionTable::name_cleanup(),
            SimilarCharGroups::surnames(),
            config.matching.split_match_ratio,
        );
        IdCardValidator {
            preprocessor: ImagePreprocessor::new(config.preprocess.clone()),
            orchestrator,
            matcher,
            scorer: FormatScorer::new(config.format.score_threshold),
            config,
        }
    }

    /// Replace the OCR correction table and the name-matching data.
    pub fn with_tables(
        mut self,
        document: ConfusionTable,
        name_cleanup: ConfusionTable,
        groups: SimilarCharGroups,
    ) -> Self {
        self.orchestrator = self.orchestrator.with_normalizer(TextNormalizer::new(document));
        self.matcher = NameMatcher::new(name_cleanup, groups, self.config.matching.split_match_ratio);
        self
    }

    /// Full-card validation.
    pub fn validate(&self, image_bytes: &[u8], expected_name: &str) -> ValidationResult {
        self.validate_with_mode(image_bytes, expected_name, ValidationMode::FullDocument)
    }

    /// Name-field-only validation; the format check is assumed to pass.
    pub fn validate_name_region(&self, image_bytes: &[u8], expected_name: &str) -> ValidationResult {
        self.validate_with_mode(image_bytes, expected_name, ValidationMode::NameRegion)
    }

    pub fn validate_with_mode(
        &self,
        image_bytes: &[u8],
        expected_name: &str,
        mode: ValidationMode,
    ) -> ValidationResult {
        let image = match ImagePreprocessor::decode(image_bytes) {
            Ok(image) => image,
            Err(e) => {
                warn!("Could not decode image: {}", e);
                let message = match mode {
                    ValidationMode::FullDocument => format!("Image processing failed: {}", e),
                    ValidationMode::NameRegion => format!("Name region validation failed: {}", e),
                };
                return ValidationResult::failed(message);
            }
        };

        info!(
            "Validating {}x{} image in {:?} mode",
            image.width(),
            image.height(),
            mode
        );

        let image_format_valid = self.check_image_format(image.width(), image.height());
        let attempt = self.extract(&image, mode);
        let name_matches = self.matcher.matches(&attempt.text, expected_name);
        let document_format_detected = match mode {
            ValidationMode::FullDocument => self.scorer.score(&attempt.text),
            ValidationMode::NameRegion => true,
        };

        let mut message = match mode {
            ValidationMode::FullDocument => {
                full_document_message(image_format_valid, name_matches, document_format_detected)
            }
            ValidationMode::NameRegion => {
                name_region_message(image_format_valid, name_matches, &attempt.text)
            }
        };
        let all_passed = image_format_valid && name_matches && document_format_detected;
        if !attempt.reliable && !all_passed {
            message.push_str("\n• ");
            message.push_str(WEAK_EXTRACTION_NOTE);
        }

        info!(
            "Validation finished: image {}, name {}, format {}",
            image_format_valid, name_matches, document_format_detected
        );

        ValidationResult {
            image_format_valid,
            name_matches,
            document_format_detected,
            extracted_text: attempt.text,
            message,
        }
    }

    /// Read an image from disk and validate it.
    pub fn validate_file<P: AsRef<Path>>(
        &self,
        path: P,
        expected_name: &str,
        mode: ValidationMode,
    ) -> Result<ValidationResult, IdCardError> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(self.validate_with_mode(&bytes, expected_name, mode))
    }

    /// Whether width/height is close enough to the card's aspect ratio.
    /// There is no minimum size.
    pub fn check_image_format(&self, width: u32, height: u32) -> bool {
        if height == 0 {
            return false;
        }
        let ratio = width as f64 / height as f64;
        let document = &self.config.document;
        (ratio - document.reference_aspect_ratio).abs() <= document.aspect_ratio_tolerance
    }

    fn extract(&self, image: &RgbImage, mode: ValidationMode) -> OcrAttemptResult {
        let binary = match mode {
            ValidationMode::FullDocument => self.preprocessor.binarize(image),
            ValidationMode::NameRegion => {
                let region = RegionExtractor::crop(image, &self.config.name_region);
                self.preprocessor.binarize(&region)
            }
        };
        self.orchestrator.extract(&binary)
    }

    /// Single-pass reading without any validation.
    pub fn read_text(&self, image_bytes: &[u8], target: RecognitionTarget) -> OcrReading {
        let image = match ImagePreprocessor::decode(image_bytes) {
            Ok(image) => image,
            Err(e) => return OcrReading::empty(format!("Could not decode image: {}", e)),
        };
        let gray = ImagePreprocessor::to_grayscale(&image);

        match target {
            RecognitionTarget::General => {
                let raw = match self.orchestrator.recognize_raw(&gray, &OcrPassConfig::default_pass()) {
                    Ok(raw) => raw,
                    Err(e) => return OcrReading::empty(format!("OCR failed: {}", e)),
                };
                let text = raw.trim();
                if text.is_empty() {
                    return OcrReading::empty("No text recognised".to_string());
                }
                OcrReading {
                    text: text.to_string(),
                    confidence: estimate_confidence(text),
                    message: "OCR succeeded".to_string(),
                }
            }
            RecognitionTarget::IdNumber => {
                let raw = match self.orchestrator.recognize_raw(&gray, &OcrPassConfig::id_number()) {
                    Ok(raw) => raw,
                    Err(e) => return OcrReading::empty(format!("ID number OCR failed: {}", e)),
                };
                let text: String = raw
                    .to_uppercase()
                    .chars()
                    .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
                    .collect();
                if text.is_empty() {
                    return OcrReading::empty("No ID number recognised".to_string());
                }
                if is_id_number_format(&text) {
                    info!("ID number recognised: {}", text);
                    OcrReading {
                        text,
                        confidence: 0.95,
                        message: "ID number recognised".to_string(),
                    }
                } else {
                    warn!("Incomplete ID number: {}", text);
                    OcrReading {
                        text,
                        confidence: 0.6,
                        message: "ID number partially recognised; check the format".to_string(),
                    }
                }
            }
        }
    }
}

fn full_document_message(image_format_valid: bool, name_matches: bool, format_detected: bool) -> String {
    if image_format_valid && name_matches && format_detected {
        return "ID card validation succeeded".to_string();
    }

    let mut message = String::from("ID card validation failed:");
    if !image_format_valid {
        message.push_str("\n• Image aspect ratio does not match the ID card (85.6mm x 54mm)");
    }
    if !name_matches {
        message.push_str("\n• Expected name not found on the card");
    }
    if !format_detected {
        message.push_str("\n• ID card features not detected (keywords, ID number, field labels)");
    }
    message
}

fn name_region_message(image_format_valid: bool, name_matches: bool, extracted_text: &str) -> String {
    if !image_format_valid {
        "Image format or aspect ratio does not match the ID card".to_string()
    } else if name_matches {
        "Name verified".to_string()
    } else if extracted_text.is_empty() {
        "No text recognised in the name region; make sure the photo is sharp".to_string()
    } else {
        format!("Name mismatch, recognised: {}", extracted_text)
    }
}
