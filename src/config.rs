//! Validator configuration
//!
//! Every tunable constant of the pipeline, loadable from TOML. Sections left
//! out of a file keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::RegionSpec;
use crate::utils::IdCardError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub document: DocumentConfig,
    pub preprocess: PreprocessConfig,
    pub name_region: RegionSpec,
    pub ocr: OcrGateConfig,
    pub matching: MatchingConfig,
    pub format: FormatConfig,
    pub engine: EngineConfig,
}

/// Physical shape of the card (85.6mm x 54mm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub reference_aspect_ratio: f64,
    pub aspect_ratio_tolerance: f64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            reference_aspect_ratio: 1.585,
            aspect_ratio_tolerance: 0.5,
        }
    }
}

/// Upscaling floor and binarization bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    pub min_width: u32,
    pub min_height: u32,
    /// Subtracted from the mean luma to get the threshold
    pub threshold_offset: i32,
    pub threshold_min: u8,
    pub threshold_max: u8,
    /// Upscaled images larger than this are left at their original size
    pub max_upscaled_pixels: u64,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            min_width: 800,
            min_height: 500,
            threshold_offset: 20,
            threshold_min: 100,
            threshold_max: 180,
            max_upscaled_pixels: 64_000_000,
        }
    }
}

/// Garbage gate applied to every OCR pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrGateConfig {
    pub min_text_length: usize,
    pub min_quality: f64,
}

impl Default for OcrGateConfig {
    fn default() -> Self {
        Self {
            min_text_length: 5,
            min_quality: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub split_match_ratio: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            split_match_ratio: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub score_threshold: u32,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { score_threshold: 3 }
    }
}

/// Tesseract data location and languages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding `*.traineddata`; `None` uses the library default
    pub tessdata_dir: Option<PathBuf>,
    pub language: String,
    /// Used when the primary language data cannot be loaded
    pub fallback_language: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tessdata_dir: None,
            language: "chi_tra+eng".to_string(),
            fallback_language: "eng".to_string(),
        }
    }
}

impl ValidatorConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, IdCardError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, IdCardError> {
        let config: ValidatorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), IdCardError> {
        if !self.document.reference_aspect_ratio.is_finite() || self.document.reference_aspect_ratio <= 0.0 {
            return Err(IdCardError::ConfigError(
                "reference_aspect_ratio must be finite and positive".to_string(),
            ));
        }
        if !self.document.aspect_ratio_tolerance.is_finite() || self.document.aspect_ratio_tolerance < 0.0 {
            return Err(IdCardError::ConfigError(
                "aspect_ratio_tolerance must be finite and not negative".to_string(),
            ));
        }
        if self.preprocess.threshold_min > self.preprocess.threshold_max {
            return Err(IdCardError::ConfigError(format!(
                "threshold_min ({}) exceeds threshold_max ({})",
                self.preprocess.threshold_min, self.preprocess.threshold_max
            )));
        }
        if !self.name_region.is_normalized() {
            return Err(IdCardError::ConfigError(format!(
                "name_region ratios must lie in [0, 1]: {:?}",
                self.name_region
            )));
        }
        if !(0.0..=1.0).contains(&self.ocr.min_quality) {
            return Err(IdCardError::ConfigError(
                "min_quality must lie in [0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.matching.split_match_ratio) {
            return Err(IdCardError::ConfigError(
                "split_match_ratio must lie in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.document.reference_aspect_ratio, 1.585);
        assert_eq!(config.preprocess.min_width, 800);
        assert_eq!(config.preprocess.min_height, 500);
        assert_eq!(config.format.score_threshold, 3);
        assert_eq!(config.name_region, RegionSpec::NAME_FIELD);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ValidatorConfig::from_toml_str(
            r#"
            [format]
            score_threshold = 4

            [name_region]
            x = 0.2
            y = 0.4
            width = 0.3
            height = 0.1
            "#,
        )
        .unwrap();
        assert_eq!(config.format.score_threshold, 4);
        assert_eq!(config.name_region.x, 0.2);
        assert_eq!(config.matching.split_match_ratio, 0.7);
        assert_eq!(config.engine.language, "chi_tra+eng");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nlanguage = \"eng\"\ntessdata_dir = \"/opt/tessdata\"").unwrap();
        let config = ValidatorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.engine.language, "eng");
        assert_eq!(config.engine.tessdata_dir, Some(PathBuf::from("/opt/tessdata")));
    }

    #[test]
    fn test_rejects_inverted_threshold_bounds() {
        let err = ValidatorConfig::from_toml_str(
            "[preprocess]\nthreshold_min = 200\nthreshold_max = 100\n",
        )
        .unwrap_err();
        assert!(matches!(err, IdCardError::ConfigError(_)));
    }

    #[test]
    fn test_rejects_non_finite_ratios() {
        for toml in [
            "[document]\nreference_aspect_ratio = nan\n",
            "[document]\nreference_aspect_ratio = inf\n",
            "[document]\naspect_ratio_tolerance = nan\n",
            "[document]\naspect_ratio_tolerance = inf\n",
            "[ocr]\nmin_quality = nan\n",
            "[matching]\nsplit_match_ratio = nan\n",
        ] {
            let err = ValidatorConfig::from_toml_str(toml).unwrap_err();
            assert!(matches!(err, IdCardError::ConfigError(_)), "{}", toml);
        }
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = ValidatorConfig::from_toml_str("[format\nscore_threshold = ").unwrap_err();
        assert!(matches!(err, IdCardError::ConfigError(_)));
    }
}
