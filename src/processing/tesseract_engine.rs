use image::GrayImage;
use log::{debug, warn};
use std::sync::Mutex;
use tesseract::Tesseract;

use crate::config::EngineConfig;
use crate::models::OcrPassConfig;
use crate::processing::ocr::OcrEngine;
use crate::utils::IdCardError;

/// Tesseract-backed engine.
///
/// One initialized handle is kept between passes so the traineddata is
/// loaded once per language. The handle sits behind a mutex held for the
/// whole pass, which serializes passes across concurrent validations. Every
/// pass writes the full variable set from [`OcrPassConfig::engine_variables`]
/// before recognizing.
pub struct TesseractEngine {
    tessdata_dir: Option<String>,
    language: String,
    fallback_language: String,
    idle: Mutex<Option<(String, Tesseract)>>,
}

impl TesseractEngine {
    pub fn new(config: &EngineConfig) -> Self {
        TesseractEngine {
            tessdata_dir: config
                .tessdata_dir
                .as_ref()
                .map(|dir| dir.to_string_lossy().into_owned()),
            language: config.language.clone(),
            fallback_language: config.fallback_language.clone(),
            idle: Mutex::new(None),
        }
    }

    fn init(&self, language: &str) -> Result<Tesseract, IdCardError> {
        debug!("Loading Tesseract language '{}'", language);
        match Tesseract::new(self.tessdata_dir.as_deref(), Some(language)) {
            Ok(tess) => Ok(tess),
            Err(e) if language != self.fallback_language => {
                warn!(
                    "Failed to initialize Tesseract with '{}' ({}), falling back to '{}'",
                    language, e, self.fallback_language
                );
                Tesseract::new(self.tessdata_dir.as_deref(), Some(self.fallback_language.as_str()))
                    .map_err(|e| IdCardError::EngineFailure(format!("Tesseract init error: {}", e)))
            }
            Err(e) => Err(IdCardError::EngineFailure(format!(
                "Tesseract init error: {}",
                e
            ))),
        }
    }

    fn run_pass(mut tess: Tesseract, image: &GrayImage, pass: &OcrPassConfig) -> Result<(Tesseract, String), IdCardError> {
        for (name, value) in pass.engine_variables() {
            tess = tess
                .set_variable(name, &value)
                .map_err(|e| IdCardError::EngineFailure(format!("Failed to set {}: {}", name, e)))?;
        }

        let (width, height) = image.dimensions();
        let mut tess = tess
            .set_frame(
                image.as_raw(),
                width as i32,
                height as i32,
                1,
                width as i32,
            )
            .map_err(|e| IdCardError::EngineFailure(format!("Tesseract set frame error: {}", e)))?
            .recognize()
            .map_err(|e| IdCardError::EngineFailure(format!("Tesseract recognize error: {}", e)))?;

        let text = tess
            .get_text()
            .map_err(|e| IdCardError::EngineFailure(format!("Tesseract error: {}", e)))?;
        Ok((tess, text))
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &GrayImage, pass: &OcrPassConfig) -> Result<String, IdCardError> {
        let language = pass.language.as_deref().unwrap_or(&self.language);
        debug!("Tesseract pass '{}' with language '{}'", pass.kind, language);

        let mut idle = self
            .idle
            .lock()
            .map_err(|_| IdCardError::EngineFailure("Tesseract handle lock poisoned".to_string()))?;

        let tess = match idle.take() {
            Some((loaded, tess)) if loaded == language => tess,
            _ => self.init(language)?,
        };

        // A failed pass drops its handle; the next pass loads a fresh one.
        let (tess, text) = Self::run_pass(tess, image, pass)?;
        *idle = Some((language.to_string(), tess));
        Ok(text)
    }
}
