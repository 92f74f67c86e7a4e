use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma, RgbImage};
use log::{debug, info, warn};

use crate::config::PreprocessConfig;
use crate::utils::IdCardError;

/// ImagePreprocessor turns a decoded card photo into a black/white image
/// ready for OCR: small photos are upscaled, then every pixel is compared
/// against a threshold derived from the mean brightness.
pub struct ImagePreprocessor {
    config: PreprocessConfig,
}

impl ImagePreprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        ImagePreprocessor { config }
    }

    /// Decode raster bytes in any format the `image` crate understands.
    pub fn decode(image_bytes: &[u8]) -> Result<RgbImage, IdCardError> {
        let image = image::load_from_memory(image_bytes)?;
        let rgb = image.to_rgb8();
        if rgb.width() == 0 || rgb.height() == 0 {
            return Err(IdCardError::InvalidImage(
                "Decoded image has no pixels".to_string(),
            ));
        }
        Ok(rgb)
    }

    /// Upscale if needed, then binarize with an adaptive threshold.
    ///
    /// If upscaling is refused the plain grayscale image is returned.
    pub fn binarize(&self, image: &RgbImage) -> GrayImage {
        let scaled = match self.upscale(image) {
            Ok(Some(scaled)) => scaled,
            Ok(None) => image.clone(),
            Err(e) => {
                warn!("Upscaling failed, using grayscale original: {}", e);
                return Self::to_grayscale(image);
            }
        };

        let gray = Self::to_grayscale(&scaled);
        let threshold = self.adaptive_threshold(&gray);
        let binary = imageproc::contrast::threshold(&gray, threshold);

        debug!(
            "Binarized {}x{} image with threshold {}",
            binary.width(),
            binary.height(),
            threshold
        );
        binary
    }

    /// Target size when the image is below the resolution floor.
    pub fn upscaled_dimensions(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        if width >= self.config.min_width && height >= self.config.min_height {
            return None;
        }
        let scale = f64::max(
            self.config.min_width as f64 / width as f64,
            self.config.min_height as f64 / height as f64,
        );
        let new_width = (width as f64 * scale).round().max(1.0);
        let new_height = (height as f64 * scale).round().max(1.0);
        Some((new_width as u32, new_height as u32))
    }

    fn upscale(&self, image: &RgbImage) -> Result<Option<RgbImage>, IdCardError> {
        let (width, height) = image.dimensions();
        let (new_width, new_height) = match self.upscaled_dimensions(width, height) {
            Some(dims) => dims,
            None => return Ok(None),
        };

        let pixels = new_width as u64 * new_height as u64;
        if pixels > self.config.max_upscaled_pixels {
            return Err(IdCardError::InvalidImage(format!(
                "upscaling {}x{} to {}x{} exceeds the pixel budget",
                width, height, new_width, new_height
            )));
        }

        info!(
            "Upscaling image from {}x{} to {}x{}",
            width, height, new_width, new_height
        );
        Ok(Some(imageops::resize(
            image,
            new_width,
            new_height,
            FilterType::CatmullRom,
        )))
    }

    /// Perceptual luma, 0.299R + 0.587G + 0.114B, truncated.
    pub fn to_grayscale(image: &RgbImage) -> GrayImage {
        ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
            let p = image.get_pixel(x, y);
            let luma = 0.299 * p[0] as f64 + 0.587 * p[1] as f64 + 0.114 * p[2] as f64;
            Luma([luma as u8])
        })
    }

    pub fn mean_intensity(gray: &GrayImage) -> u32 {
        let count = gray.width() as u64 * gray.height() as u64;
        if count == 0 {
            return 0;
        }
        let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
        (total / count) as u32
    }

    /// Mean luma minus the offset, clamped to the configured bounds.
    /// Inverted bounds are swapped rather than trusted.
    pub fn adaptive_threshold(&self, gray: &GrayImage) -> u8 {
        let mean = Self::mean_intensity(gray) as i32;
        let raw = mean - self.config.threshold_offset;
        let (min, max) = (self.config.threshold_min as i32, self.config.threshold_max as i32);
        raw.clamp(min.min(max), min.max(max)) as u8
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(PreprocessConfig::default())
    }
}
