use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdCardError {
    /// The bytes could not be decoded into a non-empty raster image.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// The OCR engine failed on a single pass.
    #[error("OCR engine failure: {0}")]
    EngineFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<image::ImageError> for IdCardError {
    fn from(err: image::ImageError) -> Self {
        IdCardError::InvalidImage(err.to_string())
    }
}

impl From<toml::de::Error> for IdCardError {
    fn from(err: toml::de::Error) -> Self {
        IdCardError::ConfigError(err.to_string())
    }
}
