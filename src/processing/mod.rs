pub mod confusion;
pub mod image;
pub mod normalize;
pub mod ocr;
pub mod region;
pub mod tessdata;
#[cfg(feature = "tesseract")]
pub mod tesseract_engine;

pub use confusion::{ConfusionTable, SimilarCharGroups};
pub use self::image::ImagePreprocessor;
pub use normalize::TextNormalizer;
pub use ocr::{OcrEngine, OcrOrchestrator};
pub use region::RegionExtractor;
#[cfg(feature = "tesseract")]
pub use tesseract_engine::TesseractEngine;
