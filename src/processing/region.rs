use image::{ImageBuffer, Pixel};
use log::debug;

use crate::models::RegionSpec;

/// Pixel rectangle resolved from a [`RegionSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

pub struct RegionExtractor;

impl RegionExtractor {
    /// Resolve fractional coordinates against an image size.
    ///
    /// The origin is clamped to the last row/column and the extent to what
    /// remains, so the result always lies inside the image and is at least
    /// one pixel in each direction.
    pub fn resolve(spec: &RegionSpec, width: u32, height: u32) -> PixelRect {
        let (x, w) = Self::clamp_axis(spec.x, spec.width, width);
        let (y, h) = Self::clamp_axis(spec.y, spec.height, height);
        PixelRect {
            x,
            y,
            width: w,
            height: h,
        }
    }

    fn clamp_axis(origin: f64, extent: f64, size: u32) -> (u32, u32) {
        let size = size.max(1) as i64;
        let start = ((origin * size as f64).round() as i64).clamp(0, size - 1);
        let length = ((extent * size as f64).round() as i64).clamp(1, size - start);
        (start as u32, length as u32)
    }

    /// Copy the region out of `image`; the source is left untouched.
    pub fn crop<P>(
        image: &ImageBuffer<P, Vec<P::Subpixel>>,
        spec: &RegionSpec,
    ) -> ImageBuffer<P, Vec<P::Subpixel>>
    where
        P: Pixel + 'static,
        P::Subpixel: 'static,
    {
        let rect = Self::resolve(spec, image.width(), image.height());
        debug!(
            "Cropping region ({},{}) {}x{} from {}x{} image",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            image.width(),
            image.height()
        );
        image::imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image()
    }
}
