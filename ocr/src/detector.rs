use crate::OcrResult;
use crate::result::Detection;
use anyhow::Context;
use image::DynamicImage;
use std::path::Path;

/// Anything that turns an image into text detections.
///
/// Detections come back in the engine's reading order. An image without any
/// text yields an empty list, not an error.
pub trait TextDetector {
    /// Run detection and recognition on an already decoded image.
    fn detect_image(&mut self, image: &DynamicImage) -> OcrResult<Vec<Detection>>;

    /// Decode an image file and run [`TextDetector::detect_image`] on it.
    fn detect_path(&mut self, image_path: &Path) -> OcrResult<Vec<Detection>> {
        let image = image::open(image_path)
            .with_context(|| format!("failed to open image at {:?}", image_path))?;
        self.detect_image(&image)
    }
}

impl<D: TextDetector + ?Sized> TextDetector for Box<D> {
    fn detect_image(&mut self, image: &DynamicImage) -> OcrResult<Vec<Detection>> {
        (**self).detect_image(image)
    }

    fn detect_path(&mut self, image_path: &Path) -> OcrResult<Vec<Detection>> {
        (**self).detect_path(image_path)
    }
}

impl<D: TextDetector + ?Sized> TextDetector for &mut D {
    fn detect_image(&mut self, image: &DynamicImage) -> OcrResult<Vec<Detection>> {
        (**self).detect_image(image)
    }

    fn detect_path(&mut self, image_path: &Path) -> OcrResult<Vec<Detection>> {
        (**self).detect_path(image_path)
    }
}
