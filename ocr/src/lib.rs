//! Thin wrapper around `rust-paddle-ocr` that turns an image into a list of
//! text detections (polygon, text, optional confidence).
//!
//! Callers depend on the [`TextDetector`] trait rather than the engine so the
//! post-processing can run against synthetic detections. The real
//! [`OcrEngine`] is behind the `paddle` feature; its defaults follow the
//! recommended PP-OCRv5 settings from the upstream project.

mod config;
mod detector;
#[cfg(feature = "paddle")]
mod engine;
pub mod overlay;
mod result;

pub use config::{
    DEFAULT_LANGUAGE, DETECTION_MODEL_FILE, ModelConfig, OcrOptions, supported_languages,
};
pub use detector::TextDetector;
#[cfg(feature = "paddle")]
pub use engine::OcrEngine;
pub use overlay::OverlayStyle;
pub use result::{BoundingBox, Detection, Point};

/// Crate-wide result type.
pub type OcrResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::{BoundingBox, Detection, OcrResult, TextDetector};
    use image::DynamicImage;
    use std::path::Path;

    struct Fixed(Vec<Detection>);

    impl TextDetector for Fixed {
        fn detect_image(&mut self, _image: &DynamicImage) -> OcrResult<Vec<Detection>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn boxed_detector_forwards_calls() {
        let detection = Detection::from_box(BoundingBox::from_rect(0.0, 0.0, 4.0, 4.0), "Pan");
        let mut detector: Box<dyn TextDetector> = Box::new(Fixed(vec![detection.clone()]));
        let image = DynamicImage::new_rgb8(4, 4);
        assert_eq!(detector.detect_image(&image).unwrap(), vec![detection]);
    }

    #[test]
    fn detect_path_reports_unreadable_images() {
        let mut detector = Fixed(Vec::new());
        let err = detector
            .detect_path(Path::new("does/not/exist.png"))
            .unwrap_err();
        assert!(format!("{err:#}").contains("failed to open image"));
    }
}
