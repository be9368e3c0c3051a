use crate::OcrResult;
use crate::config::{ModelConfig, OcrOptions};
use crate::detector::TextDetector;
use crate::result::{BoundingBox, Detection};
use anyhow::Context;
use image::DynamicImage;
use imageproc::rect::Rect;
use rust_paddle_ocr::efficient_cropping::{EfficientCropper, ImageRef};
use rust_paddle_ocr::{Det, Rec};
use tracing::{debug, trace};

/// High-level OCR engine wrapping `rust-paddle-ocr`.
///
/// Holds the detection and recognition models so they can be reused across
/// multiple images without paying the load cost each time.
pub struct OcrEngine {
    det: Det,
    rec: Rec,
    options: OcrOptions,
}

impl OcrEngine {
    /// Build an engine with default options.
    pub fn new(config: ModelConfig) -> OcrResult<Self> {
        Self::with_options(config, OcrOptions::default())
    }

    /// Build an engine with custom options.
    pub fn with_options(config: ModelConfig, options: OcrOptions) -> OcrResult<Self> {
        let det = Det::from_file(config.detection_model())
            .context("failed to load detection model")?
            .with_merge_boxes(options.merge_boxes)
            .with_merge_threshold(options.merge_threshold);

        let rec = Rec::from_file(config.recognition_model(), config.keys_path())
            .context("failed to load recognition model")?
            .with_min_score(options.min_score)
            .with_punct_min_score(options.punct_min_score);

        debug!(
            det = %config.detection_model().display(),
            rec = %config.recognition_model().display(),
            "loaded OCR models"
        );

        Ok(Self { det, rec, options })
    }

    pub fn options(&self) -> &OcrOptions {
        &self.options
    }

    /// One crop per detected region, in the detector's order.
    fn crop_regions(&self, image: &DynamicImage, rects: &[Rect]) -> Vec<DynamicImage> {
        if self.options.efficient_cropping {
            let image_ref = ImageRef::from(image.clone());
            return match rects {
                [single] => vec![EfficientCropper::smart_crop(&image_ref, single)],
                _ if rects.len() <= 8 => EfficientCropper::parallel_batch_crop(&image_ref, rects),
                _ => EfficientCropper::optimized_batch_crop(&image_ref, rects),
            };
        }

        rects
            .iter()
            .map(|rect| {
                let bbox = BoundingBox::from(*rect);
                image.crop_imm(
                    bbox.top_left.x as u32,
                    bbox.top_left.y as u32,
                    rect.width(),
                    rect.height(),
                )
            })
            .collect()
    }

    fn recognize_region(&mut self, rect: Rect, crop: &DynamicImage) -> OcrResult<Detection> {
        let text = self.rec.predict_str(crop).with_context(|| {
            format!(
                "text recognition failed for region at ({}, {})",
                rect.left(),
                rect.top()
            )
        })?;
        trace!(x = rect.left(), y = rect.top(), text = %text, "recognized region");
        Ok(Detection::from_box(BoundingBox::from(rect), text))
    }
}

impl TextDetector for OcrEngine {
    fn detect_image(&mut self, image: &DynamicImage) -> OcrResult<Vec<Detection>> {
        let rects = self
            .det
            .find_text_rect(image)
            .context("text detection failed")?;
        debug!(regions = rects.len(), "detected text regions");
        if rects.is_empty() {
            return Ok(Vec::new());
        }

        let crops = self.crop_regions(image, &rects);
        rects
            .into_iter()
            .zip(crops.iter())
            .map(|(rect, crop)| self.recognize_region(rect, crop))
            .collect()
    }
}
