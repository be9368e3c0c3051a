//! Image in, records out.

use crate::error::ExtractError;
use crate::merge::{DEFAULT_PROXIMITY_THRESHOLD, LineMerger};
use crate::segment::{self, Record};
use image::DynamicImage;
use ocr::{Detection, TextDetector};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// Knobs for turning detections into records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractOptions {
    /// See [`DEFAULT_PROXIMITY_THRESHOLD`].
    pub proximity_threshold: f32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
        }
    }
}

/// Outcome of one image.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Records that found a price, in reading order.
    pub records: Vec<Record>,
    /// Raw detections, kept for debug overlays.
    pub detections: Vec<Detection>,
    /// Wall time spent on detection and post-processing.
    pub elapsed: Duration,
}

/// Merge and segment detections of a single image. Pure.
pub fn extract_records(detections: &[Detection], proximity_threshold: f32) -> Vec<Record> {
    let spans = LineMerger::new(proximity_threshold).merge(detections);
    segment::segment(&spans)
}

/// Runs a [`TextDetector`] and post-processes its output.
///
/// The detector is built once and reused for every image; nothing about one
/// image leaks into the next.
pub struct MenuExtractor<D> {
    detector: D,
    options: ExtractOptions,
}

impl<D: TextDetector> MenuExtractor<D> {
    pub fn new(detector: D) -> Self {
        Self::with_options(detector, ExtractOptions::default())
    }

    pub fn with_options(detector: D, options: ExtractOptions) -> Self {
        Self { detector, options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Adjust options between images, e.g. a per-image threshold.
    pub fn options_mut(&mut self) -> &mut ExtractOptions {
        &mut self.options
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Decode and process an image file.
    pub fn extract_path(
        &mut self,
        image_path: impl AsRef<Path>,
    ) -> Result<Extraction, ExtractError> {
        let path = image_path.as_ref();
        let start = Instant::now();
        let detections = self
            .detector
            .detect_path(path)
            .map_err(|source| ExtractError::Image {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(image = %path.display(), detections = detections.len(), "detected text");
        Ok(self.finish(detections, start))
    }

    /// Process an already decoded image.
    pub fn extract_image(&mut self, image: &DynamicImage) -> Result<Extraction, ExtractError> {
        let start = Instant::now();
        let detections = self
            .detector
            .detect_image(image)
            .map_err(ExtractError::Detection)?;
        debug!(detections = detections.len(), "detected text");
        Ok(self.finish(detections, start))
    }

    fn finish(&self, detections: Vec<Detection>, start: Instant) -> Extraction {
        if detections.is_empty() {
            debug!("no text found in image");
        }
        let records = extract_records(&detections, self.options.proximity_threshold);
        Extraction {
            records,
            detections,
            elapsed: start.elapsed(),
        }
    }
}
