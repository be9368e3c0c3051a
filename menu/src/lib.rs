//! Turns OCR detections from a photographed menu into `(name, price)` records.
//!
//! The pipeline is three pure steps over one image's detections:
//!
//! 1. [`text`] cleans every recognized string and tells prices from labels.
//! 2. [`merge`] glues neighbouring label fragments into single spans, never
//!    touching prices.
//! 3. [`segment`] pairs each span with the price right after it and drops
//!    labels that have none.
//!
//! [`MenuExtractor`] wires a [`TextDetector`] in front of those steps and
//! [`output`] persists the result as JSON next to the image.

mod error;
pub mod extract;
pub mod merge;
pub mod output;
pub mod segment;
pub mod text;

pub use error::{ExtractError, OutputError};
pub use extract::{ExtractOptions, Extraction, MenuExtractor, extract_records};
pub use merge::{DEFAULT_PROXIMITY_THRESHOLD, LineMerger, MergedSpan};
pub use segment::Record;
pub use text::{CleanedToken, TokenKind};

pub use ocr::{BoundingBox, Detection, Point, TextDetector};
