//! Line reconstruction: folds neighbouring text detections into labels.
//!
//! Menus are usually recognized as many short fragments ("Café", "con",
//! "leche") followed by a price. A single pass over the detections glues
//! textual fragments whose horizontal gap is below a threshold and keeps
//! every price as its own entry, so a name is never merged into a price.

use crate::text::{CleanedToken, TokenKind};
use ocr::{BoundingBox, Detection, Point};
use tracing::trace;

/// Maximum horizontal gap, in image pixels, between two fragments of one label.
pub const DEFAULT_PROXIMITY_THRESHOLD: f32 = 20.0;

/// One or more cleaned tokens folded into a single entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSpan {
    pub text: String,
    pub bbox: BoundingBox,
    pub kind: TokenKind,
}

impl MergedSpan {
    pub fn is_numeric(&self) -> bool {
        self.kind == TokenKind::Numeric
    }

    /// Distance from this span's right edge to the left edge of `bbox`.
    fn gap_to(&self, bbox: &BoundingBox) -> f32 {
        bbox.top_left.x - self.bbox.top_right.x
    }

    fn absorb(&mut self, token: CleanedToken) {
        self.text.push(' ');
        self.text.push_str(&token.text);
        self.stretch(&token.bbox);
    }

    /// Grow the box without adding text.
    fn stretch(&mut self, bbox: &BoundingBox) {
        self.bbox = union_envelope(&self.bbox, bbox);
    }
}

impl From<CleanedToken> for MergedSpan {
    fn from(token: CleanedToken) -> Self {
        Self {
            text: token.text,
            bbox: token.bbox,
            kind: token.kind,
        }
    }
}

/// Box of a span after absorbing `next`.
///
/// Top-left stays with the span, the right edge is the furthest of the two
/// (at the span's top), bottom-right comes from `next`, and the bottom-left
/// drops to the lower of the two bottoms. This is not a true bounding box for
/// rotated quads; merge decisions depend on it as-is.
pub fn union_envelope(span: &BoundingBox, next: &BoundingBox) -> BoundingBox {
    BoundingBox::new(
        span.top_left,
        Point::new(span.top_right.x.max(next.top_right.x), span.top_right.y),
        next.bottom_right,
        Point::new(
            span.bottom_left.x,
            span.bottom_left.y.max(next.bottom_left.y),
        ),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMerger {
    threshold: f32,
}

impl Default for LineMerger {
    fn default() -> Self {
        Self::new(DEFAULT_PROXIMITY_THRESHOLD)
    }
}

impl LineMerger {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Merge detections in the order given; the input is assumed to already
    /// follow reading order and is never re-sorted.
    pub fn merge(&self, detections: &[Detection]) -> Vec<MergedSpan> {
        let mut merged = Vec::new();
        let mut current: Option<MergedSpan> = None;

        for (index, detection) in detections.iter().enumerate() {
            let Some(bbox) = detection.bounding_box() else {
                trace!(
                    index,
                    points = detection.polygon.len(),
                    "skipping detection without a usable polygon"
                );
                continue;
            };

            let token = CleanedToken::new(&detection.text, bbox);
            if token.text.is_empty() {
                // Separators like "-" or "·" carry no text but still bridge
                // or split the label around them.
                match current.as_mut() {
                    Some(span) if span.gap_to(&token.bbox).abs() < self.threshold => {
                        span.stretch(&token.bbox);
                    }
                    _ => merged.extend(current.take()),
                }
                trace!(index, raw = %detection.text, "detection has no usable text");
                continue;
            }

            match token.kind {
                TokenKind::Numeric => {
                    merged.extend(current.take());
                    merged.push(MergedSpan::from(token));
                }
                TokenKind::Textual => match current.as_mut() {
                    Some(span) if span.gap_to(&token.bbox).abs() < self.threshold => {
                        span.absorb(token);
                    }
                    _ => merged.extend(current.replace(MergedSpan::from(token))),
                },
            }
        }

        merged.extend(current);
        merged
    }
}

/// Shorthand for `LineMerger::new(threshold).merge(detections)`.
pub fn merge(detections: &[Detection], threshold: f32) -> Vec<MergedSpan> {
    LineMerger::new(threshold).merge(detections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(text: &str, x: f32, y: f32, width: f32, height: f32) -> Detection {
        Detection::from_box(BoundingBox::from_rect(x, y, width, height), text)
    }

    fn texts(spans: &[MergedSpan]) -> Vec<&str> {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn close_fragments_are_joined_with_one_space() {
        // gap = 55 - 50 = 5
        let spans = merge(
            &[det("Café", 0.0, 0.0, 50.0, 20.0), det("Latte", 55.0, 0.0, 40.0, 20.0)],
            DEFAULT_PROXIMITY_THRESHOLD,
        );
        assert_eq!(texts(&spans), ["Café Latte"]);
        assert_eq!(spans[0].kind, TokenKind::Textual);
    }

    #[test]
    fn distant_fragments_stay_apart() {
        // gap = 100 - 50 = 50
        let spans = merge(
            &[det("Café", 0.0, 0.0, 50.0, 20.0), det("Latte", 100.0, 0.0, 40.0, 20.0)],
            DEFAULT_PROXIMITY_THRESHOLD,
        );
        assert_eq!(texts(&spans), ["Café", "Latte"]);
    }

    #[test]
    fn gap_equal_to_threshold_splits() {
        let spans = merge(
            &[det("Pan", 0.0, 0.0, 30.0, 20.0), det("tostado", 50.0, 0.0, 60.0, 20.0)],
            20.0,
        );
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn overlap_counts_as_close() {
        // The new fragment starts 10px left of the span's right edge.
        let spans = merge(
            &[det("Agua", 0.0, 0.0, 40.0, 20.0), det("mineral", 30.0, 0.0, 60.0, 20.0)],
            20.0,
        );
        assert_eq!(texts(&spans), ["Agua mineral"]);
    }

    #[test]
    fn prices_are_never_absorbed() {
        let spans = merge(
            &[
                det("Té", 0.0, 0.0, 20.0, 20.0),
                det("2,00", 21.0, 0.0, 30.0, 20.0),
                det("verde", 52.0, 0.0, 40.0, 20.0),
            ],
            1000.0,
        );
        assert_eq!(texts(&spans), ["Té", "2,00", "verde"]);
        assert!(spans[1].is_numeric());
        assert!(!spans[2].is_numeric());
    }

    #[test]
    fn consecutive_prices_stay_separate() {
        let spans = merge(
            &[det("1.50", 0.0, 0.0, 20.0, 20.0), det("2.50", 22.0, 0.0, 20.0, 20.0)],
            DEFAULT_PROXIMITY_THRESHOLD,
        );
        assert_eq!(texts(&spans), ["1.50", "2.50"]);
    }

    #[test]
    fn text_is_cleaned_before_merging() {
        let spans = merge(
            &[
                det("*Tortilla*", 0.0, 0.0, 60.0, 20.0),
                det("española:", 65.0, 0.0, 60.0, 20.0),
                det("€4,50", 300.0, 0.0, 40.0, 20.0),
            ],
            DEFAULT_PROXIMITY_THRESHOLD,
        );
        assert_eq!(texts(&spans), ["Tortilla española", "4,50"]);
    }

    #[test]
    fn malformed_and_leading_empty_detections_are_skipped() {
        let spans = merge(
            &[
                Detection::new(vec![ocr::Point::new(3.0, 3.0)], "Sopa"),
                det("---", 0.0, 0.0, 10.0, 10.0),
                det("Flan", 0.0, 40.0, 30.0, 20.0),
            ],
            DEFAULT_PROXIMITY_THRESHOLD,
        );
        assert_eq!(texts(&spans), ["Flan"]);
    }

    #[test]
    fn close_separator_extends_the_label() {
        // "-" pushes the right edge to 40, leaving a gap of 15 to "tostado".
        let spans = merge(
            &[
                det("Pan", 0.0, 0.0, 30.0, 20.0),
                det("-", 35.0, 0.0, 5.0, 20.0),
                det("tostado", 55.0, 0.0, 60.0, 20.0),
                det("2,00", 300.0, 0.0, 40.0, 20.0),
            ],
            DEFAULT_PROXIMITY_THRESHOLD,
        );
        assert_eq!(texts(&spans), ["Pan tostado", "2,00"]);
        assert_eq!(spans[0].bbox.top_right.x, 115.0);
    }

    #[test]
    fn distant_separator_closes_the_label() {
        // Without the separator "Gazpacho" and "andaluz" would join (gap 5).
        let spans = merge(
            &[
                det("Gazpacho", 0.0, 0.0, 80.0, 20.0),
                det("·", 200.0, 0.0, 5.0, 20.0),
                det("andaluz", 85.0, 0.0, 70.0, 20.0),
            ],
            DEFAULT_PROXIMITY_THRESHOLD,
        );
        assert_eq!(texts(&spans), ["Gazpacho", "andaluz"]);
        assert_eq!(spans[0].bbox.top_right.x, 80.0);
    }

    #[test]
    fn empty_input_gives_no_spans() {
        assert!(merge(&[], DEFAULT_PROXIMITY_THRESHOLD).is_empty());
        assert!(LineMerger::default().merge(&[]).is_empty());
    }

    #[test]
    fn envelope_follows_corner_rule() {
        let span = BoundingBox::from_rect(0.0, 0.0, 50.0, 20.0);
        let next = BoundingBox::from_rect(55.0, 2.0, 40.0, 30.0);
        let merged = union_envelope(&span, &next);

        assert_eq!(merged.top_left, Point::new(0.0, 0.0));
        assert_eq!(merged.top_right, Point::new(95.0, 0.0));
        assert_eq!(merged.bottom_right, Point::new(95.0, 32.0));
        assert_eq!(merged.bottom_left, Point::new(0.0, 32.0));
    }

    #[test]
    fn envelope_keeps_wider_right_edge() {
        // A short fragment tucked under a long one keeps the long right edge.
        let span = BoundingBox::from_rect(0.0, 0.0, 100.0, 20.0);
        let next = BoundingBox::from_rect(90.0, 0.0, 5.0, 10.0);
        let merged = union_envelope(&span, &next);

        assert_eq!(merged.top_right.x, 100.0);
        assert_eq!(merged.bottom_right, Point::new(95.0, 10.0));
        assert_eq!(merged.bottom_left.y, 20.0);
    }

    #[test]
    fn merged_box_drives_next_gap() {
        // After "Sopa del" the span ends at x=100, so "día" at 110 still joins.
        let spans = merge(
            &[
                det("Sopa", 0.0, 0.0, 40.0, 20.0),
                det("del", 50.0, 0.0, 50.0, 20.0),
                det("día", 110.0, 0.0, 30.0, 20.0),
            ],
            DEFAULT_PROXIMITY_THRESHOLD,
        );
        assert_eq!(texts(&spans), ["Sopa del día"]);
        assert_eq!(spans[0].bbox.top_right.x, 140.0);
    }
}
