use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

/// A polygon corner in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Quadrilateral around a detected text region.
///
/// Corners are always kept clockwise starting at the top-left. Width and
/// height are read off the top and left edges, so skewed quads are treated
/// as if they were axis-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl BoundingBox {
    pub fn new(top_left: Point, top_right: Point, bottom_right: Point, bottom_left: Point) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Axis-aligned box from its top-left corner and size.
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        )
    }

    /// Build a box from a raw detector polygon.
    ///
    /// Four or more points are read as `[tl, tr, br, bl, ..]`. Two or three
    /// points are folded into their axis-aligned envelope. Anything shorter
    /// cannot describe a region and yields `None`.
    pub fn from_polygon(points: &[Point]) -> Option<Self> {
        match points {
            [tl, tr, br, bl, ..] => Some(Self::new(*tl, *tr, *br, *bl)),
            [first, rest @ ..] if !rest.is_empty() => {
                let (mut min_x, mut min_y, mut max_x, mut max_y) =
                    (first.x, first.y, first.x, first.y);
                for p in rest {
                    min_x = min_x.min(p.x);
                    min_y = min_y.min(p.y);
                    max_x = max_x.max(p.x);
                    max_y = max_y.max(p.y);
                }
                Some(Self::from_rect(min_x, min_y, max_x - min_x, max_y - min_y))
            }
            _ => None,
        }
    }

    pub fn width(&self) -> f32 {
        self.top_right.x - self.top_left.x
    }

    pub fn height(&self) -> f32 {
        self.bottom_left.y - self.top_left.y
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        Self::from_rect(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    }
}

/// OCR output for a single detected region.
///
/// The polygon is kept exactly as the engine reported it; use
/// [`Detection::bounding_box`] to get the normalized quad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub polygon: Vec<Point>,
    pub text: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl Detection {
    pub fn new(polygon: Vec<Point>, text: impl Into<String>) -> Self {
        Self {
            polygon,
            text: text.into(),
            confidence: None,
        }
    }

    pub fn from_box(bbox: BoundingBox, text: impl Into<String>) -> Self {
        Self::new(bbox.corners().to_vec(), text)
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// `None` when the polygon has fewer than two points.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_polygon(&self.polygon)
    }
}
