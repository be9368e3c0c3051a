//! Debug rendering of raw detections.
//!
//! Purely diagnostic: the overlay is drawn from the detections exactly as the
//! engine produced them, before any cleaning or merging.

use crate::OcrResult;
use crate::result::{BoundingBox, Detection, Point};
use ab_glyph::FontVec;
use anyhow::Context;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Labels sit this many pixels above the top-left corner.
const LABEL_OFFSET: f32 = 10.0;

/// How detections are drawn.
pub struct OverlayStyle {
    /// Outline and label color.
    pub color: Rgb<u8>,
    /// Outline thickness in pixels.
    pub thickness: u32,
    /// Font for the labels. Without one only outlines are drawn.
    pub font: Option<FontVec>,
    /// Label glyph height in pixels.
    pub font_scale: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            thickness: 2,
            font: None,
            font_scale: 16.0,
        }
    }
}

impl OverlayStyle {
    /// Style with labels rendered using the font at `font_path`.
    pub fn with_font_path(font_path: &Path) -> OcrResult<Self> {
        let font_data = std::fs::read(font_path)
            .with_context(|| format!("failed to read font {}", font_path.display()))?;
        let font = FontVec::try_from_vec(font_data)
            .map_err(|_| anyhow::anyhow!("failed to parse font {}", font_path.display()))?;

        Ok(Self {
            font: Some(font),
            ..Self::default()
        })
    }

    /// Try a few well-known system fonts, falling back to outlines only.
    pub fn with_system_font() -> Self {
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];

        for path in font_paths {
            if let Ok(style) = Self::with_font_path(Path::new(path)) {
                info!("overlay labels use system font {path}");
                return style;
            }
        }

        debug!("no system font found, overlay labels will be skipped");
        Self::default()
    }
}

/// Appended to the source stem to name the overlay file.
const OVERLAY_SUFFIX: &str = "_overlay";

/// `menu.jpg` -> `menu_overlay.png`, next to the source image.
pub fn overlay_path_for(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    image_path.with_file_name(format!("{stem}{OVERLAY_SUFFIX}.png"))
}

/// Whether `path` looks like a file written by [`save_overlay`].
pub fn is_overlay_path(path: &Path) -> bool {
    let is_png = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    let has_suffix = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(OVERLAY_SUFFIX));
    is_png && has_suffix
}

/// Copy `image` and outline every detection polygon with its raw text above.
pub fn render_overlay(
    image: &DynamicImage,
    detections: &[Detection],
    style: &OverlayStyle,
) -> RgbImage {
    let mut canvas = image.to_rgb8();

    for detection in detections {
        let Some(bbox) = detection.bounding_box() else {
            continue;
        };
        let outline = if detection.polygon.len() >= 4 {
            detection.polygon.clone()
        } else {
            bbox.corners().to_vec()
        };
        draw_polygon(&mut canvas, &outline, style);
        draw_label(&mut canvas, &bbox, &detection.text, style);
    }

    canvas
}

/// Render the overlay and write it to `out_path`.
pub fn save_overlay(
    image: &DynamicImage,
    detections: &[Detection],
    style: &OverlayStyle,
    out_path: &Path,
) -> OcrResult<()> {
    render_overlay(image, detections, style)
        .save(out_path)
        .with_context(|| format!("failed to write overlay {}", out_path.display()))
}

fn draw_polygon(canvas: &mut RgbImage, points: &[Point], style: &OverlayStyle) {
    let thickness = style.thickness.max(1);
    let spread = (thickness - 1) as f32 / 2.0;

    for (i, start) in points.iter().enumerate() {
        let end = points[(i + 1) % points.len()];
        for step in 0..thickness {
            let offset = step as f32 - spread;
            draw_line_segment_mut(
                canvas,
                (start.x + offset, start.y),
                (end.x + offset, end.y),
                style.color,
            );
            draw_line_segment_mut(
                canvas,
                (start.x, start.y + offset),
                (end.x, end.y + offset),
                style.color,
            );
        }
    }
}

fn draw_label(canvas: &mut RgbImage, bbox: &BoundingBox, text: &str, style: &OverlayStyle) {
    let Some(ref font) = style.font else { return };
    if text.is_empty() {
        return;
    }

    let x = bbox.top_left.x.round() as i32;
    let y = (bbox.top_left.y - LABEL_OFFSET - style.font_scale).round() as i32;
    draw_text_mut(canvas, style.color, x, y.max(0), style.font_scale, font, text);
}
