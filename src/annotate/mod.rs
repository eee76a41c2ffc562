//! Detection annotation
//!
//! The annotate-only path returns the source image with detection boxes
//! drawn on it plus a parallel list of per-detection records (symbol,
//! confidence, box) the caller uses for labeling. Rendering is a side
//! effect; the records carry the data.

use std::io::Cursor;

use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use serde::Serialize;
use tracing::debug;

use crate::detection::{BoundingBox, NormalizedDetection};

/// One annotation record, consumed by the caller for drawing labels
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    /// Decoded display symbol
    pub symbol: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Derive annotation records from normalized detections
pub fn annotations(detections: &[NormalizedDetection]) -> Vec<Annotation> {
    detections
        .iter()
        .map(|det| Annotation {
            symbol: det.symbol.clone(),
            confidence: det.confidence,
            bbox: det.bbox,
        })
        .collect()
}

/// Box and label-strip rendering style
#[derive(Debug, Clone)]
pub struct AnnotationStyle {
    pub border_color: Rgb<u8>,
    pub label_background: Rgb<u8>,
    /// Border thickness in pixels
    pub thickness: u32,
    /// Height of the label strip drawn above each box
    pub label_height: u32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            border_color: Rgb([245, 166, 35]),
            label_background: Rgb([245, 166, 35]),
            thickness: 2,
            label_height: 12,
        }
    }
}

/// Draw detection boxes and label strips onto the image
pub fn draw_annotations(image: &mut RgbImage, annotations: &[Annotation], style: &AnnotationStyle) {
    for ann in annotations {
        let x = ann.bbox.x1.round() as i32;
        let y = ann.bbox.y1.round() as i32;
        let width = (ann.bbox.width().round().max(1.0)) as u32;
        let height = (ann.bbox.height().round().max(1.0)) as u32;

        for t in 0..style.thickness as i32 {
            let rect = Rect::at(x - t, y - t).of_size(width + 2 * t as u32, height + 2 * t as u32);
            draw_hollow_rect_mut(image, rect, style.border_color);
        }

        // Label strip above the box; the caller paints the symbol text on it
        if style.label_height > 0 {
            let strip_width = label_strip_width(&ann.symbol, style.label_height);
            let strip =
                Rect::at(x, y - style.label_height as i32).of_size(strip_width, style.label_height);
            draw_filled_rect_mut(image, strip, style.label_background);
        }
    }

    debug!("Drew {} annotations", annotations.len());
}

/// Approximate glyph advance: a symbol at strip height h is about 3/4 h wide
fn label_strip_width(symbol: &str, label_height: u32) -> u32 {
    let glyphs = symbol.chars().count().max(1) as u32;
    glyphs * (label_height * 3 / 4) + 4
}

/// Encode the annotated image as the JPEG byte stream returned to callers
pub fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Jpeg)
        .context("Failed to encode annotated image as JPEG")?;
    Ok(bytes.into_inner())
}
