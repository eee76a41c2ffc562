//! Detection records
//!
//! Converts raw per-box detector output into the uniform record the layout
//! engine works on: decoded symbol, confidence, bounding box and a derived
//! center point. Every normalized detection comes from exactly one raw
//! detection and is never mutated afterwards.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decode::{ClassId, SymbolDecoder};

/// Axis-aligned pixel bounding box, `x1 <= x2`, `y1 <= y2`.
///
/// Serializes as the `[x1, y1, x2, y2]` array the detector boundary uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Horizontal center of the box
    pub fn x_center(&self) -> f32 {
        (self.x1 + self.x2) / 2.0
    }

    /// Vertical center of the box
    pub fn y_center(&self) -> f32 {
        (self.y1 + self.y2) / 2.0
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [f32; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.x1, bbox.y1, bbox.x2, bbox.y2]
    }
}

/// One raw detection as the upstream detector reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    /// Predicted class, dot-pattern code or label index
    pub class: ClassId,
    /// Pixel bounding box
    pub bbox: BoundingBox,
    /// Detection confidence in `[0, 1]`
    pub confidence: f32,
}

/// One detection after symbol decoding, ready for layout
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDetection {
    /// Decoded display symbol (fallback `"?"` for unknown classes)
    pub symbol: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
    pub x_center: f32,
    pub y_center: f32,
}

/// Decode and normalize raw detections.
///
/// Confidence is copied through unchanged: thresholding is the detector's
/// responsibility and is never re-applied here. An empty input is a valid
/// "no detections" outcome and yields an empty list.
pub fn normalize(
    detections: &[RawDetection],
    decoder: &dyn SymbolDecoder,
) -> Vec<NormalizedDetection> {
    let normalized: Vec<NormalizedDetection> = detections
        .iter()
        .map(|det| NormalizedDetection {
            symbol: decoder.decode(&det.class),
            confidence: det.confidence,
            bbox: det.bbox,
            x_center: det.bbox.x_center(),
            y_center: det.bbox.y_center(),
        })
        .collect();

    debug!("Normalized {} detections", normalized.len());

    normalized
}
