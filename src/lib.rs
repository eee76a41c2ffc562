//! readout - Spatial detection-to-text reconstruction
//!
//! Takes the unordered per-symbol detections an object detector emits for a
//! scanned page (bounding box, class, confidence each) and reconstructs
//! ordered, human-readable text, inferring line breaks and word boundaries
//! purely from geometry. The same engine serves braille-cell and
//! alphanumeric-character detectors; the symbol decoder is injected as a
//! strategy.

pub mod annotate;
pub mod config;
pub mod decode;
pub mod detection;
pub mod engine;
pub mod layout;
pub mod transliterate;

pub use decode::{AlphanumericDecoder, BrailleDecoder, ClassId, DecoderKind, SymbolDecoder};
pub use detection::{BoundingBox, NormalizedDetection, RawDetection};
pub use engine::{ReconstructionConfig, ReconstructionEngine};
