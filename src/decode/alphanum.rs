//! Alphanumeric character decoding
//!
//! The character detector names classes by index into a fixed ordered list
//! of 36 labels: `A`..`Z` followed by `0`..`9`.

use tracing::debug;

use super::{ClassId, DecoderKind, SymbolDecoder};

/// Ordered class labels of the character detector
const CLASS_LABELS: [&str; 36] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z", "0", "1", "2", "3", "4", "5", "6", "7", "8", "9",
];

/// Decoder for alphanumeric character detections
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode a class index to its label. Out-of-range indices yield a
    /// `Class<index>` placeholder instead of failing.
    pub fn label(&self, index: i64) -> String {
        match usize::try_from(index).ok().and_then(|i| CLASS_LABELS.get(i)) {
            Some(label) => (*label).to_string(),
            None => {
                debug!("Class index {} outside label list, using placeholder", index);
                format!("Class{index}")
            }
        }
    }
}

impl SymbolDecoder for AlphanumericDecoder {
    fn decode(&self, class: &ClassId) -> String {
        match class {
            ClassId::Index(index) => self.label(*index),
            // Some detector exports stringify the index; accept that too
            ClassId::Code(code) => match code.trim().parse::<i64>() {
                Ok(index) => self.label(index),
                Err(_) => {
                    debug!("Alphanumeric decoder got code class {:?}, using fallback", code);
                    super::braille::FALLBACK_SYMBOL.to_string()
                }
            },
        }
    }

    fn kind(&self) -> DecoderKind {
        DecoderKind::Alphanumeric
    }
}
