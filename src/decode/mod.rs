//! Symbol decoding
//!
//! Maps raw detector class identifiers to display symbols. Two decoder
//! families exist: 6-dot braille cells (class id is a binary dot-pattern
//! string) and alphanumeric characters (class id is an index into a fixed
//! label list). Decoding is total: unknown or malformed ids resolve to a
//! fallback symbol instead of failing, since detector noise guarantees the
//! occasional unseen class.

pub mod alphanum;
pub mod braille;

pub use alphanum::AlphanumericDecoder;
pub use braille::BrailleDecoder;

use serde::{Deserialize, Serialize};

/// Class identifier emitted by the upstream detector.
///
/// Braille detectors name classes by dot pattern (`"100110"`), character
/// detectors by index into their label list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassId {
    /// Index into an ordered class list
    Index(i64),
    /// Dot-pattern code string
    Code(String),
}

/// Which detector family a decoder serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderKind {
    /// 6-dot braille cells; output goes through case normalization
    Braille,
    /// Literal characters; output is used verbatim
    Alphanumeric,
}

/// Strategy interface between the geometric engine and a detector's class
/// vocabulary. Implementations are stateless lookups, safe to share across
/// concurrent reconstructions.
pub trait SymbolDecoder {
    /// Decode a class id into a display symbol. Total: never fails, unknown
    /// ids map to a fallback symbol.
    fn decode(&self, class: &ClassId) -> String;

    /// The detector family this decoder serves
    fn kind(&self) -> DecoderKind;
}
