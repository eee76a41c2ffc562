//! Reconstruction pipeline
//!
//! The public entry point callers use: normalize the raw detections, cluster
//! them into lines, segment each line into words and assemble the final
//! string. Purely functional per call; nothing here blocks, suspends or
//! shares mutable state, so concurrent reconstructions only need their own
//! detection lists.

use tracing::debug;

use crate::decode::braille::CAPITAL_MARKER;
use crate::decode::{DecoderKind, SymbolDecoder};
use crate::detection::{normalize, RawDetection};
use crate::layout::{cluster_lines, segment_line, DEFAULT_SPACE_FACTOR, DEFAULT_Y_THRESHOLD};

/// Tunable reconstruction thresholds
#[derive(Debug, Clone, Copy)]
pub struct ReconstructionConfig {
    /// Vertical distance (px) under which detections share a line
    pub y_threshold: f32,
    /// Multiple of the median gap above which a space is inserted
    pub space_factor: f32,
    /// Capitalize the first letter after each period in the assembled text
    pub sentence_case: bool,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            y_threshold: DEFAULT_Y_THRESHOLD,
            space_factor: DEFAULT_SPACE_FACTOR,
            sentence_case: false,
        }
    }
}

/// Detection-to-text reconstruction engine with an injected symbol decoder
pub struct ReconstructionEngine<D: SymbolDecoder> {
    decoder: D,
    config: ReconstructionConfig,
}

impl<D: SymbolDecoder> ReconstructionEngine<D> {
    /// Create an engine with default thresholds
    pub fn new(decoder: D) -> Self {
        Self::with_config(decoder, ReconstructionConfig::default())
    }

    /// Create an engine with custom thresholds
    pub fn with_config(decoder: D, config: ReconstructionConfig) -> Self {
        Self { decoder, config }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// Reconstruct the text of one image from its raw detections.
    ///
    /// Zero detections is a valid outcome (a blank image) and yields an
    /// empty string, never an error.
    pub fn reconstruct(&self, detections: &[RawDetection]) -> String {
        if detections.is_empty() {
            return String::new();
        }

        let normalized = normalize(detections, &self.decoder);
        let lines = cluster_lines(normalized, self.config.y_threshold);

        let segmented: Vec<String> = lines
            .into_iter()
            .map(|mut line| segment_line(&mut line, self.config.space_factor))
            .collect();

        let mut text = assemble(&segmented, self.decoder.kind());
        if self.config.sentence_case {
            text = capitalize_sentences(&text);
        }

        debug!(
            "Reconstructed {} detections into {} lines: {:?}",
            detections.len(),
            segmented.len(),
            text
        );

        text
    }
}

/// Join segmented lines into the flat output string.
///
/// Lines are joined with single spaces, not newlines: downstream consumers
/// expect one flat string. Braille-derived text is lower-cased per line and
/// a leading capital marker upper-cases the character after it; the plain
/// character path is joined verbatim.
pub fn assemble(lines: &[String], kind: DecoderKind) -> String {
    match kind {
        DecoderKind::Braille => lines
            .iter()
            .map(|line| apply_capital_marker(&line.to_lowercase()))
            .collect::<Vec<String>>()
            .join(" "),
        DecoderKind::Alphanumeric => lines.join(" "),
    }
}

/// Consume a line-leading capital marker: the marker is dropped and the
/// character following it is upper-cased. Lines of a bare marker keep it.
fn apply_capital_marker(line: &str) -> String {
    let mut chars = line.chars();
    if chars.next() != Some(CAPITAL_MARKER) {
        return line.to_string();
    }

    let rest: Vec<char> = chars.collect();
    match rest.split_first() {
        Some((first, tail)) => {
            let mut out = String::with_capacity(line.len());
            out.extend(first.to_uppercase());
            out.extend(tail);
            out
        }
        None => line.to_string(),
    }
}

/// Decoder-independent sentence capitalization: split on `". "`, upper-case
/// each segment's first character, rejoin. The tail of each segment is left
/// alone so capitals produced by the capital marker survive.
pub fn capitalize_sentences(text: &str) -> String {
    text.split(". ")
        .map(capitalize_first)
        .collect::<Vec<String>>()
        .join(". ")
}

fn capitalize_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
