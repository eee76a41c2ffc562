//! Braille cell decoding
//!
//! A braille class id is a string of six `'0'`/`'1'` characters giving the
//! raised dots of one cell in dot order 1..6. Cells decode two independent
//! ways: to a display letter via the Spanish braille table, and to the
//! Unicode braille-pattern glyph at `U+2800` plus the integer value of the
//! code string.

use std::collections::HashMap;

use anyhow::{bail, Result};
use tracing::debug;

use super::{ClassId, DecoderKind, SymbolDecoder};

/// Fallback symbol for unassigned or malformed cells
pub const FALLBACK_SYMBOL: &str = "?";

/// Placeholder glyph for malformed cells (all six dots raised)
pub const FALLBACK_GLYPH: char = '⠿';

/// Capital-sign cell, dots 4 and 6. Marks capitalization of the following
/// letter; the text assembler consumes the marker it decodes to.
pub const CAPITAL_SIGN: &str = "000101";

/// Marker symbol the capital-sign cell decodes to
pub const CAPITAL_MARKER: char = '^';

/// Assigned cells of the Spanish braille alphabet: letters, accented vowels,
/// the number sign, comma, period and the capital sign.
const BRAILLE_TABLE: &[(&str, &str)] = &[
    ("100000", "A"),
    ("110000", "B"),
    ("100100", "C"),
    ("100110", "D"),
    ("100010", "E"),
    ("110100", "F"),
    ("110110", "G"),
    ("110010", "H"),
    ("010100", "I"),
    ("010110", "J"),
    ("101000", "K"),
    ("111000", "L"),
    ("101100", "M"),
    ("101110", "N"),
    ("110111", "Ñ"),
    ("101010", "O"),
    ("111100", "P"),
    ("111110", "Q"),
    ("111010", "R"),
    ("011100", "S"),
    ("011110", "T"),
    ("101001", "U"),
    ("111001", "V"),
    ("010111", "W"),
    ("101101", "X"),
    ("101111", "Y"),
    ("101011", "Z"),
    ("111011", "Á"),
    ("011101", "É"),
    ("001100", "Í"),
    ("001101", "Ó"),
    ("011111", "Ú"),
    ("001111", "#"),
    ("010000", ","),
    ("001000", "."),
    (CAPITAL_SIGN, "^"),
];

/// Assigned cells expected in the table: 27 letters, 5 accented vowels,
/// number sign, comma, period, capital sign
const EXPECTED_CELLS: usize = 36;

/// Decoder for 6-dot braille cell detections
pub struct BrailleDecoder {
    letters: HashMap<&'static str, &'static str>,
}

impl BrailleDecoder {
    /// Build the decoder, validating the cell table: every code must be six
    /// binary characters, no code may be assigned twice and the full
    /// alphabet must be present.
    pub fn new() -> Result<Self> {
        if BRAILLE_TABLE.len() != EXPECTED_CELLS {
            bail!(
                "Braille table incomplete: expected {} cells, got {}",
                EXPECTED_CELLS,
                BRAILLE_TABLE.len()
            );
        }

        let mut letters = HashMap::with_capacity(BRAILLE_TABLE.len());
        for (code, symbol) in BRAILLE_TABLE {
            if !is_valid_code(code) {
                bail!("Invalid braille cell code in table: {:?}", code);
            }
            if letters.insert(*code, *symbol).is_some() {
                bail!("Duplicate braille cell code in table: {:?}", code);
            }
        }
        Ok(Self { letters })
    }

    /// Decode a cell code to its display letter. Unassigned or malformed
    /// codes yield the fallback symbol.
    pub fn letter(&self, code: &str) -> &'static str {
        let code = code.trim();
        match self.letters.get(code).copied() {
            Some(symbol) => symbol,
            None => {
                debug!("Unassigned braille cell {:?}, using fallback", code);
                FALLBACK_SYMBOL
            }
        }
    }
}

impl SymbolDecoder for BrailleDecoder {
    fn decode(&self, class: &ClassId) -> String {
        match class {
            ClassId::Code(code) => self.letter(code).to_string(),
            ClassId::Index(index) => {
                debug!("Braille decoder got index class {}, using fallback", index);
                FALLBACK_SYMBOL.to_string()
            }
        }
    }

    fn kind(&self) -> DecoderKind {
        DecoderKind::Braille
    }
}

/// Map a cell code onto the Unicode braille block. The code string is read as
/// a binary number and added to the `U+2800` base; malformed codes yield the
/// all-dots placeholder.
pub fn cell_glyph(code: &str) -> char {
    let code = code.trim();
    if !is_valid_code(code) {
        return FALLBACK_GLYPH;
    }
    match u32::from_str_radix(code, 2) {
        Ok(value) => char::from_u32(0x2800 + value).unwrap_or(FALLBACK_GLYPH),
        Err(_) => FALLBACK_GLYPH,
    }
}

fn is_valid_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b == b'0' || b == b'1')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_known_cells() {
        let decoder = BrailleDecoder::new().unwrap();
        assert_eq!(decoder.letter("100000"), "A");
        assert_eq!(decoder.letter("110010"), "H");
        assert_eq!(decoder.letter("110111"), "Ñ");
        assert_eq!(decoder.letter("001111"), "#");
        assert_eq!(decoder.letter("010000"), ",");
        assert_eq!(decoder.letter("001000"), ".");
    }

    #[test]
    fn test_trims_whitespace_like_detector_output() {
        let decoder = BrailleDecoder::new().unwrap();
        assert_eq!(decoder.letter(" 100000 "), "A");
    }

    #[test]
    fn test_malformed_codes_fall_back() {
        let decoder = BrailleDecoder::new().unwrap();
        assert_eq!(decoder.letter("10100"), FALLBACK_SYMBOL); // too short
        assert_eq!(decoder.letter("1010011"), FALLBACK_SYMBOL); // too long
        assert_eq!(decoder.letter("10a001"), FALLBACK_SYMBOL); // non-binary
        assert_eq!(decoder.letter(""), FALLBACK_SYMBOL);
    }

    #[test]
    fn test_unassigned_cells_fall_back() {
        let decoder = BrailleDecoder::new().unwrap();
        // Dots 5+6 is well-formed but carries no assignment
        assert_eq!(decoder.letter("000011"), FALLBACK_SYMBOL);
    }

    #[test]
    fn test_index_class_is_a_decode_miss() {
        let decoder = BrailleDecoder::new().unwrap();
        assert_eq!(decoder.decode(&ClassId::Index(7)), FALLBACK_SYMBOL);
    }

    #[test]
    fn test_capital_sign_decodes_to_marker() {
        let decoder = BrailleDecoder::new().unwrap();
        assert_eq!(decoder.letter(CAPITAL_SIGN), "^");
    }

    #[test]
    fn test_glyph_offsets_into_braille_block() {
        assert_eq!(cell_glyph("000000"), '\u{2800}');
        assert_eq!(cell_glyph("000001"), '\u{2801}');
        assert_eq!(cell_glyph("100000"), '\u{2820}');
        assert_eq!(cell_glyph("111111"), '\u{283F}');
    }

    #[test]
    fn test_glyph_fallback_for_malformed_codes() {
        assert_eq!(cell_glyph("banana"), FALLBACK_GLYPH);
        assert_eq!(cell_glyph("10101"), FALLBACK_GLYPH);
    }

    #[test]
    fn test_decoding_is_pure() {
        let decoder = BrailleDecoder::new().unwrap();
        for code in ["100000", "000011", "bad"] {
            assert_eq!(decoder.letter(code), decoder.letter(code));
            assert_eq!(cell_glyph(code), cell_glyph(code));
        }
    }
}
