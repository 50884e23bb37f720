//! Byte to character tables for the three candidate encodings.
//!
//! Every table is total over `0..=255`: bytes without a printable meaning in
//! the charset decode to U+FFFD, so decoding never fails and always yields
//! one `char` per input byte.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const REPLACEMENT: char = '\u{FFFD}';

/// Candidate encodings in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    Ascii,
    /// C64 PETSCII, lowercase/uppercase character set.
    Petscii,
    /// C64 screen codes, lowercase/uppercase character set.
    Screencode,
}

impl Encoding {
    pub const ALL: [Encoding; 3] = [Encoding::Ascii, Encoding::Petscii, Encoding::Screencode];

    pub fn name(self) -> &'static str {
        match self {
            Encoding::Ascii => "ascii",
            Encoding::Petscii => "petscii_c64en_lc",
            Encoding::Screencode => "screencode_c64_lc",
        }
    }

    fn table(self) -> &'static [char; 256] {
        match self {
            Encoding::Ascii => &ASCII,
            Encoding::Petscii => &PETSCII_LC,
            Encoding::Screencode => &SCREENCODE_LC,
        }
    }

    pub fn decode_byte(self, byte: u8) -> char {
        self.table()[byte as usize]
    }

    pub fn decode(self, bytes: &[u8]) -> String {
        let table = self.table();
        bytes.iter().map(|&b| table[b as usize]).collect()
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Glyphs shared by PETSCII $60-$7F and screen codes $40-$5F.
const GRAPHICS_UPPER: [char; 32] = [
    '\u{2500}', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P',
    'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '\u{253C}', '\u{1FB8C}', '\u{2502}',
    '\u{1FB96}', '\u{1FB98}',
];

// Block graphics shared by PETSCII $A0-$BF and screen codes $60-$7F.
const BLOCKS: [char; 32] = [
    '\u{00A0}', '\u{258C}', '\u{2584}', '\u{2594}', '\u{2581}', '\u{258F}', '\u{2592}',
    '\u{2595}', '\u{1FB8F}', '\u{1FB99}', '\u{1FB87}', '\u{251C}', '\u{2597}', '\u{2514}',
    '\u{2510}', '\u{2582}', '\u{250C}', '\u{2534}', '\u{252C}', '\u{2524}', '\u{258E}',
    '\u{258D}', '\u{1FB88}', '\u{1FB82}', '\u{1FB83}', '\u{2583}', '\u{2713}', '\u{2596}',
    '\u{259D}', '\u{2518}', '\u{2598}', '\u{259A}',
];

// `@`, lowercase letters and the five symbols after them.
const LETTERS_LOWER: [char; 32] = [
    '@', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q',
    'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '[', '\u{00A3}', ']', '\u{2191}', '\u{2190}',
];

static ASCII: [char; 256] = build_ascii();
static PETSCII_LC: [char; 256] = build_petscii_lc();
static SCREENCODE_LC: [char; 256] = build_screencode_lc();

const fn build_ascii() -> [char; 256] {
    let mut lut = [REPLACEMENT; 256];
    let mut i = 0;
    while i < 0x80 {
        lut[i] = i as u8 as char;
        i += 1;
    }
    lut
}

const fn with_block(mut lut: [char; 256], start: usize, block: &[char; 32]) -> [char; 256] {
    let mut i = 0;
    while i < 32 {
        lut[start + i] = block[i];
        i += 1;
    }
    lut
}

const fn build_petscii_lc() -> [char; 256] {
    let mut lut = [REPLACEMENT; 256];

    lut[0x0A] = '\n';
    lut[0x0D] = '\r';
    lut[0x8D] = '\n';

    let mut i = 0x20;
    while i < 0x40 {
        lut[i] = i as u8 as char;
        i += 1;
    }

    lut = with_block(lut, 0x40, &LETTERS_LOWER);
    lut = with_block(lut, 0x60, &GRAPHICS_UPPER);
    lut = with_block(lut, 0xA0, &BLOCKS);
    lut = with_block(lut, 0xC0, &GRAPHICS_UPPER);
    lut = with_block(lut, 0xE0, &BLOCKS);
    lut[0xFF] = GRAPHICS_UPPER[0x1E];
    lut
}

const fn build_screencode_lc() -> [char; 256] {
    let mut lut = [REPLACEMENT; 256];

    lut = with_block(lut, 0x00, &LETTERS_LOWER);

    let mut i = 0x20;
    while i < 0x40 {
        lut[i] = i as u8 as char;
        i += 1;
    }

    lut = with_block(lut, 0x40, &GRAPHICS_UPPER);
    lut = with_block(lut, 0x60, &BLOCKS);
    lut
}
