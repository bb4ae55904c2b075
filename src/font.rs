//! Label fonts: metrics for centring names and the bytes to embed in the PDF.
//!
//! Text is written with WinAnsiEncoding, so every string is reduced to single
//! byte codes before it is measured or drawn. Characters outside that code page
//! print as `?`.

use std::fs;
use std::path::Path;

use ab_glyph::{Font, FontVec};
use tracing::debug;

use crate::error::{Error, Result};

const FIRST_CHAR: u8 = 32;
const LAST_CHAR: u8 = 255;

/// A font in the shape the PDF writer needs.
#[derive(Clone, Debug)]
pub struct LabelFont {
    base_name: String,
    /// Advance widths for codes `FIRST_CHAR..=LAST_CHAR`, in 1/1000 em.
    widths: Vec<f32>,
    embedded: Option<EmbeddedFont>,
}

/// TrueType program and the descriptor values derived from it, in 1/1000 em.
#[derive(Clone, Debug)]
pub struct EmbeddedFont {
    pub data: Vec<u8>,
    pub ascent: f32,
    pub descent: f32,
    pub cap_height: f32,
    pub bbox: [f32; 4],
}

impl LabelFont {
    /// Loads a TrueType font from disk for embedding.
    ///
    /// # Errors
    ///
    /// [`Error::Font`] if the file cannot be read or is not a usable font.
    pub fn load(path: &Path) -> Result<Self> {
        let font_error = |reason: String| Error::Font { path: path.to_path_buf(), reason };

        let data = fs::read(path).map_err(|e| font_error(e.to_string()))?;
        let font = FontVec::try_from_vec(data.clone()).map_err(|e| font_error(e.to_string()))?;
        let upem = font.units_per_em().unwrap_or(1000.0);
        let scale = 1000.0 / upem;

        let widths: Vec<f32> = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| match winansi_char(code) {
                Some(c) => font.h_advance_unscaled(font.glyph_id(c)) * scale,
                None => 0.0,
            })
            .collect();
        let max_width = widths.iter().copied().fold(0.0f32, f32::max);
        let ascent = font.ascent_unscaled() * scale;
        let descent = font.descent_unscaled() * scale;
        let cap_height = cap_height(&font) * scale;

        // PDF names must not contain spaces or delimiters
        let base_name = path
            .file_stem()
            .map(|s| {
                s.to_string_lossy()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                    .collect::<String>()
            })
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "LabelFont".to_string());
        debug!(font = %base_name, upem, "loaded TrueType font");

        Ok(Self {
            base_name,
            widths,
            embedded: Some(EmbeddedFont {
                data,
                ascent,
                descent,
                cap_height,
                bbox: [0.0, descent, max_width, ascent],
            }),
        })
    }

    /// The standard Helvetica-Bold font, which PDF viewers supply themselves.
    pub fn helvetica_bold() -> Self {
        let widths = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| match code {
                32..=126 => f32::from(HELVETICA_BOLD_ASCII[usize::from(code - 32)]),
                _ => 556.0,
            })
            .collect();
        Self {
            base_name: "Helvetica-Bold".to_string(),
            widths,
            embedded: None,
        }
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn embedded(&self) -> Option<&EmbeddedFont> {
        self.embedded.as_ref()
    }

    pub fn first_char(&self) -> u8 {
        FIRST_CHAR
    }

    pub fn last_char(&self) -> u8 {
        LAST_CHAR
    }

    /// Widths array for the PDF font dictionary.
    pub fn widths(&self) -> &[f32] {
        &self.widths
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: f32 = encode_winansi(text)
            .into_iter()
            .filter(|&b| b >= FIRST_CHAR)
            .map(|b| self.widths[usize::from(b - FIRST_CHAR)])
            .sum();
        units * size / 1000.0
    }
}

/// Maps text to WinAnsiEncoding codes.
pub fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let cp = u32::from(c);
            match cp {
                0x20..=0x7e | 0xa0..=0xff => cp as u8,
                _ => WINANSI_HIGH
                    .iter()
                    .position(|&h| h == Some(c))
                    .map_or(b'?', |i| 0x80 + i as u8),
            }
        })
        .collect()
}

fn winansi_char(code: u8) -> Option<char> {
    match code {
        0x20..=0x7e | 0xa0..=0xff => Some(char::from(code)),
        0x80..=0x9f => WINANSI_HIGH[usize::from(code - 0x80)],
        _ => None,
    }
}

/// Codes 0x80..=0x9F of WinAnsiEncoding.
static WINANSI_HIGH: [Option<char>; 32] = [
    Some('\u{20ac}'), None, Some('\u{201a}'), Some('\u{0192}'),
    Some('\u{201e}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02c6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017d}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201c}'),
    Some('\u{201d}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02dc}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203a}'),
    Some('\u{0153}'), None, Some('\u{017e}'), Some('\u{0178}'),
];

/// Helvetica-Bold advance widths for ASCII 32..=126 (Adobe AFM).
static HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // space../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,      // p..~
];

/// Height of a flat capital above the baseline, in font units.
///
/// Taken from the outline of `H`; fonts without one get 0.7 em.
fn cap_height(font: &impl Font) -> f32 {
    let upem = font.units_per_em().unwrap_or(1000.0);
    font.outline(font.glyph_id('H'))
        .map(|outline| outline.bounds.max.y)
        .filter(|&height| height > 0.0)
        .unwrap_or(0.7 * upem)
}
