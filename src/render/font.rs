//! Bitmap font faces and glyph generation.
//!
//! Uses the Spleen font family: 12x24 for the title, 8x16 for body
//! text, 6x12 for the small print.

use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};

/// The three faces a receipt line can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Title,
    Body,
    Small,
}

/// Pixel dimensions for each face.
#[derive(Debug, Clone, Copy)]
pub struct FaceMetrics {
    pub char_width: usize,
    pub char_height: usize,
}

impl FaceMetrics {
    pub const TITLE: FaceMetrics = FaceMetrics { char_width: 12, char_height: 24 };
    pub const BODY: FaceMetrics = FaceMetrics { char_width: 8, char_height: 16 };
    pub const SMALL: FaceMetrics = FaceMetrics { char_width: 6, char_height: 12 };

    pub fn for_face(face: Face) -> FaceMetrics {
        match face {
            Face::Title => Self::TITLE,
            Face::Body => Self::BODY,
            Face::Small => Self::SMALL,
        }
    }
}

/// Generate a glyph bitmap for a character.
/// Returns a buffer of `char_width * char_height` bytes, 0 or 1.
pub fn generate_glyph(face: Face, ch: char) -> Vec<u8> {
    let metrics = FaceMetrics::for_face(face);
    let mut glyph = vec![0u8; metrics.char_width * metrics.char_height];

    let mut spleen = match face {
        Face::Title => PSF2Font::new(FONT_12X24).unwrap(),
        Face::Body => PSF2Font::new(FONT_8X16).unwrap(),
        Face::Small => PSF2Font::new(FONT_6X12).unwrap(),
    };

    let utf8 = ch.to_string();
    if let Some(rows) = spleen.glyph_for_utf8(utf8.as_bytes()) {
        for (row_y, row) in rows.enumerate() {
            for (col_x, on) in row.enumerate() {
                let idx = row_y * metrics.char_width + col_x;
                if idx < glyph.len() {
                    glyph[idx] = if on { 1 } else { 0 };
                }
            }
        }
    } else {
        // Unknown characters render as a box outline
        draw_box(&mut glyph, metrics.char_width, metrics.char_height);
    }

    glyph
}

/// Draw a box outline in the glyph buffer.
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = 1;
        glyph[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        glyph[y * width] = 1;
        glyph[y * width + width - 1] = 1;
    }
}
