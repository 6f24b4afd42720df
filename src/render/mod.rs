//! # Receipt Rasterizer
//!
//! Turns a projected [`ReceiptView`] into an RGBA image: lays the line
//! document out on a fixed-width canvas, paints the resolved background,
//! then draws each line with the Spleen bitmap faces.
//!
//! ## Architecture
//!
//! ```text
//! ReceiptView → layout (ops + final height) → paint background → draw ops → RgbaImage
//! ```
//!
//! Scaling for export happens after layout: the canvas is rendered at
//! native size and upscaled with nearest-neighbor, which keeps bitmap
//! glyph edges crisp.

mod background;
mod font;

pub use background::{BackgroundSpec, paint};
pub use font::{Face, FaceMetrics, generate_glyph};

use image::{ImageFormat, Rgba, RgbaImage, imageops};
use std::io::Cursor;

use crate::error::ViniloError;
use crate::receipt::{Line, ReceiptView};
use crate::theme::Rgb;

/// Native receipt width in pixels.
pub const RECEIPT_WIDTH: u32 = 400;

const MARGIN_X: usize = 32;
const MARGIN_TOP: usize = 40;
const MARGIN_BOTTOM: usize = 32;
const CONTENT_WIDTH: usize = RECEIPT_WIDTH as usize - 2 * MARGIN_X;

/// Ink color for receipt text.
const TEXT_COLOR: Rgb = [31, 41, 55];
/// Rule color.
const RULE_COLOR: Rgb = [209, 213, 219];

const BLANK_ADVANCE: usize = 16;
const LINE_GAP: usize = 4;
const RULE_PAD: usize = 4;

#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug)]
enum DrawOp {
    Text {
        y: usize,
        align: Align,
        face: Face,
        bold: bool,
        text: String,
    },
    Rule {
        y: usize,
    },
}

/// Render a view onto a resolved background at the given scale.
///
/// `page` fills the canvas before the background treatment is painted.
pub fn render_view(
    view: &ReceiptView,
    spec: &BackgroundSpec,
    scale: u32,
    page: Rgb,
) -> RgbaImage {
    let (ops, height) = layout(view);

    let mut canvas = RgbaImage::from_pixel(
        RECEIPT_WIDTH,
        height as u32,
        Rgba([page[0], page[1], page[2], 255]),
    );
    background::paint(&mut canvas, spec);

    for op in &ops {
        match op {
            DrawOp::Text { y, align, face, bold, text } => {
                draw_text(&mut canvas, *y, *align, *face, *bold, text);
            }
            DrawOp::Rule { y } => draw_rule(&mut canvas, *y),
        }
    }

    let scale = scale.max(1);
    if scale == 1 {
        canvas
    } else {
        imageops::resize(
            &canvas,
            canvas.width() * scale,
            canvas.height() * scale,
            imageops::FilterType::Nearest,
        )
    }
}

/// Encode an RGBA canvas as PNG bytes.
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, ViniloError> {
    let mut bytes = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ViniloError::Render(format!("Failed to encode PNG: {e}")))?;
    Ok(bytes)
}

/// Characters that fit on one line for a face.
fn chars_per_line(face: Face) -> usize {
    CONTENT_WIDTH / FaceMetrics::for_face(face).char_width
}

/// Lay out the line document. Returns draw ops and the final height.
fn layout(view: &ReceiptView) -> (Vec<DrawOp>, usize) {
    let mut ops = Vec::new();
    let mut y = MARGIN_TOP;

    let push_wrapped = |ops: &mut Vec<DrawOp>, y: &mut usize, text: &str, face: Face, bold: bool, align: Align| {
        let height = FaceMetrics::for_face(face).char_height;
        for segment in wrap(text, chars_per_line(face)) {
            ops.push(DrawOp::Text { y: *y, align, face, bold, text: segment });
            *y += height + LINE_GAP;
        }
    };

    for line in &view.lines {
        match line {
            Line::Title(text) => {
                push_wrapped(&mut ops, &mut y, text, Face::Title, false, Align::Center);
                y += 8;
            }
            Line::Caption(text) => {
                push_wrapped(&mut ops, &mut y, text, Face::Body, false, Align::Center);
            }
            Line::Blank => y += BLANK_ADVANCE,
            Line::Item { name, duration } => {
                let cols = chars_per_line(Face::Body);
                let dur_chars = duration.chars().count();
                let name_max = cols.saturating_sub(dur_chars + 1);
                ops.push(DrawOp::Text {
                    y,
                    align: Align::Left,
                    face: Face::Body,
                    bold: false,
                    text: truncate(name, name_max),
                });
                ops.push(DrawOp::Text {
                    y,
                    align: Align::Right,
                    face: Face::Body,
                    bold: false,
                    text: duration.clone(),
                });
                y += FaceMetrics::BODY.char_height + LINE_GAP;
            }
            Line::Rule => {
                y += RULE_PAD;
                ops.push(DrawOp::Rule { y });
                y += 1 + RULE_PAD;
            }
            Line::TotalRow { label, value } => {
                ops.push(DrawOp::Text {
                    y,
                    align: Align::Left,
                    face: Face::Body,
                    bold: true,
                    text: label.clone(),
                });
                ops.push(DrawOp::Text {
                    y,
                    align: Align::Right,
                    face: Face::Body,
                    bold: true,
                    text: value.clone(),
                });
                y += FaceMetrics::BODY.char_height + LINE_GAP;
            }
            Line::Meta(text) | Line::Footer(text) => {
                push_wrapped(&mut ops, &mut y, text, Face::Small, false, Align::Center);
            }
            Line::Tag(text) => {
                y += 6;
                push_wrapped(&mut ops, &mut y, text, Face::Small, false, Align::Center);
            }
        }
    }

    (ops, y + MARGIN_BOTTOM)
}

/// Greedy word wrap honoring embedded newlines; overlong words are
/// hard-split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if current_len == 0 {
                current = word.to_string();
                current_len = word_len;
            } else if current_len + 1 + word_len <= max_chars {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
                current_len = word_len;
            }

            while current_len > max_chars {
                let head: String = current.chars().take(max_chars).collect();
                let tail: String = current.chars().skip(max_chars).collect();
                lines.push(head);
                current_len = tail.chars().count();
                current = tail;
            }
        }

        lines.push(current);
    }

    lines
}

/// Truncate to at most `max_chars` characters.
fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn draw_text(canvas: &mut RgbaImage, y: usize, align: Align, face: Face, bold: bool, text: &str) {
    let metrics = FaceMetrics::for_face(face);
    let text_width = text.chars().count() * metrics.char_width;
    let x = match align {
        Align::Left => MARGIN_X,
        Align::Center => MARGIN_X + CONTENT_WIDTH.saturating_sub(text_width) / 2,
        Align::Right => MARGIN_X + CONTENT_WIDTH.saturating_sub(text_width),
    };

    let mut pen_x = x;
    for ch in text.chars() {
        let glyph = font::generate_glyph(face, ch);
        blit_glyph(canvas, pen_x, y, &glyph, metrics);
        if bold {
            blit_glyph(canvas, pen_x + 1, y, &glyph, metrics);
        }
        pen_x += metrics.char_width;
    }
}

fn blit_glyph(canvas: &mut RgbaImage, x: usize, y: usize, glyph: &[u8], metrics: FaceMetrics) {
    let (w, h) = (canvas.width() as usize, canvas.height() as usize);
    for gy in 0..metrics.char_height {
        for gx in 0..metrics.char_width {
            if glyph[gy * metrics.char_width + gx] == 0 {
                continue;
            }
            let (px, py) = (x + gx, y + gy);
            if px < w && py < h {
                canvas.put_pixel(
                    px as u32,
                    py as u32,
                    Rgba([TEXT_COLOR[0], TEXT_COLOR[1], TEXT_COLOR[2], 255]),
                );
            }
        }
    }
}

fn draw_rule(canvas: &mut RgbaImage, y: usize) {
    if y >= canvas.height() as usize {
        return;
    }
    for x in MARGIN_X..(RECEIPT_WIDTH as usize - MARGIN_X) {
        canvas.put_pixel(
            x as u32,
            y as u32,
            Rgba([RULE_COLOR[0], RULE_COLOR[1], RULE_COLOR[2], 255]),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{Theme, WHITE};

    fn sample_view() -> ReceiptView {
        ReceiptView {
            lines: vec![
                Line::Title("ALBUM TITLE".into()),
                Line::Caption("BY ARTIST NAME".into()),
                Line::Blank,
                Line::Item { name: "TRACK 1".into(), duration: "2:49".into() },
                Line::Rule,
                Line::TotalRow { label: "TOTAL MINUTES".into(), value: "2:49".into() },
                Line::Rule,
                Line::Meta("14.04.2017 04:14 12 34 56789 1234".into()),
                Line::Footer("PRODUCED BY YOUR PRODUCERS HERE".into()),
                Line::Tag("@ALBUMRECEIPTS".into()),
            ],
            theme: Theme::Paper,
        }
    }

    #[test]
    fn renders_fixed_width_with_ink() {
        let img = render_view(&sample_view(), &BackgroundSpec::Solid(WHITE), 1, WHITE);
        assert_eq!(img.width(), RECEIPT_WIDTH);
        assert!(img.height() > 100);
        let ink = Rgba([TEXT_COLOR[0], TEXT_COLOR[1], TEXT_COLOR[2], 255]);
        assert!(img.pixels().any(|p| *p == ink));
    }

    #[test]
    fn scale_multiplies_both_dimensions() {
        let view = sample_view();
        let base = render_view(&view, &BackgroundSpec::Solid(WHITE), 1, WHITE);
        let scaled = render_view(&view, &BackgroundSpec::Solid(WHITE), 2, WHITE);
        assert_eq!(scaled.width(), base.width() * 2);
        assert_eq!(scaled.height(), base.height() * 2);
    }

    #[test]
    fn solid_background_shows_in_margins() {
        let img = render_view(&sample_view(), &BackgroundSpec::Solid([230, 247, 255]), 1, WHITE);
        assert_eq!(*img.get_pixel(2, 2), Rgba([230, 247, 255, 255]));
    }

    #[test]
    fn longer_tracklists_grow_the_canvas() {
        let short = sample_view();
        let mut long = sample_view();
        for i in 0..10 {
            long.lines.insert(
                3,
                Line::Item { name: format!("TRACK {i}"), duration: "3:00".into() },
            );
        }
        let a = render_view(&short, &BackgroundSpec::Solid(WHITE), 1, WHITE);
        let b = render_view(&long, &BackgroundSpec::Solid(WHITE), 1, WHITE);
        assert!(b.height() > a.height());
        // Same width regardless of content
        assert_eq!(a.width(), b.width());
    }

    #[test]
    fn wrap_respects_word_boundaries() {
        assert_eq!(wrap("AA BB CC", 5), vec!["AA BB", "CC"]);
        assert_eq!(wrap("AA", 5), vec!["AA"]);
        assert_eq!(wrap("", 5), vec![""]);
    }

    #[test]
    fn wrap_hard_splits_overlong_words() {
        assert_eq!(wrap("ABCDEFGH", 3), vec!["ABC", "DEF", "GH"]);
    }

    #[test]
    fn wrap_honors_embedded_newlines() {
        assert_eq!(wrap("AA\nBB", 10), vec!["AA", "BB"]);
    }

    #[test]
    fn truncate_is_char_aware() {
        assert_eq!(truncate("TRACKNAME", 5), "TRACK");
        assert_eq!(truncate("AB", 5), "AB");
    }

    #[test]
    fn encode_png_produces_signature() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[0..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
