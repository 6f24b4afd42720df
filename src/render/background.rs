//! Background painting for the receipt canvas.
//!
//! A [`BackgroundSpec`] is a fully resolved background: color values
//! parsed, gradient descriptors compiled, image payloads decoded. The
//! export pipeline resolves a [`Theme`](crate::theme::Theme) into one of
//! these (fetching remote images where its options permit) and hands it
//! here for painting.

use image::{DynamicImage, Rgba, RgbaImage, imageops::FilterType};

use crate::theme::{Gradient, Rgb};

/// Opacity of the white legibility overlay composited over image
/// backgrounds.
const IMAGE_OVERLAY_ALPHA: f32 = 0.7;

/// Base tint of the paper texture.
const PAPER_BASE: Rgb = [253, 252, 247];

/// A resolved, paintable background.
#[derive(Debug, Clone)]
pub enum BackgroundSpec {
    Paper,
    Solid(Rgb),
    Gradient(Gradient),
    Image(DynamicImage),
}

/// Paint the background over the whole canvas.
pub fn paint(canvas: &mut RgbaImage, spec: &BackgroundSpec) {
    match spec {
        BackgroundSpec::Paper => paint_paper(canvas),
        BackgroundSpec::Solid(color) => fill(canvas, *color),
        BackgroundSpec::Gradient(gradient) => paint_gradient(canvas, gradient),
        BackgroundSpec::Image(source) => {
            paint_cover(canvas, source);
            overlay_white(canvas, IMAGE_OVERLAY_ALPHA);
        }
    }
}

fn fill(canvas: &mut RgbaImage, color: Rgb) {
    for pixel in canvas.pixels_mut() {
        *pixel = Rgba([color[0], color[1], color[2], 255]);
    }
}

/// Off-white paper with a subtle deterministic grain.
fn paint_paper(canvas: &mut RgbaImage) {
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let n = grain(x, y);
        let shade = |c: u8| c.saturating_add_signed(n);
        *pixel = Rgba([shade(PAPER_BASE[0]), shade(PAPER_BASE[1]), shade(PAPER_BASE[2]), 255]);
    }
}

/// Hash-based grain in -4..=3, stable across renders.
fn grain(x: u32, y: u32) -> i8 {
    let mut h = x.wrapping_mul(374_761_393).wrapping_add(y.wrapping_mul(668_265_263));
    h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    ((h >> 16) & 0x7) as i8 - 4
}

/// Paint a linear gradient along its CSS angle (clockwise from up).
fn paint_gradient(canvas: &mut RgbaImage, gradient: &Gradient) {
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    let theta = gradient.angle_deg.to_radians();
    let (sin, cos) = theta.sin_cos();
    // Screen y grows downward, so "up" is -y.
    let (dx, dy) = (sin, -cos);
    let half = (w * dx.abs() + h * dy.abs()) / 2.0;
    let (cx, cy) = (w / 2.0, h / 2.0);

    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let proj = (x as f32 - cx) * dx + (y as f32 - cy) * dy;
        let t = if half > 0.0 { (proj + half) / (2.0 * half) } else { 0.5 };
        let [r, g, b] = gradient.sample(t);
        *pixel = Rgba([r, g, b, 255]);
    }
}

/// Scale the image to cover the canvas, centered, and blit it.
fn paint_cover(canvas: &mut RgbaImage, source: &DynamicImage) {
    let (cw, ch) = (canvas.width(), canvas.height());
    let (iw, ih) = (source.width().max(1), source.height().max(1));

    let scale = (cw as f32 / iw as f32).max(ch as f32 / ih as f32);
    let scaled_w = (iw as f32 * scale).ceil().max(cw as f32) as u32;
    let scaled_h = (ih as f32 * scale).ceil().max(ch as f32) as u32;

    let scaled = source
        .resize_exact(scaled_w, scaled_h, FilterType::Triangle)
        .to_rgba8();

    let off_x = (scaled_w - cw) / 2;
    let off_y = (scaled_h - ch) / 2;
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        *pixel = *scaled.get_pixel(x + off_x, y + off_y);
    }
}

/// Composite a partial-opacity white layer over the canvas.
fn overlay_white(canvas: &mut RgbaImage, alpha: f32) {
    let keep = 1.0 - alpha;
    for pixel in canvas.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let blend = |c: u8| (c as f32 * keep + 255.0 * alpha).round() as u8;
        *pixel = Rgba([blend(r), blend(g), blend(b), a]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::parse_gradient;

    fn canvas(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255]))
    }

    #[test]
    fn solid_fills_exact_color() {
        let mut img = canvas(8, 8);
        paint(&mut img, &BackgroundSpec::Solid([255, 222, 226]));
        for pixel in img.pixels() {
            assert_eq!(*pixel, Rgba([255, 222, 226, 255]));
        }
    }

    #[test]
    fn paper_is_near_white_and_textured() {
        let mut img = canvas(32, 32);
        paint(&mut img, &BackgroundSpec::Paper);
        let first = *img.get_pixel(0, 0);
        assert!(img.pixels().all(|p| p.0[0] > 240 && p.0[3] == 255));
        // Grain varies between pixels
        assert!(img.pixels().any(|p| *p != first));
        // And is deterministic
        let mut again = canvas(32, 32);
        paint(&mut again, &BackgroundSpec::Paper);
        assert_eq!(img, again);
    }

    #[test]
    fn horizontal_gradient_runs_left_to_right() {
        let g = parse_gradient("linear-gradient(90deg, #000000 0%, #ffffff 100%)").unwrap();
        let mut img = canvas(64, 16);
        paint(&mut img, &BackgroundSpec::Gradient(g));
        let left = img.get_pixel(0, 8).0[0];
        let mid = img.get_pixel(32, 8).0[0];
        let right = img.get_pixel(63, 8).0[0];
        assert!(left < mid && mid < right);
        // A vertical column is uniform for a 90deg gradient
        assert_eq!(img.get_pixel(32, 0), img.get_pixel(32, 15));
    }

    #[test]
    fn image_background_gets_legibility_overlay() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            10,
            10,
            Rgba([0, 0, 0, 255]),
        ));
        let mut img = canvas(20, 20);
        paint(&mut img, &BackgroundSpec::Image(source));
        // Pure black blended toward white at 70%
        let p = img.get_pixel(10, 10).0;
        assert!(p[0] >= 170 && p[0] <= 185, "got {p:?}");
    }

    #[test]
    fn cover_scaling_fills_canvas_from_any_aspect() {
        // A 2x10 red source must still cover a 20x20 canvas completely.
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            2,
            10,
            Rgba([255, 0, 0, 255]),
        ));
        let mut img = canvas(20, 20);
        paint(&mut img, &BackgroundSpec::Image(source));
        for pixel in img.pixels() {
            // Red, lightened by the overlay — never the black base
            assert!(pixel.0[0] > 200);
        }
    }
}
