//! # Receipt Background Themes
//!
//! The receipt background is one of four treatments: textured paper,
//! a solid color, a linear gradient, or a user-supplied image. The
//! value payload depends on the variant; `Paper` carries none, so
//! switching to it discards any previous value by construction.
//!
//! Payload parsing is deliberately lenient: an unparseable color token
//! or gradient descriptor resolves to plain white rather than erroring,
//! matching the "input malformation is never an error" policy used for
//! duration fields.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};

/// An RGB color triple.
pub type Rgb = [u8; 3];

/// Plain white, the fallback for every unparseable background payload.
pub const WHITE: Rgb = [255, 255, 255];

/// Sentinel value string reported for the paper theme.
pub const PAPER_SENTINEL: &str = "paper";

/// Background treatment for the receipt.
///
/// Serializes as `{"type": "solid", "value": "#ffffff"}` on the wire;
/// `Paper` has no value field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Theme {
    /// Static textured paper background.
    #[default]
    Paper,
    /// A color token (`#rgb` or `#rrggbb`).
    Solid(String),
    /// A `linear-gradient(<angle>deg, #hex p%, ...)` descriptor.
    Gradient(String),
    /// A `data:` URI (from upload) or an `http(s)` URL.
    Image(String),
}

impl Theme {
    /// The value payload, or the paper sentinel for `Paper`.
    pub fn value(&self) -> &str {
        match self {
            Theme::Paper => PAPER_SENTINEL,
            Theme::Solid(v) | Theme::Gradient(v) | Theme::Image(v) => v,
        }
    }
}

/// One color stop of a parsed gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient line, 0.0 to 1.0.
    pub position: f32,
    pub color: Rgb,
}

/// A parsed linear gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    /// CSS convention: degrees clockwise from pointing up.
    pub angle_deg: f32,
    /// At least one stop, sorted by position.
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    /// Sample the gradient at `t` in [0, 1].
    pub fn sample(&self, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let first = &self.stops[0];
        if t <= first.position {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t <= b.position {
                let span = b.position - a.position;
                let f = if span > 0.0 { (t - a.position) / span } else { 1.0 };
                return lerp_color(a.color, b.color, f);
            }
        }
        self.stops[self.stops.len() - 1].color
    }
}

fn lerp_color(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

/// Parse a `#rgb` or `#rrggbb` color token.
pub fn parse_color(token: &str) -> Option<Rgb> {
    let hex = token.trim().strip_prefix('#')?;
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, ch) in hex.chars().enumerate() {
                let n = ch.to_digit(16)? as u8;
                rgb[i] = n * 16 + n;
            }
            Some(rgb)
        }
        6 => {
            let mut rgb = [0u8; 3];
            for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
                let s = std::str::from_utf8(chunk).ok()?;
                rgb[i] = u8::from_str_radix(s, 16).ok()?;
            }
            Some(rgb)
        }
        _ => None,
    }
}

/// Parse a `linear-gradient(...)` descriptor.
///
/// Accepts an optional leading `<angle>deg` segment followed by
/// `#hex [p%]` stops. Stops without explicit positions are distributed
/// evenly. Returns `None` when no stop parses.
pub fn parse_gradient(descriptor: &str) -> Option<Gradient> {
    let open = descriptor.find('(')?;
    let close = descriptor.rfind(')')?;
    if close <= open {
        return None;
    }
    let body = &descriptor[open + 1..close];

    let mut angle_deg = 90.0f32;
    let mut raw_stops: Vec<(Option<f32>, Rgb)> = Vec::new();

    for (i, segment) in body.split(',').enumerate() {
        let segment = segment.trim();
        if i == 0
            && let Some(deg) = segment.strip_suffix("deg")
        {
            if let Ok(a) = deg.trim().parse::<f32>() {
                angle_deg = a;
            }
            continue;
        }

        let mut color = None;
        let mut position = None;
        for word in segment.split_whitespace() {
            if let Some(c) = parse_color(word) {
                color = Some(c);
            } else if let Some(pct) = word.strip_suffix('%')
                && let Ok(p) = pct.parse::<f32>()
            {
                position = Some((p / 100.0).clamp(0.0, 1.0));
            }
        }
        if let Some(color) = color {
            raw_stops.push((position, color));
        }
    }

    if raw_stops.is_empty() {
        return None;
    }

    let n = raw_stops.len();
    let mut stops: Vec<GradientStop> = raw_stops
        .into_iter()
        .enumerate()
        .map(|(i, (pos, color))| GradientStop {
            position: pos.unwrap_or(if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 }),
            color,
        })
        .collect();
    stops.sort_by(|a, b| a.position.total_cmp(&b.position));

    Some(Gradient { angle_deg, stops })
}

/// Split a `data:` URI into its MIME type and decoded payload.
pub fn parse_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let bytes = BASE64.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}

/// Encode raw bytes as a `data:` URI.
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_theme_is_paper() {
        assert_eq!(Theme::default(), Theme::Paper);
        assert_eq!(Theme::default().value(), PAPER_SENTINEL);
    }

    #[test]
    fn theme_json_round_trip() {
        let solid = Theme::Solid("#ffdee2".into());
        let json = serde_json::to_string(&solid).unwrap();
        assert_eq!(json, r##"{"type":"solid","value":"#ffdee2"}"##);
        assert_eq!(serde_json::from_str::<Theme>(&json).unwrap(), solid);

        let paper: Theme = serde_json::from_str(r#"{"type":"paper"}"#).unwrap();
        assert_eq!(paper, Theme::Paper);
    }

    #[test]
    fn parse_color_forms() {
        assert_eq!(parse_color("#ffffff"), Some([255, 255, 255]));
        assert_eq!(parse_color("#f8f5e6"), Some([248, 245, 230]));
        assert_eq!(parse_color("#fff"), Some([255, 255, 255]));
        assert_eq!(parse_color("#a1c"), Some([170, 17, 204]));
        assert_eq!(parse_color("white"), None);
        assert_eq!(parse_color("#ffff"), None);
        assert_eq!(parse_color("#gggggg"), None);
    }

    #[test]
    fn parse_gradient_with_angle_and_positions() {
        let g = parse_gradient("linear-gradient(90deg, #ff9a9e 0%, #fad0c4 100%)").unwrap();
        assert_eq!(g.angle_deg, 90.0);
        assert_eq!(g.stops.len(), 2);
        assert_eq!(g.stops[0].position, 0.0);
        assert_eq!(g.stops[0].color, [0xff, 0x9a, 0x9e]);
        assert_eq!(g.stops[1].position, 1.0);
        assert_eq!(g.stops[1].color, [0xfa, 0xd0, 0xc4]);
    }

    #[test]
    fn parse_gradient_without_positions_distributes_evenly() {
        let g = parse_gradient("linear-gradient(#000000, #808080, #ffffff)").unwrap();
        assert_eq!(g.angle_deg, 90.0);
        let positions: Vec<f32> = g.stops.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn parse_gradient_garbage_is_none() {
        assert_eq!(parse_gradient("radial-gradient banana"), None);
        assert_eq!(parse_gradient("linear-gradient(90deg, red, blue)"), None);
    }

    #[test]
    fn gradient_sampling_endpoints_and_midpoint() {
        let g = parse_gradient("linear-gradient(90deg, #000000 0%, #ffffff 100%)").unwrap();
        assert_eq!(g.sample(0.0), [0, 0, 0]);
        assert_eq!(g.sample(1.0), [255, 255, 255]);
        assert_eq!(g.sample(0.5), [128, 128, 128]);
        // Out-of-range clamps
        assert_eq!(g.sample(-1.0), [0, 0, 0]);
        assert_eq!(g.sample(2.0), [255, 255, 255]);
    }

    #[test]
    fn data_uri_round_trip() {
        let uri = encode_data_uri("image/png", b"hello");
        assert!(uri.starts_with("data:image/png;base64,"));
        let (mime, bytes) = parse_data_uri(&uri).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn data_uri_rejects_non_data() {
        assert!(parse_data_uri("https://example.com/x.png").is_none());
        assert!(parse_data_uri("data:image/png;base64,!!!").is_none());
    }
}
