//! # Receipt View Projection
//!
//! Pure projection from [`ReceiptForm`](crate::form::ReceiptForm) to the
//! line document the renderer paints. All user-visible fallbacks live
//! here: placeholder strings for empty fields, the current date/time
//! defaults, positional track names, and the decorative code line.
//!
//! The projection imposes no case transformation on user text — the
//! uppercase look of the demo data is the user's own input.

use chrono::Local;
use rand::Rng;

use crate::form::ReceiptForm;
use crate::theme::Theme;

/// Fallback shown for an empty album title.
pub const TITLE_FALLBACK: &str = "ALBUM TITLE";
/// Fallback shown for an empty artist name.
pub const ARTIST_FALLBACK: &str = "ARTIST NAME";
/// Fallback shown for empty producer credits.
pub const PRODUCERS_FALLBACK: &str = "PRODUCED BY YOUR PRODUCERS HERE";
/// Fallback shown for an empty track duration.
pub const DURATION_FALLBACK: &str = "0:00";
/// Tag line at the bottom of every receipt.
pub const TAG_LINE: &str = "@ALBUMRECEIPTS";

/// Digit-group widths of the decorative code line.
pub const CODE_GROUP_WIDTHS: [usize; 4] = [2, 2, 5, 4];

/// Source of the decorative digit groups on the meta line.
///
/// Pluggable so tests can substitute a fixed stub; the groups are
/// cosmetic flavor text, regenerated on every projection, and nothing
/// may depend on their exact values.
pub trait DecorativeCode {
    /// Digit groups with widths 2, 2, 5, 4.
    fn groups(&self) -> Vec<String>;
}

/// Production generator: fresh random groups per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCode;

impl DecorativeCode for RandomCode {
    fn groups(&self) -> Vec<String> {
        let mut rng = rand::rng();
        vec![
            rng.random_range(10u32..100).to_string(),
            rng.random_range(10u32..100).to_string(),
            rng.random_range(10_000u32..100_000).to_string(),
            rng.random_range(1_000u32..10_000).to_string(),
        ]
    }
}

/// One line of the projected receipt document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Large centered album title.
    Title(String),
    /// Centered caption under the title ("BY ...").
    Caption(String),
    /// Vertical whitespace.
    Blank,
    /// Tracklist row: name left, duration right.
    Item { name: String, duration: String },
    /// Thin horizontal rule.
    Rule,
    /// Emphasized row between rules: label left, value right.
    TotalRow { label: String, value: String },
    /// Centered small line (date, time, decorative code).
    Meta(String),
    /// Centered small footer text, word-wrapped by the renderer.
    Footer(String),
    /// Smallest centered line at the very bottom.
    Tag(String),
}

/// A projected receipt: the line document plus the theme it should be
/// painted on.
#[derive(Debug, Clone)]
pub struct ReceiptView {
    pub lines: Vec<Line>,
    pub theme: Theme,
}

/// Project the form state into a receipt view.
///
/// Pure apart from the clock (date/time fallbacks) and the decorative
/// code generator passed in by the caller.
pub fn project(form: &ReceiptForm, codes: &dyn DecorativeCode) -> ReceiptView {
    let mut lines = Vec::new();

    let title = fallback(&form.title, TITLE_FALLBACK);
    let artist = fallback(&form.artist, ARTIST_FALLBACK);
    lines.push(Line::Title(title));
    lines.push(Line::Caption(format!("BY {artist}")));
    lines.push(Line::Blank);

    for (index, track) in form.tracks.iter().enumerate() {
        let mut name = fallback(&track.title, &format!("TRACK {}", index + 1));
        if !track.featuring.is_empty() {
            name.push_str(&format!(" (FEAT. {})", track.featuring));
        }
        lines.push(Line::Item {
            name,
            duration: fallback(&track.duration, DURATION_FALLBACK),
        });
    }
    if !form.tracks.is_empty() {
        lines.push(Line::Blank);
    }

    lines.push(Line::Rule);
    lines.push(Line::TotalRow {
        label: "TOTAL MINUTES".into(),
        value: form.total_time(),
    });
    lines.push(Line::Rule);
    lines.push(Line::Blank);

    let now = Local::now();
    let date = fallback(&form.date, &now.format("%d.%m.%Y").to_string());
    let time = fallback(&form.time, &now.format("%H:%M").to_string());
    lines.push(Line::Meta(format!(
        "{date} {time} {}",
        codes.groups().join(" ")
    )));
    lines.push(Line::Blank);

    lines.push(Line::Footer(format!("COPYRIGHT {}", now.format("%Y"))));
    lines.push(Line::Footer(fallback(&form.producers, PRODUCERS_FALLBACK)));
    lines.push(Line::Tag(TAG_LINE.into()));

    ReceiptView {
        lines,
        theme: form.theme.clone(),
    }
}

fn fallback(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
