//! # Receipt Form State
//!
//! The single owned state object behind the album receipt: album-level
//! fields, the ordered tracklist, and the background theme. All mutation
//! goes through the command methods here; every command bumps `revision`
//! before returning, so a projection taken afterwards always observes
//! the new state.
//!
//! The total-time field is derived on demand from the tracklist unless a
//! manual override is present. Duration text is parsed leniently — a
//! missing, non-numeric, or negative component contributes zero, never
//! an error.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::theme::Theme;

/// One row of the tracklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEntry {
    /// Stable identifier, assigned at creation, never reused.
    pub id: Uuid,
    pub title: String,
    /// Free text, `minutes:seconds` expected.
    pub duration: String,
    /// Featured artist; empty means "not displayed".
    pub featuring: String,
}

impl TrackEntry {
    fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            duration: String::new(),
            featuring: String::new(),
        }
    }

    fn seeded(title: &str, duration: &str, featuring: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            duration: duration.to_string(),
            featuring: featuring.to_string(),
        }
    }
}

/// Album-level scalar fields addressable by `set_field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Artist,
    Date,
    Time,
    TotalTime,
    Producers,
}

/// Track fields addressable by `update_track`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackField {
    Title,
    Duration,
    Featuring,
}

/// The receipt form state. See the module docs for the mutation model.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReceiptForm {
    pub title: String,
    pub artist: String,
    pub date: String,
    pub time: String,
    /// Manual total-time override; empty means "derive from tracks".
    pub total_time: String,
    pub producers: String,
    pub tracks: Vec<TrackEntry>,
    pub theme: Theme,
    /// Mutation counter, bumped by every command.
    pub revision: u64,
}

impl ReceiptForm {
    /// An empty form: no fields, no tracks, paper theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// The seeded demo album shown on first load.
    pub fn demo() -> Self {
        Self {
            title: "PLAYBOI CARTI".into(),
            artist: "PLAYBOI CARTI".into(),
            date: "14.04.2017".into(),
            time: "04:14".into(),
            total_time: "46:50".into(),
            producers: "PRODUCED BY A$AP ROCKY, CHACE JOHNSON, HARRY FRAUD, HIT-BOY, J, \
                        CASH BEATZ, JAKE ONE, JSTSEMOTHEBEAT, K-MAJOR, KASIIMGOTJUICE, \
                        MEXIKODRO, MURDA KID, PIERRE BOURNE, ROARK BAILEY, RICCI RIERA, \
                        SOUTHSIDE"
                .into(),
            tracks: vec![
                TrackEntry::seeded("LOCATION", "2:49", ""),
                TrackEntry::seeded("MAGNOLIA", "3:02", ""),
                TrackEntry::seeded("LOOKIN", "3:04", "LIL UZI VERT"),
                TrackEntry::seeded("WOKEUPLIKETHIS*", "3:56", "LIL UZI VERT"),
                TrackEntry::seeded("LET IT GO", "2:30", ""),
                TrackEntry::seeded("HALF & HALF", "3:47", ""),
                TrackEntry::seeded("NEW CHOPPA", "2:06", "A$AP ROCKY"),
                TrackEntry::seeded("OTHER SHIT", "2:50", ""),
            ],
            theme: Theme::Paper,
            revision: 0,
        }
    }

    /// Replace one scalar field. Any string is accepted, including empty.
    pub fn set_field(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.title = value,
            Field::Artist => self.artist = value,
            Field::Date => self.date = value,
            Field::Time => self.time = value,
            Field::TotalTime => self.total_time = value,
            Field::Producers => self.producers = value,
        }
        self.revision += 1;
    }

    /// Append a fresh empty track and return its id.
    pub fn add_track(&mut self) -> Uuid {
        let track = TrackEntry::empty();
        let id = track.id;
        self.tracks.push(track);
        self.revision += 1;
        id
    }

    /// Replace one field on the track with matching id.
    /// Silent no-op if the id is absent.
    pub fn update_track(&mut self, id: Uuid, field: TrackField, value: String) {
        if let Some(track) = self.tracks.iter_mut().find(|t| t.id == id) {
            match field {
                TrackField::Title => track.title = value,
                TrackField::Duration => track.duration = value,
                TrackField::Featuring => track.featuring = value,
            }
            self.revision += 1;
        }
    }

    /// Remove the track with matching id. No-op if absent.
    pub fn remove_track(&mut self, id: Uuid) {
        let before = self.tracks.len();
        self.tracks.retain(|t| t.id != id);
        if self.tracks.len() != before {
            self.revision += 1;
        }
    }

    /// Replace the theme wholesale.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.revision += 1;
    }

    /// The effective total time: the manual override when set, otherwise
    /// the sum of all track durations normalized to `minutes:seconds`.
    pub fn total_time(&self) -> String {
        if self.total_time.is_empty() {
            self.computed_total()
        } else {
            self.total_time.clone()
        }
    }

    fn computed_total(&self) -> String {
        let mut minutes: u64 = 0;
        let mut seconds: u64 = 0;
        for track in &self.tracks {
            let mut parts = track.duration.split(':');
            minutes += parse_component(parts.next().unwrap_or(""));
            seconds += parse_component(parts.next().unwrap_or(""));
        }
        minutes += seconds / 60;
        seconds %= 60;
        format!("{minutes}:{seconds:02}")
    }
}

/// Lenient duration-component parse: leading ASCII digits after optional
/// sign and whitespace. Missing, non-numeric, or negative input is 0.
fn parse_component(raw: &str) -> u64 {
    let s = raw.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    if s.starts_with('-') {
        return 0;
    }
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
