//! Color lookup tables
//!
//! Three disjoint vocabularies kept consistent here:
//! - the 7-entry track palette (Rekordbox `Colour` hex ↔ Traktor `INFO COLOR`
//!   ordinal),
//! - the 16-entry cue palette (semantic name ↔ RGB triple), used only for cue
//!   coloring,
//! - the cue label table mapping names like "intro" or a Traktor type code to
//!   a cue palette name.
//!
//! Reverse lookups are linear scans of the forward tables; all tables are
//! small enough that no reverse index is needed.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cue::TraktorCueKind;
use crate::direction::Direction;

/// One RGB triple as both schemas carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean distance in RGB space.
    pub fn distance_sq(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

/// Rekordbox track colour hex ↔ Traktor colour ordinal.
const TRACK_PALETTE: [(&str, &str); 7] = [
    ("0xFF0000", "1"), // red
    ("0xFFA500", "2"), // orange
    ("0xFFFF00", "3"), // yellow
    ("0x00FF00", "4"), // green
    ("0x0000FF", "5"), // blue
    ("0xFF007F", "6"), // rose
    ("0x660099", "7"), // violet
];

pub fn ordinal_for_hex(hex: &str) -> Option<&'static str> {
    TRACK_PALETTE
        .iter()
        .find(|(h, _)| *h == hex)
        .map(|(_, num)| *num)
}

pub fn hex_for_ordinal(ordinal: &str) -> Option<&'static str> {
    TRACK_PALETTE
        .iter()
        .find(|(_, num)| *num == ordinal)
        .map(|(h, _)| *h)
}

/// Map a track colour into the target schema's vocabulary; unknown or empty
/// values yield an empty string (no colour emitted).
pub fn map_track_color(direction: Direction, value: &str) -> String {
    let mapped = match direction {
        Direction::TraktorToRekordbox => hex_for_ordinal(value),
        Direction::RekordboxToTraktor => ordinal_for_hex(value),
    };
    match mapped {
        Some(v) => v.to_string(),
        None => {
            if !value.is_empty() {
                warn!(color = value, "unknown track color, dropping");
            }
            String::new()
        }
    }
}

/// The 16-color cue palette. Intentionally disjoint from the track palette.
const CUE_PALETTE: [(&str, Rgb); 16] = [
    ("pink", Rgb::new(222, 68, 207)),
    ("orchidea", Rgb::new(180, 50, 255)),
    ("violet", Rgb::new(170, 114, 255)),
    ("mauve", Rgb::new(100, 115, 255)),
    ("blue", Rgb::new(48, 90, 255)),
    ("sky", Rgb::new(80, 180, 255)),
    ("cyan", Rgb::new(0, 224, 255)),
    ("turquoise", Rgb::new(31, 163, 146)),
    ("celadon", Rgb::new(16, 177, 118)),
    ("green", Rgb::new(40, 226, 20)),
    ("lime", Rgb::new(165, 225, 22)),
    ("kaki", Rgb::new(180, 190, 4)),
    ("yellow", Rgb::new(195, 175, 4)),
    ("orange", Rgb::new(224, 100, 27)),
    ("red", Rgb::new(230, 40, 40)),
    ("magenta", Rgb::new(255, 18, 123)),
];

pub fn palette_rgb(name: &str) -> Option<Rgb> {
    CUE_PALETTE
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, rgb)| *rgb)
}

/// Cue label (normalized) or Traktor type code → cue palette name.
///
/// "chorus" and "cue1" map to "rose", which is not in the cue palette; such
/// labels deliberately resolve to no colour at all.
const CUE_LABEL_COLORS: [(&str, &str); 22] = [
    ("0", "blue"),   // hotcue
    ("1", "red"),    // fade in
    ("2", "green"),  // fade out
    ("3", "cyan"),   // load
    ("4", "lime"),   // grid
    ("5", "orange"), // loop
    ("start", "yellow"),
    ("intro", "yellow"),
    ("break", "turquoise"),
    ("bridge", "turquoise"),
    ("chorus", "rose"),
    ("verse", "mauve"),
    ("up", "celadon"),
    ("buildup", "celadon"),
    ("drop", "pink"),
    ("down", "sky"),
    ("outro", "violet"),
    ("cue1", "rose"),
    ("cue2", "magenta"),
    ("cue3", "mauve"),
    ("cue4", "sky"),
    ("autogrid", "kaki"),
];

fn palette_name_for_label(label: &str) -> &'static str {
    let normalized: String = label
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect();
    CUE_LABEL_COLORS
        .iter()
        .find(|(key, _)| *key == normalized)
        .map(|(_, name)| *name)
        .unwrap_or("blue")
}

/// Resolve a cue label or Traktor type code to palette RGB values.
/// `None` means no colour attributes are emitted for this cue.
pub fn cue_rgb_for_label(label: &str) -> Option<Rgb> {
    palette_rgb(palette_name_for_label(label))
}

/// Cue palette RGB → Traktor cue type, used when converting coloured
/// POSITION_MARKs back into CUE_V2 elements.
const RGB_CUE_TYPES: [(Rgb, TraktorCueKind); 16] = [
    (Rgb::new(222, 68, 207), TraktorCueKind::Cue),     // pink
    (Rgb::new(180, 50, 255), TraktorCueKind::Cue),     // orchidea
    (Rgb::new(170, 114, 255), TraktorCueKind::Cue),    // violet
    (Rgb::new(100, 115, 255), TraktorCueKind::Cue),    // mauve
    (Rgb::new(48, 90, 255), TraktorCueKind::Cue),      // blue
    (Rgb::new(80, 180, 255), TraktorCueKind::Cue),     // sky
    (Rgb::new(0, 224, 255), TraktorCueKind::Load),     // cyan
    (Rgb::new(31, 163, 146), TraktorCueKind::Load),    // turquoise
    (Rgb::new(16, 177, 118), TraktorCueKind::Grid),    // celadon
    (Rgb::new(40, 226, 20), TraktorCueKind::Loop),     // green
    (Rgb::new(165, 225, 22), TraktorCueKind::Grid),    // lime
    (Rgb::new(180, 190, 4), TraktorCueKind::Grid),     // kaki
    (Rgb::new(195, 175, 4), TraktorCueKind::Cue),      // yellow
    (Rgb::new(224, 100, 27), TraktorCueKind::Loop),    // orange
    (Rgb::new(230, 40, 40), TraktorCueKind::FadeIn),   // red
    (Rgb::new(255, 18, 123), TraktorCueKind::FadeOut), // magenta
];

/// Classify an incoming RGB triple as a Traktor cue type: exact palette match
/// first, otherwise the nearest entry by squared Euclidean distance. Ties go
/// to the first entry in table order.
pub fn classify_cue_rgb(rgb: Rgb) -> TraktorCueKind {
    if let Some((_, kind)) = RGB_CUE_TYPES.iter().find(|(c, _)| *c == rgb) {
        return *kind;
    }
    RGB_CUE_TYPES
        .iter()
        .min_by_key(|(c, _)| c.distance_sq(rgb))
        .map(|(_, kind)| *kind)
        .unwrap_or(TraktorCueKind::Cue)
}
