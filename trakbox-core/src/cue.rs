//! Cue and loop translation between NML `CUE_V2` and Rekordbox
//! `POSITION_MARK` elements
//!
//! The type vocabularies are asymmetric: Traktor exposes six codes, Rekordbox
//! two. Mapping toward Rekordbox collapses everything but loops to the
//! generic cue code; the richer Traktor types are re-derived from the cue
//! colour on the way back.

use serde::{Deserialize, Serialize};

use crate::color::{self, Rgb};

/// Placeholder Traktor uses for unnamed cues.
pub const EMPTY_CUE_NAME: &str = "n.n.";
/// Name of the grid anchor cue and its companion indicator.
pub const GRID_CUE_NAME: &str = "AutoGrid";
/// Name of secondary flexible-grid markers.
pub const BEAT_MARKER_NAME: &str = "Beat Marker";
/// Hot-cue slot value meaning "no pad assigned".
pub const UNASSIGNED_HOTCUE: i32 = -1;

/// Traktor `CUE_V2 TYPE` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraktorCueKind {
    Cue,
    FadeIn,
    FadeOut,
    Load,
    Grid,
    Loop,
}

impl TraktorCueKind {
    /// Unknown codes default to the generic cue.
    pub fn from_code(code: &str) -> Self {
        match code {
            "1" => TraktorCueKind::FadeIn,
            "2" => TraktorCueKind::FadeOut,
            "3" => TraktorCueKind::Load,
            "4" => TraktorCueKind::Grid,
            "5" => TraktorCueKind::Loop,
            _ => TraktorCueKind::Cue,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            TraktorCueKind::Cue => "0",
            TraktorCueKind::FadeIn => "1",
            TraktorCueKind::FadeOut => "2",
            TraktorCueKind::Load => "3",
            TraktorCueKind::Grid => "4",
            TraktorCueKind::Loop => "5",
        }
    }

    /// Lossy by design: fade-in, fade-out, load and grid all become the
    /// generic Rekordbox cue.
    pub fn to_rekordbox(self) -> RekordboxCueKind {
        match self {
            TraktorCueKind::Loop => RekordboxCueKind::Loop,
            _ => RekordboxCueKind::Cue,
        }
    }
}

/// Rekordbox `POSITION_MARK Type` codes. Only two survive outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RekordboxCueKind {
    Cue,
    Loop,
}

impl RekordboxCueKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "4" => RekordboxCueKind::Loop,
            _ => RekordboxCueKind::Cue,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            RekordboxCueKind::Cue => "0",
            RekordboxCueKind::Loop => "4",
        }
    }

    pub fn to_traktor(self) -> TraktorCueKind {
        match self {
            RekordboxCueKind::Loop => TraktorCueKind::Loop,
            RekordboxCueKind::Cue => TraktorCueKind::Cue,
        }
    }
}

/// One `CUE_V2` element. Offsets in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraktorCue {
    pub name: String,
    pub kind: TraktorCueKind,
    pub start_ms: f64,
    pub len_ms: f64,
    pub hotcue: i32,
    /// BPM of the nested `GRID` element, present only on grid markers.
    pub grid_bpm: Option<f64>,
}

impl TraktorCue {
    /// AutoGrid / Beat Marker cues carrying a grid BPM belong to the
    /// beatgrid, not to the cue list.
    pub fn is_grid_marker(&self) -> bool {
        (self.name == GRID_CUE_NAME || self.name == BEAT_MARKER_NAME)
            && self.grid_bpm.is_some()
    }
}

/// One `POSITION_MARK` element. Offsets in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionMark {
    pub name: String,
    pub kind: RekordboxCueKind,
    pub start_secs: f64,
    /// Present only for loops (non-zero length).
    pub end_secs: Option<f64>,
    pub num: i32,
    pub color: Option<Rgb>,
}

/// Translate NML cues to POSITION_MARKs, in source order.
///
/// Grid markers and the AutoGrid indicator are skipped here; they are
/// expressed through TEMPO breakpoints instead. Fallback numbering starts
/// at 0 and advances once per emitted mark.
pub fn position_marks(cues: &[TraktorCue]) -> Vec<PositionMark> {
    let mut marks = Vec::new();
    let mut next_index = 0;
    for cue in cues {
        if cue.is_grid_marker() || cue.name == GRID_CUE_NAME {
            continue;
        }
        let num = if cue.hotcue != UNASSIGNED_HOTCUE {
            cue.hotcue
        } else {
            next_index
        };
        next_index += 1;

        // Generic cues with a real name are coloured by the name, everything
        // else by the type code.
        let label = if cue.kind == TraktorCueKind::Cue && cue.name != EMPTY_CUE_NAME {
            cue.name.as_str()
        } else {
            cue.kind.code()
        };

        marks.push(PositionMark {
            name: cue.name.clone(),
            kind: cue.kind.to_rekordbox(),
            start_secs: cue.start_ms / 1000.0,
            end_secs: (cue.len_ms != 0.0).then(|| (cue.start_ms + cue.len_ms) / 1000.0),
            num,
            color: color::cue_rgb_for_label(label),
        });
    }
    marks
}

/// Translate POSITION_MARKs to NML cues, in source order.
///
/// AutoGrid marks are skipped (the grid is rebuilt from TEMPO breakpoints).
/// Fallback numbering starts at 1 because Traktor slot 0 is reserved for the
/// grid indicator. A coloured mark gets its Traktor type from the RGB
/// classification; an uncoloured one from the type-code table.
pub fn traktor_cues(marks: &[PositionMark]) -> Vec<TraktorCue> {
    let mut cues = Vec::new();
    let mut next_index = 1;
    for mark in marks {
        if mark.name == GRID_CUE_NAME {
            continue;
        }
        let hotcue = if mark.num != UNASSIGNED_HOTCUE {
            mark.num
        } else {
            next_index
        };
        next_index += 1;

        let kind = match mark.color {
            Some(rgb) => color::classify_cue_rgb(rgb),
            None => mark.kind.to_traktor(),
        };
        let start_ms = mark.start_secs * 1000.0;
        let len_ms = mark
            .end_secs
            .map(|end| end * 1000.0 - start_ms)
            .unwrap_or(0.0);

        cues.push(TraktorCue {
            name: if mark.name.is_empty() {
                EMPTY_CUE_NAME.to_string()
            } else {
                mark.name.clone()
            },
            kind,
            start_ms,
            len_ms,
            hotcue,
            grid_bpm: None,
        });
    }
    cues
}
