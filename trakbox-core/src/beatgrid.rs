//! Beatgrid reconstruction
//!
//! Rekordbox models the grid as one-or-many `TEMPO` breakpoints; Traktor as
//! special grid cues (`AutoGrid` anchor, `Beat Marker` secondaries) with an
//! embedded `GRID BPM`. A track never leaves here with zero tempo
//! information: missing grid data falls back to the track average BPM.

use serde::{Deserialize, Serialize};

use crate::cue::{
    TraktorCue, TraktorCueKind, BEAT_MARKER_NAME, GRID_CUE_NAME, UNASSIGNED_HOTCUE,
};

/// One Rekordbox `TEMPO` breakpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tempo {
    pub inizio_secs: f64,
    pub bpm: f64,
    /// Converted breakpoints carry `Metro="4/4"`; synthesized fallbacks don't.
    pub has_metro: bool,
}

/// One grid breakpoint on the Traktor side, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GridMarker {
    pub start_ms: f64,
    pub bpm: f64,
    /// The authoritative zero-reference of the grid. Exactly one per track.
    pub anchor: bool,
}

/// TEMPO breakpoints → grid markers.
///
/// Zero breakpoints synthesize an anchor at offset 0 with the average BPM;
/// one breakpoint is a static grid; with two or more the first is the anchor
/// and the rest are flexible-grid secondaries.
pub fn markers_from_tempos(tempos: &[Tempo], average_bpm: f64) -> Vec<GridMarker> {
    if tempos.is_empty() {
        return vec![GridMarker {
            start_ms: 0.0,
            bpm: average_bpm,
            anchor: true,
        }];
    }
    tempos
        .iter()
        .enumerate()
        .map(|(i, tempo)| GridMarker {
            start_ms: tempo.inizio_secs * 1000.0,
            bpm: tempo.bpm,
            anchor: i == 0,
        })
        .collect()
}

/// Grid markers → NML grid cues. Every marker becomes a type-4 cue with a
/// nested grid BPM; the anchor additionally produces the AutoGrid indicator
/// cue on hot-cue slot 0.
pub fn grid_cues(markers: &[GridMarker]) -> Vec<TraktorCue> {
    let mut cues = Vec::new();
    for marker in markers {
        cues.push(TraktorCue {
            name: if marker.anchor {
                GRID_CUE_NAME.to_string()
            } else {
                BEAT_MARKER_NAME.to_string()
            },
            kind: TraktorCueKind::Grid,
            start_ms: marker.start_ms,
            len_ms: 0.0,
            hotcue: UNASSIGNED_HOTCUE,
            grid_bpm: Some(marker.bpm),
        });
        if marker.anchor {
            cues.push(TraktorCue {
                name: GRID_CUE_NAME.to_string(),
                kind: TraktorCueKind::Cue,
                start_ms: marker.start_ms,
                len_ms: 0.0,
                hotcue: 0,
                grid_bpm: None,
            });
        }
    }
    cues
}

/// NML cues → TEMPO breakpoints.
///
/// Each grid marker cue contributes one breakpoint. Without any, a single
/// breakpoint is synthesized from the average BPM, anchored at the AutoGrid
/// indicator's offset when one exists and at zero otherwise.
pub fn tempos_from_cues(cues: &[TraktorCue], average_bpm: f64) -> Vec<Tempo> {
    let tempos: Vec<Tempo> = cues
        .iter()
        .filter(|cue| cue.is_grid_marker())
        .map(|cue| Tempo {
            inizio_secs: cue.start_ms / 1000.0,
            bpm: cue.grid_bpm.unwrap_or(average_bpm),
            has_metro: true,
        })
        .collect();
    if !tempos.is_empty() {
        return tempos;
    }

    let anchor_secs = cues
        .iter()
        .find(|cue| cue.name == GRID_CUE_NAME)
        .map(|cue| cue.start_ms / 1000.0)
        .unwrap_or(0.0);
    vec![Tempo {
        inizio_secs: anchor_secs,
        bpm: average_bpm,
        has_metro: false,
    }]
}
