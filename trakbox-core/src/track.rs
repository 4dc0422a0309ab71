//! Per-schema track records
//!
//! Each schema gets a fixed-shape struct with its own vocabulary: key codes,
//! colour ordinals and millisecond offsets on the Traktor side; key names,
//! colour hex and second offsets on the Rekordbox side. One record is built
//! fresh per source track and consumed when the target entry is written.

use serde::{Deserialize, Serialize};

use crate::beatgrid::Tempo;
use crate::cue::{PositionMark, TraktorCue};
use crate::location::LocationPath;

/// One track in NML vocabulary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraktorTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// `MUSICAL_KEY VALUE`, "0".."23".
    pub key_code: String,
    pub bpm: f64,
    /// `INFO COLOR` ordinal "1".."7", empty when uncoloured.
    pub color: String,
    pub genre: String,
    /// Duration in whole seconds, as Traktor stores it.
    pub playtime: String,
    pub playcount: String,
    /// Bits per second.
    pub bitrate: f64,
    pub import_date: String,
    pub modified_date: String,
    pub last_played: String,
    pub ranking: String,
    pub comment: String,
    pub location: LocationPath,
    /// Source order, grid cues included.
    pub cues: Vec<TraktorCue>,
}

/// One track in DJ_PLAYLISTS vocabulary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RekordboxTrack {
    pub track_id: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub total_time: String,
    pub track_number: String,
    pub average_bpm: f64,
    /// Kilobits per second.
    pub bit_rate: f64,
    pub play_count: String,
    pub rating: String,
    /// Key name ("C".."Bm").
    pub tonality: String,
    /// Track palette hex ("0xFF0000"), empty when uncoloured.
    pub colour: String,
    pub date_added: String,
    pub date_modified: String,
    pub last_played: String,
    pub comments: String,
    /// Percent-encoded `file://localhost` URI.
    pub location: String,
    pub tempos: Vec<Tempo>,
    /// Source order.
    pub marks: Vec<PositionMark>,
}
