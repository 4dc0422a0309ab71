//! Track record assembly
//!
//! [`Converter`] orchestrates one run: it holds the direction plus the
//! run-level state (monotonic track index, accumulated playlist keys) and
//! composes the lookup tables, location translation, cue translation and
//! beatgrid reconstruction into one output record per source entry.

use tracing::{debug, info};

use crate::beatgrid;
use crate::color;
use crate::cue;
use crate::direction::Direction;
use crate::key;
use crate::location::LocationPath;
use crate::rekordbox::XmlEntry;
use crate::track::{RekordboxTrack, TraktorTrack};
use crate::traktor::NmlEntry;

/// Assumed BPM when the source carries none.
pub const DEFAULT_BPM: f64 = 120.0;
/// Assumed bitrate when the source carries none, in Traktor's bits/s.
pub const DEFAULT_BITRATE_BPS: f64 = 320_000.0;
/// The same default in Rekordbox's kbps.
pub const DEFAULT_BITRATE_KBPS: f64 = 320.0;

/// Per-run conversion state. Create one per input document; the direction is
/// fixed for the converter's lifetime and must match the document-level
/// method being called.
pub struct Converter {
    direction: Direction,
    track_index: u32,
    playlist_keys: Vec<String>,
}

impl Converter {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            track_index: 0,
            playlist_keys: Vec::new(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Target-vocabulary keys of every converted track, in output order,
    /// for rebuilding the "all tracks" playlist.
    pub fn playlist_keys(&self) -> &[String] {
        &self.playlist_keys
    }

    /// Convert a parsed NML document into Rekordbox tracks. Playlist entries
    /// are skipped and do not consume a track index.
    pub fn rekordbox_collection(&mut self, entries: &[NmlEntry]) -> Vec<RekordboxTrack> {
        let tracks: Vec<RekordboxTrack> = entries
            .iter()
            .filter_map(|entry| match entry {
                NmlEntry::Track(track) => Some(self.to_rekordbox(track)),
                NmlEntry::PlaylistRef => {
                    debug!("skipping playlist entry");
                    None
                }
            })
            .collect();
        info!(tracks = tracks.len(), "converted NML collection");
        tracks
    }

    /// Convert a parsed DJ_PLAYLISTS document into Traktor tracks. Playlist
    /// track references are skipped and do not consume a track index.
    pub fn traktor_collection(&mut self, entries: &[XmlEntry]) -> Vec<TraktorTrack> {
        let tracks: Vec<TraktorTrack> = entries
            .iter()
            .filter_map(|entry| match entry {
                XmlEntry::Track(track) => Some(self.to_traktor(track)),
                XmlEntry::PlaylistRef => {
                    debug!("skipping playlist track reference");
                    None
                }
            })
            .collect();
        info!(tracks = tracks.len(), "converted Rekordbox collection");
        tracks
    }

    /// Assemble one Rekordbox track from an NML entry.
    pub fn to_rekordbox(&mut self, entry: &TraktorTrack) -> RekordboxTrack {
        self.track_index += 1;
        let direction = self.direction;
        debug!(index = self.track_index, title = %entry.title, "converting track");

        let track = RekordboxTrack {
            track_id: format!("{:09}", self.track_index),
            name: entry.title.clone(),
            artist: entry.artist.clone(),
            album: entry.album.clone(),
            genre: entry.genre.clone(),
            total_time: entry.playtime.clone(),
            track_number: self.track_index.to_string(),
            average_bpm: entry.bpm,
            bit_rate: entry.bitrate / 1000.0,
            play_count: entry.playcount.clone(),
            rating: entry.ranking.clone(),
            tonality: key::map_tonality(direction, &entry.key_code),
            colour: color::map_track_color(direction, &entry.color),
            date_added: direction.format_date(&entry.import_date),
            date_modified: direction.format_date(&entry.modified_date),
            last_played: direction.format_date(&entry.last_played),
            comments: entry.comment.clone(),
            location: entry.location.to_uri(),
            tempos: beatgrid::tempos_from_cues(&entry.cues, entry.bpm),
            marks: cue::position_marks(&entry.cues),
        };
        self.playlist_keys.push(track.track_id.clone());
        track
    }

    /// Assemble one Traktor entry from a Rekordbox track. Grid cues come
    /// first, then the translated position marks, matching Traktor's layout.
    pub fn to_traktor(&mut self, track: &RekordboxTrack) -> TraktorTrack {
        self.track_index += 1;
        let direction = self.direction;
        debug!(index = self.track_index, title = %track.name, "converting track");

        let location = LocationPath::from_uri(&track.location);
        let markers = beatgrid::markers_from_tempos(&track.tempos, track.average_bpm);
        let mut cues = beatgrid::grid_cues(&markers);
        cues.extend(cue::traktor_cues(&track.marks));

        let modified_date = direction.format_date(&track.date_modified);
        let entry = TraktorTrack {
            title: track.name.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            key_code: key::map_tonality(direction, &track.tonality),
            bpm: track.average_bpm,
            color: color::map_track_color(direction, &track.colour),
            genre: track.genre.clone(),
            playtime: track.total_time.clone(),
            playcount: track.play_count.clone(),
            bitrate: track.bit_rate * 1000.0,
            import_date: direction.format_date(&track.date_added),
            modified_date: if modified_date.is_empty() {
                direction.today()
            } else {
                modified_date
            },
            last_played: direction.format_date(&track.last_played),
            ranking: track.rating.clone(),
            comment: track.comments.clone(),
            location,
            cues,
        };
        self.playlist_keys.push(entry.location.playlist_key());
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatgrid::Tempo;
    use crate::cue::{
        PositionMark, RekordboxCueKind, TraktorCue, TraktorCueKind, GRID_CUE_NAME,
        UNASSIGNED_HOTCUE,
    };
    use crate::traktor;

    fn sample_traktor_track() -> TraktorTrack {
        TraktorTrack {
            title: "Sunrise".into(),
            artist: "DJ Test".into(),
            album: "First Light".into(),
            key_code: "12".into(),
            bpm: 126.0,
            color: "1".into(),
            genre: "House".into(),
            playtime: "321".into(),
            playcount: "7".into(),
            bitrate: 320_000.0,
            import_date: "2023/05/01".into(),
            modified_date: "2023/06/10".into(),
            last_played: "2023/06/01".into(),
            ranking: "51".into(),
            comment: "peak time".into(),
            location: LocationPath {
                volume: "USB".into(),
                dirs: vec!["Music".into()],
                file: "Sunrise.mp3".into(),
            },
            cues: vec![
                TraktorCue {
                    name: GRID_CUE_NAME.into(),
                    kind: TraktorCueKind::Grid,
                    start_ms: 250.0,
                    len_ms: 0.0,
                    hotcue: UNASSIGNED_HOTCUE,
                    grid_bpm: Some(126.0),
                },
                TraktorCue {
                    name: GRID_CUE_NAME.into(),
                    kind: TraktorCueKind::Cue,
                    start_ms: 250.0,
                    len_ms: 0.0,
                    hotcue: 0,
                    grid_bpm: None,
                },
                TraktorCue {
                    name: "Intro".into(),
                    kind: TraktorCueKind::Cue,
                    start_ms: 1000.0,
                    len_ms: 0.0,
                    hotcue: 1,
                    grid_bpm: None,
                },
                TraktorCue {
                    name: "n.n.".into(),
                    kind: TraktorCueKind::Loop,
                    start_ms: 64_000.0,
                    len_ms: 15_000.0,
                    hotcue: UNASSIGNED_HOTCUE,
                    grid_bpm: None,
                },
            ],
        }
    }

    #[test]
    fn test_scalar_fields_map_into_rekordbox() {
        let mut converter = Converter::new(Direction::TraktorToRekordbox);
        let track = converter.to_rekordbox(&sample_traktor_track());

        assert_eq!(track.track_id, "000000001");
        assert_eq!(track.tonality, "Cm");
        assert_eq!(track.colour, "0xFF0000");
        assert_eq!(track.bit_rate, 320.0);
        assert_eq!(track.date_added, "2023-05-01");
        assert_eq!(track.location, "file://localhost/USB/Music/Sunrise.mp3");
        // one grid breakpoint came from the anchor cue
        assert_eq!(track.tempos.len(), 1);
        assert_eq!(track.tempos[0].inizio_secs, 0.25);
        // grid cues are not position marks
        assert_eq!(track.marks.len(), 2);
        assert_eq!(converter.playlist_keys(), &["000000001".to_string()]);
    }

    #[test]
    fn test_round_trip_preserves_lossless_fields() {
        let source = sample_traktor_track();
        let mut forward = Converter::new(Direction::TraktorToRekordbox);
        let rekordbox = forward.to_rekordbox(&source);

        let mut backward = Converter::new(Direction::RekordboxToTraktor);
        let back = backward.to_traktor(&rekordbox);

        assert_eq!(back.key_code, source.key_code);
        assert_eq!(back.color, source.color);
        assert_eq!(back.import_date, source.import_date);
        assert_eq!(back.location, source.location);

        // two grid cues (anchor + indicator) then the two real cues
        assert_eq!(back.cues.len(), 4);
        assert!(back.cues[0].is_grid_marker());
        assert_eq!(back.cues[1].hotcue, 0);
        // "Intro" was coloured yellow by name; yellow classifies back to a cue
        assert_eq!(back.cues[2].kind, TraktorCueKind::Cue);
        assert_eq!(back.cues[2].hotcue, 1);
        // the loop was coloured orange by type; orange classifies back to a loop
        assert_eq!(back.cues[3].kind, TraktorCueKind::Loop);
        assert_eq!(back.cues[3].len_ms, 15_000.0);
    }

    #[test]
    fn test_traktor_assembly_from_rekordbox() {
        let track = RekordboxTrack {
            name: "Moonfall".into(),
            tonality: "Abm".into(),
            average_bpm: 174.0,
            bit_rate: 320.0,
            total_time: "400".into(),
            date_added: "2024-01-02".into(),
            location: "file://localhost/USB/DnB/Moonfall.mp3".into(),
            tempos: vec![
                Tempo { inizio_secs: 0.1, bpm: 174.0, has_metro: true },
                Tempo { inizio_secs: 60.0, bpm: 175.0, has_metro: true },
                Tempo { inizio_secs: 120.0, bpm: 173.5, has_metro: true },
            ],
            marks: vec![PositionMark {
                name: "Drop".into(),
                kind: RekordboxCueKind::Cue,
                start_secs: 32.0,
                end_secs: None,
                num: UNASSIGNED_HOTCUE,
                color: None,
            }],
            ..Default::default()
        };

        let mut converter = Converter::new(Direction::RekordboxToTraktor);
        let entry = converter.to_traktor(&track);

        assert_eq!(entry.key_code, "20");
        assert_eq!(entry.bitrate, 320_000.0);
        assert_eq!(entry.import_date, "2024/01/02");
        // empty DateModified falls back to today, in Traktor format
        assert_eq!(entry.modified_date.len(), 10);
        assert!(entry.modified_date.contains('/'));
        // 3 grid markers + 1 indicator + 1 translated cue
        assert_eq!(entry.cues.len(), 5);
        assert_eq!(entry.cues.iter().filter(|c| c.is_grid_marker()).count(), 3);
        // unassigned hot cue renumbered from base 1
        assert_eq!(entry.cues[4].hotcue, 1);
        assert_eq!(
            converter.playlist_keys(),
            &["USB/:DnB/:Moonfall.mp3".to_string()]
        );
    }

    #[test]
    fn test_playlist_entries_do_not_consume_indices() {
        let nml = r#"<NML VERSION="20"><COLLECTION ENTRIES="2">
            <ENTRY TITLE="One"></ENTRY>
        </COLLECTION><PLAYLISTS><NODE TYPE="PLAYLIST" NAME="p"><PLAYLIST ENTRIES="1" TYPE="LIST" UUID="u">
            <ENTRY><PRIMARYKEY TYPE="TRACK" KEY="k"></PRIMARYKEY></ENTRY>
        </PLAYLIST></NODE></PLAYLISTS>
        <COLLECTION2><ENTRY TITLE="Two"></ENTRY></COLLECTION2></NML>"#;
        let entries = traktor::parse(nml).unwrap();
        assert_eq!(entries.len(), 3);

        let mut converter = Converter::new(Direction::TraktorToRekordbox);
        let tracks = converter.rekordbox_collection(&entries);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].track_id, "000000001");
        // the skipped playlist entry did not reserve an index
        assert_eq!(tracks[1].track_id, "000000002");
        assert_eq!(tracks[1].name, "Two");
    }

    #[test]
    fn test_converted_track_serializes_to_json() {
        let mut converter = Converter::new(Direction::TraktorToRekordbox);
        let track = converter.to_rekordbox(&sample_traktor_track());
        let value: serde_json::Value = serde_json::to_value(&track).unwrap();
        assert_eq!(value["tonality"], "Cm");
        assert_eq!(value["marks"].as_array().unwrap().len(), 2);
    }
}
