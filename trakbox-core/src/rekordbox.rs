//! Rekordbox DJ_PLAYLISTS document shell
//!
//! Counterpart of [`crate::traktor`]: roxmltree parsing of `TRACK` elements
//! into [`RekordboxTrack`] records, quick-xml serialization of a converted
//! collection as a DJ_PLAYLISTS 1.0.0 document.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use roxmltree::{Document, Node};

use crate::beatgrid::Tempo;
use crate::color::Rgb;
use crate::convert::{DEFAULT_BITRATE_KBPS, DEFAULT_BPM};
use crate::cue::{PositionMark, RekordboxCueKind};
use crate::error::{Error, Result};
use crate::track::RekordboxTrack;

/// One `TRACK` element of the source document.
#[derive(Debug, Clone)]
pub enum XmlEntry {
    Track(RekordboxTrack),
    /// A `TRACK Key="..."` reference inside the PLAYLISTS tree; skipped
    /// during conversion and not counted.
    PlaylistRef,
}

fn attr(node: Node, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

/// Parse every `TRACK` in a DJ_PLAYLISTS document, in document order.
pub fn parse(xml: &str) -> Result<Vec<XmlEntry>> {
    let doc = Document::parse(xml)?;
    let mut entries = Vec::new();
    for node in doc.descendants().filter(|n| n.has_tag_name("TRACK")) {
        if node.attribute("Key").is_some() && node.attribute("Location").is_none() {
            entries.push(XmlEntry::PlaylistRef);
        } else {
            entries.push(XmlEntry::Track(parse_track(node)));
        }
    }
    Ok(entries)
}

fn parse_track(node: Node) -> RekordboxTrack {
    let average_bpm = attr(node, "AverageBpm").parse().unwrap_or(DEFAULT_BPM);
    RekordboxTrack {
        track_id: attr(node, "TrackID"),
        name: attr(node, "Name"),
        artist: attr(node, "Artist"),
        album: attr(node, "Album"),
        genre: attr(node, "Genre"),
        total_time: attr(node, "TotalTime"),
        track_number: attr(node, "TrackNumber"),
        average_bpm,
        bit_rate: attr(node, "BitRate").parse().unwrap_or(DEFAULT_BITRATE_KBPS),
        play_count: attr(node, "PlayCount"),
        rating: attr(node, "Rating"),
        tonality: attr(node, "Tonality"),
        colour: attr(node, "Colour"),
        date_added: attr(node, "DateAdded"),
        date_modified: attr(node, "DateModified"),
        last_played: attr(node, "LastPlayed"),
        comments: attr(node, "Comments"),
        location: attr(node, "Location"),
        tempos: node
            .children()
            .filter(|c| c.has_tag_name("TEMPO"))
            .map(|c| parse_tempo(c, average_bpm))
            .collect(),
        marks: node
            .children()
            .filter(|c| c.has_tag_name("POSITION_MARK"))
            .map(parse_mark)
            .collect(),
    }
}

fn parse_tempo(node: Node, average_bpm: f64) -> Tempo {
    Tempo {
        inizio_secs: attr(node, "Inizio").parse().unwrap_or(0.0),
        bpm: attr(node, "Bpm").parse().unwrap_or(average_bpm),
        has_metro: node.attribute("Metro").is_some(),
    }
}

fn parse_mark(node: Node) -> PositionMark {
    let channel = |name: &str| node.attribute(name).and_then(|v| v.parse::<u8>().ok());
    let color = match (channel("Red"), channel("Green"), channel("Blue")) {
        (Some(r), Some(g), Some(b)) => Some(Rgb::new(r, g, b)),
        _ => None,
    };
    PositionMark {
        name: attr(node, "Name"),
        kind: RekordboxCueKind::from_code(&attr(node, "Type")),
        start_secs: attr(node, "Start").parse().unwrap_or(0.0),
        end_secs: node.attribute("End").and_then(|v| v.parse().ok()),
        num: attr(node, "Num").parse().unwrap_or(-1),
        color,
    }
}

type XmlWriter = Writer<Vec<u8>>;

fn start(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(name);
    elem.extend_attributes(attrs.iter().copied());
    w.write_event(Event::Start(elem))?;
    Ok(())
}

fn empty(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(name);
    elem.extend_attributes(attrs.iter().copied());
    w.write_event(Event::Empty(elem))?;
    Ok(())
}

fn end(w: &mut XmlWriter, name: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Serialize a converted collection as a DJ_PLAYLISTS 1.0.0 document.
/// `playlist_keys` holds the TrackIDs for the "contains all tracks" playlist.
pub fn write(
    tracks: &[RekordboxTrack],
    playlist_keys: &[String],
    playlist_name: &str,
) -> Result<String> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    start(&mut w, "DJ_PLAYLISTS", &[("Version", "1.0.0")])?;
    empty(
        &mut w,
        "PRODUCT",
        &[
            ("Name", "rekordbox"),
            ("Version", "6.6.11"),
            ("Company", "AlphaTheta"),
        ],
    )?;

    let count = tracks.len().to_string();
    start(&mut w, "COLLECTION", &[("Entries", &count)])?;
    for track in tracks {
        write_track(&mut w, track)?;
    }
    end(&mut w, "COLLECTION")?;

    write_playlists(&mut w, playlist_keys, playlist_name)?;
    end(&mut w, "DJ_PLAYLISTS")?;

    String::from_utf8(w.into_inner()).map_err(|e| Error::Write(e.to_string()))
}

fn write_track(w: &mut XmlWriter, track: &RekordboxTrack) -> Result<()> {
    let average_bpm = format!("{:.2}", track.average_bpm);
    let bit_rate = format!("{}", track.bit_rate as i64);

    let mut elem = BytesStart::new("TRACK");
    elem.extend_attributes([
        ("TrackID", track.track_id.as_str()),
        ("Name", track.name.as_str()),
        ("Artist", track.artist.as_str()),
        ("Album", track.album.as_str()),
        ("Genre", track.genre.as_str()),
        ("Kind", "3"),
        ("Size", "0"),
        ("TotalTime", track.total_time.as_str()),
        ("DiscNumber", "0"),
        ("TrackNumber", track.track_number.as_str()),
        ("Year", "0"),
        ("AverageBpm", average_bpm.as_str()),
        ("BitRate", bit_rate.as_str()),
        ("DateModified", track.date_modified.as_str()),
        ("DateAdded", track.date_added.as_str()),
        ("SampleRate", "0"),
        ("PlayCount", track.play_count.as_str()),
        ("LastPlayed", track.last_played.as_str()),
        ("Rating", track.rating.as_str()),
        ("Tonality", track.tonality.as_str()),
        ("Comments", track.comments.as_str()),
        ("Location", track.location.as_str()),
    ]);
    if !track.colour.is_empty() {
        elem.push_attribute(("Colour", track.colour.as_str()));
    }

    if track.tempos.is_empty() && track.marks.is_empty() {
        w.write_event(Event::Empty(elem))?;
        return Ok(());
    }
    w.write_event(Event::Start(elem))?;

    for tempo in &track.tempos {
        let inizio = format!("{:.3}", tempo.inizio_secs);
        let bpm = format!("{:.2}", tempo.bpm);
        let mut elem = BytesStart::new("TEMPO");
        elem.push_attribute(("Inizio", inizio.as_str()));
        elem.push_attribute(("Bpm", bpm.as_str()));
        if tempo.has_metro {
            elem.push_attribute(("Metro", "4/4"));
        }
        elem.push_attribute(("Battito", "1"));
        w.write_event(Event::Empty(elem))?;
    }

    for mark in &track.marks {
        write_mark(w, mark)?;
    }

    end(w, "TRACK")
}

fn write_mark(w: &mut XmlWriter, mark: &PositionMark) -> Result<()> {
    let start_secs = format!("{:.3}", mark.start_secs);
    let num = mark.num.to_string();

    let mut elem = BytesStart::new("POSITION_MARK");
    elem.extend_attributes([
        ("Name", mark.name.as_str()),
        ("Type", mark.kind.code()),
        ("Start", start_secs.as_str()),
        ("Num", num.as_str()),
    ]);
    if let Some(end_secs) = mark.end_secs {
        let end_secs = format!("{end_secs:.3}");
        elem.push_attribute(("End", end_secs.as_str()));
    }
    if let Some(rgb) = mark.color {
        elem.push_attribute(("Red", rgb.r.to_string().as_str()));
        elem.push_attribute(("Green", rgb.g.to_string().as_str()));
        elem.push_attribute(("Blue", rgb.b.to_string().as_str()));
    }
    w.write_event(Event::Empty(elem))?;
    Ok(())
}

fn write_playlists(w: &mut XmlWriter, keys: &[String], name: &str) -> Result<()> {
    start(w, "PLAYLISTS", &[])?;
    start(
        w,
        "NODE",
        &[("Type", "0"), ("Name", "ROOT"), ("Count", "1")],
    )?;

    let entries = keys.len().to_string();
    start(
        w,
        "NODE",
        &[
            ("Name", name),
            ("Type", "1"),
            ("KeyType", "0"),
            ("Entries", &entries),
        ],
    )?;
    for key in keys {
        empty(w, "TRACK", &[("Key", key)])?;
    }
    end(w, "NODE")?;

    end(w, "NODE")?;
    end(w, "PLAYLISTS")
}
