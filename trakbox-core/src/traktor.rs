//! Traktor NML document shell
//!
//! Thin reading/writing layer around the translation engine: roxmltree for
//! parsing `ENTRY` elements into [`TraktorTrack`] records, quick-xml for
//! serializing a converted collection back into an NML 20 document.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use roxmltree::{Document, Node};

use crate::convert::{DEFAULT_BITRATE_BPS, DEFAULT_BPM};
use crate::cue::{TraktorCue, TraktorCueKind, GRID_CUE_NAME};
use crate::error::{Error, Result};
use crate::key;
use crate::location::LocationPath;
use crate::track::TraktorTrack;

/// Static stand-in for Traktor's audio fingerprint; authentic AUDIO_ID blobs
/// cannot be produced without the analyzer, and Traktor re-analyzes imported
/// tracks anyway.
const AUDIO_ID_PLACEHOLDER: &str = "AWAWZmRENDMzMzf//////////////////////f/////////////////////s/////////////////////5b///7//////////+//////af/////////////////////+///////////f/////////1n/////////9Y///////////f/////////+r/7///////9XYzMzM0MyMzJUMzNDNDMzRDn//////////////////////f/////////////////////e/////////////////////3r+/+////////7u7u/v////vf//7////////v/+//////+FZneYYQAAAA==";

/// One `ENTRY` element of the source document.
#[derive(Debug, Clone)]
pub enum NmlEntry {
    Track(TraktorTrack),
    /// An entry under PLAYLISTS referencing a track by key; skipped during
    /// conversion and not counted.
    PlaylistRef,
}

fn attr(node: Node, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

fn child<'a>(node: Node<'a, 'a>, name: &str) -> Option<Node<'a, 'a>> {
    node.children().find(|c| c.has_tag_name(name))
}

fn child_attr(node: Node, child_name: &str, attr_name: &str) -> String {
    child(node, child_name)
        .and_then(|c| c.attribute(attr_name))
        .unwrap_or_default()
        .to_string()
}

/// Parse every `ENTRY` in an NML document, in document order.
pub fn parse(xml: &str) -> Result<Vec<NmlEntry>> {
    let doc = Document::parse(xml)?;
    let mut entries = Vec::new();
    for node in doc.descendants().filter(|n| n.has_tag_name("ENTRY")) {
        if child(node, "PRIMARYKEY").is_some() {
            entries.push(NmlEntry::PlaylistRef);
        } else {
            entries.push(NmlEntry::Track(parse_entry(node)));
        }
    }
    Ok(entries)
}

fn parse_entry(node: Node) -> TraktorTrack {
    let info = child(node, "INFO");
    let info_attr = |name: &str| {
        info.and_then(|i| i.attribute(name))
            .unwrap_or_default()
            .to_string()
    };

    TraktorTrack {
        title: attr(node, "TITLE"),
        artist: attr(node, "ARTIST"),
        modified_date: attr(node, "MODIFIED_DATE"),
        album: child_attr(node, "ALBUM", "TITLE"),
        key_code: child_attr(node, "MUSICAL_KEY", "VALUE"),
        bpm: child_attr(node, "TEMPO", "BPM").parse().unwrap_or(DEFAULT_BPM),
        color: info_attr("COLOR"),
        genre: info_attr("GENRE"),
        playtime: info_attr("PLAYTIME"),
        playcount: info_attr("PLAYCOUNT"),
        bitrate: info_attr("BITRATE").parse().unwrap_or(DEFAULT_BITRATE_BPS),
        import_date: info_attr("IMPORT_DATE"),
        last_played: info_attr("LAST_PLAYED"),
        ranking: info_attr("RANKING"),
        comment: info_attr("COMMENT"),
        location: child(node, "LOCATION")
            .map(|l| {
                LocationPath::from_nml(
                    l.attribute("DIR").unwrap_or_default(),
                    l.attribute("FILE").unwrap_or_default(),
                    l.attribute("VOLUME").unwrap_or_default(),
                )
            })
            .unwrap_or_default(),
        cues: node
            .children()
            .filter(|c| c.has_tag_name("CUE_V2"))
            .map(parse_cue)
            .collect(),
    }
}

fn parse_cue(node: Node) -> TraktorCue {
    TraktorCue {
        name: attr(node, "NAME"),
        kind: TraktorCueKind::from_code(&attr(node, "TYPE")),
        start_ms: attr(node, "START").parse().unwrap_or(0.0),
        len_ms: attr(node, "LEN").parse().unwrap_or(0.0),
        hotcue: attr(node, "HOTCUE").parse().unwrap_or(-1),
        grid_bpm: child(node, "GRID")
            .and_then(|g| g.attribute("BPM"))
            .and_then(|bpm| bpm.parse().ok()),
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

/// Serialize a converted collection as an NML 20 document. `playlist_keys`
/// rebuilds one playlist containing every converted track, in order.
pub fn write(
    tracks: &[TraktorTrack],
    playlist_keys: &[String],
    playlist_name: &str,
) -> Result<String> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    start(&mut w, "NML", &[("VERSION", "20")])?;
    empty(
        &mut w,
        "HEAD",
        &[
            ("COMPANY", "www.native-instruments.com"),
            ("PROGRAM", "Traktor Pro 4"),
        ],
    )?;

    let count = tracks.len().to_string();
    start(&mut w, "COLLECTION", &[("ENTRIES", &count)])?;
    for track in tracks {
        write_entry(&mut w, track)?;
    }
    end(&mut w, "COLLECTION")?;

    empty(&mut w, "SETS", &[("ENTRIES", "0")])?;
    write_playlists(&mut w, playlist_keys, playlist_name)?;
    empty(&mut w, "INDEXING", &[])?;
    end(&mut w, "NML")?;

    String::from_utf8(w.into_inner()).map_err(|e| Error::Write(e.to_string()))
}

fn write_entry(w: &mut XmlWriter, track: &TraktorTrack) -> Result<()> {
    start(
        w,
        "ENTRY",
        &[
            ("MODIFIED_DATE", &track.modified_date),
            ("MODIFIED_TIME", "0"),
            ("AUDIO_ID", AUDIO_ID_PLACEHOLDER),
            ("TITLE", &track.title),
            ("ARTIST", &track.artist),
        ],
    )?;

    let dir = track.location.nml_dir();
    empty(
        w,
        "LOCATION",
        &[
            ("DIR", &dir),
            ("FILE", &track.location.file),
            ("VOLUME", &track.location.volume),
            ("VOLUMEID", &track.location.volume),
        ],
    )?;

    if !track.album.is_empty() {
        empty(w, "ALBUM", &[("TITLE", &track.album)])?;
    }
    empty(w, "MODIFICATION_INFO", &[("AUTHOR_TYPE", "user")])?;

    let bitrate = format!("{}", track.bitrate as i64);
    let open_key = key::open_key_for_code(&track.key_code).unwrap_or_default();
    let playtime_float = format!(
        "{:.6}",
        track.playtime.parse::<f64>().unwrap_or(0.0)
    );
    let mut info = BytesStart::new("INFO");
    info.extend_attributes([
        ("BITRATE", bitrate.as_str()),
        ("GENRE", track.genre.as_str()),
        ("KEY", open_key),
        ("PLAYCOUNT", track.playcount.as_str()),
        ("PLAYTIME", track.playtime.as_str()),
        ("PLAYTIME_FLOAT", playtime_float.as_str()),
        ("RANKING", track.ranking.as_str()),
        ("IMPORT_DATE", track.import_date.as_str()),
        ("LAST_PLAYED", track.last_played.as_str()),
        ("FLAGS", "12"),
    ]);
    if !track.color.is_empty() {
        info.push_attribute(("COLOR", track.color.as_str()));
    }
    if !track.comment.is_empty() {
        info.push_attribute(("COMMENT", track.comment.as_str()));
    }
    w.write_event(Event::Empty(info))?;

    let bpm = format!("{:.6}", track.bpm);
    empty(
        w,
        "TEMPO",
        &[("BPM", &bpm), ("BPM_QUALITY", "100.000000")],
    )?;
    empty(
        w,
        "LOUDNESS",
        &[
            ("PEAK_DB", "-1.0"),
            ("PERCEIVED_DB", "-1.0"),
            ("ANALYZED_DB", "-1.0"),
        ],
    )?;
    empty(w, "MUSICAL_KEY", &[("VALUE", &track.key_code)])?;

    for cue in &track.cues {
        write_cue(w, cue)?;
    }

    end(w, "ENTRY")
}

fn write_cue(w: &mut XmlWriter, cue: &TraktorCue) -> Result<()> {
    let start_ms = format!("{:.6}", cue.start_ms);
    let len_ms = format!("{:.6}", cue.len_ms);
    let hotcue = cue.hotcue.to_string();

    let mut elem = BytesStart::new("CUE_V2");
    elem.extend_attributes([
        ("NAME", cue.name.as_str()),
        ("DISPL_ORDER", "0"),
        ("TYPE", cue.kind.code()),
        ("START", start_ms.as_str()),
        ("LEN", len_ms.as_str()),
        ("REPEATS", "-1"),
        ("HOTCUE", hotcue.as_str()),
    ]);
    // the grid indicator is always white
    if cue.name == GRID_CUE_NAME && cue.kind == TraktorCueKind::Cue {
        elem.push_attribute(("COLOR", "#FFFFFF"));
    }

    match cue.grid_bpm {
        Some(grid_bpm) => {
            w.write_event(Event::Start(elem))?;
            let bpm = format!("{grid_bpm:.6}");
            empty(w, "GRID", &[("BPM", &bpm)])?;
            end(w, "CUE_V2")?;
        }
        None => w.write_event(Event::Empty(elem))?,
    }
    Ok(())
}

fn write_playlists(w: &mut XmlWriter, keys: &[String], name: &str) -> Result<()> {
    start(w, "PLAYLISTS", &[])?;
    start(w, "NODE", &[("TYPE", "FOLDER"), ("NAME", "$ROOT")])?;
    start(w, "SUBNODES", &[("COUNT", "1")])?;
    start(w, "NODE", &[("TYPE", "PLAYLIST"), ("NAME", name)])?;

    let entries = keys.len().to_string();
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    start(
        w,
        "PLAYLIST",
        &[("ENTRIES", &entries), ("TYPE", "LIST"), ("UUID", &uuid)],
    )?;
    for key in keys {
        start(w, "ENTRY", &[])?;
        empty(w, "PRIMARYKEY", &[("TYPE", "TRACK"), ("KEY", key)])?;
        end(w, "ENTRY")?;
    }
    end(w, "PLAYLIST")?;

    end(w, "NODE")?;
    end(w, "SUBNODES")?;
    end(w, "NODE")?;
    end(w, "PLAYLISTS")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::UNASSIGNED_HOTCUE;

    const SAMPLE_NML: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<NML VERSION="20">
  <HEAD COMPANY="www.native-instruments.com" PROGRAM="Traktor Pro 4"></HEAD>
  <COLLECTION ENTRIES="1">
    <ENTRY MODIFIED_DATE="2023/06/10" MODIFIED_TIME="0" TITLE="Sunrise" ARTIST="DJ Test">
      <LOCATION DIR="/:Music/:House/:" FILE="Sunrise.mp3" VOLUME="USB" VOLUMEID="USB"></LOCATION>
      <ALBUM TITLE="First Light"></ALBUM>
      <INFO BITRATE="320000" GENRE="House" PLAYCOUNT="7" PLAYTIME="321" RANKING="51"
            IMPORT_DATE="2023/05/01" LAST_PLAYED="2023/06/01" COLOR="1"></INFO>
      <TEMPO BPM="126.000000" BPM_QUALITY="100.000000"></TEMPO>
      <MUSICAL_KEY VALUE="12"></MUSICAL_KEY>
      <CUE_V2 NAME="AutoGrid" DISPL_ORDER="0" TYPE="4" START="250.000000" LEN="0.000000" REPEATS="-1" HOTCUE="-1">
        <GRID BPM="126.000000"></GRID>
      </CUE_V2>
      <CUE_V2 NAME="AutoGrid" DISPL_ORDER="0" TYPE="0" START="250.000000" LEN="0.000000" REPEATS="-1" HOTCUE="0" COLOR="#FFFFFF"></CUE_V2>
      <CUE_V2 NAME="Drop" DISPL_ORDER="0" TYPE="0" START="32250.000000" LEN="0.000000" REPEATS="-1" HOTCUE="2"></CUE_V2>
      <CUE_V2 NAME="n.n." DISPL_ORDER="0" TYPE="5" START="64250.000000" LEN="15238.095238" REPEATS="-1" HOTCUE="-1"></CUE_V2>
    </ENTRY>
  </COLLECTION>
  <PLAYLISTS>
    <NODE TYPE="FOLDER" NAME="$ROOT">
      <SUBNODES COUNT="1">
        <NODE TYPE="PLAYLIST" NAME="collection">
          <PLAYLIST ENTRIES="1" TYPE="LIST" UUID="abc">
            <ENTRY><PRIMARYKEY TYPE="TRACK" KEY="USB/:Music/:House/:Sunrise.mp3"></PRIMARYKEY></ENTRY>
          </PLAYLIST>
        </NODE>
      </SUBNODES>
    </NODE>
  </PLAYLISTS>
</NML>"##;

    #[test]
    fn test_parse_entries_and_playlist_refs() {
        let entries = parse(SAMPLE_NML).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[1], NmlEntry::PlaylistRef));

        let NmlEntry::Track(track) = &entries[0] else {
            panic!("expected a track entry");
        };
        assert_eq!(track.title, "Sunrise");
        assert_eq!(track.artist, "DJ Test");
        assert_eq!(track.album, "First Light");
        assert_eq!(track.key_code, "12");
        assert_eq!(track.bpm, 126.0);
        assert_eq!(track.color, "1");
        assert_eq!(track.bitrate, 320_000.0);
        assert_eq!(track.location.volume, "USB");
        assert_eq!(track.location.dirs, vec!["Music".to_string(), "House".to_string()]);
        assert_eq!(track.cues.len(), 4);
        assert!(track.cues[0].is_grid_marker());
        assert_eq!(track.cues[0].grid_bpm, Some(126.0));
        assert_eq!(track.cues[2].hotcue, 2);
        assert_eq!(track.cues[3].hotcue, UNASSIGNED_HOTCUE);
        assert_eq!(track.cues[3].kind, TraktorCueKind::Loop);
    }

    #[test]
    fn test_missing_fields_fail_soft() {
        let minimal = r#"<NML VERSION="20"><COLLECTION ENTRIES="1">
            <ENTRY TITLE="Bare"></ENTRY>
        </COLLECTION></NML>"#;
        let entries = parse(minimal).unwrap();
        let NmlEntry::Track(track) = &entries[0] else {
            panic!("expected a track entry");
        };
        assert_eq!(track.title, "Bare");
        assert_eq!(track.artist, "");
        assert_eq!(track.bpm, DEFAULT_BPM);
        assert_eq!(track.bitrate, DEFAULT_BITRATE_BPS);
        assert_eq!(track.location, LocationPath::default());
        assert!(track.cues.is_empty());
    }

    #[test]
    fn test_write_round_trips_through_parse() {
        let entries = parse(SAMPLE_NML).unwrap();
        let NmlEntry::Track(track) = &entries[0] else {
            panic!("expected a track entry");
        };
        let keys = vec![track.location.playlist_key()];
        let out = write(std::slice::from_ref(track), &keys, "collection").unwrap();

        let reparsed = parse(&out).unwrap();
        assert_eq!(reparsed.len(), 2); // track + playlist ref
        let NmlEntry::Track(back) = &reparsed[0] else {
            panic!("expected a track entry");
        };
        assert_eq!(back.title, track.title);
        assert_eq!(back.key_code, track.key_code);
        assert_eq!(back.color, track.color);
        assert_eq!(back.cues.len(), track.cues.len());
        assert_eq!(back.location.playlist_key(), keys[0]);
        assert!(out.contains("COLOR=\"#FFFFFF\""));
        assert!(out.contains("KEY=\"10m\""));
    }

    #[test]
    fn test_invalid_document_is_parse_error() {
        assert!(matches!(parse("<NML"), Err(Error::Parse(_))));
    }
}
