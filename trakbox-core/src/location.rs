//! Location path translation
//!
//! Rekordbox stores a flat percent-encoded `file://localhost` URI; Traktor
//! decomposes the same path into `VOLUME`, a `/:`-separated `DIR` and `FILE`.
//! `LocationPath` is the shared triple both serializations go through.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

/// Boot volume stand-in when the URI does not carry a volume segment.
pub const DEFAULT_VOLUME: &str = "Macintosh HD";

const URI_PREFIX: &str = "file://localhost";

/// Spaces are the only printable character the partner schemas escape.
const URI_ESCAPE: &AsciiSet = &CONTROLS.add(b' ');

/// A track location as volume + directory segments + filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPath {
    pub volume: String,
    pub dirs: Vec<String>,
    pub file: String,
}

impl Default for LocationPath {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME.to_string(),
            dirs: Vec::new(),
            file: String::new(),
        }
    }
}

impl LocationPath {
    /// Decompose a `file://localhost` URI. The first segment of an absolute
    /// path is the volume; it is not repeated in the directory segments.
    /// Input that does not match the prefix yields the default decomposition.
    ///
    /// Known asymmetry: a URI composed for the boot volume omits the volume
    /// segment, so decomposing it classifies the first real directory as the
    /// volume. Covered by tests, accepted.
    pub fn from_uri(uri: &str) -> Self {
        let Some(raw) = uri.strip_prefix(URI_PREFIX) else {
            return Self::default();
        };
        let path = percent_decode_str(raw).decode_utf8_lossy();
        let absolute = path.starts_with('/');
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((file, rest)) = parts.split_last() else {
            return Self::default();
        };
        if absolute && !rest.is_empty() {
            Self {
                volume: rest[0].to_string(),
                dirs: rest[1..].iter().map(|s| s.to_string()).collect(),
                file: file.to_string(),
            }
        } else {
            Self {
                volume: DEFAULT_VOLUME.to_string(),
                dirs: rest.iter().map(|s| s.to_string()).collect(),
                file: file.to_string(),
            }
        }
    }

    /// Recompose the `file://localhost` URI. The placeholder volume is
    /// treated as the boot volume and omitted from the path.
    pub fn to_uri(&self) -> String {
        let mut path = String::new();
        if !self.volume.is_empty() && self.volume != DEFAULT_VOLUME {
            path.push('/');
            path.push_str(&self.volume);
        }
        for dir in &self.dirs {
            path.push('/');
            path.push_str(dir);
        }
        path.push('/');
        path.push_str(&self.file);
        format!("{URI_PREFIX}{}", utf8_percent_encode(&path, URI_ESCAPE))
    }

    /// Build from NML `DIR`/`FILE`/`VOLUME` attributes.
    pub fn from_nml(dir: &str, file: &str, volume: &str) -> Self {
        Self {
            volume: if volume.is_empty() {
                DEFAULT_VOLUME.to_string()
            } else {
                volume.to_string()
            },
            dirs: dir
                .split("/:")
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect(),
            file: file.to_string(),
        }
    }

    /// NML `DIR` serialization: `/:`-joined segments with leading and
    /// trailing separator, `/:` when there are no segments.
    pub fn nml_dir(&self) -> String {
        if self.dirs.is_empty() {
            "/:".to_string()
        } else {
            format!("/:{}/:", self.dirs.join("/:"))
        }
    }

    /// NML `PRIMARYKEY KEY` value for playlist reconstruction.
    pub fn playlist_key(&self) -> String {
        format!("{}{}{}", self.volume, self.nml_dir(), self.file)
    }
}
