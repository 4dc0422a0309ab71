//! Conversion direction context
//!
//! A `Direction` is created once per run and passed into every mapping call.
//! All lookup tables are keyed one way and reverse-scanned the other way, so
//! each operation picks its orientation from the direction it is handed.

use std::path::Path;

use chrono::{Local, NaiveDate};
use tracing::warn;

use crate::error::{Error, Result};

const TRAKTOR_DATE: &str = "%Y/%m/%d";
const REKORDBOX_DATE: &str = "%Y-%m-%d";

/// Which schema is the source and which is the target for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TraktorToRekordbox,
    RekordboxToTraktor,
}

impl Direction {
    /// Detect the direction from the input file extension:
    /// `.nml` converts to Rekordbox XML, `.xml` converts to NML.
    pub fn from_extension(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "nml" => Ok(Direction::TraktorToRekordbox),
            "xml" => Ok(Direction::RekordboxToTraktor),
            _ => Err(Error::UnknownFormat(path.display().to_string())),
        }
    }

    pub fn source_date_format(self) -> &'static str {
        match self {
            Direction::TraktorToRekordbox => TRAKTOR_DATE,
            Direction::RekordboxToTraktor => REKORDBOX_DATE,
        }
    }

    pub fn target_date_format(self) -> &'static str {
        match self {
            Direction::TraktorToRekordbox => REKORDBOX_DATE,
            Direction::RekordboxToTraktor => TRAKTOR_DATE,
        }
    }

    /// Reformat a date from the source schema's format to the target's.
    /// Unparsable input passes through unchanged rather than failing.
    pub fn format_date(self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }
        match NaiveDate::parse_from_str(raw, self.source_date_format()) {
            Ok(date) => date.format(self.target_date_format()).to_string(),
            Err(_) => {
                warn!(date = raw, "unparsable date, passing through");
                raw.to_string()
            }
        }
    }

    /// Today's date in the target schema's format.
    pub fn today(self) -> String {
        Local::now()
            .date_naive()
            .format(self.target_date_format())
            .to_string()
    }
}
