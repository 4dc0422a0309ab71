//! Musical key lookup tables
//!
//! Traktor stores a numeric key code ("0".."23", majors then minors),
//! Rekordbox a key name ("C".."Bm"). The open-key display code is a derived
//! mapping emitted only into NML `INFO KEY`.

use crate::direction::Direction;

/// Key names indexed by Traktor `MUSICAL_KEY VALUE` (code = index).
const KEY_NAMES: [&str; 24] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B", // major
    "Cm", "Dbm", "Dm", "Ebm", "Em", "Fm", "Gbm", "Gm", "Abm", "Am", "Bbm",
    "Bm", // minor
];

/// Open-key display codes, indexed the same way (e.g. code 12 = Cm = "10m").
const OPEN_KEY_CODES: [&str; 24] = [
    "10d", "11d", "12d", "1d", "2d", "3d", "4d", "5d", "6d", "7d", "8d", "9d",
    "10m", "11m", "12m", "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m",
];

pub fn code_for_name(name: &str) -> Option<String> {
    KEY_NAMES
        .iter()
        .position(|n| *n == name)
        .map(|i| i.to_string())
}

pub fn name_for_code(code: &str) -> Option<&'static str> {
    let index: usize = code.parse().ok()?;
    KEY_NAMES.get(index).copied()
}

/// Open-key display code for a numeric key code, for NML `INFO KEY`.
pub fn open_key_for_code(code: &str) -> Option<&'static str> {
    let index: usize = code.parse().ok()?;
    OPEN_KEY_CODES.get(index).copied()
}

/// Map a tonality value into the target schema's vocabulary; unknown values
/// yield an empty string.
pub fn map_tonality(direction: Direction, value: &str) -> String {
    match direction {
        Direction::TraktorToRekordbox => {
            name_for_code(value).map(str::to_string).unwrap_or_default()
        }
        Direction::RekordboxToTraktor => code_for_name(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_table_both_directions() {
        assert_eq!(code_for_name("C").as_deref(), Some("0"));
        assert_eq!(code_for_name("Abm").as_deref(), Some("20"));
        assert_eq!(name_for_code("12"), Some("Cm"));
        assert_eq!(name_for_code("23"), Some("Bm"));
    }

    #[test]
    fn test_open_key_display_code() {
        assert_eq!(open_key_for_code("12"), Some("10m"));
        assert_eq!(open_key_for_code("0"), Some("10d"));
        assert_eq!(open_key_for_code("3"), Some("1d"));
        assert_eq!(open_key_for_code("24"), None);
    }

    #[test]
    fn test_map_tonality_unknown_is_empty() {
        assert_eq!(map_tonality(Direction::TraktorToRekordbox, "99"), "");
        assert_eq!(map_tonality(Direction::RekordboxToTraktor, "H"), "");
        assert_eq!(map_tonality(Direction::RekordboxToTraktor, "Cm"), "12");
        assert_eq!(map_tonality(Direction::TraktorToRekordbox, "12"), "Cm");
    }
}
