//! trakbox-core: bidirectional DJ-library translation between Traktor NML
//! and Rekordbox DJ_PLAYLISTS XML
//!
//! The engine is a set of bidirectional lookup tables (color, key, cue type),
//! a location-path translator, a cue/loop translator and a beatgrid
//! reconstructor, composed per track by [`convert::Converter`]. Document
//! parsing and writing are thin shells in [`traktor`] and [`rekordbox`].
//!
//! Everything inside the engine fails soft: missing or malformed fields map
//! to empty/default values and one bad track never aborts a run.

pub mod beatgrid;
pub mod color;
pub mod convert;
pub mod cue;
pub mod direction;
pub mod error;
pub mod key;
pub mod location;
pub mod rekordbox;
pub mod track;
pub mod traktor;

pub use convert::Converter;
pub use direction::Direction;
pub use error::{Error, Result};
pub use location::LocationPath;
pub use track::{RekordboxTrack, TraktorTrack};
