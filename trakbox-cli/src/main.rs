//! trakbox: convert DJ libraries between Traktor NML and Rekordbox XML
//!
//! Single positional input file; the direction and output name are derived
//! from the extension (`library.nml` → `library.rekordbox.xml`,
//! `library.rekordbox.xml` → `library.nml`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trakbox_core::{rekordbox, traktor, Converter, Direction};

const PLAYLIST_NAME: &str = "collection";

#[derive(Parser)]
#[command(name = "trakbox")]
#[command(about = "Convert DJ libraries between Traktor NML and Rekordbox XML")]
#[command(version)]
struct Cli {
    /// Input library (.nml or .xml)
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let cli = Cli::parse();
    if !cli.input.is_file() {
        bail!("input file not found: {}", cli.input.display());
    }
    let direction = Direction::from_extension(&cli.input)
        .with_context(|| "expected a .nml or .xml input file")?;
    let output = output_path(&cli.input, direction);

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("cannot read {}", cli.input.display()))?;

    let mut converter = Converter::new(direction);
    let result = match direction {
        Direction::TraktorToRekordbox => {
            let entries = traktor::parse(&text)?;
            let tracks = converter.rekordbox_collection(&entries);
            rekordbox::write(&tracks, converter.playlist_keys(), PLAYLIST_NAME)?
        }
        Direction::RekordboxToTraktor => {
            let entries = rekordbox::parse(&text)?;
            let tracks = converter.traktor_collection(&entries);
            traktor::write(&tracks, converter.playlist_keys(), PLAYLIST_NAME)?
        }
    };

    fs::write(&output, result)
        .with_context(|| format!("cannot write {}", output.display()))?;
    info!(
        "converted {} -> {}",
        cli.input.display(),
        output.display()
    );
    Ok(())
}

/// Output path by suffix substitution.
fn output_path(input: &Path, direction: Direction) -> PathBuf {
    match direction {
        Direction::TraktorToRekordbox => input.with_extension("rekordbox.xml"),
        Direction::RekordboxToTraktor => {
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            let stem = stem.strip_suffix(".rekordbox").unwrap_or(stem);
            input.with_file_name(format!("{stem}.nml"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_naming() {
        assert_eq!(
            output_path(Path::new("lib.nml"), Direction::TraktorToRekordbox),
            PathBuf::from("lib.rekordbox.xml")
        );
        assert_eq!(
            output_path(
                Path::new("/music/lib.rekordbox.xml"),
                Direction::RekordboxToTraktor
            ),
            PathBuf::from("/music/lib.nml")
        );
        assert_eq!(
            output_path(Path::new("export.xml"), Direction::RekordboxToTraktor),
            PathBuf::from("export.nml")
        );
    }

    #[test]
    fn test_file_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let nml_path = dir.path().join("lib.nml");
        fs::write(
            &nml_path,
            r#"<NML VERSION="20"><COLLECTION ENTRIES="1">
                <ENTRY TITLE="One" ARTIST="A"><TEMPO BPM="128.000000"></TEMPO></ENTRY>
            </COLLECTION></NML>"#,
        )
        .unwrap();

        let text = fs::read_to_string(&nml_path).unwrap();
        let entries = traktor::parse(&text).unwrap();
        let mut converter = Converter::new(Direction::TraktorToRekordbox);
        let tracks = converter.rekordbox_collection(&entries);
        let xml = rekordbox::write(&tracks, converter.playlist_keys(), PLAYLIST_NAME).unwrap();

        let out = output_path(&nml_path, Direction::TraktorToRekordbox);
        fs::write(&out, &xml).unwrap();

        let back = rekordbox::parse(&fs::read_to_string(&out).unwrap()).unwrap();
        // 1 converted track + 1 playlist reference
        assert_eq!(back.len(), 2);
    }
}
