//! Input/output formats: CSV source records in, compiled JSON dataset out.
//!
//! # Module Organization
//!
//! - [`csv`]: tabular source parsing (entities + relationships tables)
//! - [`json`]: the compiled [`Dataset`] the browser viewer fetches
//!
//! Native hosts can use [`load_dir`] to read the conventional file pair from
//! a data directory; the wasm surface receives text from the host's fetch
//! instead.

pub mod csv;
pub mod json;

pub use self::csv::{parse_entities, parse_relationships, EntityRecord, RelationshipRecord};
pub use self::json::{Dataset, DATASET_VERSION};

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

#[cfg(not(target_arch = "wasm32"))]
use crate::{
    error::CivigraphError,
    properties::{Entity, Relationship, Roster},
};

/// Locate a data file by substring match on the file name, preferring exact
/// conventional names. Directory listings are sorted so the choice is
/// deterministic.
#[cfg(not(target_arch = "wasm32"))]
fn find_file(dir: &Path, needle: &str, extension: &str) -> Result<PathBuf, CivigraphError> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().and_then(|e| e.to_str()) == Some(extension)
                && path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.contains(needle))
                    .unwrap_or(false)
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next().ok_or_else(|| {
        CivigraphError::NotFound(format!(
            "no *{needle}*.{extension} file in {}",
            dir.display()
        ))
    })
}

/// Read the conventional CSV pair (and optional `roster.toml`) from a data
/// directory: the first `*entities*.csv` and `*relationships*.csv` found.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_dir(
    dir: &Path,
) -> Result<(Vec<Entity>, Vec<Relationship>, Option<Roster>), CivigraphError> {
    let entities_path = find_file(dir, "entities", "csv")?;
    let relationships_path = find_file(dir, "relationships", "csv")?;
    tracing::debug!(
        "loading {} and {}",
        entities_path.display(),
        relationships_path.display()
    );

    let entities = parse_entities(&std::fs::read_to_string(&entities_path)?)?;
    let relationships = parse_relationships(&std::fs::read_to_string(&relationships_path)?)?;

    let roster_path = dir.join("roster.toml");
    let roster = if roster_path.exists() {
        Some(Roster::from_toml(&std::fs::read_to_string(&roster_path)?)?)
    } else {
        None
    };

    Ok((entities, relationships, roster))
}
