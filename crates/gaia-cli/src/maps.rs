//! Map file layout inside the maps directory.
//!
//! A map `name` is the pair `<name>.pmp` (terrain) and
//! `<name>.entities.json` (entity list). Populated output goes next to them
//! as `<name><suffix>.entities.json`.

use std::io;
use std::path::{Path, PathBuf};

pub const TERRAIN_EXTENSION: &str = "pmp";
pub const ENTITIES_SUFFIX: &str = ".entities.json";

/// Paths of one map's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFiles {
    pub name: String,
    pub terrain: PathBuf,
    pub entities: PathBuf,
}

impl MapFiles {
    pub fn new(maps_dir: &Path, name: &str) -> Self {
        Self {
            name: name.to_string(),
            terrain: maps_dir.join(format!("{name}.{TERRAIN_EXTENSION}")),
            entities: maps_dir.join(format!("{name}{ENTITIES_SUFFIX}")),
        }
    }

    /// Where the populated entity list is written.
    pub fn output(&self, suffix: &str) -> PathBuf {
        let dir = self.entities.parent().unwrap_or(Path::new(""));
        dir.join(format!("{}{suffix}{ENTITIES_SUFFIX}", self.name))
    }

    /// The first of the two input files that does not exist.
    pub fn missing(&self) -> Option<&Path> {
        [&self.terrain, &self.entities]
            .into_iter()
            .find(|p| !p.is_file())
            .map(PathBuf::as_path)
    }
}

/// Names of the maps in `maps_dir` that have both a terrain file and an
/// entity list, sorted.
pub fn list_maps(maps_dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(maps_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(TERRAIN_EXTENSION) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if MapFiles::new(maps_dir, name).missing().is_none() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}
