//! Errors surfaced by the command-line tool.

use std::path::PathBuf;

use gaia_config::ConfigError;
use gaia_scenario::ScenarioError;
use gaia_terrain::TerrainError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read terrain {}: {source}", .path.display())]
    Terrain {
        path: PathBuf,
        #[source]
        source: TerrainError,
    },

    #[error("entity list {}: {source}", .path.display())]
    Scenario {
        path: PathBuf,
        #[source]
        source: ScenarioError,
    },

    #[error("failed to list maps in {}: {source}", .path.display())]
    ListMaps {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("map {map:?} is missing {}", .path.display())]
    MissingMapFile { map: String, path: PathBuf },

    #[error("map dimension must be a positive number, got {0}")]
    InvalidMapDimension(f64),

    #[error("no map given and no map remembered from a previous run")]
    NoMapSelected,
}
