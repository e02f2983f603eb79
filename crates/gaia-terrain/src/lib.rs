//! Terrain file decoding for `.pmp` scenario heightmaps.
//!
//! Two historical encodings share the `.pmp` extension: a legacy float32 grid
//! behind an opaque 64-byte header, and the current `PSMP` layout with u16
//! altitudes followed by a texture name table and a per-tile index grid.
//! [`decode_terrain`] sniffs the header once and dispatches to the matching
//! decoder; [`world_to_grid`] maps world positions back onto the decoded grid.

mod coords;
mod decoder;
mod error;
mod format;
mod heightmap;
mod reader;
mod textures;

#[cfg(test)]
mod test_support;

pub use coords::{GridIndex, WorldPoint, altitude_at, world_to_grid};
pub use decoder::{
    AnomalyPolicy, DEFAULT_LEGACY_WORLD_SCALE, DecodeOptions, DecodedTerrain, LEGACY_ALTITUDE_LIMIT,
    altitude_from_raw, decode_terrain, legacy_grid_size, read_terrain_file,
};
pub use error::{FormatError, TerrainError};
pub use format::{CURRENT_HEADER_LEN, LEGACY_HEADER_LEN, MAGIC, PmpFormat, PmpHeader, detect_format};
pub use heightmap::{AltitudeStats, Heightmap};
pub use textures::{TILES_PER_PATCH, TextureTable, TileGrid};
