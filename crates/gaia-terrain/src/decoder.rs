//! Decoding of both `.pmp` encodings into a heightmap, world dimension,
//! texture table and tile grid.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FormatError, TerrainError};
use crate::format::{LEGACY_HEADER_LEN, PmpFormat, PmpHeader, detect_format};
use crate::heightmap::Heightmap;
use crate::reader::ByteReader;
use crate::textures::{TILES_PER_PATCH, TextureTable, TileGrid, parse_texture_section};

/// Largest accepted legacy altitude magnitude.
pub const LEGACY_ALTITUDE_LIMIT: f32 = 200.0;

/// World units per legacy grid cell, calibrated against a 1619-cell map
/// spanning 4300 units.
pub const DEFAULT_LEGACY_WORLD_SCALE: f64 = 4300.0 / 1619.0;

/// World units per tile in the current encoding.
const WORLD_UNITS_PER_TILE: f64 = 4.0;

/// Altitude of raw sample 0 in the current encoding.
const MIN_ALTITUDE: f64 = -20.0;

/// Altitude span covered by the full u16 range (raw 65535 maps to 692).
const ALTITUDE_SPAN: f64 = 712.0;

/// Range of the synthetic altitude substituted for a bad legacy sample.
const SUBSTITUTE_MAX: f32 = 50.0;

/// What to do with a legacy altitude sample that is non-finite or outside
/// `[-LEGACY_ALTITUDE_LIMIT, LEGACY_ALTITUDE_LIMIT]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnomalyPolicy {
    /// Abort the decode with [`FormatError::AltitudeOutOfRange`].
    #[default]
    Fail,
    /// Clamp to the nearest limit; NaN becomes 0.
    Clamp,
    /// Replace with a random altitude in `[0, 50)` drawn from the decode RNG.
    Substitute,
}

/// Knobs for [`decode_terrain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeOptions {
    /// Handling of out-of-range legacy samples.
    pub anomaly_policy: AnomalyPolicy,
    /// World units per legacy grid cell.
    pub legacy_world_scale: f64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            anomaly_policy: AnomalyPolicy::default(),
            legacy_world_scale: DEFAULT_LEGACY_WORLD_SCALE,
        }
    }
}

/// Everything recovered from one terrain buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTerrain {
    /// Encoding that was detected.
    pub format: PmpFormat,
    /// Header fields; `None` for legacy files.
    pub header: Option<PmpHeader>,
    /// Altitude grid.
    pub heightmap: Heightmap,
    /// World-space extent spanned by the heightmap, in game units.
    pub map_dimension: f64,
    /// Texture names; empty for legacy files.
    pub textures: TextureTable,
    /// Tile texture indices; empty for legacy files.
    pub tiles: TileGrid,
}

/// Decode a terrain buffer of either encoding.
///
/// `rng` is only drawn from when a legacy sample is repaired under
/// [`AnomalyPolicy::Substitute`].
pub fn decode_terrain<R: Rng>(
    data: &[u8],
    options: &DecodeOptions,
    rng: &mut R,
) -> Result<DecodedTerrain, FormatError> {
    let format = detect_format(data);
    let decoded = match format {
        PmpFormat::Legacy => decode_legacy(data, options, rng)?,
        PmpFormat::Current => decode_current(data)?,
    };
    tracing::info!(
        %format,
        size = decoded.heightmap.size(),
        map_dimension = decoded.map_dimension,
        textures = decoded.textures.len(),
        bytes = data.len(),
        "decoded terrain"
    );
    Ok(decoded)
}

/// Read a terrain file from disk and decode it.
pub fn read_terrain_file<R: Rng>(
    path: &Path,
    options: &DecodeOptions,
    rng: &mut R,
) -> Result<DecodedTerrain, TerrainError> {
    let data = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "read terrain file");
    Ok(decode_terrain(&data, options, rng)?)
}

/// Side length of the legacy grid held by a buffer of `buffer_len` bytes:
/// `floor(sqrt((buffer_len - 64) / 4))`, or 0 below the header size.
pub fn legacy_grid_size(buffer_len: usize) -> usize {
    (buffer_len.saturating_sub(LEGACY_HEADER_LEN) / 4).isqrt()
}

/// Convert a current-format u16 sample to engine altitude in `[-20, 692]`.
pub fn altitude_from_raw(raw: u16) -> f32 {
    (f64::from(raw) / f64::from(u16::MAX) * ALTITUDE_SPAN + MIN_ALTITUDE) as f32
}

fn decode_legacy<R: Rng>(
    data: &[u8],
    options: &DecodeOptions,
    rng: &mut R,
) -> Result<DecodedTerrain, FormatError> {
    if data.len() < LEGACY_HEADER_LEN {
        return Err(FormatError::TruncatedHeader {
            format: PmpFormat::Legacy,
            offset: 0,
            needed: LEGACY_HEADER_LEN,
            available: data.len(),
        });
    }

    let size = legacy_grid_size(data.len());
    let mut samples = Vec::with_capacity(size * size);
    let mut repaired = 0usize;

    for (index, b) in data[LEGACY_HEADER_LEN..]
        .chunks_exact(4)
        .take(size * size)
        .enumerate()
    {
        let raw = f32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        if raw.is_finite() && raw.abs() <= LEGACY_ALTITUDE_LIMIT {
            samples.push(raw);
            continue;
        }

        let value = match options.anomaly_policy {
            AnomalyPolicy::Fail => {
                return Err(FormatError::AltitudeOutOfRange {
                    offset: LEGACY_HEADER_LEN + index * 4,
                    value: raw,
                });
            }
            AnomalyPolicy::Clamp if raw.is_nan() => 0.0,
            AnomalyPolicy::Clamp => raw.clamp(-LEGACY_ALTITUDE_LIMIT, LEGACY_ALTITUDE_LIMIT),
            AnomalyPolicy::Substitute => rng.random_range(0.0..SUBSTITUTE_MAX),
        };
        repaired += 1;
        samples.push(value);
    }

    if repaired > 0 {
        tracing::warn!(
            repaired,
            policy = ?options.anomaly_policy,
            "repaired out-of-range legacy altitude samples"
        );
    }

    Ok(DecodedTerrain {
        format: PmpFormat::Legacy,
        header: None,
        heightmap: Heightmap::from_raw(size, samples),
        map_dimension: size as f64 * options.legacy_world_scale,
        textures: TextureTable::default(),
        tiles: TileGrid::empty(),
    })
}

fn decode_current(data: &[u8]) -> Result<DecodedTerrain, FormatError> {
    let mut reader = ByteReader::new(data);
    let header = PmpHeader::parse(&mut reader)?;
    tracing::debug!(
        version = header.version,
        data_size = header.data_size,
        map_size_patches = header.map_size_patches,
        "read PSMP header"
    );

    let heightmap_offset = reader.position();
    let available = reader.remaining();
    let tiles_per_side = (header.map_size_patches as usize).checked_mul(TILES_PER_PATCH);
    let layout = tiles_per_side.and_then(|tiles| {
        let side = tiles.checked_add(1)?;
        let bytes = side.checked_mul(side)?.checked_mul(2)?;
        Some((tiles, side, bytes))
    });
    let truncated = |needed: usize| FormatError::TruncatedHeightmap {
        offset: heightmap_offset,
        needed,
        available,
    };
    let (tiles_per_side, side, bytes) = layout.ok_or_else(|| truncated(usize::MAX))?;
    let region = reader.take(bytes).ok_or_else(|| truncated(bytes))?;

    let samples = region
        .chunks_exact(2)
        .map(|b| altitude_from_raw(u16::from_le_bytes([b[0], b[1]])))
        .collect();

    let (textures, tiles) = parse_texture_section(&mut reader, tiles_per_side)?;

    Ok(DecodedTerrain {
        format: PmpFormat::Current,
        header: Some(header),
        heightmap: Heightmap::from_raw(side, samples),
        map_dimension: tiles_per_side as f64 * WORLD_UNITS_PER_TILE,
        textures,
        tiles,
    })
}
