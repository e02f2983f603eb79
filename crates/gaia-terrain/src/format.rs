//! Encoding detection and the current-format header.
//!
//! ## Current layout (`PSMP`)
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | Magic bytes `"PSMP"` |
//! | 4 | 4 | Version (`u32`, little-endian) |
//! | 8 | 4 | Data size (`u32`, little-endian) |
//! | 12 | 4 | Map size in patches (`u32`, little-endian) |
//! | 16 | (P×16+1)²×2 | Altitude samples (`u16`, row-major) |
//! | … | 4 | Texture count `N` (`u32`) |
//! | … | N × (4 + len) | Texture names (`u32` length + ASCII bytes) |
//! | … | (P×16)²×2 | Tile texture indices (`u16`, row-major, optional) |
//!
//! ## Legacy layout
//!
//! A 64-byte opaque header followed by `size²` little-endian `f32` altitudes.

use std::fmt;

use crate::error::FormatError;
use crate::reader::ByteReader;

/// Magic bytes identifying the current encoding.
pub const MAGIC: [u8; 4] = *b"PSMP";

/// Fixed header length of the legacy encoding.
pub const LEGACY_HEADER_LEN: usize = 64;

/// Fixed header length of the current encoding.
pub const CURRENT_HEADER_LEN: usize = 16;

/// The two encodings that share the `.pmp` extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PmpFormat {
    /// Float32 heightmap behind a 64-byte header, no texture data.
    Legacy,
    /// `PSMP` header, u16 heightmap, texture table and tile grid.
    Current,
}

impl fmt::Display for PmpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => f.write_str("legacy"),
            Self::Current => f.write_str("PSMP"),
        }
    }
}

/// Select the decode path from the first four bytes of `data`.
///
/// Only the magic tag is inspected. A buffer too short to hold a tag is
/// treated as legacy and rejected later by the legacy header check.
pub fn detect_format(data: &[u8]) -> PmpFormat {
    if data.get(..MAGIC.len()) == Some(&MAGIC[..]) {
        PmpFormat::Current
    } else {
        PmpFormat::Legacy
    }
}

/// Header fields of a current-format file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PmpHeader {
    /// Format version as written by the engine.
    pub version: u32,
    /// Declared payload size. Informational only.
    pub data_size: u32,
    /// Map side length in patches (16 tiles per patch).
    pub map_size_patches: u32,
}

impl PmpHeader {
    /// Read the 16-byte header, leaving the reader at the first altitude sample.
    pub(crate) fn parse(reader: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let truncated = |offset: usize, available: usize| FormatError::TruncatedHeader {
            format: PmpFormat::Current,
            offset,
            needed: CURRENT_HEADER_LEN,
            available,
        };
        let available = reader.remaining();
        if available < CURRENT_HEADER_LEN {
            return Err(truncated(reader.position(), available));
        }

        reader
            .take(MAGIC.len())
            .ok_or_else(|| truncated(reader.position(), available))?;
        let mut field = || {
            let offset = reader.position();
            reader.read_u32_le().ok_or_else(|| truncated(offset, available))
        };
        let version = field()?;
        let data_size = field()?;
        let map_size_patches = field()?;

        Ok(Self {
            version,
            data_size,
            map_size_patches,
        })
    }
}
