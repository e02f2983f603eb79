//! Texture name table and per-tile texture index grid.

use std::ops::Range;

use crate::error::FormatError;
use crate::reader::ByteReader;

/// Tiles along one side of a patch.
pub const TILES_PER_PATCH: usize = 16;

/// Ordered texture names. Position in the table is the index used by [`TileGrid`].
///
/// Names are unique by position only; the same name may appear twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureTable {
    names: Vec<String>,
}

impl TextureTable {
    /// Build a table from names in storage order.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name stored at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// All names in storage order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Square grid of texture indices, one per tile, stored row-major.
///
/// Indices at or past the end of the [`TextureTable`] are reserved values,
/// not errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileGrid {
    side: usize,
    indices: Vec<u16>,
}

impl TileGrid {
    /// A grid with no tiles (legacy files carry no tile data).
    pub fn empty() -> Self {
        Self::default()
    }

    /// A `side × side` grid with every index at 0.
    pub fn zeroed(side: usize) -> Self {
        Self {
            side,
            indices: vec![0; side * side],
        }
    }

    /// `(rows, columns)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.side, self.side)
    }

    /// `true` when the grid has no tiles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Texture index of a tile, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<u16> {
        if row >= self.side || col >= self.side {
            return None;
        }
        self.indices.get(row * self.side + col).copied()
    }

    /// All indices in row-major order.
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Count tiles whose index does not name an entry of a table of `table_len` names.
    pub fn special_count(&self, table_len: usize) -> usize {
        self.indices
            .iter()
            .filter(|&&index| usize::from(index) >= table_len)
            .count()
    }
}

/// Byte spans of the texture section, validated before anything is decoded.
struct TextureSectionLayout {
    names: Vec<Range<usize>>,
}

impl TextureSectionLayout {
    /// Walk every length prefix without materialising names.
    ///
    /// The reader is advanced to the end of the name list only if the whole
    /// list fits in the buffer.
    fn scan(reader: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let mut lookahead = reader.clone();

        let count_offset = lookahead.position();
        let count = lookahead
            .read_u32_le()
            .ok_or(FormatError::TruncatedTextureSection {
                offset: count_offset,
                needed: 4,
                available: lookahead.remaining(),
            })? as usize;

        // Each entry carries at least its 4-byte length prefix.
        let minimum = count.saturating_mul(4);
        if minimum > lookahead.remaining() {
            return Err(FormatError::TruncatedTextureSection {
                offset: lookahead.position(),
                needed: minimum,
                available: lookahead.remaining(),
            });
        }

        let mut names = Vec::with_capacity(count);
        for _ in 0..count {
            let prefix_offset = lookahead.position();
            let len = lookahead
                .read_u32_le()
                .ok_or(FormatError::TruncatedTextureSection {
                    offset: prefix_offset,
                    needed: 4,
                    available: lookahead.remaining(),
                })? as usize;
            let name_offset = lookahead.position();
            let available = lookahead.remaining();
            let span = lookahead
                .skip(len)
                .ok_or(FormatError::TruncatedTextureSection {
                    offset: name_offset,
                    needed: len,
                    available,
                })?;
            names.push(span);
        }

        *reader = lookahead;
        Ok(Self { names })
    }
}

/// Parse the texture table and tile grid that follow the heightmap.
///
/// A malformed name list is a [`FormatError`]; a tile section shorter than
/// `tiles_per_side² × 2` bytes is replaced by a zero-filled grid.
pub(crate) fn parse_texture_section(
    reader: &mut ByteReader<'_>,
    tiles_per_side: usize,
) -> Result<(TextureTable, TileGrid), FormatError> {
    let layout = TextureSectionLayout::scan(reader)?;
    let names = layout
        .names
        .into_iter()
        .map(|span| String::from_utf8_lossy(reader.span(span)).into_owned())
        .collect::<Vec<_>>();
    tracing::debug!(count = names.len(), "parsed texture names");

    let tiles = read_tile_grid(reader, tiles_per_side);
    Ok((TextureTable::new(names), tiles))
}

fn read_tile_grid(reader: &mut ByteReader<'_>, tiles_per_side: usize) -> TileGrid {
    let needed = tiles_per_side
        .checked_mul(tiles_per_side)
        .and_then(|n| n.checked_mul(2));
    let available = reader.remaining();

    let bytes = needed.and_then(|n| reader.take(n));
    let Some(bytes) = bytes else {
        tracing::warn!(
            tiles_per_side,
            needed = needed.unwrap_or(usize::MAX),
            available,
            "tile section shorter than the tile grid, filling with texture 0"
        );
        return TileGrid::zeroed(tiles_per_side);
    };

    let indices = bytes
        .chunks_exact(2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .collect();
    TileGrid {
        side: tiles_per_side,
        indices,
    }
}
