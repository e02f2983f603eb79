//! Byte-level builders for terrain buffers used by the unit tests.

use crate::format::{LEGACY_HEADER_LEN, MAGIC};

/// A legacy buffer: zeroed 64-byte header followed by `values` as LE floats.
pub(crate) fn legacy_buffer(values: &[f32]) -> Vec<u8> {
    let mut data = vec![0u8; LEGACY_HEADER_LEN];
    for v in values {
        data.extend_from_slice(&v.to_le_bytes());
    }
    data
}

/// Builder for a current-format (`PSMP`) buffer.
pub(crate) struct CurrentFile {
    patches: u32,
    heights: Option<Vec<u16>>,
    textures: Vec<String>,
    tiles: Vec<u16>,
}

impl CurrentFile {
    pub(crate) fn new(patches: u32) -> Self {
        Self {
            patches,
            heights: None,
            textures: Vec::new(),
            tiles: Vec::new(),
        }
    }

    pub(crate) fn heights(mut self, heights: Vec<u16>) -> Self {
        self.heights = Some(heights);
        self
    }

    pub(crate) fn textures(mut self, names: &[&str]) -> Self {
        self.textures = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub(crate) fn tiles(mut self, tiles: Vec<u16>) -> Self {
        self.tiles = tiles;
        self
    }

    pub(crate) fn build_header_only(&self) -> Vec<u8> {
        let mut data = MAGIC.to_vec();
        data.extend_from_slice(&6u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&self.patches.to_le_bytes());
        data
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut data = self.build_header_only();

        let side = self.patches as usize * 16 + 1;
        let heights = self
            .heights
            .clone()
            .unwrap_or_else(|| vec![0; side * side]);
        for h in heights {
            data.extend_from_slice(&h.to_le_bytes());
        }

        data.extend_from_slice(&(self.textures.len() as u32).to_le_bytes());
        for name in &self.textures {
            data.extend_from_slice(&(name.len() as u32).to_le_bytes());
            data.extend_from_slice(name.as_bytes());
        }

        for t in &self.tiles {
            data.extend_from_slice(&t.to_le_bytes());
        }
        data
    }
}
