//! Terrain decoding error types.

use crate::format::PmpFormat;

/// Structural problems found while decoding a terrain buffer.
///
/// Every variant records the byte offset of the field that could not be
/// decoded, available through [`FormatError::offset`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    /// The buffer is shorter than the fixed header of its detected format.
    #[error("{format} header truncated at offset {offset}: need {needed} bytes, have {available}")]
    TruncatedHeader {
        /// Format selected by the magic check.
        format: PmpFormat,
        /// Offset of the header field that could not be read.
        offset: usize,
        /// Header length required by the format.
        needed: usize,
        /// Bytes actually present.
        available: usize,
    },

    /// The heightmap region declared by the header runs past the end of the buffer.
    #[error("heightmap truncated at offset {offset}: need {needed} bytes, have {available}")]
    TruncatedHeightmap {
        /// Offset where the heightmap region starts.
        offset: usize,
        /// Bytes the declared map size requires.
        needed: usize,
        /// Bytes remaining after the header.
        available: usize,
    },

    /// The texture count or a texture name length would read past the end of the buffer.
    #[error("texture section truncated at offset {offset}: need {needed} bytes, have {available}")]
    TruncatedTextureSection {
        /// Offset of the count, length prefix or name that overruns the buffer.
        offset: usize,
        /// Bytes the field requires.
        needed: usize,
        /// Bytes remaining from `offset`.
        available: usize,
    },

    /// A legacy altitude sample is non-finite or outside the accepted range,
    /// and the decode was configured to fail on such samples.
    #[error("legacy altitude sample {value} at offset {offset} is out of range")]
    AltitudeOutOfRange {
        /// Offset of the offending float.
        offset: usize,
        /// The raw decoded value.
        value: f32,
    },
}

impl FormatError {
    /// Byte offset of the field that caused the error.
    pub fn offset(&self) -> usize {
        match *self {
            Self::TruncatedHeader { offset, .. }
            | Self::TruncatedHeightmap { offset, .. }
            | Self::TruncatedTextureSection { offset, .. }
            | Self::AltitudeOutOfRange { offset, .. } => offset,
        }
    }
}

/// Errors from reading and decoding a terrain file on disk.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// Failed to read the file.
    #[error("failed to read terrain file: {0}")]
    Io(#[from] std::io::Error),

    /// The file contents are not a valid terrain buffer.
    #[error(transparent)]
    Format(#[from] FormatError),
}
