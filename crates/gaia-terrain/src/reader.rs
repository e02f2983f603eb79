//! Bounds-checked little-endian cursor over a byte slice.

use std::ops::Range;

/// Forward-only reader that never panics on short input.
///
/// Reads return `None` instead of advancing past the end, leaving the caller
/// to attach context (which field, which offset) to the failure.
#[derive(Clone, Debug)]
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Take `len` bytes and advance, or `None` if fewer remain.
    pub(crate) fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let bytes = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    /// Advance by `len` bytes and return the skipped span.
    pub(crate) fn skip(&mut self, len: usize) -> Option<Range<usize>> {
        let start = self.pos;
        self.take(len)?;
        Some(start..self.pos)
    }

    pub(crate) fn read_u32_le(&mut self) -> Option<u32> {
        let b = self.take(4)?;
        Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Bytes of a span previously returned by [`ByteReader::skip`].
    pub(crate) fn span(&self, range: Range<usize>) -> &'a [u8] {
        &self.data[range]
    }
}
