//! Square altitude grid decoded from a terrain file.

use rand::Rng;

use crate::coords::GridIndex;

/// Minimum and maximum altitude across a heightmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeStats {
    /// Lowest sample.
    pub min: f32,
    /// Highest sample.
    pub max: f32,
}

/// Square grid of altitude samples, stored row-major.
///
/// Row `i` corresponds to world `z`, column `j` to world `x`
/// (see [`crate::world_to_grid`]). Immutable once decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    size: usize,
    samples: Vec<f32>,
}

impl Heightmap {
    /// Wrap a row-major sample buffer. `samples.len()` must be `size * size`.
    pub(crate) fn from_raw(size: usize, samples: Vec<f32>) -> Self {
        debug_assert_eq!(samples.len(), size * size);
        Self { size, samples }
    }

    /// Build a heightmap by evaluating `f(row, col)` for every cell.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut samples = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                samples.push(f(row, col));
            }
        }
        Self { size, samples }
    }

    /// A heightmap with every cell at the same altitude.
    pub fn flat(size: usize, altitude: f32) -> Self {
        Self {
            size,
            samples: vec![altitude; size * size],
        }
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// `true` when the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Altitude at a cell, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.samples.get(row * self.size + col).copied()
    }

    /// Altitude at a grid index, or `None` outside the grid.
    pub fn at(&self, index: GridIndex) -> Option<f32> {
        self.get(index.row, index.col)
    }

    /// All samples in row-major order.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Lowest and highest altitude, or `None` for an empty grid.
    pub fn altitude_stats(&self) -> Option<AltitudeStats> {
        let mut iter = self.samples.iter().copied();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(AltitudeStats { min, max })
    }

    /// Read `count` uniformly chosen cells. Empty grids yield nothing.
    pub fn sample_cells<R: Rng>(&self, rng: &mut R, count: usize) -> Vec<(GridIndex, f32)> {
        if self.is_empty() {
            return Vec::new();
        }
        (0..count)
            .map(|_| {
                let index = GridIndex {
                    row: rng.random_range(0..self.size),
                    col: rng.random_range(0..self.size),
                };
                (index, self.samples[index.row * self.size + index.col])
            })
            .collect()
    }
}
