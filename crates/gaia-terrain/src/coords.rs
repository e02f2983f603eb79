//! World-space ↔ heightmap-grid coordinate mapping.
//!
//! World positions are continuous `(x, z)` pairs in game units, spanning
//! `[0, map_dimension)` on both axes. The grid is indexed `(row, col)` with
//! world `z` selecting the row and world `x` selecting the column.

use crate::heightmap::Heightmap;

/// A position on the map plane, in game units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPoint {
    /// East-west coordinate.
    pub x: f64,
    /// North-south coordinate.
    pub z: f64,
}

impl WorldPoint {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Euclidean distance on the map plane.
    pub fn distance(&self, other: &WorldPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.z - other.z).powi(2)).sqrt()
    }

    /// `true` if both coordinates lie in `[0, map_dimension)`.
    pub fn is_within(&self, map_dimension: f64) -> bool {
        (0.0..map_dimension).contains(&self.x) && (0.0..map_dimension).contains(&self.z)
    }
}

/// A cell in a square grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridIndex {
    /// Row, selected by world `z`.
    pub row: usize,
    /// Column, selected by world `x`.
    pub col: usize,
}

/// Map a world position to the grid cell containing it.
///
/// `row = floor(z / map_dimension * grid_size)` and
/// `col = floor(x / map_dimension * grid_size)`, each clamped to
/// `[0, grid_size - 1]`. Out-of-range and non-finite inputs clamp to the
/// nearest edge (NaN maps to 0). A zero-sized grid always yields `(0, 0)`.
pub fn world_to_grid(x: f64, z: f64, map_dimension: f64, grid_size: usize) -> GridIndex {
    GridIndex {
        row: axis_to_index(z, map_dimension, grid_size),
        col: axis_to_index(x, map_dimension, grid_size),
    }
}

fn axis_to_index(coord: f64, map_dimension: f64, grid_size: usize) -> usize {
    let last = grid_size.saturating_sub(1);
    let scaled = (coord / map_dimension * grid_size as f64).floor();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else if scaled >= last as f64 {
        last
    } else {
        scaled as usize
    }
}

/// Altitude of the heightmap cell under a world position.
///
/// Returns `None` only for an empty heightmap.
pub fn altitude_at(x: f64, z: f64, heightmap: &Heightmap, map_dimension: f64) -> Option<f32> {
    heightmap.at(world_to_grid(x, z, map_dimension, heightmap.size()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_z_selects_row_x_selects_column() {
        let idx = world_to_grid(100.0, 900.0, 1000.0, 10);
        assert_eq!(idx, GridIndex { row: 9, col: 1 });
    }

    #[test]
    fn test_floor_within_cell() {
        assert_eq!(world_to_grid(99.9, 0.0, 1000.0, 10).col, 0);
        assert_eq!(world_to_grid(100.0, 0.0, 1000.0, 10).col, 1);
        assert_eq!(world_to_grid(0.0, 199.99, 1000.0, 10).row, 1);
    }

    #[test]
    fn test_clamps_out_of_range_inputs() {
        let inputs = [
            -1.0e12,
            -5.0,
            -0.0,
            1000.0,
            1000.5,
            1.0e12,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NAN,
        ];
        for &x in &inputs {
            for &z in &inputs {
                let idx = world_to_grid(x, z, 1000.0, 17);
                assert!(idx.row <= 16 && idx.col <= 16, "({x}, {z}) -> {idx:?}");
            }
        }
        assert_eq!(world_to_grid(-5.0, 5000.0, 1000.0, 17), GridIndex { row: 16, col: 0 });
    }

    #[test]
    fn test_monotonic_in_range() {
        let mut last = 0;
        for step in 0..=2000 {
            let x = step as f64 * 0.5;
            let col = world_to_grid(x, 0.0, 1000.0, 129).col;
            assert!(col >= last, "column decreased at x={x}");
            last = col;
        }
        assert_eq!(last, 128);

        let mut last = 0;
        for step in 0..=2000 {
            let z = step as f64 * 0.5;
            let index = world_to_grid(0.0, z, 1000.0, 129);
            assert_eq!(index.col, 0);
            assert!(index.row >= last, "row decreased at z={z}");
            last = index.row;
        }
        assert_eq!(last, 128);
    }

    #[test]
    fn test_zero_grid_and_zero_dimension() {
        assert_eq!(world_to_grid(5.0, 5.0, 1000.0, 0), GridIndex { row: 0, col: 0 });
        assert_eq!(world_to_grid(5.0, 5.0, 0.0, 8), GridIndex { row: 7, col: 7 });
        assert_eq!(world_to_grid(0.0, 0.0, 0.0, 8), GridIndex { row: 0, col: 0 });
    }

    #[test]
    fn test_altitude_at_reads_mapped_cell() {
        let map = Heightmap::from_fn(4, |row, col| (row * 4 + col) as f32);
        assert_eq!(altitude_at(0.0, 0.0, &map, 400.0), Some(0.0));
        assert_eq!(altitude_at(350.0, 120.0, &map, 400.0), Some(7.0));
        assert_eq!(altitude_at(-10.0, 999.0, &map, 400.0), Some(12.0));
        assert_eq!(altitude_at(1.0, 1.0, &Heightmap::flat(0, 0.0), 400.0), None);
    }

    #[test]
    fn test_world_point_helpers() {
        let a = WorldPoint::new(0.0, 0.0);
        let b = WorldPoint::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert!(a.is_within(10.0));
        assert!(!WorldPoint::new(10.0, 1.0).is_within(10.0));
        assert!(!WorldPoint::new(1.0, -0.1).is_within(10.0));
    }
}
