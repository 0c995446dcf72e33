//! Row-major cell addressing with per-axis wrap or clip.
//!
//! Cells are 1-based: axis `i` spans `[1, extent[i]]`. The backing array is
//! row-major with the last axis fastest, so `index = sum((c_i - 1) * stride_i)`.

use crate::error::SpaceError;
use rand::Rng;
use roost_core::{Coord, Periodicity};
use smallvec::SmallVec;

/// Shape, strides and periodicity of a discrete grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridGeometry {
    extent: Coord,
    periodic: SmallVec<[bool; 4]>,
    strides: SmallVec<[usize; 4]>,
    cell_count: usize,
}

impl GridGeometry {
    /// Maximum axis length: coordinates use `i32`, so each axis must fit.
    pub const MAX_AXIS: u32 = i32::MAX as u32;

    /// Validate an extent and periodicity and precompute strides.
    pub fn new(extent: &[u32], periodicity: &Periodicity) -> Result<Self, SpaceError> {
        if extent.is_empty() {
            return Err(SpaceError::EmptySpace);
        }
        let periodic = periodicity
            .axes(extent.len())
            .ok_or(SpaceError::DimensionMismatch {
                expected: extent.len(),
                got: match periodicity {
                    Periodicity::PerAxis(flags) => flags.len(),
                    Periodicity::Uniform(_) => extent.len(),
                },
            })?;
        for (axis, &len) in extent.iter().enumerate() {
            if len == 0 {
                return Err(SpaceError::EmptySpace);
            }
            if len > Self::MAX_AXIS {
                return Err(SpaceError::DimensionTooLarge {
                    axis,
                    value: len,
                    max: Self::MAX_AXIS,
                });
            }
        }

        let ndim = extent.len();
        let mut strides: SmallVec<[usize; 4]> = SmallVec::from_elem(1, ndim);
        for axis in (0..ndim - 1).rev() {
            strides[axis] = strides[axis + 1]
                .checked_mul(extent[axis + 1] as usize)
                .ok_or(SpaceError::TooManyCells)?;
        }
        let cell_count = strides[0]
            .checked_mul(extent[0] as usize)
            .ok_or(SpaceError::TooManyCells)?;

        Ok(Self {
            extent: extent.iter().map(|&len| len as i32).collect(),
            periodic,
            strides,
            cell_count,
        })
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.extent.len()
    }

    /// Length of every axis.
    pub fn extent(&self) -> &[i32] {
        &self.extent
    }

    /// Per-axis periodicity flags.
    pub fn periodic_axes(&self) -> &[bool] {
        &self.periodic
    }

    /// Whether `axis` wraps around.
    pub fn is_periodic(&self, axis: usize) -> bool {
        self.periodic[axis]
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Human-readable bounds, e.g. `[1, 10] x [1, 5]`.
    pub fn bounds(&self) -> String {
        self.extent
            .iter()
            .map(|len| format!("[1, {len}]"))
            .collect::<Vec<_>>()
            .join(" x ")
    }

    fn check_ndim(&self, got: usize) -> Result<(), SpaceError> {
        if got != self.ndim() {
            return Err(SpaceError::DimensionMismatch {
                expected: self.ndim(),
                got,
            });
        }
        Ok(())
    }

    /// Flat index of an in-bounds coordinate.
    pub fn index_of(&self, coord: &[i32]) -> Result<usize, SpaceError> {
        self.check_ndim(coord.len())?;
        let in_bounds = coord
            .iter()
            .zip(&self.extent)
            .all(|(&c, &len)| c >= 1 && c <= len);
        if !in_bounds {
            return Err(SpaceError::CoordOutOfBounds {
                coord: SmallVec::from_slice(coord),
                bounds: self.bounds(),
            });
        }
        Ok(self.index_unchecked(coord))
    }

    pub(crate) fn index_unchecked(&self, coord: &[i32]) -> usize {
        coord
            .iter()
            .zip(&self.strides)
            .map(|(&c, &stride)| (c - 1) as usize * stride)
            .sum()
    }

    /// Inverse of [`index_of`](Self::index_of).
    pub fn coord_of(&self, index: usize) -> Coord {
        let mut rest = index;
        self.strides
            .iter()
            .map(|&stride| {
                let c = rest / stride;
                rest %= stride;
                c as i32 + 1
            })
            .collect()
    }

    /// `true` if every cell within `reach` steps of `coord` along each axis
    /// lies inside the grid, so offsets up to `reach` need no wrap or clip.
    pub fn is_interior(&self, coord: &[i32], reach: i64) -> bool {
        coord
            .iter()
            .zip(&self.extent)
            .all(|(&c, &len)| reach < c as i64 && c as i64 <= len as i64 - reach)
    }

    /// Index of `origin + offset` when the result is known to be in bounds.
    pub(crate) fn shift_unchecked(&self, origin_index: usize, offset: &[i32]) -> usize {
        let delta: isize = offset
            .iter()
            .zip(&self.strides)
            .map(|(&o, &stride)| o as isize * stride as isize)
            .sum();
        (origin_index as isize + delta) as usize
    }

    /// Index of `origin + offset`, wrapping periodic axes and returning
    /// `None` when a bounded axis falls off the grid.
    pub(crate) fn shift(&self, origin: &[i32], offset: &[i32]) -> Option<usize> {
        let mut index = 0;
        for axis in 0..self.ndim() {
            let c = self.resolve_axis(axis, origin[axis] as i64 + offset[axis] as i64)?;
            index += (c - 1) as usize * self.strides[axis];
        }
        Some(index)
    }

    /// Bring a raw axis value into `[1, len]`: modulo on periodic axes,
    /// `None` when out of range on bounded ones.
    pub(crate) fn resolve_axis(&self, axis: usize, c: i64) -> Option<i32> {
        let len = self.extent[axis] as i64;
        if (1..=len).contains(&c) {
            return Some(c as i32);
        }
        if self.periodic[axis] {
            Some(((c - 1).rem_euclid(len) + 1) as i32)
        } else {
            None
        }
    }

    /// Wrap periodic axes into range; reject out-of-range bounded axes.
    pub fn normalize(&self, coord: &[i32]) -> Result<Coord, SpaceError> {
        self.check_ndim(coord.len())?;
        coord
            .iter()
            .enumerate()
            .map(|(axis, &c)| {
                self.resolve_axis(axis, c as i64)
                    .ok_or_else(|| SpaceError::CoordOutOfBounds {
                        coord: SmallVec::from_slice(coord),
                        bounds: self.bounds(),
                    })
            })
            .collect()
    }

    /// Signed-free displacement along `axis`, taking the shorter way round
    /// on periodic axes.
    pub fn axis_delta(&self, axis: usize, a: i32, b: i32) -> i64 {
        let direct = (a as i64 - b as i64).abs();
        if self.periodic[axis] {
            direct.min(self.extent[axis] as i64 - direct)
        } else {
            direct
        }
    }

    /// A uniformly random cell.
    pub fn random_coord<R: Rng + ?Sized>(&self, rng: &mut R) -> Coord {
        self.extent
            .iter()
            .map(|&len| rng.random_range(1..=len))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use smallvec::smallvec;

    fn geom(extent: &[u32], periodic: bool) -> GridGeometry {
        GridGeometry::new(extent, &Periodicity::from(periodic)).unwrap()
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn rejects_empty_and_zero_axes() {
        let p = Periodicity::from(false);
        assert_eq!(GridGeometry::new(&[], &p), Err(SpaceError::EmptySpace));
        assert_eq!(GridGeometry::new(&[4, 0], &p), Err(SpaceError::EmptySpace));
    }

    #[test]
    fn rejects_axis_exceeding_i32_max() {
        let p = Periodicity::from(false);
        assert!(matches!(
            GridGeometry::new(&[2, i32::MAX as u32 + 1], &p),
            Err(SpaceError::DimensionTooLarge { axis: 1, .. })
        ));
    }

    #[test]
    fn rejects_mismatched_periodicity() {
        let p = Periodicity::from([true, false, true]);
        assert_eq!(
            GridGeometry::new(&[3, 3], &p),
            Err(SpaceError::DimensionMismatch {
                expected: 2,
                got: 3
            })
        );
    }

    // ── Addressing ──────────────────────────────────────────────

    #[test]
    fn index_is_row_major_one_based() {
        let g = geom(&[3, 4], false);
        assert_eq!(g.index_of(&[1, 1]), Ok(0));
        assert_eq!(g.index_of(&[1, 4]), Ok(3));
        assert_eq!(g.index_of(&[2, 1]), Ok(4));
        assert_eq!(g.index_of(&[3, 4]), Ok(11));
        assert!(g.index_of(&[0, 1]).is_err());
        assert!(g.index_of(&[3, 5]).is_err());
        assert!(matches!(
            g.index_of(&[1]),
            Err(SpaceError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn shift_wraps_or_clips_per_axis() {
        let g = GridGeometry::new(&[5, 5], &Periodicity::from([true, false])).unwrap();
        // Axis 0 wraps: 1 - 2 -> 4.
        assert_eq!(g.shift(&[1, 3], &[-2, 0]), g.index_of(&[4, 3]).ok());
        // Axis 1 is bounded: 3 + 3 -> off the grid.
        assert_eq!(g.shift(&[1, 3], &[0, 3]), None);
    }

    #[test]
    fn normalize_wraps_periodic_and_rejects_bounded() {
        let g = GridGeometry::new(&[5, 5], &Periodicity::from([true, false])).unwrap();
        assert_eq!(g.normalize(&[7, 2]), Ok(smallvec![2, 2]));
        assert_eq!(g.normalize(&[0, 5]), Ok(smallvec![5, 5]));
        assert!(g.normalize(&[2, 6]).is_err());
    }

    #[test]
    fn axis_delta_takes_short_way_round() {
        let g = geom(&[10], true);
        assert_eq!(g.axis_delta(0, 1, 10), 1);
        assert_eq!(g.axis_delta(0, 3, 8), 5);
        let b = geom(&[10], false);
        assert_eq!(b.axis_delta(0, 1, 10), 9);
    }

    #[test]
    fn interior_check() {
        let g = geom(&[10, 10], false);
        assert!(g.is_interior(&[5, 5], 2));
        assert!(!g.is_interior(&[2, 5], 2));
        assert!(!g.is_interior(&[5, 9], 2));
        assert!(g.is_interior(&[1, 1], 0));
    }

    proptest! {
        #[test]
        fn coord_of_inverts_index_of(a in 1u32..6, b in 1u32..6, c in 1u32..6, seed in 0usize..1000) {
            let g = geom(&[a, b, c], false);
            let index = seed % g.cell_count();
            let coord = g.coord_of(index);
            prop_assert_eq!(g.index_of(&coord), Ok(index));
        }

        #[test]
        fn unchecked_shift_matches_checked_inside(x in 3i32..8, y in 3i32..8, dx in -2i32..=2, dy in -2i32..=2) {
            let g = geom(&[10, 10], false);
            let origin = [x, y];
            let origin_index = g.index_of(&origin).unwrap();
            prop_assert_eq!(Some(g.shift_unchecked(origin_index, &[dx, dy])), g.shift(&origin, &[dx, dy]));
        }
    }
}
