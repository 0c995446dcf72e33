//! Shared frame of both discrete grid kinds.
//!
//! [`GridIndex`](crate::GridIndex) and [`GridIndexSingle`](crate::GridIndexSingle)
//! differ only in what a cell stores. Everything else (addressing, metric,
//! offset cache, query planning) lives here.

use crate::error::SpaceError;
use crate::geometry::GridGeometry;
use crate::nearby::{AxisRanges, AxisSlices, NearbyCells};
use crate::offsets::OffsetCache;
use roost_core::{Coord, Metric, Periodicity};
use smallvec::SmallVec;

/// Geometry, metric and neighbourhood cache of a discrete grid.
#[derive(Clone, Debug)]
pub struct Lattice {
    geometry: GridGeometry,
    offsets: OffsetCache,
}

impl Lattice {
    pub(crate) fn new(
        extent: &[u32],
        periodicity: &Periodicity,
        metric: Metric,
    ) -> Result<Self, SpaceError> {
        let geometry = GridGeometry::new(extent, periodicity)?;
        let offsets = OffsetCache::new(metric, geometry.extent(), geometry.periodic_axes())?;
        Ok(Self { geometry, offsets })
    }

    /// Shape and periodicity.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Neighbourhood metric.
    pub fn metric(&self) -> Metric {
        self.offsets.metric()
    }

    /// The per-space offset memo table.
    pub fn offsets(&self) -> &OffsetCache {
        &self.offsets
    }

    /// Cells within distance `r` of `pos`, origin included.
    pub(crate) fn cells_within(&self, pos: &[i32], r: f64) -> Result<NearbyCells<'_>, SpaceError> {
        let origin_index = self.geometry.index_of(pos)?;
        Ok(NearbyCells::new(
            &self.geometry,
            self.offsets.within_radius(r),
            SmallVec::from_slice(pos),
            origin_index,
            self.offsets.reach_for(r),
        ))
    }

    /// Cells within distance `r` of `pos`, origin excluded.
    pub(crate) fn cells_within_no_origin(
        &self,
        pos: &[i32],
        r: f64,
    ) -> Result<NearbyCells<'_>, SpaceError> {
        let origin_index = self.geometry.index_of(pos)?;
        Ok(NearbyCells::new(
            &self.geometry,
            self.offsets.within_radius_no_origin(r),
            SmallVec::from_slice(pos),
            origin_index,
            self.offsets.reach_for(r),
        ))
    }

    /// Box of cells around `pos` given per-axis ranges. Chebyshev only.
    pub(crate) fn axis_slices(
        &self,
        pos: &[i32],
        ranges: &AxisRanges,
    ) -> Result<AxisSlices<'_>, SpaceError> {
        if self.metric() != Metric::Chebyshev {
            return Err(SpaceError::UnsupportedMetric {
                metric: self.metric(),
                operation: "per-axis range queries",
            });
        }
        self.geometry.index_of(pos)?;
        AxisSlices::new(&self.geometry, pos, ranges)
    }

    /// Cells at exactly distance `floor(r)` from `pos`: the candidate
    /// targets of a random walk step.
    pub(crate) fn shell_cells(&self, pos: &[i32], r: f64) -> Result<Vec<usize>, SpaceError> {
        if self.metric() == Metric::Euclidean {
            return Err(SpaceError::UnsupportedMetric {
                metric: self.metric(),
                operation: "random walk",
            });
        }
        self.geometry.index_of(pos)?;
        let shell = self.offsets.at_radius(r)?;
        Ok(shell
            .iter()
            .filter_map(|offset| self.geometry.shift(pos, offset))
            .collect())
    }

    /// Distance between two cells in the space's metric, taking the short
    /// way round on periodic axes.
    pub fn distance(&self, a: &[i32], b: &[i32]) -> Result<f64, SpaceError> {
        self.geometry.index_of(a)?;
        self.geometry.index_of(b)?;
        Ok(self.metric().distance(
            (0..self.geometry.ndim()).map(|axis| self.geometry.axis_delta(axis, a[axis], b[axis]) as f64),
        ))
    }

    /// Every cell, in flat-index order.
    pub fn positions(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.geometry.cell_count()).map(|index| self.geometry.coord_of(index))
    }

    /// Wrap periodic axes into range; reject out-of-range bounded axes.
    pub fn normalize_position(&self, pos: &[i32]) -> Result<Coord, SpaceError> {
        self.geometry.normalize(pos)
    }
}
