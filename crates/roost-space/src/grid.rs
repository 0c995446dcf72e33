//! Multi-occupancy grid: every cell holds a bucket of agent ids.

use crate::error::SpaceError;
use crate::lattice::Lattice;
use crate::nearby::{AxisRanges, AxisSlices, Bucket, NearbyIds};
use rand::seq::IndexedRandom;
use rand::Rng;
use roost_core::{AgentId, Coord, Metric, Periodicity};

/// Attempts at sampling an empty cell before falling back to a full scan.
pub(crate) const RANDOM_EMPTY_TRIES: usize = 16;

/// A D-dimensional grid of id buckets.
///
/// Any number of agents may share a cell. The index stores ids only; the
/// caller owns the agents and is responsible for passing the position an
/// agent was inserted at when removing or moving it.
///
/// # Examples
///
/// ```
/// use roost_core::{AgentId, Metric};
/// use roost_space::GridIndex;
///
/// let mut grid = GridIndex::new(&[10, 10], false, Metric::Chebyshev).unwrap();
/// grid.insert(AgentId(1), &[5, 5]).unwrap();
/// grid.insert(AgentId(2), &[5, 6]).unwrap();
///
/// let near: Vec<_> = grid.nearby_ids(&[5, 5], 1.0).unwrap().collect();
/// assert_eq!(near, vec![AgentId(1), AgentId(2)]);
/// ```
#[derive(Clone, Debug)]
pub struct GridIndex {
    lattice: Lattice,
    buckets: Vec<Bucket>,
}

impl GridIndex {
    /// Create an empty grid.
    ///
    /// `periodicity` is either one flag for every axis or one flag per axis.
    pub fn new(
        extent: &[u32],
        periodicity: impl Into<Periodicity>,
        metric: Metric,
    ) -> Result<Self, SpaceError> {
        let lattice = Lattice::new(extent, &periodicity.into(), metric)?;
        let buckets = vec![Bucket::new(); lattice.geometry().cell_count()];
        Ok(Self { lattice, buckets })
    }

    /// Shape, metric and offset cache.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Number of ids stored across all cells.
    pub fn occupancy(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.len()).sum()
    }

    // ── Placement ───────────────────────────────────────────────

    /// Append `id` to the bucket at `pos`. Ids are not checked for
    /// duplicates.
    pub fn insert(&mut self, id: AgentId, pos: &[i32]) -> Result<(), SpaceError> {
        let index = self.lattice.geometry().index_of(pos)?;
        self.buckets[index].push(id);
        Ok(())
    }

    /// Delete `id` from the bucket at `pos`.
    pub fn remove(&mut self, id: AgentId, pos: &[i32]) -> Result<(), SpaceError> {
        let index = self.lattice.geometry().index_of(pos)?;
        take(&mut self.buckets[index], id)
    }

    /// Move `id` from `from` to `to`. A no-op when both are the same cell.
    ///
    /// Both positions are validated before anything is touched, so a failed
    /// move leaves the grid unchanged.
    pub fn move_agent(&mut self, id: AgentId, from: &[i32], to: &[i32]) -> Result<(), SpaceError> {
        let target = self.lattice.geometry().index_of(to)?;
        let source = self.lattice.geometry().index_of(from)?;
        if source == target {
            return Ok(());
        }
        take(&mut self.buckets[source], id)?;
        self.buckets[target].push(id);
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Ids stored in the cell at `pos`, in insertion order.
    pub fn ids_in_position(&self, pos: &[i32]) -> Result<&[AgentId], SpaceError> {
        let index = self.lattice.geometry().index_of(pos)?;
        Ok(&self.buckets[index])
    }

    /// `true` if no id is stored at `pos`.
    pub fn is_empty(&self, pos: &[i32]) -> Result<bool, SpaceError> {
        Ok(self.ids_in_position(pos)?.is_empty())
    }

    /// Ids in every cell within distance `r` of `pos`, the origin cell
    /// included.
    ///
    /// Cells come in offset order; ids within a cell in insertion order.
    pub fn nearby_ids(&self, pos: &[i32], r: f64) -> Result<NearbyIds<'_>, SpaceError> {
        let cells = self.lattice.cells_within(pos, r)?;
        Ok(NearbyIds::new(cells, &self.buckets))
    }

    /// Like [`nearby_ids`](Self::nearby_ids), without `id` itself.
    pub fn nearby_ids_of(
        &self,
        id: AgentId,
        pos: &[i32],
        r: f64,
    ) -> Result<impl Iterator<Item = AgentId> + '_, SpaceError> {
        Ok(self.nearby_ids(pos, r)?.filter(move |&other| other != id))
    }

    /// Positions of the cells within distance `r` of `pos`, origin excluded.
    pub fn nearby_positions(
        &self,
        pos: &[i32],
        r: f64,
    ) -> Result<impl Iterator<Item = Coord> + '_, SpaceError> {
        let geometry = self.lattice.geometry();
        let cells = self.lattice.cells_within_no_origin(pos, r)?;
        Ok(cells.map(move |index| geometry.coord_of(index)))
    }

    /// Ids inside an axis-aligned box around `pos`. Chebyshev grids only.
    pub fn nearby_ids_in_ranges(
        &self,
        pos: &[i32],
        ranges: &AxisRanges,
    ) -> Result<NearbyIds<'_, AxisSlices<'_>>, SpaceError> {
        let cells = self.lattice.axis_slices(pos, ranges)?;
        Ok(NearbyIds::new(cells, &self.buckets))
    }

    /// Every cell, in flat-index order.
    pub fn positions(&self) -> impl Iterator<Item = Coord> + '_ {
        self.lattice.positions()
    }

    /// Cells with an empty bucket, in flat-index order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Coord> + '_ {
        let geometry = self.lattice.geometry();
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, bucket)| bucket.is_empty())
            .map(move |(index, _)| geometry.coord_of(index))
    }

    // ── Sampling ────────────────────────────────────────────────

    /// A uniformly random cell.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Coord {
        self.lattice.geometry().random_coord(rng)
    }

    /// A uniformly random empty cell, or `None` if every cell is occupied.
    ///
    /// Samples a few cells at random first and only scans the grid when the
    /// grid is crowded.
    pub fn random_empty<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coord> {
        let geometry = self.lattice.geometry();
        for _ in 0..RANDOM_EMPTY_TRIES {
            let index = rng.random_range(0..geometry.cell_count());
            if self.buckets[index].is_empty() {
                return Some(geometry.coord_of(index));
            }
        }
        let empty: Vec<usize> = (0..geometry.cell_count())
            .filter(|&index| self.buckets[index].is_empty())
            .collect();
        empty.choose(rng).map(|&index| geometry.coord_of(index))
    }

    /// A uniformly random cell at exactly distance `floor(r)` from `pos`, or
    /// `None` when no such cell exists. Euclidean grids are rejected.
    pub fn random_walk_target<R: Rng + ?Sized>(
        &self,
        pos: &[i32],
        r: f64,
        rng: &mut R,
    ) -> Result<Option<Coord>, SpaceError> {
        let targets = self.lattice.shell_cells(pos, r)?;
        Ok(targets
            .choose(rng)
            .map(|&index| self.lattice.geometry().coord_of(index)))
    }

    // ── Geometry ────────────────────────────────────────────────

    /// Wrap periodic axes into range; reject out-of-range bounded axes.
    pub fn normalize_position(&self, pos: &[i32]) -> Result<Coord, SpaceError> {
        self.lattice.normalize_position(pos)
    }

    /// Distance between two cells in the grid's metric.
    pub fn distance(&self, a: &[i32], b: &[i32]) -> Result<f64, SpaceError> {
        self.lattice.distance(a, b)
    }
}

/// Remove the first occurrence of `id` from `bucket`, keeping the order of
/// the rest.
fn take(bucket: &mut Bucket, id: AgentId) -> Result<(), SpaceError> {
    let at = bucket
        .iter()
        .position(|&other| other == id)
        .ok_or(SpaceError::AgentNotFound { id })?;
    bucket.remove(at);
    Ok(())
}
