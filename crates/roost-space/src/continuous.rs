//! Continuous space accelerated by a euclidean [`GridIndex`].
//!
//! Positions are real vectors in `[0, extent_i)`. Each agent is also filed
//! in the grid cell containing it, so neighbour queries only look at the
//! cells a search radius can reach. The cell-level answer is a superset of
//! the true neighbourhood; [`ContinuousIndex::nearby_ids_exact`] filters
//! it by real distance.

use crate::error::SpaceError;
use crate::grid::GridIndex;
use crate::nearby::NearbyIds;
use indexmap::IndexMap;
use rand::Rng;
use roost_core::{AgentId, Coord, Metric, Periodicity, Point};
use smallvec::SmallVec;
use tracing::debug;

/// Relative tolerance when checking that spacing divides the extent.
const SPACING_TOLERANCE: f64 = 1e-9;

/// The closest agent found by [`ContinuousIndex::nearest_neighbor`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    /// The neighbour.
    pub id: AgentId,
    /// Euclidean distance to it.
    pub distance: f64,
}

/// Continuous D-dimensional space with grid-accelerated neighbour search.
///
/// # Examples
///
/// ```
/// use roost_core::AgentId;
/// use roost_space::ContinuousIndex;
///
/// let mut space = ContinuousIndex::new(&[10.0, 10.0], 1.0, true).unwrap();
/// space.insert(AgentId(1), &[0.1, 0.1]).unwrap();
/// space.insert(AgentId(2), &[9.95, 0.05]).unwrap();
///
/// // The second agent is 0.18 away across the periodic seam.
/// let near: Vec<_> = space.nearby_ids_exact(&[0.1, 0.1], 0.3).unwrap().collect();
/// assert!(near.contains(&AgentId(2)));
/// ```
#[derive(Clone, Debug)]
pub struct ContinuousIndex {
    extent: Point,
    spacing: f64,
    grid: GridIndex,
    positions: IndexMap<AgentId, Point>,
}

impl ContinuousIndex {
    /// Create an empty space.
    ///
    /// `spacing` is the side of an accelerating grid cell and must divide
    /// every extent evenly.
    pub fn new(
        extent: &[f64],
        spacing: f64,
        periodicity: impl Into<Periodicity>,
    ) -> Result<Self, SpaceError> {
        if extent.is_empty() || extent.iter().any(|&e| !(e.is_finite() && e > 0.0)) {
            return Err(SpaceError::EmptySpace);
        }
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(SpaceError::InvalidSpacing {
                reason: format!("spacing must be positive and finite, got {spacing}"),
            });
        }
        let cells = extent
            .iter()
            .map(|&e| cells_along(e, spacing))
            .collect::<Result<SmallVec<[u32; 4]>, _>>()?;
        let grid = GridIndex::new(&cells, periodicity, Metric::Euclidean)?;
        debug!(
            extent = ?extent,
            spacing,
            cells = ?cells.as_slice(),
            "continuous space created"
        );
        Ok(Self {
            extent: SmallVec::from_slice(extent),
            spacing,
            grid,
            positions: IndexMap::new(),
        })
    }

    /// Side length of the space along every axis.
    pub fn extent(&self) -> &[f64] {
        &self.extent
    }

    /// Side of an accelerating grid cell.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.extent.len()
    }

    /// The accelerating grid.
    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    fn is_periodic(&self, axis: usize) -> bool {
        self.grid.lattice().geometry().is_periodic(axis)
    }

    fn bounds(&self) -> String {
        self.extent
            .iter()
            .map(|e| format!("[0, {e})"))
            .collect::<Vec<_>>()
            .join(" x ")
    }

    fn check_point(&self, pos: &[f64]) -> Result<(), SpaceError> {
        if pos.len() != self.ndim() {
            return Err(SpaceError::DimensionMismatch {
                expected: self.ndim(),
                got: pos.len(),
            });
        }
        let inside = pos
            .iter()
            .zip(&self.extent)
            .all(|(&p, &e)| (0.0..e).contains(&p));
        if !inside {
            return Err(SpaceError::PointOutOfBounds {
                point: SmallVec::from_slice(pos),
                bounds: self.bounds(),
            });
        }
        Ok(())
    }

    /// The grid cell containing `pos`: `floor(pos / spacing) + 1` per axis.
    ///
    /// `pos` must be in bounds.
    pub fn to_cell(&self, pos: &[f64]) -> Coord {
        pos.iter()
            .zip(self.grid.lattice().geometry().extent())
            .map(|(&p, &len)| ((p / self.spacing).floor() as i32 + 1).clamp(1, len))
            .collect()
    }

    /// Centre of a grid cell: `(cell - 0.5) * spacing` per axis.
    pub fn cell_center(&self, cell: &[i32]) -> Point {
        cell.iter()
            .map(|&c| (c as f64 - 0.5) * self.spacing)
            .collect()
    }

    // ── Placement ───────────────────────────────────────────────

    /// Start tracking `id` at `pos`.
    pub fn insert(&mut self, id: AgentId, pos: &[f64]) -> Result<(), SpaceError> {
        self.check_point(pos)?;
        if self.positions.contains_key(&id) {
            return Err(SpaceError::DuplicateAgent { id });
        }
        let cell = self.to_cell(pos);
        self.grid.insert(id, &cell)?;
        self.positions.insert(id, SmallVec::from_slice(pos));
        Ok(())
    }

    /// Stop tracking `id`, returning its last position.
    ///
    /// Constant time: the most recently inserted agent takes the removed
    /// agent's place in [`ids`](Self::ids) order.
    pub fn remove(&mut self, id: AgentId) -> Result<Point, SpaceError> {
        let cell = match self.positions.get(&id) {
            Some(pos) => self.to_cell(pos),
            None => return Err(SpaceError::AgentNotFound { id }),
        };
        self.grid.remove(id, &cell)?;
        self.positions
            .swap_remove(&id)
            .ok_or(SpaceError::AgentNotFound { id })
    }

    /// Move `id` to `to`, refiling it in the grid if its cell changes.
    pub fn move_agent(&mut self, id: AgentId, to: &[f64]) -> Result<(), SpaceError> {
        self.check_point(to)?;
        let from = match self.positions.get(&id) {
            Some(pos) => self.to_cell(pos),
            None => return Err(SpaceError::AgentNotFound { id }),
        };
        let target = self.to_cell(to);
        self.grid.move_agent(id, &from, &target)?;
        if let Some(pos) = self.positions.get_mut(&id) {
            pos.clear();
            pos.extend_from_slice(to);
        }
        Ok(())
    }

    // ── Tracking ────────────────────────────────────────────────

    /// Current position of `id`.
    pub fn position(&self, id: AgentId) -> Option<&[f64]> {
        self.positions.get(&id).map(|pos| pos.as_slice())
    }

    /// Tracked ids in insertion order, as permuted by [`remove`](Self::remove).
    pub fn ids(&self) -> impl ExactSizeIterator<Item = AgentId> + '_ {
        self.positions.keys().copied()
    }

    /// Number of tracked agents.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// `true` if no agent is tracked.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Euclidean distance, the short way round on periodic axes.
    pub fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64, SpaceError> {
        for got in [a.len(), b.len()] {
            if got != self.ndim() {
                return Err(SpaceError::DimensionMismatch {
                    expected: self.ndim(),
                    got,
                });
            }
        }
        Ok(self.distance_unchecked(a, b))
    }

    fn distance_unchecked(&self, a: &[f64], b: &[f64]) -> f64 {
        Metric::Euclidean.distance((0..self.ndim()).map(|axis| {
            let direct = (a[axis] - b[axis]).abs();
            if self.is_periodic(axis) {
                direct.min(self.extent[axis] - direct)
            } else {
                direct
            }
        }))
    }

    /// Grid radius that reaches every cell holding an agent within `r` of
    /// `pos`.
    ///
    /// The query cell's centre may be up to `delta` from `pos`, and any
    /// candidate may sit up to half a cell diagonal from its own centre.
    fn grid_radius(&self, pos: &[f64], r: f64) -> f64 {
        let center = self.cell_center(&self.to_cell(pos));
        let delta = Metric::Euclidean.distance(pos.iter().zip(&center).map(|(&p, &c)| p - c));
        (r + delta) / self.spacing + (self.ndim() as f64).sqrt() / 2.0
    }

    /// Every agent within `r` of `pos`, possibly with some farther ones.
    ///
    /// Never misses an agent within `r`. Cheaper than
    /// [`nearby_ids_exact`](Self::nearby_ids_exact) when the caller filters
    /// anyway.
    pub fn nearby_ids(&self, pos: &[f64], r: f64) -> Result<NearbyIds<'_>, SpaceError> {
        self.check_point(pos)?;
        let cell = self.to_cell(pos);
        self.grid.nearby_ids(&cell, self.grid_radius(pos, r))
    }

    /// Exactly the agents within `r` of `pos`.
    pub fn nearby_ids_exact(
        &self,
        pos: &[f64],
        r: f64,
    ) -> Result<impl Iterator<Item = AgentId> + '_, SpaceError> {
        let origin: Point = SmallVec::from_slice(pos);
        Ok(self.nearby_ids(pos, r)?.filter(move |id| {
            self.positions
                .get(id)
                .is_some_and(|other| self.distance_unchecked(&origin, other) <= r)
        }))
    }

    fn tracked(&self, id: AgentId) -> Result<Point, SpaceError> {
        self.positions
            .get(&id)
            .cloned()
            .ok_or(SpaceError::AgentNotFound { id })
    }

    /// [`nearby_ids`](Self::nearby_ids) around a tracked agent, without the
    /// agent itself.
    pub fn nearby_ids_of(
        &self,
        id: AgentId,
        r: f64,
    ) -> Result<impl Iterator<Item = AgentId> + '_, SpaceError> {
        let pos = self.tracked(id)?;
        Ok(self.nearby_ids(&pos, r)?.filter(move |&other| other != id))
    }

    /// [`nearby_ids_exact`](Self::nearby_ids_exact) around a tracked agent,
    /// without the agent itself.
    pub fn nearby_ids_exact_of(
        &self,
        id: AgentId,
        r: f64,
    ) -> Result<impl Iterator<Item = AgentId> + '_, SpaceError> {
        let pos = self.tracked(id)?;
        Ok(self.nearby_ids_exact(&pos, r)?.filter(move |&other| other != id))
    }

    /// The closest other agent within `r` of `id`, or `None`.
    ///
    /// Ties go to the candidate met first.
    pub fn nearest_neighbor(&self, id: AgentId, r: f64) -> Result<Option<Neighbor>, SpaceError> {
        let pos = self.tracked(id)?;
        let mut best: Option<Neighbor> = None;
        for other in self.nearby_ids_of(id, r)? {
            let Some(at) = self.positions.get(&other) else {
                continue;
            };
            let distance = self.distance_unchecked(&pos, at);
            if distance <= r && best.is_none_or(|b| distance < b.distance) {
                best = Some(Neighbor { id: other, distance });
            }
        }
        Ok(best)
    }

    // ── Sampling ────────────────────────────────────────────────

    /// A uniformly random position.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        self.extent
            .iter()
            .map(|&e| rng.random_range(0.0..e))
            .collect()
    }

    /// Wrap periodic axes into `[0, extent)`; reject out-of-range bounded
    /// axes.
    pub fn normalize_position(&self, pos: &[f64]) -> Result<Point, SpaceError> {
        if pos.len() != self.ndim() {
            return Err(SpaceError::DimensionMismatch {
                expected: self.ndim(),
                got: pos.len(),
            });
        }
        let out_of_bounds = || SpaceError::PointOutOfBounds {
            point: SmallVec::from_slice(pos),
            bounds: self.bounds(),
        };
        pos.iter()
            .enumerate()
            .map(|(axis, &p)| {
                let e = self.extent[axis];
                if (0.0..e).contains(&p) {
                    Ok(p)
                } else if self.is_periodic(axis) && p.is_finite() {
                    let wrapped = p.rem_euclid(e);
                    // rem_euclid can round up to `e` for tiny negative inputs.
                    Ok(if wrapped >= e { 0.0 } else { wrapped })
                } else {
                    Err(out_of_bounds())
                }
            })
            .collect()
    }
}

/// Number of grid cells along an axis of length `extent`.
fn cells_along(extent: f64, spacing: f64) -> Result<u32, SpaceError> {
    let ratio = extent / spacing;
    let cells = ratio.round();
    if cells < 1.0 || (ratio - cells).abs() > SPACING_TOLERANCE * cells.max(1.0) {
        return Err(SpaceError::InvalidSpacing {
            reason: format!("spacing {spacing} does not evenly divide extent {extent}"),
        });
    }
    if cells > u32::MAX as f64 {
        return Err(SpaceError::TooManyCells);
    }
    Ok(cells as u32)
}
