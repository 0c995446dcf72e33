//! Lazy neighbourhood iterators.
//!
//! Query results are iterator objects that hold a borrow of the index's
//! storage, a shared handle to the cached offset list, and the origin.
//! Ids are produced one at a time without an intermediate list. Because
//! the storage is borrowed, the index cannot be mutated while a result is
//! being consumed.

use crate::error::SpaceError;
use crate::geometry::GridGeometry;
use crate::offsets::Offsets;
use roost_core::{AgentId, Coord};
use smallvec::SmallVec;
use std::ops::RangeInclusive;

/// The ids stored in one cell of a multi-occupancy grid.
pub type Bucket = SmallVec<[AgentId; 2]>;

/// Flat indices of the cells around an origin, in offset order.
///
/// Runs on one of two equivalent paths, chosen once per query: when the
/// origin is at least the offsets' reach away from every wall, offsets are
/// added to the origin's flat index directly; otherwise each offset is
/// wrapped (periodic axes) or dropped (bounded axes).
#[derive(Clone, Debug)]
pub struct NearbyCells<'a> {
    geometry: &'a GridGeometry,
    offsets: Offsets,
    origin: Coord,
    origin_index: usize,
    next: usize,
    interior: bool,
}

impl<'a> NearbyCells<'a> {
    pub(crate) fn new(
        geometry: &'a GridGeometry,
        offsets: Offsets,
        origin: Coord,
        origin_index: usize,
        reach: i64,
    ) -> Self {
        let interior = geometry.is_interior(&origin, reach);
        Self {
            geometry,
            offsets,
            origin,
            origin_index,
            next: 0,
            interior,
        }
    }

    /// Whether this query takes the unchecked interior path.
    pub fn is_interior(&self) -> bool {
        self.interior
    }

    /// Route every offset through the wrap/clip path.
    #[cfg(test)]
    pub(crate) fn force_checked(mut self) -> Self {
        self.interior = false;
        self
    }
}

impl Iterator for NearbyCells<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while let Some(offset) = self.offsets.get(self.next) {
            self.next += 1;
            if self.interior {
                return Some(self.geometry.shift_unchecked(self.origin_index, offset));
            }
            if let Some(index) = self.geometry.shift(&self.origin, offset) {
                return Some(index);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.offsets.len() - self.next;
        if self.interior {
            (remaining, Some(remaining))
        } else {
            (0, Some(remaining))
        }
    }
}

/// Per-axis ranges for a box-shaped Chebyshev query.
///
/// Ranges are offsets relative to the query position.
///
/// # Examples
///
/// ```
/// use roost_space::AxisRanges;
///
/// // Two cells either way along x, none along y: a horizontal strip.
/// let strip = AxisRanges::symmetric([2, 0]);
///
/// // Only constrain axis 1; axis 0 spans the whole grid.
/// let column = AxisRanges::Explicit(vec![(1, -1..=1)]);
/// # let _ = (strip, column);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AxisRanges {
    /// Reach `r_i` on axis `i`: offsets `-r_i..=r_i`. One entry per axis.
    Symmetric(SmallVec<[u32; 4]>),
    /// `(axis, offsets)` pairs with 0-based axis indices. Unlisted axes
    /// span the whole axis.
    Explicit(Vec<(usize, RangeInclusive<i32>)>),
}

impl AxisRanges {
    /// Symmetric reach per axis.
    pub fn symmetric(reach: impl AsRef<[u32]>) -> Self {
        Self::Symmetric(SmallVec::from_slice(reach.as_ref()))
    }
}

/// Flat indices of an axis-aligned box, built by slicing each axis
/// independently instead of enumerating offsets.
#[derive(Clone, Debug)]
pub struct AxisSlices<'a> {
    geometry: &'a GridGeometry,
    axes: SmallVec<[Vec<i32>; 4]>,
    cursor: SmallVec<[usize; 4]>,
    done: bool,
}

impl<'a> AxisSlices<'a> {
    pub(crate) fn new(
        geometry: &'a GridGeometry,
        origin: &[i32],
        ranges: &AxisRanges,
    ) -> Result<Self, SpaceError> {
        let ndim = geometry.ndim();
        let mut spans: SmallVec<[Option<(i64, i64)>; 4]> = SmallVec::from_elem(None, ndim);
        match ranges {
            AxisRanges::Symmetric(reach) => {
                if reach.len() != ndim {
                    return Err(SpaceError::DimensionMismatch {
                        expected: ndim,
                        got: reach.len(),
                    });
                }
                for (span, &r) in spans.iter_mut().zip(reach) {
                    *span = Some((-(r as i64), r as i64));
                }
            }
            AxisRanges::Explicit(list) => {
                for (axis, range) in list {
                    let slot = spans.get_mut(*axis).ok_or_else(|| SpaceError::InvalidRange {
                        reason: format!("axis {axis} does not exist in a {ndim}-dimensional grid"),
                    })?;
                    if slot.is_some() {
                        return Err(SpaceError::InvalidRange {
                            reason: format!("axis {axis} listed more than once"),
                        });
                    }
                    if range.start() > range.end() {
                        return Err(SpaceError::InvalidRange {
                            reason: format!("empty range {range:?} on axis {axis}"),
                        });
                    }
                    *slot = Some((*range.start() as i64, *range.end() as i64));
                }
            }
        }

        let axes: SmallVec<[Vec<i32>; 4]> = spans
            .iter()
            .enumerate()
            .map(|(axis, span)| axis_cells(geometry, axis, origin[axis], *span))
            .collect();
        let done = axes.iter().any(Vec::is_empty);
        Ok(Self {
            geometry,
            cursor: SmallVec::from_elem(0, ndim),
            axes,
            done,
        })
    }
}

/// The in-grid values of one axis covered by `origin + span`.
fn axis_cells(geometry: &GridGeometry, axis: usize, origin: i32, span: Option<(i64, i64)>) -> Vec<i32> {
    let len = geometry.extent()[axis] as i64;
    let Some((lo, hi)) = span else {
        return (1..=len as i32).collect();
    };
    let (first, last) = (origin as i64 + lo, origin as i64 + hi);
    if geometry.is_periodic(axis) {
        if last - first + 1 >= len {
            return (1..=len as i32).collect();
        }
        (first..=last)
            .filter_map(|c| geometry.resolve_axis(axis, c))
            .collect()
    } else {
        (first.max(1)..=last.min(len)).map(|c| c as i32).collect()
    }
}

impl Iterator for AxisSlices<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.done {
            return None;
        }
        let coord: Coord = self
            .axes
            .iter()
            .zip(&self.cursor)
            .map(|(cells, &i)| cells[i])
            .collect();
        // Odometer: last axis fastest.
        let mut axis = self.axes.len();
        loop {
            if axis == 0 {
                self.done = true;
                break;
            }
            axis -= 1;
            self.cursor[axis] += 1;
            if self.cursor[axis] < self.axes[axis].len() {
                break;
            }
            self.cursor[axis] = 0;
        }
        Some(self.geometry.index_unchecked(&coord))
    }
}

/// Ids stored in a sequence of cells of a multi-occupancy grid.
///
/// Buckets are flattened in cell order; ids within a bucket keep their
/// insertion order.
#[derive(Clone, Debug)]
pub struct NearbyIds<'a, C = NearbyCells<'a>> {
    cells: C,
    buckets: &'a [Bucket],
    current: std::slice::Iter<'a, AgentId>,
}

impl<'a, C> NearbyIds<'a, C> {
    pub(crate) fn new(cells: C, buckets: &'a [Bucket]) -> Self {
        Self {
            cells,
            buckets,
            current: Default::default(),
        }
    }
}

impl<C: Iterator<Item = usize>> Iterator for NearbyIds<'_, C> {
    type Item = AgentId;

    fn next(&mut self) -> Option<AgentId> {
        loop {
            if let Some(&id) = self.current.next() {
                return Some(id);
            }
            let index = self.cells.next()?;
            self.current = self.buckets[index].iter();
        }
    }
}

/// Occupants of a sequence of cells of a single-occupancy grid.
///
/// Empty cells (sentinel id 0) are skipped.
#[derive(Clone, Debug)]
pub struct NearbyOccupants<'a, C = NearbyCells<'a>> {
    cells: C,
    slots: &'a [AgentId],
}

impl<'a, C> NearbyOccupants<'a, C> {
    pub(crate) fn new(cells: C, slots: &'a [AgentId]) -> Self {
        Self { cells, slots }
    }
}

impl<C: Iterator<Item = usize>> Iterator for NearbyOccupants<'_, C> {
    type Item = AgentId;

    fn next(&mut self) -> Option<AgentId> {
        loop {
            let id = self.slots[self.cells.next()?];
            if !id.is_sentinel() {
                return Some(id);
            }
        }
    }
}
