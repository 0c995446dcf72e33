//! Single-occupancy grid: at most one agent per cell.

use crate::error::SpaceError;
use crate::grid::RANDOM_EMPTY_TRIES;
use crate::lattice::Lattice;
use crate::nearby::{AxisRanges, AxisSlices, NearbyOccupants};
use rand::seq::IndexedRandom;
use rand::Rng;
use roost_core::{AgentId, Coord, Metric, Periodicity};

/// A D-dimensional grid storing one id per cell, [`AgentId::EMPTY`] for
/// vacant cells.
#[derive(Clone, Debug)]
pub struct GridIndexSingle {
    lattice: Lattice,
    slots: Vec<AgentId>,
}

impl GridIndexSingle {
    /// Create a grid with every cell vacant.
    pub fn new(
        extent: &[u32],
        periodicity: impl Into<Periodicity>,
        metric: Metric,
    ) -> Result<Self, SpaceError> {
        let lattice = Lattice::new(extent, &periodicity.into(), metric)?;
        let slots = vec![AgentId::EMPTY; lattice.geometry().cell_count()];
        Ok(Self { lattice, slots })
    }

    /// Shape, metric and offset cache.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Number of occupied cells.
    pub fn occupancy(&self) -> usize {
        self.slots.iter().filter(|id| !id.is_sentinel()).count()
    }

    fn occupied_index(&self, id: AgentId, pos: &[i32]) -> Result<usize, SpaceError> {
        let index = self.lattice.geometry().index_of(pos)?;
        if self.slots[index] != id {
            return Err(SpaceError::AgentNotFound { id });
        }
        Ok(index)
    }

    fn vacant_index(&self, pos: &[i32]) -> Result<usize, SpaceError> {
        let index = self.lattice.geometry().index_of(pos)?;
        let occupant = self.slots[index];
        if !occupant.is_sentinel() {
            return Err(SpaceError::CellOccupied {
                coord: pos.into(),
                occupant,
            });
        }
        Ok(index)
    }

    // ── Placement ───────────────────────────────────────────────

    /// Place `id` at `pos`. Fails if the cell is taken; the occupant stays.
    pub fn insert(&mut self, id: AgentId, pos: &[i32]) -> Result<(), SpaceError> {
        if id.is_sentinel() {
            return Err(SpaceError::ReservedId);
        }
        let index = self.vacant_index(pos)?;
        self.slots[index] = id;
        Ok(())
    }

    /// Vacate `pos`, which must hold `id`.
    pub fn remove(&mut self, id: AgentId, pos: &[i32]) -> Result<(), SpaceError> {
        let index = self.occupied_index(id, pos)?;
        self.slots[index] = AgentId::EMPTY;
        Ok(())
    }

    /// Move `id` from `from` to a vacant cell `to`. A no-op when both are
    /// the same cell.
    pub fn move_agent(&mut self, id: AgentId, from: &[i32], to: &[i32]) -> Result<(), SpaceError> {
        let source = self.occupied_index(id, from)?;
        if self.lattice.geometry().index_of(to)? == source {
            return Ok(());
        }
        let target = self.vacant_index(to)?;
        self.slots[source] = AgentId::EMPTY;
        self.slots[target] = id;
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    /// The agent at `pos`, if any.
    pub fn id_in_position(&self, pos: &[i32]) -> Result<Option<AgentId>, SpaceError> {
        let index = self.lattice.geometry().index_of(pos)?;
        let id = self.slots[index];
        Ok((!id.is_sentinel()).then_some(id))
    }

    /// `true` if `pos` is vacant.
    pub fn is_empty(&self, pos: &[i32]) -> Result<bool, SpaceError> {
        let index = self.lattice.geometry().index_of(pos)?;
        Ok(self.slots[index].is_sentinel())
    }

    /// Agents within distance `r` of `pos`, the origin cell included.
    pub fn nearby_ids(&self, pos: &[i32], r: f64) -> Result<NearbyOccupants<'_>, SpaceError> {
        let cells = self.lattice.cells_within(pos, r)?;
        Ok(NearbyOccupants::new(cells, &self.slots))
    }

    /// Agents within distance `r` of `pos`, the origin cell excluded.
    ///
    /// With one agent per cell, skipping the origin cell is exactly skipping
    /// the agent that stands there.
    pub fn nearby_ids_of(&self, pos: &[i32], r: f64) -> Result<NearbyOccupants<'_>, SpaceError> {
        let cells = self.lattice.cells_within_no_origin(pos, r)?;
        Ok(NearbyOccupants::new(cells, &self.slots))
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

    /// Agents inside an axis-aligned box around `pos`. Chebyshev grids only.
    pub fn nearby_ids_in_ranges(
        &self,
        pos: &[i32],
        ranges: &AxisRanges,
    ) -> Result<NearbyOccupants<'_, AxisSlices<'_>>, SpaceError> {
        let cells = self.lattice.axis_slices(pos, ranges)?;
        Ok(NearbyOccupants::new(cells, &self.slots))
    }

    /// Every cell, in flat-index order.
    pub fn positions(&self) -> impl Iterator<Item = Coord> + '_ {
        self.lattice.positions()
    }

    /// Vacant cells, in flat-index order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Coord> + '_ {
        let geometry = self.lattice.geometry();
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, id)| id.is_sentinel())
            .map(move |(index, _)| geometry.coord_of(index))
    }

    // ── Sampling ────────────────────────────────────────────────

    /// A uniformly random cell, occupied or not.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Coord {
        self.lattice.geometry().random_coord(rng)
    }

    /// A uniformly random vacant cell, or `None` if the grid is full.
    pub fn random_empty<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coord> {
        let geometry = self.lattice.geometry();
        for _ in 0..RANDOM_EMPTY_TRIES {
            let index = rng.random_range(0..geometry.cell_count());
            if self.slots[index].is_sentinel() {
                return Some(geometry.coord_of(index));
            }
        }
        let vacant: Vec<usize> = (0..geometry.cell_count())
            .filter(|&index| self.slots[index].is_sentinel())
            .collect();
        vacant.choose(rng).map(|&index| geometry.coord_of(index))
    }

    /// A uniformly random vacant cell at exactly distance `floor(r)` from
    /// `pos`, or `None` when every such cell is taken.
    pub fn random_walk_target<R: Rng + ?Sized>(
        &self,
        pos: &[i32],
        r: f64,
        rng: &mut R,
    ) -> Result<Option<Coord>, SpaceError> {
        let mut targets = self.lattice.shell_cells(pos, r)?;
        targets.retain(|&index| self.slots[index].is_sentinel());
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use indexmap::IndexMap;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use smallvec::smallvec;

    fn grid(extent: &[u32], periodic: bool) -> GridIndexSingle {
        GridIndexSingle::new(extent, periodic, Metric::Chebyshev).unwrap()
    }

    // ── Placement ───────────────────────────────────────────────

    #[test]
    fn occupied_cell_rejects_insert_and_keeps_occupant() {
        let mut g = grid(&[5, 5], false);
        g.insert(AgentId(4), &[2, 2]).unwrap();
        assert_eq!(
            g.insert(AgentId(9), &[2, 2]),
            Err(SpaceError::CellOccupied {
                coord: smallvec![2, 2],
                occupant: AgentId(4),
            })
        );
        assert_eq!(g.id_in_position(&[2, 2]), Ok(Some(AgentId(4))));
    }

    #[test]
    fn sentinel_id_is_reserved() {
        let mut g = grid(&[3], false);
        assert_eq!(g.insert(AgentId::EMPTY, &[1]), Err(SpaceError::ReservedId));
        assert_eq!(g.is_empty(&[1]), Ok(true));
    }

    #[test]
    fn negative_ids_are_allowed() {
        let mut g = grid(&[3], false);
        g.insert(AgentId(-7), &[2]).unwrap();
        assert_eq!(g.id_in_position(&[2]), Ok(Some(AgentId(-7))));
    }

    #[test]
    fn remove_checks_occupant() {
        let mut g = grid(&[3, 3], true);
        g.insert(AgentId(1), &[1, 1]).unwrap();
        assert_eq!(
            g.remove(AgentId(2), &[1, 1]),
            Err(SpaceError::AgentNotFound { id: AgentId(2) })
        );
        g.remove(AgentId(1), &[1, 1]).unwrap();
        assert_eq!(g.is_empty(&[1, 1]), Ok(true));
    }

    #[test]
    fn move_into_occupied_cell_changes_nothing() {
        let mut g = grid(&[3, 3], false);
        g.insert(AgentId(1), &[1, 1]).unwrap();
        g.insert(AgentId(2), &[3, 3]).unwrap();
        assert!(matches!(
            g.move_agent(AgentId(1), &[1, 1], &[3, 3]),
            Err(SpaceError::CellOccupied { .. })
        ));
        assert_eq!(g.id_in_position(&[1, 1]), Ok(Some(AgentId(1))));
        assert_eq!(g.id_in_position(&[3, 3]), Ok(Some(AgentId(2))));

        g.move_agent(AgentId(1), &[1, 1], &[2, 2]).unwrap();
        assert_eq!(g.is_empty(&[1, 1]), Ok(true));
        assert_eq!(g.id_in_position(&[2, 2]), Ok(Some(AgentId(1))));
    }

    // ── Neighbourhoods ──────────────────────────────────────────

    #[test]
    fn nearby_ids_skips_vacant_cells() {
        let mut g = grid(&[5, 5], false);
        g.insert(AgentId(1), &[3, 3]).unwrap();
        g.insert(AgentId(2), &[4, 4]).unwrap();
        g.insert(AgentId(3), &[5, 5]).unwrap();
        let got: Vec<AgentId> = g.nearby_ids(&[3, 3], 1.0).unwrap().collect();
        assert_eq!(got, vec![AgentId(1), AgentId(2)]);
        let others: Vec<AgentId> = g.nearby_ids_of(&[3, 3], 1.0).unwrap().collect();
        assert_eq!(others, vec![AgentId(2)]);
    }

    #[test]
    fn periodic_neighbourhood_wraps() {
        let mut g = grid(&[4, 4], true);
        g.insert(AgentId(1), &[1, 1]).unwrap();
        g.insert(AgentId(2), &[4, 4]).unwrap();
        let got: Vec<AgentId> = g.nearby_ids_of(&[1, 1], 1.0).unwrap().collect();
        assert_eq!(got, vec![AgentId(2)]);
    }

    // ── Sampling ────────────────────────────────────────────────

    #[test]
    fn random_walk_offers_only_vacant_targets() {
        let mut g = grid(&[3, 3], false);
        g.insert(AgentId(1), &[2, 2]).unwrap();
        let ring: Vec<Coord> = g.nearby_positions(&[2, 2], 1.0).unwrap().collect();
        for (i, pos) in ring.iter().enumerate().skip(1) {
            g.insert(AgentId(i as i64 + 10), pos).unwrap();
        }
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let target = g.random_walk_target(&[2, 2], 1.0, &mut rng).unwrap();
            assert_eq!(target.as_ref(), Some(&ring[0]));
        }
        g.insert(AgentId(99), &ring[0]).unwrap();
        assert_eq!(g.random_walk_target(&[2, 2], 1.0, &mut rng), Ok(None));
    }

    #[test]
    fn random_empty_on_full_grid_is_none() {
        let mut g = grid(&[2, 2], false);
        let cells: Vec<Coord> = g.positions().collect();
        for (i, pos) in cells.iter().enumerate() {
            g.insert(AgentId(i as i64 + 1), pos).unwrap();
        }
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(g.random_empty(&mut rng), None);
        assert_eq!(g.empty_positions().count(), 0);
    }

    proptest! {
        #[test]
        fn slots_track_random_operations(
            ops in prop::collection::vec((0u8..3, 1i64..8, 1i32..=4, 1i32..=4), 1..80),
        ) {
            let mut g = grid(&[4, 4], true);
            let mut placed: IndexMap<AgentId, Coord> = IndexMap::new();
            for (op, raw, x, y) in ops {
                let id = AgentId(raw);
                let pos: Coord = smallvec![x, y];
                let vacant = g.is_empty(&pos).unwrap();
                match (op, placed.get(&id).cloned()) {
                    (0, None) => {
                        prop_assert_eq!(g.insert(id, &pos).is_ok(), vacant);
                        if vacant {
                            placed.insert(id, pos);
                        }
                    }
                    (1, Some(at)) => {
                        g.remove(id, &at).unwrap();
                        placed.shift_remove(&id);
                    }
                    (2, Some(at)) => {
                        let ok = g.move_agent(id, &at, &pos).is_ok();
                        prop_assert_eq!(ok, vacant || at == pos);
                        if ok {
                            placed.insert(id, pos);
                        }
                    }
                    _ => {}
                }
                compliance::assert_single_matches(&g, &placed);
            }
        }
    }
}
