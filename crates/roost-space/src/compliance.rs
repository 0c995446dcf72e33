//! Reusable invariant assertions for the index test modules.
//!
//! Each helper checks one structural property against either a reference
//! model kept by the test or the index's own bookkeeping.

use crate::continuous::ContinuousIndex;
use crate::grid::GridIndex;
use crate::single::GridIndexSingle;
use indexmap::IndexMap;
use roost_core::{AgentId, Coord};

/// Assert that every bucket holds exactly the agents `expected` places there
/// and nothing else.
pub fn assert_grid_matches(grid: &GridIndex, expected: &IndexMap<AgentId, Coord>) {
    let mut seen = 0;
    for pos in grid.positions() {
        for &id in grid.ids_in_position(&pos).unwrap() {
            assert_eq!(
                expected.get(&id),
                Some(&pos),
                "agent {id} found in {pos:?}, expected at {:?}",
                expected.get(&id)
            );
            seen += 1;
        }
    }
    assert_eq!(seen, expected.len(), "bucket total disagrees with placed agents");
}

/// Assert that every slot holds exactly the agent `expected` places there.
pub fn assert_single_matches(grid: &GridIndexSingle, expected: &IndexMap<AgentId, Coord>) {
    for pos in grid.positions() {
        let occupant = grid.id_in_position(&pos).unwrap();
        let wanted = expected
            .iter()
            .find(|(_, at)| **at == pos)
            .map(|(&id, _)| id);
        assert_eq!(occupant, wanted, "slot {pos:?} disagrees with placed agents");
    }
    assert_eq!(grid.occupancy(), expected.len());
}

/// Assert that each tracked agent is filed in the cell containing its
/// position, and that the grid holds nobody else.
pub fn assert_continuous_consistent(space: &ContinuousIndex) {
    for id in space.ids() {
        let pos = space.position(id).unwrap();
        let cell = space.to_cell(pos);
        assert!(
            space.grid().ids_in_position(&cell).unwrap().contains(&id),
            "agent {id} at {pos:?} missing from cell {cell:?}"
        );
    }
    assert_eq!(space.grid().occupancy(), space.len());
}

/// Assert `distance(a, a) == 0` and `distance(a, b) == distance(b, a)`.
pub fn assert_distance_symmetric(grid: &GridIndex) {
    let cells: Vec<Coord> = grid.positions().collect();
    for a in &cells {
        assert_eq!(grid.distance(a, a), Ok(0.0), "distance({a:?}, {a:?})");
        for b in &cells {
            assert_eq!(
                grid.distance(a, b),
                grid.distance(b, a),
                "distance({a:?}, {b:?}) is asymmetric"
            );
        }
    }
}

/// Assert that `b` near `a` implies `a` near `b`, and that each cell
/// appears at most once in a neighbourhood.
pub fn assert_neighbourhood_symmetric(grid: &GridIndex, r: f64) {
    for a in grid.positions() {
        let near: Vec<Coord> = grid.nearby_positions(&a, r).unwrap().collect();
        let mut unique = near.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), near.len(), "duplicate cells around {a:?} at r={r}");
        for b in &near {
            assert!(
                grid.nearby_positions(b, r).unwrap().any(|c| c == a),
                "{b:?} is near {a:?} but not the reverse at r={r}"
            );
        }
    }
}
