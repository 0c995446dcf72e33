//! Seeded placement fixtures.
//!
//! Every fixture draws from `ChaCha8Rng::seed_from_u64(seed)`, so the same
//! seed always produces the same layout.

use crate::MockAgents;
use indexmap::IndexMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use roost_core::{AgentId, Coord};
use roost_space::{ContinuousIndex, GridIndex};

/// Deterministic RNG for tests and benches.
pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Place `count` agents (ids `1..=count`) at random points of `space`,
/// registering each in `agents` with a kind in `0..kinds`.
pub fn scatter_points(
    space: &mut ContinuousIndex,
    agents: &mut MockAgents,
    count: usize,
    kinds: u32,
    seed: u64,
) -> Vec<AgentId> {
    let mut rng = rng(seed);
    (1..=count as i64)
        .map(|raw| {
            let id = AgentId(raw);
            let pos = space.random_position(&mut rng);
            space.insert(id, &pos).unwrap();
            agents.add(id, rng.random_range(0..kinds.max(1)));
            id
        })
        .collect()
}

/// Place `count` agents (ids `1..=count`) in random cells of `grid`.
///
/// Returns where each agent went.
pub fn scatter_cells(grid: &mut GridIndex, count: usize, seed: u64) -> IndexMap<AgentId, Coord> {
    let mut rng = rng(seed);
    (1..=count as i64)
        .map(|raw| {
            let id = AgentId(raw);
            let pos = grid.random_position(&mut rng);
            grid.insert(id, &pos).unwrap();
            (id, pos)
        })
        .collect()
}

/// Every tracked agent within `r` of `pos`, by linear scan. Sorted by id.
pub fn brute_force_within(space: &ContinuousIndex, pos: &[f64], r: f64) -> Vec<AgentId> {
    let mut found: Vec<AgentId> = space
        .ids()
        .filter(|&id| {
            let at = space.position(id).unwrap();
            space.distance(pos, at).unwrap() <= r
        })
        .collect();
    found.sort_unstable();
    found
}

/// Collect and sort ids for order-insensitive comparison.
pub fn sorted(ids: impl IntoIterator<Item = AgentId>) -> Vec<AgentId> {
    let mut v: Vec<AgentId> = ids.into_iter().collect();
    v.sort_unstable();
    v
}
