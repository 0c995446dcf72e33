//! Benchmark profiles for the Roost spatial indices.
//!
//! Provides pre-populated spaces shaped like common agent-based models:
//!
//! - [`flocking_profile`]: 100x100 periodic continuous space, 300 agents
//! - [`schelling_profile`]: 30x30 single-occupancy grid at 80% occupancy

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use roost_core::{AgentId, Metric};
use roost_space::{ContinuousConfig, ContinuousIndex, GridConfig, GridIndexSingle};

/// Agents in [`flocking_profile`].
pub const FLOCK_SIZE: i64 = 300;

/// Build a flocking-style continuous space: 100x100, periodic, spacing 2.
///
/// Agents `1..=300` at uniformly random positions.
pub fn flocking_profile(seed: u64) -> ContinuousIndex {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut space = ContinuousConfig::new([100.0, 100.0])
        .spacing(2.0)
        .build()
        .unwrap();
    for raw in 1..=FLOCK_SIZE {
        let pos = space.random_position(&mut rng);
        space.insert(AgentId(raw), &pos).unwrap();
    }
    space
}

/// Build a Schelling-style grid: 30x30 Chebyshev, bounded, one agent per
/// cell, 720 agents placed in random empty cells.
pub fn schelling_profile(seed: u64) -> GridIndexSingle {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut grid = GridConfig::new([30, 30])
        .periodicity(false)
        .metric(Metric::Chebyshev)
        .build_single()
        .unwrap();
    let agents = 30 * 30 * 4 / 5;
    for raw in 1..=agents {
        let Some(pos) = grid.random_empty(&mut rng) else {
            break;
        };
        grid.insert(AgentId(raw), &pos).unwrap();
    }
    grid
}
