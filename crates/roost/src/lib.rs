//! Roost: spatial indexing and neighbour queries for agent-based models.
//!
//! This is the top-level facade crate that re-exports the public API of the
//! Roost sub-crates. For most users, adding `roost` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use roost::prelude::*;
//!
//! // A 20x20 continuous space with wrap-around edges.
//! let mut space = ContinuousConfig::new([20.0, 20.0]).spacing(1.0).build().unwrap();
//! space.insert(AgentId(1), &[1.0, 1.0]).unwrap();
//! space.insert(AgentId(2), &[4.0, 1.0]).unwrap();
//! space.insert(AgentId(3), &[19.8, 1.0]).unwrap();
//!
//! let nn = space.nearest_neighbor(AgentId(1), 2.0).unwrap().unwrap();
//! assert_eq!(nn.id, AgentId(3));
//!
//! // Multi-occupancy grid with a Manhattan neighbourhood.
//! let mut grid = GridConfig::new([8, 8]).metric(Metric::Manhattan).build_grid().unwrap();
//! grid.insert(AgentId(1), &[1, 1]).unwrap();
//! grid.insert(AgentId(2), &[8, 1]).unwrap();
//! let near: Vec<_> = grid.nearby_ids_of(AgentId(1), &[1, 1], 1.0).unwrap().collect();
//! assert_eq!(near, vec![AgentId(2)]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `roost-core` | Ids, coordinates, metrics, periodicity, lookup trait |
//! | [`space`] | `roost-space` | Grid and continuous indices, pairs, dispatch |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core identifiers, metrics, and traits (`roost-core`).
pub use roost_core as types;

/// Spatial indices and neighbour queries (`roost-space`).
///
/// Provides [`space::GridIndex`], [`space::GridIndexSingle`],
/// [`space::ContinuousIndex`], and the [`space::AgentSpace`] dispatch enum.
pub use roost_space as space;

/// Common imports for typical Roost usage.
///
/// ```rust
/// use roost::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use roost_core::{AgentId, AgentLookup, Coord, Metric, Periodicity, Point};

    // Configuration
    pub use roost_space::{ContinuousConfig, GridConfig};

    // Spaces
    pub use roost_space::{
        AgentSpace, AxisRanges, ContinuousIndex, GridIndex, GridIndexSingle, Position,
    };

    // Pairs and properties
    pub use roost_space::{interacting_pairs, PairPolicy, SpatialField};

    // Errors
    pub use roost_space::SpaceError;
}
