//! Spatial indices and neighbour queries for Roost agent-based models.
//!
//! # Space kinds
//!
//! - [`GridIndex`]: D-dimensional grid, any number of agents per cell
//! - [`GridIndexSingle`]: D-dimensional grid, at most one agent per cell
//! - [`ContinuousIndex`]: real-valued positions, accelerated by a grid
//!
//! [`AgentSpace`] dispatches over the three when the kind is only known at
//! runtime.
//!
//! # Neighbourhoods
//!
//! Every grid owns an [`OffsetCache`]: for each radius it builds, once, the
//! list of integer offsets making up the neighbourhood shape under the
//! grid's [`Metric`](roost_core::Metric). Queries combine those offsets with
//! the query position, wrapping periodic axes and dropping cells that fall
//! off bounded ones, and return lazy iterators that borrow the index.
//!
//! [`interacting_pairs`] builds on the continuous index to enumerate unique
//! pairs of nearby agents.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod continuous;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod lattice;
pub mod nearby;
pub mod offsets;
pub mod pairs;
pub mod property;
pub mod single;
pub mod space;

#[cfg(test)]
pub(crate) mod compliance;

pub use config::{ContinuousConfig, GridConfig};
pub use continuous::{ContinuousIndex, Neighbor};
pub use error::SpaceError;
pub use geometry::GridGeometry;
pub use grid::GridIndex;
pub use lattice::Lattice;
pub use nearby::{AxisRanges, AxisSlices, Bucket, NearbyCells, NearbyIds, NearbyOccupants};
pub use offsets::{OffsetCache, Offsets};
pub use pairs::{interacting_pairs, InteractingPairs, PairPolicy};
pub use property::SpatialField;
pub use single::GridIndexSingle;
pub use space::{AgentSpace, Position};
