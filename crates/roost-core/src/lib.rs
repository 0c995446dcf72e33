//! Core types and traits for the Roost spatial indexing framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every space backend: agent identifiers,
//! coordinate and point types, distance metrics, periodicity, and the
//! lookup trait through which an agent container exposes its entities.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod metric;
pub mod periodicity;
pub mod traits;

pub use error::ParseMetricError;
pub use id::{AgentId, Coord, Point};
pub use metric::Metric;
pub use periodicity::Periodicity;
pub use traits::AgentLookup;
