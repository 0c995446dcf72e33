//! Strongly-typed identifiers and the [`Coord`] / [`Point`] type aliases.

use smallvec::SmallVec;
use std::fmt;

/// Identifies an agent placed in a space.
///
/// Ids may be positive or negative but never zero: `AgentId(0)` is the
/// empty-cell sentinel of single-occupancy grids and is rejected there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub i64);

impl AgentId {
    /// The reserved "no agent" value.
    pub const EMPTY: AgentId = AgentId(0);

    /// Returns `true` for the reserved sentinel id.
    pub fn is_sentinel(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AgentId {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

/// A 1-based cell coordinate (or a signed cell offset) in a discrete grid.
///
/// Uses `SmallVec<[i32; 4]>` to avoid heap allocation for grids up to
/// 4 dimensions. Higher-dimensional grids spill to the heap transparently.
pub type Coord = SmallVec<[i32; 4]>;

/// A position in continuous space, one `f64` per dimension.
pub type Point = SmallVec<[f64; 4]>;
