//! Error types for space construction, mutation, and queries.
//!
//! Every variant is a usage error: a violated precondition that the caller
//! must fix. Degenerate numeric input (negative or NaN radii) is normalised
//! internally and never surfaces here.

use roost_core::{AgentId, Coord, Metric, Point};
use std::fmt;

/// Errors arising from space construction, agent placement, or queries.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceError {
    /// A cell coordinate is outside the grid.
    CoordOutOfBounds {
        /// The offending coordinate.
        coord: Coord,
        /// Human-readable description of the valid range.
        bounds: String,
    },
    /// A continuous position is outside the space extent.
    PointOutOfBounds {
        /// The offending position.
        point: Point,
        /// Human-readable description of the valid range.
        bounds: String,
    },
    /// A coordinate, point, or per-axis list has the wrong number of axes.
    DimensionMismatch {
        /// Number of axes of the space.
        expected: usize,
        /// Number of axes supplied.
        got: usize,
    },
    /// Attempted to construct a space with zero cells or zero dimensions.
    EmptySpace,
    /// An axis length exceeds the supported maximum.
    DimensionTooLarge {
        /// Axis index.
        axis: usize,
        /// The rejected length.
        value: u32,
        /// Maximum allowed length.
        max: u32,
    },
    /// The total cell count overflows `usize`.
    TooManyCells,
    /// The agent is not stored where the caller said it is.
    AgentNotFound {
        /// The missing agent.
        id: AgentId,
    },
    /// The agent is already tracked by this space.
    DuplicateAgent {
        /// The duplicated agent.
        id: AgentId,
    },
    /// A single-occupancy cell already holds an agent.
    CellOccupied {
        /// The target cell.
        coord: Coord,
        /// The agent already stored there.
        occupant: AgentId,
    },
    /// `AgentId(0)` is the empty-cell sentinel and cannot be stored.
    ReservedId,
    /// The operation is not defined for the space's metric.
    UnsupportedMetric {
        /// The space's metric.
        metric: Metric,
        /// Name of the rejected operation.
        operation: &'static str,
    },
    /// Continuous extent is not a positive multiple of the grid spacing.
    InvalidSpacing {
        /// What went wrong.
        reason: String,
    },
    /// A per-axis range query is malformed.
    InvalidRange {
        /// What went wrong.
        reason: String,
    },
    /// A discretised property field does not match its declared shape.
    InvalidField {
        /// What went wrong.
        reason: String,
    },
    /// A position of the wrong kind was passed to an [`AgentSpace`](crate::AgentSpace).
    PositionKind {
        /// The kind of space that rejected the position.
        space: &'static str,
        /// The position kind the space expects ("cell" or "point").
        expected: &'static str,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoordOutOfBounds { coord, bounds } => {
                write!(f, "coordinate {coord:?} out of bounds: {bounds}")
            }
            Self::PointOutOfBounds { point, bounds } => {
                write!(f, "position {point:?} out of bounds: {bounds}")
            }
            Self::DimensionMismatch { expected, got } => {
                write!(f, "expected {expected} axes, got {got}")
            }
            Self::EmptySpace => write!(f, "space must have at least one cell"),
            Self::DimensionTooLarge { axis, value, max } => {
                write!(f, "axis {axis} length {value} exceeds maximum {max}")
            }
            Self::TooManyCells => write!(f, "total cell count overflows usize"),
            Self::AgentNotFound { id } => write!(f, "agent {id} not found"),
            Self::DuplicateAgent { id } => write!(f, "agent {id} is already placed"),
            Self::CellOccupied { coord, occupant } => {
                write!(f, "cell {coord:?} is occupied by agent {occupant}")
            }
            Self::ReservedId => write!(f, "agent id 0 is reserved for empty cells"),
            Self::UnsupportedMetric { metric, operation } => {
                write!(f, "{operation} is not supported with the {metric} metric")
            }
            Self::InvalidSpacing { reason } => write!(f, "invalid spacing: {reason}"),
            Self::InvalidRange { reason } => write!(f, "invalid range: {reason}"),
            Self::InvalidField { reason } => write!(f, "invalid field: {reason}"),
            Self::PositionKind { space, expected } => {
                write!(f, "a {space} space expects a {expected} position")
            }
        }
    }
}

impl std::error::Error for SpaceError {}
