//! Closed dispatch over the space kinds.

use crate::continuous::ContinuousIndex;
use crate::error::SpaceError;
use crate::grid::GridIndex;
use crate::single::GridIndexSingle;
use rand::Rng;
use roost_core::{AgentId, Coord, Point};

/// A position in any [`AgentSpace`].
#[derive(Clone, Debug, PartialEq)]
pub enum Position {
    /// A 1-based grid cell.
    Cell(Coord),
    /// A point in continuous space.
    Point(Point),
}

impl Position {
    fn cell(&self, space: &'static str) -> Result<&[i32], SpaceError> {
        match self {
            Self::Cell(c) => Ok(c),
            Self::Point(_) => Err(SpaceError::PositionKind {
                space,
                expected: "cell",
            }),
        }
    }

    fn point(&self, space: &'static str) -> Result<&[f64], SpaceError> {
        match self {
            Self::Point(p) => Ok(p),
            Self::Cell(_) => Err(SpaceError::PositionKind {
                space,
                expected: "point",
            }),
        }
    }
}

impl From<Coord> for Position {
    fn from(c: Coord) -> Self {
        Self::Cell(c)
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Self::Point(p)
    }
}

/// One of the supported space kinds.
///
/// Model code that must work with whichever space a model was built with
/// holds an `AgentSpace` and [`Position`]s. Passing a position of the wrong
/// kind is a [`SpaceError::PositionKind`] error.
#[derive(Clone, Debug)]
pub enum AgentSpace {
    /// Multi-occupancy grid.
    Grid(GridIndex),
    /// Single-occupancy grid.
    GridSingle(GridIndexSingle),
    /// Continuous space.
    Continuous(ContinuousIndex),
}

impl AgentSpace {
    /// Short name of the space kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Grid(_) => "grid",
            Self::GridSingle(_) => "single-occupancy grid",
            Self::Continuous(_) => "continuous",
        }
    }

    /// Place `id` at `pos`.
    pub fn insert(&mut self, id: AgentId, pos: &Position) -> Result<(), SpaceError> {
        let space = self.kind_name();
        match self {
            Self::Grid(g) => g.insert(id, pos.cell(space)?),
            Self::GridSingle(g) => g.insert(id, pos.cell(space)?),
            Self::Continuous(c) => c.insert(id, pos.point(space)?),
        }
    }

    /// Remove `id`, which is at `pos`.
    ///
    /// A continuous space tracks positions itself and only checks the
    /// position's kind.
    pub fn remove(&mut self, id: AgentId, pos: &Position) -> Result<(), SpaceError> {
        let space = self.kind_name();
        match self {
            Self::Grid(g) => g.remove(id, pos.cell(space)?),
            Self::GridSingle(g) => g.remove(id, pos.cell(space)?),
            Self::Continuous(c) => {
                pos.point(space)?;
                c.remove(id).map(drop)
            }
        }
    }

    /// Move `id` from `from` to `to`.
    pub fn move_agent(&mut self, id: AgentId, from: &Position, to: &Position) -> Result<(), SpaceError> {
        let space = self.kind_name();
        match self {
            Self::Grid(g) => g.move_agent(id, from.cell(space)?, to.cell(space)?),
            Self::GridSingle(g) => g.move_agent(id, from.cell(space)?, to.cell(space)?),
            Self::Continuous(c) => {
                from.point(space)?;
                c.move_agent(id, to.point(space)?)
            }
        }
    }

    /// Agents within `r` of `pos`.
    ///
    /// Exact for continuous space; grids answer in their own metric.
    pub fn nearby_ids(
        &self,
        pos: &Position,
        r: f64,
    ) -> Result<Box<dyn Iterator<Item = AgentId> + '_>, SpaceError> {
        let space = self.kind_name();
        Ok(match self {
            Self::Grid(g) => Box::new(g.nearby_ids(pos.cell(space)?, r)?),
            Self::GridSingle(g) => Box::new(g.nearby_ids(pos.cell(space)?, r)?),
            Self::Continuous(c) => Box::new(c.nearby_ids_exact(pos.point(space)?, r)?),
        })
    }

    /// `true` if no agent occupies the cell at `pos`.
    ///
    /// For continuous space this asks about the accelerating grid cell
    /// containing the point.
    pub fn is_empty(&self, pos: &Position) -> Result<bool, SpaceError> {
        let space = self.kind_name();
        match self {
            Self::Grid(g) => g.is_empty(pos.cell(space)?),
            Self::GridSingle(g) => g.is_empty(pos.cell(space)?),
            Self::Continuous(c) => {
                let point = c.normalize_position(pos.point(space)?)?;
                c.grid().is_empty(&c.to_cell(&point))
            }
        }
    }

    /// A uniformly random position.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        match self {
            Self::Grid(g) => Position::Cell(g.random_position(rng)),
            Self::GridSingle(g) => Position::Cell(g.random_position(rng)),
            Self::Continuous(c) => Position::Point(c.random_position(rng)),
        }
    }

    /// Wrap periodic axes into range; reject out-of-range bounded axes.
    pub fn normalize_position(&self, pos: &Position) -> Result<Position, SpaceError> {
        let space = self.kind_name();
        Ok(match self {
            Self::Grid(g) => Position::Cell(g.normalize_position(pos.cell(space)?)?),
            Self::GridSingle(g) => Position::Cell(g.normalize_position(pos.cell(space)?)?),
            Self::Continuous(c) => Position::Point(c.normalize_position(pos.point(space)?)?),
        })
    }
}

impl From<GridIndex> for AgentSpace {
    fn from(g: GridIndex) -> Self {
        Self::Grid(g)
    }
}

impl From<GridIndexSingle> for AgentSpace {
    fn from(g: GridIndexSingle) -> Self {
        Self::GridSingle(g)
    }
}

impl From<ContinuousIndex> for AgentSpace {
    fn from(c: ContinuousIndex) -> Self {
        Self::Continuous(c)
    }
}
