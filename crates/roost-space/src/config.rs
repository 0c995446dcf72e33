//! Validated construction parameters for the space kinds.
//!
//! [`GridConfig`] and [`ContinuousConfig`] are plain data: fill in the
//! fields (or use the chaining setters), call [`validate`](GridConfig::validate)
//! to check them early, and build the index you need.

use crate::continuous::ContinuousIndex;
use crate::error::SpaceError;
use crate::geometry::GridGeometry;
use crate::grid::GridIndex;
use crate::single::GridIndexSingle;
use roost_core::{Metric, Periodicity};

// ── GridConfig ─────────────────────────────────────────────────────

/// Parameters of a discrete grid.
///
/// # Examples
///
/// ```
/// use roost_core::Metric;
/// use roost_space::GridConfig;
///
/// let grid = GridConfig::new([20, 20])
///     .periodicity([true, false])
///     .metric(Metric::Manhattan)
///     .build_grid()
///     .unwrap();
/// assert_eq!(grid.lattice().metric(), Metric::Manhattan);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Cells per axis.
    pub extent: Vec<u32>,
    /// Wrap-around per axis. Default: every axis periodic.
    pub periodicity: Periodicity,
    /// Neighbourhood metric. Default: Chebyshev.
    pub metric: Metric,
}

impl GridConfig {
    /// A periodic Chebyshev grid of the given extent.
    pub fn new(extent: impl Into<Vec<u32>>) -> Self {
        Self {
            extent: extent.into(),
            periodicity: Periodicity::default(),
            metric: Metric::default(),
        }
    }

    /// Set the periodicity.
    pub fn periodicity(mut self, periodicity: impl Into<Periodicity>) -> Self {
        self.periodicity = periodicity.into();
        self
    }

    /// Set the metric.
    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Check the extent and periodicity without allocating any cells.
    pub fn validate(&self) -> Result<(), SpaceError> {
        GridGeometry::new(&self.extent, &self.periodicity).map(drop)
    }

    /// Build a multi-occupancy grid.
    pub fn build_grid(&self) -> Result<GridIndex, SpaceError> {
        GridIndex::new(&self.extent, self.periodicity.clone(), self.metric)
    }

    /// Build a single-occupancy grid.
    pub fn build_single(&self) -> Result<GridIndexSingle, SpaceError> {
        GridIndexSingle::new(&self.extent, self.periodicity.clone(), self.metric)
    }
}

// ── ContinuousConfig ───────────────────────────────────────────────

/// Parameters of a continuous space.
#[derive(Clone, Debug, PartialEq)]
pub struct ContinuousConfig {
    /// Side length per axis.
    pub extent: Vec<f64>,
    /// Accelerating grid cell side. Default: `min(extent) / 20`.
    pub spacing: Option<f64>,
    /// Wrap-around per axis. Default: every axis periodic.
    pub periodicity: Periodicity,
}

impl ContinuousConfig {
    /// Divisor applied to the shortest side when no spacing is given.
    pub const DEFAULT_CELLS_PER_SIDE: f64 = 20.0;

    /// A periodic space of the given extent with default spacing.
    pub fn new(extent: impl Into<Vec<f64>>) -> Self {
        Self {
            extent: extent.into(),
            spacing: None,
            periodicity: Periodicity::default(),
        }
    }

    /// Set the accelerating grid spacing.
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// Set the periodicity.
    pub fn periodicity(mut self, periodicity: impl Into<Periodicity>) -> Self {
        self.periodicity = periodicity.into();
        self
    }

    /// The spacing that [`build`](Self::build) will use.
    pub fn effective_spacing(&self) -> f64 {
        self.spacing.unwrap_or_else(|| {
            self.extent.iter().copied().fold(f64::INFINITY, f64::min) / Self::DEFAULT_CELLS_PER_SIDE
        })
    }

    /// Check extent, spacing, and periodicity.
    ///
    /// Builds the (empty) space and discards it; continuous spaces
    /// allocate one bucket per accelerating cell.
    pub fn validate(&self) -> Result<(), SpaceError> {
        self.build().map(drop)
    }

    /// Build the space.
    pub fn build(&self) -> Result<ContinuousIndex, SpaceError> {
        ContinuousIndex::new(&self.extent, self.effective_spacing(), self.periodicity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_defaults() {
        let cfg = GridConfig::new([3, 4]);
        assert_eq!(cfg.periodicity, Periodicity::Uniform(true));
        assert_eq!(cfg.metric, Metric::Chebyshev);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn grid_validate_catches_bad_shape() {
        assert_eq!(GridConfig::new(Vec::new()).validate(), Err(SpaceError::EmptySpace));
        assert!(matches!(
            GridConfig::new([3, 3]).periodicity([true]).validate(),
            Err(SpaceError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn grid_builds_both_kinds() {
        let cfg = GridConfig::new([4, 4]).periodicity(false);
        let grid = cfg.build_grid().unwrap();
        let single = cfg.build_single().unwrap();
        assert_eq!(grid.lattice().geometry(), single.lattice().geometry());
        assert_eq!(grid.lattice().metric(), single.lattice().metric());
    }

    #[test]
    fn continuous_default_spacing() {
        let cfg = ContinuousConfig::new([10.0, 40.0]);
        assert_eq!(cfg.effective_spacing(), 0.5);
        let space = cfg.build().unwrap();
        assert_eq!(space.grid().lattice().geometry().extent(), &[20, 80]);
    }

    #[test]
    fn continuous_validate_catches_uneven_spacing() {
        assert!(matches!(
            ContinuousConfig::new([10.0]).spacing(4.0).validate(),
            Err(SpaceError::InvalidSpacing { .. })
        ));
        assert!(ContinuousConfig::new([10.0]).spacing(2.5).validate().is_ok());
    }
}
