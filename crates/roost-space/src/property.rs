//! Reading a discretised field at a continuous position.

use crate::continuous::ContinuousIndex;
use crate::error::SpaceError;
use roost_core::Coord;

/// A property defined over a continuous space.
pub enum SpatialField<'a, T> {
    /// Values on a regular grid laid over the whole extent, row-major with
    /// the last axis fastest.
    Grid {
        /// Cells per axis.
        shape: &'a [usize],
        /// `shape.iter().product()` values.
        values: &'a [T],
    },
    /// A function of the position itself.
    Function(&'a dyn Fn(&[f64]) -> T),
}

impl<T> std::fmt::Debug for SpatialField<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grid { shape, values } => f
                .debug_struct("Grid")
                .field("shape", shape)
                .field("len", &values.len())
                .finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl ContinuousIndex {
    /// The 1-based cell of a `shape` grid laid over the extent that
    /// contains `pos`.
    ///
    /// `shape` need not match the accelerating grid.
    pub fn spatial_index(&self, pos: &[f64], shape: &[usize]) -> Result<Coord, SpaceError> {
        if shape.len() != self.ndim() {
            return Err(SpaceError::DimensionMismatch {
                expected: self.ndim(),
                got: shape.len(),
            });
        }
        if let Some(axis) = shape.iter().position(|&n| n == 0 || n > i32::MAX as usize) {
            return Err(SpaceError::InvalidField {
                reason: format!("axis {axis} has {} cells", shape[axis]),
            });
        }
        let pos = self.normalize_position(pos)?;
        Ok(pos
            .iter()
            .zip(self.extent())
            .zip(shape)
            .map(|((&p, &e), &n)| {
                let cell = (p / e * n as f64).floor() as i64 + 1;
                cell.clamp(1, n as i64) as i32
            })
            .collect())
    }

    /// The value of `field` at `pos`.
    pub fn spatial_property<T: Clone>(
        &self,
        pos: &[f64],
        field: &SpatialField<'_, T>,
    ) -> Result<T, SpaceError> {
        match field {
            SpatialField::Function(f) => {
                let pos = self.normalize_position(pos)?;
                Ok(f(&pos))
            }
            SpatialField::Grid { shape, values } => {
                let expected: usize = shape.iter().product();
                if values.len() != expected {
                    return Err(SpaceError::InvalidField {
                        reason: format!(
                            "shape {shape:?} needs {expected} values, got {}",
                            values.len()
                        ),
                    });
                }
                let cell = self.spatial_index(pos, shape)?;
                let index = cell
                    .iter()
                    .zip(shape.iter())
                    .fold(0usize, |acc, (&c, &n)| acc * n + (c - 1) as usize);
                Ok(values[index].clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> ContinuousIndex {
        ContinuousIndex::new(&[10.0, 4.0], 1.0, [true, false]).unwrap()
    }

    #[test]
    fn index_scales_to_field_shape() {
        let s = space();
        assert_eq!(s.spatial_index(&[0.0, 0.0], &[5, 2]).unwrap().as_slice(), &[1, 1]);
        assert_eq!(s.spatial_index(&[9.9, 3.9], &[5, 2]).unwrap().as_slice(), &[5, 2]);
        assert_eq!(s.spatial_index(&[4.1, 2.0], &[5, 2]).unwrap().as_slice(), &[3, 2]);
    }

    #[test]
    fn index_wraps_periodic_axes() {
        let s = space();
        assert_eq!(s.spatial_index(&[-1.0, 1.0], &[10, 4]).unwrap().as_slice(), &[10, 2]);
        assert!(s.spatial_index(&[1.0, 4.5], &[10, 4]).is_err());
    }

    #[test]
    fn grid_field_lookup() {
        let s = space();
        let values: Vec<u32> = (0..10).collect();
        let field = SpatialField::Grid {
            shape: &[5, 2],
            values: &values,
        };
        // Cell (3, 2) is flat index 2 * 2 + 1.
        assert_eq!(s.spatial_property(&[4.1, 2.0], &field), Ok(5));
    }

    #[test]
    fn grid_field_must_match_shape() {
        let s = space();
        let values = [1u8, 2, 3];
        let field = SpatialField::Grid {
            shape: &[2, 2],
            values: &values,
        };
        assert!(matches!(
            s.spatial_property(&[1.0, 1.0], &field),
            Err(SpaceError::InvalidField { .. })
        ));
        let zero = SpatialField::Grid {
            shape: &[0, 2],
            values: &values[..0],
        };
        assert!(matches!(
            s.spatial_property(&[1.0, 1.0], &zero),
            Err(SpaceError::InvalidField { .. })
        ));
    }

    #[test]
    fn function_field_sees_wrapped_position() {
        let s = space();
        let f = |p: &[f64]| p[0] + p[1];
        let field = SpatialField::Function(&f);
        assert_eq!(s.spatial_property(&[11.0, 2.0], &field), Ok(3.0));
    }
}
