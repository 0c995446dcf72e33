//! Boundary periodicity, uniform or per axis.

use smallvec::SmallVec;

/// Whether each axis of a space wraps around (torus) or is bounded.
///
/// # Examples
///
/// ```
/// use roost_core::Periodicity;
///
/// let torus = Periodicity::from(true);
/// assert_eq!(torus.axes(3).unwrap().as_slice(), &[true, true, true]);
///
/// // Cylinder: wraps along the first axis only.
/// let cylinder = Periodicity::from([true, false]);
/// assert!(cylinder.axes(3).is_none());
/// assert_eq!(cylinder.axes(2).unwrap().as_slice(), &[true, false]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Periodicity {
    /// The same flag for every axis.
    Uniform(bool),
    /// One flag per axis.
    PerAxis(SmallVec<[bool; 4]>),
}

impl Periodicity {
    /// Expand into one flag per axis for an `ndim`-dimensional space.
    ///
    /// Returns `None` if a per-axis list has the wrong length.
    pub fn axes(&self, ndim: usize) -> Option<SmallVec<[bool; 4]>> {
        match self {
            Self::Uniform(p) => Some(SmallVec::from_elem(*p, ndim)),
            Self::PerAxis(flags) if flags.len() == ndim => Some(flags.clone()),
            Self::PerAxis(_) => None,
        }
    }

}

impl Default for Periodicity {
    fn default() -> Self {
        Self::Uniform(true)
    }
}

impl From<bool> for Periodicity {
    fn from(p: bool) -> Self {
        Self::Uniform(p)
    }
}

impl<const N: usize> From<[bool; N]> for Periodicity {
    fn from(flags: [bool; N]) -> Self {
        Self::PerAxis(SmallVec::from_slice(&flags))
    }
}

impl From<Vec<bool>> for Periodicity {
    fn from(flags: Vec<bool>) -> Self {
        Self::PerAxis(SmallVec::from_vec(flags))
    }
}

impl From<&[bool]> for Periodicity {
    fn from(flags: &[bool]) -> Self {
        Self::PerAxis(SmallVec::from_slice(flags))
    }
}
