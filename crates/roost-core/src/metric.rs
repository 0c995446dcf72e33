//! Distance metrics shared by grid and continuous spaces.

use crate::error::ParseMetricError;
use std::fmt;
use std::str::FromStr;

/// How "within radius r" is measured.
///
/// The metric decides which cell offsets belong to a neighbourhood and
/// how the distance between two positions is computed. It is fixed for
/// the lifetime of a space.
///
/// # Examples
///
/// ```
/// use roost_core::Metric;
///
/// let d = [3.0, 4.0];
/// assert_eq!(Metric::Chebyshev.distance(d), 4.0);
/// assert_eq!(Metric::Manhattan.distance(d), 7.0);
/// assert_eq!(Metric::Euclidean.distance(d), 5.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Metric {
    /// L-infinity: the largest per-axis displacement (square neighbourhoods).
    #[default]
    Chebyshev,
    /// L1: the sum of per-axis displacements (diamond neighbourhoods).
    Manhattan,
    /// L2: straight-line distance (disc neighbourhoods).
    Euclidean,
}

impl Metric {
    /// Lower-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Chebyshev => "chebyshev",
            Self::Manhattan => "manhattan",
            Self::Euclidean => "euclidean",
        }
    }

    /// Combine per-axis displacements into a distance.
    ///
    /// Signs are ignored, so callers may pass raw differences.
    pub fn distance<I>(self, deltas: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        let deltas = deltas.into_iter().map(f64::abs);
        match self {
            Self::Chebyshev => deltas.fold(0.0, f64::max),
            Self::Manhattan => deltas.sum(),
            Self::Euclidean => deltas.map(|d| d * d).sum::<f64>().sqrt(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chebyshev" => Ok(Self::Chebyshev),
            "manhattan" => Ok(Self::Manhattan),
            "euclidean" => Ok(Self::Euclidean),
            _ => Err(ParseMetricError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_round_trips_names() {
        for m in [Metric::Chebyshev, Metric::Manhattan, Metric::Euclidean] {
            assert_eq!(m.name().parse::<Metric>(), Ok(m));
        }
        assert_eq!(" Euclidean ".parse::<Metric>(), Ok(Metric::Euclidean));
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "taxicab".parse::<Metric>().unwrap_err();
        assert_eq!(err.input, "taxicab");
    }

    #[test]
    fn distance_of_empty_displacement_is_zero() {
        for m in [Metric::Chebyshev, Metric::Manhattan, Metric::Euclidean] {
            assert_eq!(m.distance(std::iter::empty()), 0.0);
        }
    }

    proptest! {
        #[test]
        fn metrics_are_ordered(a in -50.0f64..50.0, b in -50.0f64..50.0, c in -50.0f64..50.0) {
            let d = [a, b, c];
            let cheb = Metric::Chebyshev.distance(d);
            let eucl = Metric::Euclidean.distance(d);
            let manh = Metric::Manhattan.distance(d);
            prop_assert!(cheb <= eucl + 1e-9);
            prop_assert!(eucl <= manh + 1e-9);
        }
    }
}
