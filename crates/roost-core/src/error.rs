//! Error types for parsing core configuration values.

use std::error::Error;
use std::fmt;

/// Returned when a string does not name a known [`Metric`](crate::Metric).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseMetricError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ParseMetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown metric '{}': expected chebyshev, manhattan or euclidean",
            self.input
        )
    }
}

impl Error for ParseMetricError {}
