//! Memoized neighbourhood offsets.
//!
//! A neighbourhood shape ("every cell within distance r") is translation
//! invariant, so it is computed once per radius as a list of integer
//! offsets and reused for every origin. Boundaries are handled at query
//! time by wrap or clip; the cached lists never depend on the origin.
//!
//! # Cache keys
//!
//! Chebyshev and Manhattan shapes over integer offsets depend only on
//! `floor(r)`, so their key is `floor(r) + 1`. Euclidean shapes depend only
//! on `floor(r^2)` (squared norms of integer offsets are integers), so the
//! Euclidean key is `floor(r^2) + 1`. Key `0` is reserved for degenerate
//! radii (negative or NaN), whose neighbourhood is the origin alone.

use crate::error::SpaceError;
use roost_core::{Coord, Metric};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// A shared, immutable list of offsets.
pub type Offsets = Arc<[Coord]>;

#[derive(Debug, Default)]
struct Tables {
    within: HashMap<u64, Offsets>,
    within_no_origin: HashMap<u64, Offsets>,
    at_radius: HashMap<u64, Offsets>,
}

/// Per-space memo table of neighbourhood offsets.
///
/// Owned by one grid; the grid's metric, extent and periodicity never
/// change, so entries are never invalidated. Lookups take `&self`; the
/// tables sit behind a mutex so the owning index stays `Send + Sync`.
///
/// # Examples
///
/// ```
/// use roost_core::Metric;
/// use roost_space::OffsetCache;
///
/// let cache = OffsetCache::new(Metric::Manhattan, &[10, 10], &[false, false]).unwrap();
/// // Diamond of radius 1: the origin and its four axis neighbours.
/// assert_eq!(cache.within_radius(1.0).len(), 5);
/// assert_eq!(cache.within_radius_no_origin(1.0).len(), 4);
/// ```
#[derive(Debug)]
pub struct OffsetCache {
    metric: Metric,
    extent: Coord,
    periodic: SmallVec<[bool; 4]>,
    tables: Mutex<Tables>,
}

impl Clone for OffsetCache {
    fn clone(&self) -> Self {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        Self {
            metric: self.metric,
            extent: self.extent.clone(),
            periodic: self.periodic.clone(),
            tables: Mutex::new(Tables {
                within: tables.within.clone(),
                within_no_origin: tables.within_no_origin.clone(),
                at_radius: tables.at_radius.clone(),
            }),
        }
    }
}

impl OffsetCache {
    /// Create an empty cache for a grid of the given extent and periodicity.
    ///
    /// # Errors
    ///
    /// [`SpaceError::DimensionMismatch`] if `extent` and `periodic` differ
    /// in length, [`SpaceError::EmptySpace`] if there are no axes or an axis
    /// length is not positive.
    pub fn new(metric: Metric, extent: &[i32], periodic: &[bool]) -> Result<Self, SpaceError> {
        if extent.len() != periodic.len() {
            return Err(SpaceError::DimensionMismatch {
                expected: extent.len(),
                got: periodic.len(),
            });
        }
        if extent.is_empty() || extent.iter().any(|&len| len <= 0) {
            return Err(SpaceError::EmptySpace);
        }
        Ok(Self {
            metric,
            extent: SmallVec::from_slice(extent),
            periodic: SmallVec::from_slice(periodic),
            tables: Mutex::new(Tables::default()),
        })
    }

    /// The metric shaping every neighbourhood.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.extent.len()
    }

    /// The memo key for radius `r` under this cache's metric.
    pub fn radius_key(&self, r: f64) -> u64 {
        if r.is_nan() || r < 0.0 {
            return 0;
        }
        match self.metric {
            Metric::Chebyshev | Metric::Manhattan => (r.floor() as u64).saturating_add(1),
            Metric::Euclidean => ((r * r).floor() as u64).saturating_add(1),
        }
    }

    /// Largest per-axis step reachable with `key`.
    fn reach(&self, key: u64) -> i64 {
        match (key, self.metric) {
            (0, _) => 0,
            (k, Metric::Chebyshev | Metric::Manhattan) => (k - 1).min(i64::MAX as u64) as i64,
            (k, Metric::Euclidean) => isqrt(k - 1) as i64,
        }
    }

    /// The largest per-axis step any offset for radius `r` can take.
    ///
    /// Queries whose origin is farther than this from every wall need no
    /// wrap or clip.
    pub fn reach_for(&self, r: f64) -> i64 {
        self.reach(self.radius_key(r))
    }

    /// Inclusive candidate range per axis for per-axis reach `r0`.
    ///
    /// Periodic axes of length `s` shrink to `[-min(r0, s/2), min(r0, (s-1)/2)]`,
    /// which covers each residue exactly once, so a radius wider than half
    /// the axis cannot produce two offsets addressing the same cell.
    /// Bounded axes shrink to `[-(s-1), s-1]`; larger steps leave the grid
    /// from every origin.
    pub fn hyperrectangle(&self, r0: i64) -> SmallVec<[(i32, i32); 4]> {
        self.extent
            .iter()
            .zip(&self.periodic)
            .map(|(&len, &periodic)| {
                let len = len as i64;
                let (lo, hi) = if periodic {
                    (r0.min(len / 2), r0.min((len - 1) / 2))
                } else {
                    (r0.min(len - 1), r0.min(len - 1))
                };
                (-lo as i32, hi as i32)
            })
            .collect()
    }

    /// Offsets of every cell within distance `r` of the origin, origin included.
    ///
    /// Lexicographic order, first axis slowest. Never empty.
    pub fn within_radius(&self, r: f64) -> Offsets {
        let key = self.radius_key(r);
        let mut tables = self.lock();
        if let Some(hit) = tables.within.get(&key) {
            return Arc::clone(hit);
        }
        let built = self.build_within(key);
        tables.within.insert(key, Arc::clone(&built));
        built
    }

    /// [`within_radius`](Self::within_radius) with the zero offset removed.
    ///
    /// Used when the origin is known to hold only the querying agent.
    pub fn within_radius_no_origin(&self, r: f64) -> Offsets {
        let key = self.radius_key(r);
        if let Some(hit) = self.lock().within_no_origin.get(&key) {
            return Arc::clone(hit);
        }
        let all = self.within_radius(r);
        let built: Offsets = all
            .iter()
            .filter(|o| o.iter().any(|&c| c != 0))
            .cloned()
            .collect();
        self.lock()
            .within_no_origin
            .insert(key, Arc::clone(&built));
        built
    }

    /// Offsets at exactly `floor(r)` from the origin (the boundary shell).
    ///
    /// Defined for Chebyshev and Manhattan only; a Euclidean shell over
    /// integer offsets is not a meaningful step set. May be empty when
    /// periodic shrinking removes the whole shell (radius wider than half
    /// the space).
    pub fn at_radius(&self, r: f64) -> Result<Offsets, SpaceError> {
        if self.metric == Metric::Euclidean {
            return Err(SpaceError::UnsupportedMetric {
                metric: self.metric,
                operation: "offsets_at_radius",
            });
        }
        let key = self.radius_key(r);
        let mut tables = self.lock();
        if let Some(hit) = tables.at_radius.get(&key) {
            return Ok(Arc::clone(hit));
        }
        let r0 = self.reach(key);
        let built: Offsets = if key == 0 {
            Arc::from(vec![self.origin()])
        } else {
            hypercube(&self.hyperrectangle(r0))
                .into_iter()
                .filter(|o| match self.metric {
                    Metric::Chebyshev => linf(o) == r0,
                    _ => l1(o) == r0,
                })
                .collect()
        };
        debug!(
            key,
            metric = %self.metric,
            offsets = built.len(),
            "built shell offsets"
        );
        tables.at_radius.insert(key, Arc::clone(&built));
        Ok(built)
    }

    /// Number of distinct radius keys built for `within_radius`.
    pub fn cached_radii(&self) -> usize {
        self.lock().within.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn origin(&self) -> Coord {
        SmallVec::from_elem(0, self.ndim())
    }

    fn build_within(&self, key: u64) -> Offsets {
        let r0 = self.reach(key);
        let mut offsets: Vec<Coord> = if key == 0 {
            Vec::new()
        } else {
            let candidates = hypercube(&self.hyperrectangle(r0));
            match self.metric {
                Metric::Chebyshev => candidates,
                Metric::Manhattan => candidates.into_iter().filter(|o| l1(o) <= r0).collect(),
                Metric::Euclidean => {
                    let limit = key - 1;
                    candidates
                        .into_iter()
                        .filter(|o| squared_norm(o) <= limit)
                        .collect()
                }
            }
        };
        if offsets.is_empty() {
            offsets.push(self.origin());
        }
        debug!(
            key,
            metric = %self.metric,
            offsets = offsets.len(),
            "built neighbourhood offsets"
        );
        Arc::from(offsets)
    }
}

/// Every integer point of the box, first axis slowest.
fn hypercube(bounds: &[(i32, i32)]) -> Vec<Coord> {
    let total: usize = bounds
        .iter()
        .map(|&(lo, hi)| (hi - lo + 1) as usize)
        .product();
    let mut out = Vec::with_capacity(total);
    let mut current: Coord = bounds.iter().map(|&(lo, _)| lo).collect();
    if bounds.is_empty() {
        return out;
    }
    loop {
        out.push(current.clone());
        // Odometer: last axis fastest.
        let mut axis = bounds.len();
        loop {
            if axis == 0 {
                return out;
            }
            axis -= 1;
            if current[axis] < bounds[axis].1 {
                current[axis] += 1;
                break;
            }
            current[axis] = bounds[axis].0;
        }
    }
}

fn l1(offset: &[i32]) -> i64 {
    offset.iter().map(|&c| (c as i64).abs()).sum()
}

fn linf(offset: &[i32]) -> i64 {
    offset.iter().map(|&c| (c as i64).abs()).max().unwrap_or(0)
}

fn squared_norm(offset: &[i32]) -> u64 {
    offset
        .iter()
        .map(|&c| (c as i64 * c as i64) as u64)
        .fold(0u64, u64::saturating_add)
}

/// Integer square root (floor).
fn isqrt(n: u64) -> u64 {
    let mut x = (n as f64).sqrt() as u64;
    while x.saturating_mul(x) > n {
        x -= 1;
    }
    while (x + 1).saturating_mul(x + 1) <= n {
        x += 1;
    }
    x
}
