//! Unique interacting pairs of agents in a continuous space.

use crate::continuous::ContinuousIndex;
use crate::error::SpaceError;
use indexmap::{IndexMap, IndexSet};
use roost_core::{AgentId, AgentLookup};
use std::fmt;
use tracing::debug;

/// How agents are paired by [`interacting_pairs`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PairPolicy {
    /// Every pair of agents within the radius.
    #[default]
    All,
    /// Each agent with its nearest neighbour; no agent in two pairs.
    Nearest,
    /// Every pair within the radius whose kinds differ.
    Types,
}

impl fmt::Display for PairPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Nearest => "nearest",
            Self::Types => "types",
        })
    }
}

/// The pairs produced by [`interacting_pairs`], as entity handles.
///
/// Each pair is `(lower id, higher id)`. No pair appears twice and no agent
/// is paired with itself.
#[derive(Clone, Debug)]
pub struct InteractingPairs<'a, A> {
    inner: std::vec::IntoIter<(&'a A, &'a A)>,
}

impl<'a, A> Iterator for InteractingPairs<'a, A> {
    type Item = (&'a A, &'a A);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<A> ExactSizeIterator for InteractingPairs<'_, A> {}

fn canonical(a: AgentId, b: AgentId) -> (AgentId, AgentId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Enumerate unique pairs of agents within `r` of each other.
///
/// `scheduler` gives the agents to start from, in the order they are
/// visited; every one must be tracked by `space` and known to `agents`.
/// Neighbours are found with exact distance queries.
///
/// # Errors
///
/// [`SpaceError::AgentNotFound`] if a scheduled agent is not in the space
/// or a paired agent cannot be resolved through `agents`.
pub fn interacting_pairs<'a, L, I>(
    space: &ContinuousIndex,
    r: f64,
    policy: PairPolicy,
    scheduler: I,
    agents: &'a L,
) -> Result<InteractingPairs<'a, L::Agent>, SpaceError>
where
    L: AgentLookup,
    I: IntoIterator<Item = AgentId>,
{
    let ids = match policy {
        PairPolicy::All => all_pairs(space, r, scheduler)?,
        PairPolicy::Nearest => nearest_pairs(space, r, scheduler)?,
        PairPolicy::Types => typed_pairs(space, r, scheduler, agents)?,
    };
    debug!(%policy, radius = r, pairs = ids.len(), "interacting pairs enumerated");

    let resolve = |id: AgentId| agents.agent(id).ok_or(SpaceError::AgentNotFound { id });
    let pairs = ids
        .into_iter()
        .map(|(a, b)| -> Result<_, SpaceError> { Ok((resolve(a)?, resolve(b)?)) })
        .collect::<Result<Vec<_>, SpaceError>>()?;
    Ok(InteractingPairs {
        inner: pairs.into_iter(),
    })
}

fn all_pairs(
    space: &ContinuousIndex,
    r: f64,
    scheduler: impl IntoIterator<Item = AgentId>,
) -> Result<IndexSet<(AgentId, AgentId)>, SpaceError> {
    let mut pairs = IndexSet::new();
    for id in scheduler {
        for other in space.nearby_ids_exact_of(id, r)? {
            pairs.insert(canonical(id, other));
        }
    }
    Ok(pairs)
}

/// Pairs within `r` whose kinds differ, where both kinds are among those
/// the scheduler yields.
fn typed_pairs<L: AgentLookup>(
    space: &ContinuousIndex,
    r: f64,
    scheduler: impl IntoIterator<Item = AgentId>,
    agents: &L,
) -> Result<IndexSet<(AgentId, AgentId)>, SpaceError> {
    let kind_of = |id: AgentId| agents.kind(id).ok_or(SpaceError::AgentNotFound { id });
    let scheduled = scheduler
        .into_iter()
        .map(|id| Ok((id, kind_of(id)?)))
        .collect::<Result<Vec<_>, SpaceError>>()?;
    let kinds: IndexSet<&L::Kind> = scheduled.iter().map(|(_, kind)| kind).collect();

    let mut pairs = IndexSet::new();
    for (id, kind) in &scheduled {
        for other in space.nearby_ids_exact_of(*id, r)? {
            let other_kind = kind_of(other)?;
            if other_kind != *kind && kinds.contains(&other_kind) {
                pairs.insert(canonical(*id, other));
            }
        }
    }
    Ok(pairs)
}

/// Pair every agent with its nearest neighbour, then break up chains so
/// no agent appears twice.
///
/// The first pass keeps, per lower id, the closest nomination. The second
/// pass looks at every agent named by more than one first-pass pair and
/// drops all of its pairs but the closest (the earliest on a tie). A pair
/// survives only if it is the closest first-pass pair of both its agents.
fn nearest_pairs(
    space: &ContinuousIndex,
    r: f64,
    scheduler: impl IntoIterator<Item = AgentId>,
) -> Result<IndexSet<(AgentId, AgentId)>, SpaceError> {
    let mut nominated: IndexMap<AgentId, (AgentId, f64)> = IndexMap::new();
    for id in scheduler {
        let Some(neighbor) = space.nearest_neighbor(id, r)? else {
            continue;
        };
        let (low, high) = canonical(id, neighbor.id);
        match nominated.get_mut(&low) {
            Some(slot) if neighbor.distance < slot.1 => *slot = (high, neighbor.distance),
            Some(_) => {}
            None => {
                nominated.insert(low, (high, neighbor.distance));
            }
        }
    }

    // Index into `nominated` of each agent's closest pair.
    let mut closest: IndexMap<AgentId, (usize, f64)> = IndexMap::new();
    for (index, (&low, &(high, distance))) in nominated.iter().enumerate() {
        for agent in [low, high] {
            match closest.get_mut(&agent) {
                Some(best) if distance < best.1 => *best = (index, distance),
                Some(_) => {}
                None => {
                    closest.insert(agent, (index, distance));
                }
            }
        }
    }

    let is_closest =
        |agent: AgentId, index: usize| closest.get(&agent).is_some_and(|best| best.0 == index);
    Ok(nominated
        .iter()
        .enumerate()
        .filter(|&(index, (&low, &(high, _)))| is_closest(low, index) && is_closest(high, index))
        .map(|(_, (&low, &(high, _)))| (low, high))
        .collect())
}
