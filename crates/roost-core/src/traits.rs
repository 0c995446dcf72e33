//! The lookup trait through which an agent container exposes its entities.

use crate::id::AgentId;
use std::hash::Hash;

/// Read-only access to the agents owned by a model container.
///
/// Spaces store only ids. Operations that hand back entity handles
/// (interacting pairs) or need an agent's runtime category (type-aware
/// pairing) resolve them through this trait.
pub trait AgentLookup {
    /// The entity handle type.
    type Agent;

    /// Runtime category used for type-aware pairing.
    ///
    /// Containers with a single kind of agent can use `()`.
    type Kind: Eq + Hash;

    /// Resolve an id to its entity handle.
    ///
    /// Returns `None` if the container has no agent with this id.
    fn agent(&self, id: AgentId) -> Option<&Self::Agent>;

    /// The runtime category of an agent, or `None` if the id is unknown.
    fn kind(&self, id: AgentId) -> Option<Self::Kind>;
}
