//! Test utilities and mock types for Roost development.
//!
//! Provides [`MockAgents`], an in-memory [`AgentLookup`] container, and
//! seeded placement fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use indexmap::IndexMap;
use roost_core::{AgentId, AgentLookup};

/// A minimal agent: its id and a numeric kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MockAgent {
    pub id: AgentId,
    pub kind: u32,
}

/// In-memory agent container keyed by id, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MockAgents {
    agents: IndexMap<AgentId, MockAgent>,
}

impl MockAgents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an agent.
    pub fn add(&mut self, id: AgentId, kind: u32) {
        self.agents.insert(id, MockAgent { id, kind });
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Ids in insertion order; usable as a scheduler.
    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }
}

impl AgentLookup for MockAgents {
    type Agent = MockAgent;
    type Kind = u32;

    fn agent(&self, id: AgentId) -> Option<&MockAgent> {
        self.agents.get(&id)
    }

    fn kind(&self, id: AgentId) -> Option<u32> {
        self.agents.get(&id).map(|a| a.kind)
    }
}
