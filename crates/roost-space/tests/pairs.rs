//! Interacting-pair enumeration over seeded continuous layouts.

use indexmap::IndexSet;
use proptest::prelude::*;
use roost_core::{AgentId, AgentLookup};
use roost_space::{interacting_pairs, ContinuousIndex, PairPolicy};
use roost_test_utils::fixtures::scatter_points;
use roost_test_utils::MockAgents;

fn layout(count: usize, kinds: u32, seed: u64) -> (ContinuousIndex, MockAgents) {
    let mut space = ContinuousIndex::new(&[10.0, 10.0], 0.5, true).unwrap();
    let mut agents = MockAgents::new();
    scatter_points(&mut space, &mut agents, count, kinds, seed);
    (space, agents)
}

#[test]
fn all_policy_matches_pairwise_scan() {
    let (space, agents) = layout(120, 1, 3);
    let r = 0.8;
    let got: IndexSet<(AgentId, AgentId)> =
        interacting_pairs(&space, r, PairPolicy::All, agents.ids(), &agents)
            .unwrap()
            .map(|(a, b)| (a.id, b.id))
            .collect();

    let ids = agents.ids();
    let mut expected = 0;
    for (i, &a) in ids.iter().enumerate() {
        for &b in &ids[i + 1..] {
            let d = space
                .distance(space.position(a).unwrap(), space.position(b).unwrap())
                .unwrap();
            if d <= r {
                expected += 1;
                assert!(got.contains(&(a.min(b), a.max(b))), "missing pair {a}-{b}");
            }
        }
    }
    assert_eq!(got.len(), expected);
}

#[test]
fn types_policy_never_pairs_equal_kinds() {
    let (space, agents) = layout(150, 3, 8);
    let pairs = interacting_pairs(&space, 1.0, PairPolicy::Types, agents.ids(), &agents).unwrap();
    for (a, b) in pairs {
        assert_ne!(a.kind, b.kind);
        assert!(a.id < b.id);
    }
}

#[test]
fn types_policy_ignores_unscheduled_kinds() {
    let (space, agents) = layout(150, 3, 21);
    let sched: Vec<AgentId> = agents
        .ids()
        .into_iter()
        .filter(|&id| agents.kind(id) != Some(2))
        .collect();
    let pairs = interacting_pairs(&space, 1.5, PairPolicy::Types, sched, &agents).unwrap();
    assert_ne!(pairs.len(), 0);
    for (a, b) in pairs {
        assert!(a.kind < 2 && b.kind < 2, "pair {}-{} has an unscheduled kind", a.id, b.id);
        assert_ne!(a.kind, b.kind);
    }
}

proptest! {
    #[test]
    fn all_pairs_are_unique(seed in 0u64..300, count in 0usize..60, r in 0.0f64..2.0) {
        let (space, agents) = layout(count, 1, seed);
        let pairs: Vec<(AgentId, AgentId)> =
            interacting_pairs(&space, r, PairPolicy::All, agents.ids(), &agents)
                .unwrap()
                .map(|(a, b)| (a.id, b.id))
                .collect();
        let unique: IndexSet<_> = pairs.iter().copied().collect();
        prop_assert_eq!(unique.len(), pairs.len());
        prop_assert!(pairs.iter().all(|(a, b)| a < b));
    }

    #[test]
    fn nearest_pairs_share_no_agent(seed in 0u64..300, count in 0usize..60, r in 0.0f64..3.0) {
        let (space, agents) = layout(count, 1, seed);
        let pairs = interacting_pairs(&space, r, PairPolicy::Nearest, agents.ids(), &agents).unwrap();
        let mut seen = IndexSet::new();
        for (a, b) in pairs {
            prop_assert!(a.id != b.id);
            prop_assert!(seen.insert(a.id), "agent {} paired twice", a.id);
            prop_assert!(seen.insert(b.id), "agent {} paired twice", b.id);
        }
    }
}
