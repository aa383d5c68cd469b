//! Bisimulation contraction of pointed Kripke models.
//!
//! Three modes: `Full` runs unbounded partition refinement on the whole
//! model and always yields a true bisimulation quotient; `Rooted` runs at
//! most `bound` refinement rounds on the subgraph reachable from the
//! designated worlds; `Canonical` computes the same bounded quotient
//! through interned world signatures, which makes equality checks between
//! worlds of *different* states a comparison of dense ids.

mod partition;
mod signature;

pub use signature::{InfoId, SignatureId, SignatureStore};

use crate::state::{Relations, State, WorldId};
use fixedbitset::FixedBitSet;
use std::collections::VecDeque;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ContractionType {
    Full,
    Rooted,
    Canonical,
}

/// Result of a contraction. `is_true_bisimulation` tells whether the
/// requested bound sufficed to witness full bisimulation, i.e. the
/// partition had stabilized by then; the `Full` mode always witnesses it.
pub struct Contraction {
    pub state: State,
    pub is_true_bisimulation: bool,
}

/// Contracts `s` under the given mode. `bound` is ignored by `Full`.
pub fn contract(
    kind: ContractionType,
    s: &State,
    bound: usize,
    signatures: &mut SignatureStore,
) -> Contraction {
    match kind {
        ContractionType::Full => Contraction {
            state: contract_full(s),
            is_true_bisimulation: true,
        },
        ContractionType::Rooted => contract_rooted(s, bound),
        ContractionType::Canonical => contract_canonical(s, bound, signatures),
    }
}

/// Quotient of `s` under the coarsest (unbounded) bisimulation, ignoring
/// the designated worlds for the partition but preserving them in the
/// quotient.
pub fn contract_full(s: &State) -> State {
    let partition = partition::full_partition(s);
    quotient(s, &partition)
}

/// Bounded contraction by partition refinement, restricted to the worlds
/// reachable from the designated set.
pub fn contract_rooted(s: &State, bound: usize) -> Contraction {
    let universe = reachable(s);
    let (partition, stable) = partition::bounded_partition(s, &universe, bound);
    Contraction {
        state: quotient(s, &partition),
        is_true_bisimulation: stable,
    }
}

/// Bounded contraction by world-signature hashing, restricted to the
/// worlds reachable from the designated set.
pub fn contract_canonical(s: &State, bound: usize, store: &mut SignatureStore) -> Contraction {
    let universe = reachable(s);
    let (partition, stable) = signature::canonical_partition(s, &universe, bound, store);
    Contraction {
        state: quotient(s, &partition),
        is_true_bisimulation: stable,
    }
}

/// Assignment of worlds to equivalence classes. Worlds outside the
/// contracted universe carry no class. Class ids are normalized to
/// first-occurrence order over ascending world ids, so the id of a class
/// equals the rank of its least world.
pub(crate) struct Partition {
    classes: Vec<Option<u32>>,
    count: usize,
}

impl Partition {
    pub(crate) fn new(classes: Vec<Option<u32>>, count: usize) -> Self {
        Partition { classes, count }
    }

    pub(crate) fn class_of(&self, w: WorldId) -> Option<u32> {
        self.classes[w.index()]
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }
}

/// Worlds reachable from the designated set through any agent's relation.
pub(crate) fn reachable(s: &State) -> FixedBitSet {
    let mut seen = s.designated_set().clone();
    let mut queue: VecDeque<WorldId> = s.designated_worlds().collect();

    while let Some(w) = queue.pop_front() {
        for agent in s.language().agent_ids() {
            for w2 in s.successors(agent, w) {
                if !seen.contains(w2.index()) {
                    seen.insert(w2.index());
                    queue.push_back(w2);
                }
            }
        }
    }
    seen
}

/// Builds the quotient state of a partition: one world per class, numbered
/// by class id (hence by least member). Labels and successor sets lift
/// from the least member of each class; the designated set lifts as the
/// image of the projection.
fn quotient(s: &State, partition: &Partition) -> State {
    let count = partition.count();

    let mut representatives: Vec<Option<WorldId>> = vec![None; count];
    for w in s.worlds() {
        if let Some(class) = partition.class_of(w) {
            let slot = &mut representatives[class as usize];
            if slot.is_none() {
                *slot = Some(w);
            }
        }
    }
    let representatives: Vec<WorldId> =
        representatives.into_iter().map(|r| r.expect("empty class")).collect();

    let mut labels = Vec::with_capacity(count);
    for &rep in &representatives {
        labels.push(s.label_of(rep));
    }

    let mut relations: Relations = Vec::with_capacity(s.language().agents_count());
    for agent in s.language().agent_ids() {
        let mut relation = Vec::with_capacity(count);
        for &rep in &representatives {
            let mut set = FixedBitSet::with_capacity(count);
            for w2 in s.successors(agent, rep) {
                if let Some(class) = partition.class_of(w2) {
                    set.insert(class as usize);
                }
            }
            relation.push(set);
        }
        relations.push(relation);
    }

    let mut designated = FixedBitSet::with_capacity(count);
    for w in s.designated_worlds() {
        let class = partition.class_of(w).expect("designated world dropped");
        designated.insert(class as usize);
    }

    State::from_parts(s.language().clone(), count, relations, labels, designated)
}
