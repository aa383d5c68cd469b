//! Process-lifetime interning tables.
//!
//! Each planning call is handed its own `Storages` bundle; the tables are
//! monotonic (entries are added, never mutated or removed) and
//! single-threaded. Abandoning the bundle releases everything at once.

use crate::bisimulation::SignatureStore;
use crate::ids::dense_id;
use crate::label::{LabelId, LabelStore};
use crate::state::{State, WorldId};
use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;

dense_id!(
    /// Identifier of an interned state.
    StateId
);

/// The store bundle handed to a planning call.
#[derive(Default)]
pub struct Storages {
    pub labels: LabelStore,
    pub signatures: SignatureStore,
    pub states: StateStore,
}

impl Storages {
    pub fn new() -> Self {
        Default::default()
    }
}

/// Structural key of a state under a canonical renumbering of its worlds,
/// so that two states differing only by world numbering collide.
#[derive(PartialEq, Eq, Hash)]
struct StateKey {
    worlds_count: usize,
    designated: Vec<u32>,
    labels: Vec<LabelId>,
    adjacency: Vec<FixedBitSet>,
}

/// Deduplicating store of the states met during a search. The closed set
/// of the planner owns the states; frontiers refer to them by id.
#[derive(Default)]
pub struct StateStore {
    states: Vec<Arc<State>>,
    index: HashMap<StateKey, StateId>,
}

impl StateStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Interns `state`, returning its id and whether it was new. A state
    /// that only renumbers the worlds of an already interned one maps to
    /// the existing id.
    pub fn intern(&mut self, state: State) -> (StateId, bool) {
        let key = canonical_key(&state);
        if let Some(&id) = self.index.get(&key) {
            return (id, false);
        }
        let id = StateId::new(self.states.len());
        self.index.insert(key, id);
        self.states.push(Arc::new(state));
        (id, true)
    }

    pub fn get(&self, id: StateId) -> &Arc<State> {
        &self.states[id]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Renumbers the worlds by a breadth-first traversal from the designated
/// set in ascending id order (unreached worlds appended last, ascending),
/// then serializes designated set, labels and adjacency.
fn canonical_key(state: &State) -> StateKey {
    let n = state.worlds_count();

    let mut new_of: Vec<Option<u32>> = vec![None; n];
    let mut order: Vec<WorldId> = Vec::with_capacity(n);
    let mut queue: VecDeque<WorldId> = VecDeque::new();

    for w in state.designated_worlds() {
        new_of[w.index()] = Some(order.len() as u32);
        order.push(w);
        queue.push_back(w);
    }
    while let Some(w) = queue.pop_front() {
        for agent in state.language().agent_ids() {
            for w2 in state.successors(agent, w) {
                if new_of[w2.index()].is_none() {
                    new_of[w2.index()] = Some(order.len() as u32);
                    order.push(w2);
                    queue.push_back(w2);
                }
            }
        }
    }
    for w in state.worlds() {
        if new_of[w.index()].is_none() {
            new_of[w.index()] = Some(order.len() as u32);
            order.push(w);
        }
    }

    let designated: Vec<u32> = state
        .designated_worlds()
        .map(|w| new_of[w.index()].unwrap())
        .collect();

    let labels: Vec<LabelId> = order.iter().map(|&w| state.label_of(w)).collect();

    let mut adjacency = Vec::with_capacity(state.language().agents_count() * n);
    for agent in state.language().agent_ids() {
        for &w in &order {
            let mut set = FixedBitSet::with_capacity(n);
            for w2 in state.successors(agent, w) {
                set.insert(new_of[w2.index()].unwrap() as usize);
            }
            adjacency.push(set);
        }
    }

    StateKey {
        worlds_count: n,
        designated,
        labels,
        adjacency,
    }
}
