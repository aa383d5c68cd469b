use crate::error::ValidationError;
use crate::formula::Formula;
use crate::ids::dense_id;
use crate::label::LabelId;
use crate::language::{AgentId, Language};
use fixedbitset::FixedBitSet;
use itertools::Itertools;
use std::fmt::{Display, Error, Formatter};
use std::sync::Arc;

dense_id!(
    /// Identifier of a world, local to its containing state.
    WorldId
);

/// Successor sets of one agent: one bitset over the worlds per world.
pub type AgentRelation = Vec<FixedBitSet>;

/// Accessibility of all agents, indexed by agent then world.
pub type Relations = Vec<AgentRelation>;

/// Pointed multi-agent Kripke model.
///
/// Immutable once constructed: product update and contraction produce fresh
/// states. Labels are ids into the label store the state was built against;
/// the engine never assumes connectivity, so unreachable worlds are
/// permitted (contraction may remove them).
#[derive(Clone)]
pub struct State {
    language: Arc<Language>,
    worlds_count: usize,
    relations: Relations,
    labels: Vec<LabelId>,
    designated: FixedBitSet,
}

impl State {
    pub fn new(
        language: Arc<Language>,
        worlds_count: usize,
        relations: Relations,
        labels: Vec<LabelId>,
        designated: FixedBitSet,
    ) -> Result<Self, ValidationError> {
        validate_relations(&relations, language.agents_count(), worlds_count)?;
        if labels.len() != worlds_count {
            return Err(ValidationError::LabelCount {
                expected: worlds_count,
                found: labels.len(),
            });
        }
        if designated.len() != worlds_count {
            return Err(ValidationError::DesignatedUniverse {
                expected: worlds_count,
                found: designated.len(),
            });
        }
        if designated.is_clear() {
            return Err(ValidationError::EmptyDesignated);
        }

        Ok(State {
            language,
            worlds_count,
            relations,
            labels,
            designated,
        })
    }

    /// Constructor reserved to the engine: the parts are produced by the
    /// update and contraction algorithms and already satisfy the
    /// structural invariants.
    pub(crate) fn from_parts(
        language: Arc<Language>,
        worlds_count: usize,
        relations: Relations,
        labels: Vec<LabelId>,
        designated: FixedBitSet,
    ) -> Self {
        debug_assert!(validate_relations(&relations, language.agents_count(), worlds_count).is_ok());
        debug_assert_eq!(labels.len(), worlds_count);
        debug_assert_eq!(designated.len(), worlds_count);
        debug_assert!(!designated.is_clear());

        State {
            language,
            worlds_count,
            relations,
            labels,
            designated,
        }
    }

    pub fn language(&self) -> &Arc<Language> {
        &self.language
    }

    pub fn worlds_count(&self) -> usize {
        self.worlds_count
    }

    pub fn worlds(&self) -> impl Iterator<Item = WorldId> {
        (0..self.worlds_count).map(WorldId::new)
    }

    pub fn label_of(&self, w: WorldId) -> LabelId {
        self.labels[w]
    }

    pub fn labels(&self) -> &[LabelId] {
        &self.labels
    }

    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    /// Worlds the agent considers possible from `w`.
    pub fn successor_set(&self, agent: AgentId, w: WorldId) -> &FixedBitSet {
        &self.relations[agent][w]
    }

    pub fn successors(&self, agent: AgentId, w: WorldId) -> impl Iterator<Item = WorldId> + '_ {
        self.successor_set(agent, w).ones().map(WorldId::new)
    }

    pub fn designated_set(&self) -> &FixedBitSet {
        &self.designated
    }

    pub fn designated_worlds(&self) -> impl Iterator<Item = WorldId> + '_ {
        self.designated.ones().map(WorldId::new)
    }

    pub fn is_designated(&self, w: WorldId) -> bool {
        self.designated.contains(w.index())
    }

    /// A state satisfies a formula iff the formula holds in every
    /// designated world.
    pub fn satisfies(&self, f: &Formula) -> bool {
        self.designated_worlds().all(|w| f.holds_in(self, w))
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "state<{} worlds, designated {{{}}}>",
            self.worlds_count,
            self.designated.ones().format(" ")
        )
    }
}

/// Shared with event models, which carry the same relational shape over
/// events.
pub(crate) fn validate_relations(
    relations: &Relations,
    agents_count: usize,
    members_count: usize,
) -> Result<(), ValidationError> {
    if relations.len() != agents_count {
        return Err(ValidationError::RelationCount {
            expected: agents_count,
            found: relations.len(),
        });
    }
    for (agent, relation) in relations.iter().enumerate() {
        if relation.len() != members_count {
            return Err(ValidationError::RelationMembers {
                agent,
                expected: members_count,
                found: relation.len(),
            });
        }
        for (member, set) in relation.iter().enumerate() {
            if set.len() != members_count {
                return Err(ValidationError::RelationUniverse {
                    agent,
                    member,
                    expected: members_count,
                    found: set.len(),
                });
            }
        }
    }
    Ok(())
}
