use crate::error::ValidationError;
use crate::formula::FormulaRef;
use crate::ids::dense_id;
use crate::language::{AgentId, AtomId, Language};
use crate::state::{validate_relations, Relations};
use fixedbitset::FixedBitSet;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

dense_id!(
    /// Identifier of an event, local to its containing action.
    EventId
);

/// Propositional assignments performed by an event: each atom in the domain
/// is set to the truth value of the mapped formula, evaluated in the source
/// state. The empty map denotes a pure announcement/sensing event.
pub type Postconditions = BTreeMap<AtomId, FormulaRef>;

/// Event model: a Kripke-like structure whose members carry preconditions
/// and propositional postconditions. The per-agent event relation encodes
/// observability.
pub struct Action {
    language: Arc<Language>,
    name: String,
    events_count: usize,
    relations: Relations,
    preconditions: Vec<FormulaRef>,
    postconditions: Vec<Postconditions>,
    designated: FixedBitSet,
    maximum_depth: u32,
}

impl Action {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        language: Arc<Language>,
        events_count: usize,
        relations: Relations,
        preconditions: Vec<FormulaRef>,
        postconditions: Vec<Postconditions>,
        designated: FixedBitSet,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        validate_relations(&relations, language.agents_count(), events_count)?;
        if preconditions.len() != events_count {
            return Err(ValidationError::PreconditionCount {
                expected: events_count,
                found: preconditions.len(),
            });
        }
        if postconditions.len() != events_count {
            return Err(ValidationError::PostconditionCount {
                expected: events_count,
                found: postconditions.len(),
            });
        }
        for (event, post) in postconditions.iter().enumerate() {
            for (&atom, f) in post {
                if !f.is_propositional() {
                    return Err(ValidationError::ModalPostcondition {
                        event,
                        atom: atom.index(),
                    });
                }
            }
        }
        if designated.len() != events_count {
            return Err(ValidationError::DesignatedUniverse {
                expected: events_count,
                found: designated.len(),
            });
        }
        if designated.is_clear() {
            return Err(ValidationError::EmptyDesignated);
        }

        let maximum_depth = preconditions.iter().map(|f| f.modal_depth()).max().unwrap_or(0);

        Ok(Action {
            language,
            name: name.into(),
            events_count,
            relations,
            preconditions,
            postconditions,
            designated,
            maximum_depth,
        })
    }

    pub fn language(&self) -> &Arc<Language> {
        &self.language
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn events_count(&self) -> usize {
        self.events_count
    }

    pub fn events(&self) -> impl Iterator<Item = EventId> {
        (0..self.events_count).map(EventId::new)
    }

    pub fn precondition(&self, e: EventId) -> &FormulaRef {
        &self.preconditions[e]
    }

    pub fn postconditions_of(&self, e: EventId) -> &Postconditions {
        &self.postconditions[e]
    }

    /// Events the agent considers possible when `e` occurs.
    pub fn successor_set(&self, agent: AgentId, e: EventId) -> &FixedBitSet {
        &self.relations[agent][e]
    }

    pub fn successors(&self, agent: AgentId, e: EventId) -> impl Iterator<Item = EventId> + '_ {
        self.successor_set(agent, e).ones().map(EventId::new)
    }

    pub fn designated_set(&self) -> &FixedBitSet {
        &self.designated
    }

    pub fn is_designated(&self, e: EventId) -> bool {
        self.designated.contains(e.index())
    }

    /// Maximal modal depth across the event preconditions. The planner
    /// derives its starting bound from this.
    pub fn maximum_depth(&self) -> u32 {
        self.maximum_depth
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}<{} events>", self.name, self.events_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;

    fn lang() -> Arc<Language> {
        Arc::new(Language::new(["p"], ["a"]).unwrap())
    }

    fn loop_relation(events: usize) -> Relations {
        let mut relation = Vec::with_capacity(events);
        for e in 0..events {
            let mut set = FixedBitSet::with_capacity(events);
            set.insert(e);
            relation.push(set);
        }
        vec![relation]
    }

    #[test]
    fn derives_maximum_depth_from_preconditions() {
        let language = lang();
        let a = language.agent_id("a").unwrap();
        let p = Formula::atom(language.atom_id("p").unwrap());
        let pre = Formula::knows(a, Formula::knows(a, p));

        let mut designated = FixedBitSet::with_capacity(1);
        designated.insert(0);
        let action = Action::new(
            language,
            1,
            loop_relation(1),
            vec![pre],
            vec![Postconditions::new()],
            designated,
            "probe",
        )
        .unwrap();
        assert_eq!(action.maximum_depth(), 2);
    }

    #[test]
    fn rejects_modal_postconditions() {
        let language = lang();
        let a = language.agent_id("a").unwrap();
        let p_id = language.atom_id("p").unwrap();
        let modal = Formula::knows(a, Formula::atom(p_id));

        let mut post = Postconditions::new();
        post.insert(p_id, modal);

        let mut designated = FixedBitSet::with_capacity(1);
        designated.insert(0);
        let err = Action::new(
            language,
            1,
            loop_relation(1),
            vec![Formula::top()],
            vec![post],
            designated,
            "bad",
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::ModalPostcondition { event: 0, atom: 0 });
    }

    #[test]
    fn rejects_empty_designated_events() {
        let language = lang();
        let err = Action::new(
            language,
            1,
            loop_relation(1),
            vec![Formula::top()],
            vec![Postconditions::new()],
            FixedBitSet::with_capacity(1),
            "empty",
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::EmptyDesignated);
    }
}
