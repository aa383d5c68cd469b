use crate::error::ValidationError;
use crate::ids::dense_id;
use hashbrown::HashMap;
use std::fmt::{Debug, Formatter};

dense_id!(
    /// Identifier of a propositional atom.
    AtomId
);
dense_id!(
    /// Identifier of a knowing/believing agent.
    AgentId
);

/// Registry of the atom and agent names of a planning problem.
///
/// Atoms and agents are numbered densely in declaration order. The language
/// is immutable after construction and shared (behind an `Arc`) by every
/// state and action drawn from the same problem.
#[derive(Clone)]
pub struct Language {
    atoms: Vec<String>,
    agents: Vec<String>,
    atom_index: HashMap<String, AtomId>,
    agent_index: HashMap<String, AgentId>,
}

impl Language {
    pub fn new(
        atoms: impl IntoIterator<Item = impl Into<String>>,
        agents: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, ValidationError> {
        let atoms: Vec<String> = atoms.into_iter().map(Into::into).collect();
        let agents: Vec<String> = agents.into_iter().map(Into::into).collect();

        let mut atom_index = HashMap::with_capacity(atoms.len());
        for (i, name) in atoms.iter().enumerate() {
            if atom_index.insert(name.clone(), AtomId::new(i)).is_some() {
                return Err(ValidationError::DuplicateAtom(name.clone()));
            }
        }
        let mut agent_index = HashMap::with_capacity(agents.len());
        for (i, name) in agents.iter().enumerate() {
            if agent_index.insert(name.clone(), AgentId::new(i)).is_some() {
                return Err(ValidationError::DuplicateAgent(name.clone()));
            }
        }

        Ok(Language {
            atoms,
            agents,
            atom_index,
            agent_index,
        })
    }

    pub fn atoms_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn agents_count(&self) -> usize {
        self.agents.len()
    }

    pub fn atom_id(&self, name: &str) -> Result<AtomId, ValidationError> {
        self.atom_index
            .get(name)
            .copied()
            .ok_or_else(|| ValidationError::UnknownAtom(name.to_string()))
    }

    pub fn agent_id(&self, name: &str) -> Result<AgentId, ValidationError> {
        self.agent_index
            .get(name)
            .copied()
            .ok_or_else(|| ValidationError::UnknownAgent(name.to_string()))
    }

    pub fn atom_name(&self, atom: AtomId) -> &str {
        &self.atoms[atom]
    }

    pub fn agent_name(&self, agent: AgentId) -> &str {
        &self.agents[agent]
    }

    pub fn atom_ids(&self) -> impl Iterator<Item = AtomId> {
        (0..self.atoms.len()).map(AtomId::new)
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> {
        (0..self.agents.len()).map(AgentId::new)
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.atoms == other.atoms && self.agents == other.agents
    }
}

impl Eq for Language {}

impl Debug for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, name) in self.atoms.iter().enumerate() {
            writeln!(f, "atom {i}\t<- {name}")?;
        }
        for (i, name) in self.agents.iter().enumerate() {
            writeln!(f, "agent {i}\t<- {name}")?;
        }
        Ok(())
    }
}
