use thiserror::Error;

/// Violation of a structural invariant in builder input.
///
/// All variants are surfaced to the caller; the engine never recovers from
/// them internally. Violations of *internal* invariants are programming
/// bugs and abort through assertions instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown atom `{0}`")]
    UnknownAtom(String),
    #[error("unknown agent `{0}`")]
    UnknownAgent(String),
    #[error("duplicate atom `{0}`")]
    DuplicateAtom(String),
    #[error("duplicate agent `{0}`")]
    DuplicateAgent(String),
    #[error("expected one relation per agent ({expected}), found {found}")]
    RelationCount { expected: usize, found: usize },
    #[error("relation of agent {agent} covers {found} members, expected {expected}")]
    RelationMembers {
        agent: usize,
        expected: usize,
        found: usize,
    },
    #[error("successor set of agent {agent} at member {member} has universe {found}, expected {expected}")]
    RelationUniverse {
        agent: usize,
        member: usize,
        expected: usize,
        found: usize,
    },
    #[error("expected {expected} labels, found {found}")]
    LabelCount { expected: usize, found: usize },
    #[error("expected {expected} preconditions, found {found}")]
    PreconditionCount { expected: usize, found: usize },
    #[error("expected {expected} postcondition maps, found {found}")]
    PostconditionCount { expected: usize, found: usize },
    #[error("postcondition of atom {atom} in event {event} is not propositional")]
    ModalPostcondition { event: usize, atom: usize },
    #[error("designated set has universe {found}, expected {expected}")]
    DesignatedUniverse { expected: usize, found: usize },
    #[error("designated set is empty")]
    EmptyDesignated,
    #[error("`{0}` does not share the task language")]
    LanguageMismatch(String),
}
