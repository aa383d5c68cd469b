use crate::language::{AgentId, AtomId, Language};
use crate::state::{State, WorldId};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Shared handle to an immutable formula node.
///
/// Formulas form many-owner DAGs: domain builders and the planner share
/// subtrees freely (goal and precondition formulas are evaluated against
/// many states).
pub type FormulaRef = Arc<Formula>;

enum Kind {
    True,
    False,
    Atom(AtomId),
    Not(FormulaRef),
    And(Vec<FormulaRef>),
    Or(Vec<FormulaRef>),
    /// Universal modality: the agent knows/believes the operand.
    Box(AgentId, FormulaRef),
    /// Existential modality: the agent considers the operand possible.
    Diamond(AgentId, FormulaRef),
}

/// Modal formula with a cached modal depth.
pub struct Formula {
    kind: Kind,
    modal_depth: u32,
}

impl Formula {
    fn wrap(kind: Kind) -> FormulaRef {
        let modal_depth = match &kind {
            Kind::True | Kind::False | Kind::Atom(_) => 0,
            Kind::Not(f) => f.modal_depth,
            Kind::And(fs) | Kind::Or(fs) => fs.iter().map(|f| f.modal_depth).max().unwrap_or(0),
            Kind::Box(_, f) | Kind::Diamond(_, f) => 1 + f.modal_depth,
        };
        Arc::new(Formula { kind, modal_depth })
    }

    pub fn top() -> FormulaRef {
        Formula::wrap(Kind::True)
    }

    pub fn bottom() -> FormulaRef {
        Formula::wrap(Kind::False)
    }

    pub fn atom(atom: AtomId) -> FormulaRef {
        Formula::wrap(Kind::Atom(atom))
    }

    pub fn negate(f: FormulaRef) -> FormulaRef {
        Formula::wrap(Kind::Not(f))
    }

    pub fn conjunction(fs: Vec<FormulaRef>) -> FormulaRef {
        Formula::wrap(Kind::And(fs))
    }

    pub fn disjunction(fs: Vec<FormulaRef>) -> FormulaRef {
        Formula::wrap(Kind::Or(fs))
    }

    /// Box modality: `agent` knows/believes `f`.
    pub fn knows(agent: AgentId, f: FormulaRef) -> FormulaRef {
        Formula::wrap(Kind::Box(agent, f))
    }

    /// Diamond modality: `agent` considers `f` possible.
    pub fn possibly(agent: AgentId, f: FormulaRef) -> FormulaRef {
        Formula::wrap(Kind::Diamond(agent, f))
    }

    /// Nesting depth of the modalities: 0 for purely propositional
    /// formulas, otherwise 1 + the maximal child depth through a modality.
    pub fn modal_depth(&self) -> u32 {
        self.modal_depth
    }

    pub fn is_propositional(&self) -> bool {
        self.modal_depth == 0
    }

    /// Truth of the formula in world `w` of the pointed model `s`.
    ///
    /// Conjunctions and disjunctions evaluate left to right and
    /// short-circuit.
    pub fn holds_in(&self, s: &State, w: WorldId) -> bool {
        match &self.kind {
            Kind::True => true,
            Kind::False => false,
            Kind::Atom(atom) => s.label_of(w).contains(*atom),
            Kind::Not(f) => !f.holds_in(s, w),
            Kind::And(fs) => fs.iter().all(|f| f.holds_in(s, w)),
            Kind::Or(fs) => fs.iter().any(|f| f.holds_in(s, w)),
            Kind::Box(agent, f) => s.successors(*agent, w).all(|w2| f.holds_in(s, w2)),
            Kind::Diamond(agent, f) => s.successors(*agent, w).any(|w2| f.holds_in(s, w2)),
        }
    }

    /// Renders the formula with the atom and agent names of `language`.
    pub fn display<'a>(&'a self, language: &'a Language) -> impl Display + 'a {
        DispFormula(self, language)
    }
}

/// Composition of a formula and its defining language, allowing atom and
/// agent ids to be rendered by name.
struct DispFormula<'a>(&'a Formula, &'a Language);

impl Display for DispFormula<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let DispFormula(formula, language) = *self;
        match &formula.kind {
            Kind::True => write!(f, "true"),
            Kind::False => write!(f, "false"),
            Kind::Atom(atom) => write!(f, "{}", language.atom_name(*atom)),
            Kind::Not(g) => write!(f, "~{}", DispFormula(g, language)),
            Kind::And(fs) => disp_connective(f, fs, language, r" /\ "),
            Kind::Or(fs) => disp_connective(f, fs, language, r" \/ "),
            Kind::Box(agent, g) => {
                write!(f, "B_{}({})", language.agent_name(*agent), DispFormula(g, language))
            }
            Kind::Diamond(agent, g) => {
                write!(f, "P_{}({})", language.agent_name(*agent), DispFormula(g, language))
            }
        }
    }
}

fn disp_connective(
    f: &mut Formatter<'_>,
    fs: &[FormulaRef],
    language: &Language,
    sep: &str,
) -> fmt::Result {
    write!(f, "(")?;
    let mut it = fs.iter().peekable();
    while let Some(g) = it.next() {
        write!(f, "{}", DispFormula(g, language))?;
        if it.peek().is_some() {
            write!(f, "{sep}")?;
        }
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{Label, LabelStore};
    use crate::state::State;
    use fixedbitset::FixedBitSet;

    /// Two worlds, one agent: w0 |= p, w1 |= ~p, agent confuses both.
    fn two_world_state(store: &mut LabelStore) -> State {
        let language = Arc::new(Language::new(["p"], ["a"]).unwrap());
        let p = language.atom_id("p").unwrap();

        let l0 = store.intern(Label::with_true_atoms(1, [p]));
        let l1 = store.intern(Label::new(1));

        let mut all = FixedBitSet::with_capacity(2);
        all.insert(0);
        all.insert(1);
        let relations = vec![vec![all.clone(), all]];

        let mut designated = FixedBitSet::with_capacity(2);
        designated.insert(0);

        State::new(language, 2, relations, vec![l0, l1], designated).unwrap()
    }

    #[test]
    fn modal_depth_is_cached_through_connectives() {
        let p = Formula::atom(AtomId::new(0));
        let a = AgentId::new(0);
        assert_eq!(p.modal_depth(), 0);
        assert!(p.is_propositional());

        let boxed = Formula::knows(a, p.clone());
        let nested = Formula::conjunction(vec![p, Formula::negate(Formula::possibly(a, boxed))]);
        assert_eq!(nested.modal_depth(), 2);
        assert!(!nested.is_propositional());
    }

    #[test]
    fn box_quantifies_over_successors() {
        let mut store = LabelStore::new();
        let s = two_world_state(&mut store);
        let language = s.language().clone();
        let a = language.agent_id("a").unwrap();
        let p = Formula::atom(language.atom_id("p").unwrap());

        assert!(p.holds_in(&s, WorldId::new(0)));
        assert!(!p.holds_in(&s, WorldId::new(1)));

        // The agent cannot rule out the ~p world.
        assert!(!Formula::knows(a, p.clone()).holds_in(&s, WorldId::new(0)));
        assert!(Formula::possibly(a, p.clone()).holds_in(&s, WorldId::new(1)));

        assert!(s.satisfies(&p));
        assert!(!s.satisfies(&Formula::knows(a, p)));
    }

    #[test]
    fn display_uses_language_names() {
        let language = Language::new(["p", "q"], ["a"]).unwrap();
        let p = Formula::atom(AtomId::new(0));
        let q = Formula::atom(AtomId::new(1));
        let f = Formula::knows(AgentId::new(0), Formula::conjunction(vec![p, Formula::negate(q)]));
        assert_eq!(f.display(&language).to_string(), r"B_a((p /\ ~q))");
    }
}
