use daedalus::{Action, FormulaRef, Language, State, ValidationError};
use hashbrown::HashMap;
use std::sync::Arc;

/// An epistemic planning problem: an initial pointed Kripke state, a
/// library of actions, and a goal formula, all over one shared language.
pub struct PlanningTask {
    domain_name: String,
    problem_id: String,
    language: Arc<Language>,
    initial_state: State,
    actions: Vec<Arc<Action>>,
    action_index: HashMap<String, usize>,
    goal: FormulaRef,
    maximum_depth: u32,
}

impl PlanningTask {
    pub fn new(
        domain_name: impl Into<String>,
        problem_id: impl Into<String>,
        language: Arc<Language>,
        initial_state: State,
        actions: Vec<Arc<Action>>,
        goal: FormulaRef,
    ) -> Result<Self, ValidationError> {
        if initial_state.language() != &language {
            return Err(ValidationError::LanguageMismatch("initial state".to_string()));
        }
        for action in &actions {
            if action.language() != &language {
                return Err(ValidationError::LanguageMismatch(action.name().to_string()));
            }
        }

        let mut action_index = HashMap::with_capacity(actions.len());
        for (i, action) in actions.iter().enumerate() {
            action_index.insert(action.name().to_string(), i);
        }
        let maximum_depth = actions.iter().map(|a| a.maximum_depth()).max().unwrap_or(0);

        Ok(PlanningTask {
            domain_name: domain_name.into(),
            problem_id: problem_id.into(),
            language,
            initial_state,
            actions,
            action_index,
            goal,
            maximum_depth,
        })
    }

    pub fn domain_name(&self) -> &str {
        &self.domain_name
    }

    pub fn problem_id(&self) -> &str {
        &self.problem_id
    }

    pub fn language(&self) -> &Arc<Language> {
        &self.language
    }

    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    pub fn actions(&self) -> &[Arc<Action>] {
        &self.actions
    }

    pub fn action(&self, index: usize) -> &Arc<Action> {
        &self.actions[index]
    }

    pub fn action_named(&self, name: &str) -> Option<&Arc<Action>> {
        self.action_index.get(name).map(|&i| &self.actions[i])
    }

    pub fn goal(&self) -> &FormulaRef {
        &self.goal
    }

    /// Maximal modal depth over the action library, cached at
    /// construction; together with the goal depth it lower-bounds the
    /// contraction bound needed for a sound bounded search.
    pub fn maximum_depth(&self) -> u32 {
        self.maximum_depth
    }
}
