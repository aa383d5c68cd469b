//! Search strategies over the product-update transition system.

use crate::task::PlanningTask;
use daedalus::bisimulation::{contract, ContractionType, SignatureStore};
use daedalus::{product_update, LabelStore, StateStore, Storages};
use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Strategy {
    /// Breadth-first search on the full-contraction quotient; optimal, but
    /// only terminates when the reachable quotient is finite or a plan
    /// exists.
    UnboundedSearch,
    /// Iterative deepening on the contraction bound; can prove
    /// unsolvability whenever the bounded quotients are finite.
    IterativeBoundedSearch,
}

/// Sequence of indices into the action library of a task.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Plan {
    steps: Vec<usize>,
}

impl Plan {
    pub fn steps(&self) -> &[usize] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Renders the plan with the action names of its task.
    pub fn display<'a>(&'a self, task: &'a PlanningTask) -> impl Display + 'a {
        DispPlan(self, task)
    }
}

struct DispPlan<'a>(&'a Plan, &'a PlanningTask);

impl Display for DispPlan<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut it = self.0.steps.iter().peekable();
        write!(f, "[")?;
        while let Some(&step) = it.next() {
            write!(f, "{}", self.1.action(step).name())?;
            if it.peek().is_some() {
                write!(f, ", ")?;
            }
        }
        write!(f, "]")
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PlanOutcome {
    Plan(Plan),
    /// The task is proved unsolvable: some bound was tight for every
    /// encountered state and the goal was never reached.
    NoPlan,
    /// The node budget ran out before an answer was found.
    Unknown,
}

impl PlanOutcome {
    pub fn plan(&self) -> Option<&Plan> {
        match self {
            PlanOutcome::Plan(plan) => Some(plan),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchStats {
    /// Nodes dequeued and goal-checked.
    pub expanded: usize,
    /// Distinct states interned into the transition graph.
    pub discovered: usize,
    /// Final contraction bound (bounded strategy only).
    pub bound: Option<usize>,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct SearchResult {
    pub outcome: PlanOutcome,
    pub stats: SearchStats,
}

/// Solves `task` with the requested strategy and contraction mode.
pub fn search(
    task: &PlanningTask,
    strategy: Strategy,
    contraction: ContractionType,
    storages: &mut Storages,
) -> PlanOutcome {
    search_with_stats(task, strategy, contraction, None, storages).outcome
}

/// As [`search`], with an optional budget on expanded nodes (exceeding it
/// yields [`PlanOutcome::Unknown`]) and search statistics for reporting.
pub fn search_with_stats(
    task: &PlanningTask,
    strategy: Strategy,
    contraction: ContractionType,
    node_budget: Option<usize>,
    storages: &mut Storages,
) -> SearchResult {
    let start = Instant::now();
    let Storages {
        labels,
        signatures,
        states,
    } = storages;

    // The least bound preserving the goal and every precondition.
    let minimal_bound =
        (task.goal().modal_depth().max(task.maximum_depth())) as usize;

    let mut expanded = 0usize;
    let mut discovered = 0usize;

    let (outcome, bound) = match strategy {
        Strategy::UnboundedSearch => {
            // The closed set is scoped to one search: a bundle reused for
            // several calls must not leak states between them.
            *states = StateStore::new();
            let verdict = breadth_first(
                task,
                contraction,
                minimal_bound,
                states,
                labels,
                signatures,
                node_budget,
                &mut expanded,
                &mut discovered,
            );
            let outcome = match verdict {
                BfsVerdict::Goal(plan) => PlanOutcome::Plan(plan),
                // Exhaustion only proves unsolvability when every quotient
                // was exact; `Full` contraction always is.
                BfsVerdict::Exhausted { all_tight: true } => PlanOutcome::NoPlan,
                BfsVerdict::Exhausted { all_tight: false } => PlanOutcome::Unknown,
                BfsVerdict::OutOfBudget => PlanOutcome::Unknown,
            };
            (outcome, None)
        }
        Strategy::IterativeBoundedSearch => {
            let mut bound = minimal_bound;
            loop {
                tracing::debug!(bound, domain = task.domain_name(), "deepening");
                // Quotients of different bounds are incomparable, so each
                // iteration gets a fresh closed set.
                let mut closed = StateStore::new();
                let verdict = breadth_first(
                    task,
                    contraction,
                    bound,
                    &mut closed,
                    labels,
                    signatures,
                    node_budget,
                    &mut expanded,
                    &mut discovered,
                );
                match verdict {
                    BfsVerdict::Goal(plan) => break (PlanOutcome::Plan(plan), Some(bound)),
                    BfsVerdict::Exhausted { all_tight: true } => {
                        break (PlanOutcome::NoPlan, Some(bound))
                    }
                    BfsVerdict::Exhausted { all_tight: false } => bound += 1,
                    BfsVerdict::OutOfBudget => break (PlanOutcome::Unknown, Some(bound)),
                }
            }
        }
    };

    if let PlanOutcome::Plan(plan) = &outcome {
        tracing::debug!(plan = %plan.display(task), "plan found");
    }

    SearchResult {
        outcome,
        stats: SearchStats {
            expanded,
            discovered,
            bound,
            elapsed: start.elapsed(),
        },
    }
}

enum BfsVerdict {
    Goal(Plan),
    Exhausted { all_tight: bool },
    OutOfBudget,
}

/// Closed-set FIFO breadth-first search on the quotient transition system.
///
/// Deterministic by construction: the frontier is FIFO, actions are tried
/// in library order, and successor worlds are enumerated world-major.
#[allow(clippy::too_many_arguments)]
fn breadth_first(
    task: &PlanningTask,
    contraction: ContractionType,
    bound: usize,
    closed: &mut StateStore,
    labels: &mut LabelStore,
    signatures: &mut SignatureStore,
    node_budget: Option<usize>,
    expanded: &mut usize,
    discovered: &mut usize,
) -> BfsVerdict {
    let mut frontier: VecDeque<(daedalus::StateId, Vec<usize>)> = VecDeque::new();

    let root = contract(contraction, task.initial_state(), bound, signatures);
    let mut all_tight = root.is_true_bisimulation;
    let (root_id, root_new) = closed.intern(root.state);
    debug_assert!(root_new);
    *discovered += 1;
    frontier.push_back((root_id, Vec::new()));

    while let Some((id, prefix)) = frontier.pop_front() {
        let state = closed.get(id).clone();
        if state.satisfies(task.goal()) {
            return BfsVerdict::Goal(Plan { steps: prefix });
        }
        if let Some(budget) = node_budget {
            if *expanded >= budget {
                return BfsVerdict::OutOfBudget;
            }
        }
        *expanded += 1;

        for (index, action) in task.actions().iter().enumerate() {
            let Some(successor) = product_update(&state, action, labels) else {
                continue;
            };
            let contracted = contract(contraction, &successor, bound, signatures);
            all_tight &= contracted.is_true_bisimulation;
            let (successor_id, is_new) = closed.intern(contracted.state);
            if is_new {
                *discovered += 1;
                let mut steps = prefix.clone();
                steps.push(index);
                frontier.push_back((successor_id, steps));
            }
        }
    }

    BfsVerdict::Exhausted { all_tight }
}
