//! Writers for the persisted artifacts: Graphviz DOT renderings of states
//! and actions, and the CSV results table. These formats are consumed by
//! external tooling only; the planner itself never reads them back.

use crate::planner::{PlanOutcome, SearchResult};
use crate::task::PlanningTask;
use daedalus::{Action, LabelStore, State};
use itertools::Itertools;
use std::io::{self, Write};

/// Header of the results table.
pub const RESULTS_HEADER: &str = "Domain;Problem ID;#Atoms;#Agents;|W|;#Actions;Goal depth;\
Bound (IBDS);Plan length (IBDS);#Nodes (IBDS);Time (IBDS);Plan length (US);#Nodes (US);Time (US)";

/// Writes `state` as a Graphviz digraph named `name`. Worlds are nodes
/// labelled with their true atoms, designated worlds are drawn as double
/// circles, and arcs carry the names of the agents sharing them.
pub fn write_state_dot(
    out: &mut impl Write,
    state: &State,
    labels: &LabelStore,
    name: &str,
) -> io::Result<()> {
    let language = state.language();

    writeln!(out, "digraph \"{name}\" {{")?;
    writeln!(out, "    rankdir=TB;")?;
    for w in state.worlds() {
        let valuation = labels
            .get(state.label_of(w))
            .true_atoms()
            .map(|atom| language.atom_name(atom))
            .join(" ");
        let shape = if state.is_designated(w) {
            "doublecircle"
        } else {
            "circle"
        };
        writeln!(out, "    w{w} [shape={shape}, label=\"w{w}\\n{valuation}\"];")?;
    }

    for w in state.worlds() {
        for w2 in state.worlds() {
            let agents = language
                .agent_ids()
                .filter(|&agent| state.successor_set(agent, w).contains(w2.index()))
                .map(|agent| language.agent_name(agent))
                .join(",");
            if !agents.is_empty() {
                writeln!(out, "    w{w} -> w{w2} [label=\"{agents}\"];")?;
            }
        }
    }
    writeln!(out, "}}")
}

/// Writes `action` as a Graphviz digraph: events labelled with their
/// precondition and postconditions, designated events as double circles.
pub fn write_action_dot(out: &mut impl Write, action: &Action) -> io::Result<()> {
    let language = action.language();

    writeln!(out, "digraph \"{}\" {{", action.name())?;
    writeln!(out, "    rankdir=TB;")?;
    for e in action.events() {
        let pre = action.precondition(e).display(language);
        let post = action
            .postconditions_of(e)
            .iter()
            .map(|(&atom, f)| format!("{} := {}", language.atom_name(atom), f.display(language)))
            .join(", ");
        let shape = if action.is_designated(e) {
            "doublecircle"
        } else {
            "circle"
        };
        if post.is_empty() {
            writeln!(out, "    e{e} [shape={shape}, label=\"e{e}\\npre: {pre}\"];")?;
        } else {
            writeln!(
                out,
                "    e{e} [shape={shape}, label=\"e{e}\\npre: {pre}\\npost: {post}\"];"
            )?;
        }
    }

    for e in action.events() {
        for e2 in action.events() {
            let agents = language
                .agent_ids()
                .filter(|&agent| action.successor_set(agent, e).contains(e2.index()))
                .map(|agent| language.agent_name(agent))
                .join(",");
            if !agents.is_empty() {
                writeln!(out, "    e{e} -> e{e2} [label=\"{agents}\"];")?;
            }
        }
    }
    writeln!(out, "}}")
}

/// Writes one results row for `task`, pairing the bounded and the
/// unbounded search results.
pub fn write_results_row(
    out: &mut impl Write,
    task: &PlanningTask,
    bounded: &SearchResult,
    unbounded: &SearchResult,
) -> io::Result<()> {
    writeln!(
        out,
        "{};{};{};{};{};{};{};{};{};{};{};{};{};{}",
        task.domain_name(),
        task.problem_id(),
        task.language().atoms_count(),
        task.language().agents_count(),
        task.initial_state().worlds_count(),
        task.actions().len(),
        task.goal().modal_depth(),
        bounded
            .stats
            .bound
            .map_or_else(|| "-".to_string(), |b| b.to_string()),
        plan_length(&bounded.outcome),
        bounded.stats.discovered,
        format_millis(bounded.stats.elapsed),
        plan_length(&unbounded.outcome),
        unbounded.stats.discovered,
        format_millis(unbounded.stats.elapsed),
    )
}

fn plan_length(outcome: &PlanOutcome) -> String {
    match outcome {
        PlanOutcome::Plan(plan) => plan.len().to_string(),
        PlanOutcome::NoPlan => "no plan".to_string(),
        PlanOutcome::Unknown => "-".to_string(),
    }
}

fn format_millis(elapsed: std::time::Duration) -> String {
    format!("{:.3}", elapsed.as_secs_f64() * 1000.0)
}
