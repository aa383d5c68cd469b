//! Consecutive Numbers: agents `a` and `b` each hold a secret number and
//! know the two numbers to be consecutive. Public announcements of
//! non-knowledge and of one's own number drive the dialogue towards
//! mutual knowledge.

use crate::actions::public_announcement;
use anyhow::Result;
use daedalus::{Action, Formula, Label, LabelStore, Language, Relations, State};
use daedalus_search::PlanningTask;
use fixedbitset::FixedBitSet;
use std::sync::Arc;

pub fn name() -> &'static str {
    "consecutive_numbers"
}

/// Atoms `has_a_0..has_a_n` then `has_b_0..has_b_n`.
pub fn build_language(n: usize) -> Result<Arc<Language>> {
    let mut atom_names = Vec::with_capacity(2 * (n + 1));
    for k in 0..=n {
        atom_names.push(format!("has_a_{k}"));
    }
    for k in 0..=n {
        atom_names.push(format!("has_b_{k}"));
    }
    Ok(Arc::new(Language::new(atom_names, ["a", "b"])?))
}

/// Chain of `n` worlds: world `w` gives agent `w % 2` the number `n - w`
/// and the other agent `n - w - 1`. Adjacent worlds are confused exactly
/// by the agent whose number they share; both relations are reflexive.
/// The endpoint world, where `a` holds `n`, is designated.
pub fn build_initial_state(
    n: usize,
    language: &Arc<Language>,
    labels: &mut LabelStore,
) -> Result<State> {
    anyhow::ensure!(n >= 2, "a chain needs at least two worlds");
    let worlds = n;

    let mut relations: Relations = vec![Vec::with_capacity(worlds); 2];
    for relation in relations.iter_mut() {
        for w in 0..worlds {
            let mut set = FixedBitSet::with_capacity(worlds);
            set.insert(w);
            relation.push(set);
        }
    }
    for w in 0..worlds {
        let uncertain = w % 2;
        if w > 0 {
            relations[uncertain][w].insert(w - 1);
        }
        if w < worlds - 1 {
            relations[1 - uncertain][w].insert(w + 1);
        }
    }

    let mut label_ids = Vec::with_capacity(worlds);
    for w in 0..worlds {
        let first = language.agent_name(daedalus::AgentId::new(w % 2));
        let second = language.agent_name(daedalus::AgentId::new(1 - w % 2));
        let label = Label::with_true_atoms(
            language.atoms_count(),
            [
                language.atom_id(&format!("has_{first}_{}", n - w))?,
                language.atom_id(&format!("has_{second}_{}", n - w - 1))?,
            ],
        );
        label_ids.push(labels.intern(label));
    }

    let mut designated = FixedBitSet::with_capacity(worlds);
    designated.insert(0);

    let state = State::new(language.clone(), worlds, relations, label_ids, designated)?;
    Ok(state)
}

/// For every `k`: both agents can announce not knowing the other's number
/// to be `k`, and can reveal their own number to be `k`.
pub fn build_actions(n: usize, language: &Arc<Language>) -> Result<Vec<Arc<Action>>> {
    let a = language.agent_id("a")?;
    let b = language.agent_id("b")?;

    let mut actions = Vec::with_capacity(4 * (n + 1));
    for k in 0..=n {
        let has_a_k = Formula::atom(language.atom_id(&format!("has_a_{k}"))?);
        let has_b_k = Formula::atom(language.atom_id(&format!("has_b_{k}"))?);

        actions.push(Arc::new(public_announcement(
            format!("a_not_knows_b_{k}"),
            language,
            Formula::negate(Formula::knows(a, has_b_k.clone())),
        )?));
        actions.push(Arc::new(public_announcement(
            format!("b_not_knows_a_{k}"),
            language,
            Formula::negate(Formula::knows(b, has_a_k.clone())),
        )?));
        actions.push(Arc::new(public_announcement(
            format!("a_reveals_a_{k}"),
            language,
            has_a_k,
        )?));
        actions.push(Arc::new(public_announcement(
            format!("b_reveals_b_{k}"),
            language,
            has_b_k,
        )?));
    }
    Ok(actions)
}

/// Goal: both agents know the other's number.
pub fn build_task(n: usize, labels: &mut LabelStore) -> Result<PlanningTask> {
    let language = build_language(n)?;
    let a = language.agent_id("a")?;
    let b = language.agent_id("b")?;

    let initial_state = build_initial_state(n, &language, labels)?;
    let actions = build_actions(n, &language)?;

    let goal = Formula::conjunction(vec![
        Formula::knows(
            a,
            Formula::atom(language.atom_id(&format!("has_b_{}", n - 1))?),
        ),
        Formula::knows(b, Formula::atom(language.atom_id(&format!("has_a_{n}"))?)),
    ]);

    let task = PlanningTask::new(name(), n.to_string(), language, initial_state, actions, goal)?;
    Ok(task)
}

pub fn build_tasks(labels: &mut LabelStore) -> Result<Vec<PlanningTask>> {
    (2..=5).map(|n| build_task(n, labels)).collect()
}
