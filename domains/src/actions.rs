//! Builders for the recurring event-model shapes: public and private
//! announcements, private ontic changes, and semi-private sensing.
//!
//! Observability is encoded in the event relation. Fully observant agents
//! track the actual event; partially observant agents know the action
//! happened but cannot tell its outcomes apart; oblivious agents are led
//! to a skip event whose precondition is trivially true.

use anyhow::Result;
use daedalus::{Action, Formula, FormulaRef, Language, Postconditions, Relations};
use fixedbitset::FixedBitSet;
use std::sync::Arc;

fn event_set(events: usize, members: &[usize]) -> FixedBitSet {
    let mut set = FixedBitSet::with_capacity(events);
    for &e in members {
        set.insert(e);
    }
    set
}

/// One event observed by everyone: the announcement of `f` prunes every
/// world where it does not hold.
pub fn public_announcement(
    name: impl Into<String>,
    language: &Arc<Language>,
    f: FormulaRef,
) -> Result<Action> {
    let relations: Relations = vec![vec![event_set(1, &[0])]; language.agents_count()];
    let action = Action::new(
        language.clone(),
        1,
        relations,
        vec![f],
        vec![Postconditions::new()],
        event_set(1, &[0]),
        name,
    )?;
    Ok(action)
}

/// Announcement of `f` witnessed by the fully observant agents only;
/// everyone else believes nothing happened.
pub fn private_announcement(
    name: impl Into<String>,
    language: &Arc<Language>,
    f: FormulaRef,
    fully_observant: &FixedBitSet,
) -> Result<Action> {
    let action = Action::new(
        language.clone(),
        2,
        skip_relations(language, fully_observant),
        vec![f, Formula::top()],
        vec![Postconditions::new(), Postconditions::new()],
        event_set(2, &[0]),
        name,
    )?;
    Ok(action)
}

/// World change with precondition `pre` and assignments `post`, witnessed
/// by the fully observant agents only.
pub fn private_ontic(
    name: impl Into<String>,
    language: &Arc<Language>,
    pre: FormulaRef,
    post: Postconditions,
    fully_observant: &FixedBitSet,
) -> Result<Action> {
    let action = Action::new(
        language.clone(),
        2,
        skip_relations(language, fully_observant),
        vec![pre, Formula::top()],
        vec![post, Postconditions::new()],
        event_set(2, &[0]),
        name,
    )?;
    Ok(action)
}

/// Sensing of `sensed` under precondition `pre`. Fully observant agents
/// learn the sensed value; partially observant agents learn only that the
/// sensing took place; the rest believe nothing happened.
pub fn semi_private_sensing(
    name: impl Into<String>,
    language: &Arc<Language>,
    pre: FormulaRef,
    sensed: FormulaRef,
    fully_observant: &FixedBitSet,
    partially_observant: &FixedBitSet,
) -> Result<Action> {
    let truth = Formula::conjunction(vec![pre.clone(), sensed.clone()]);
    let falsity = Formula::conjunction(vec![pre, Formula::negate(sensed)]);

    let mut relations: Relations = Vec::with_capacity(language.agents_count());
    for agent in language.agent_ids() {
        let relation = if fully_observant.contains(agent.index()) {
            vec![event_set(3, &[0]), event_set(3, &[1]), event_set(3, &[2])]
        } else if partially_observant.contains(agent.index()) {
            vec![event_set(3, &[0, 1]), event_set(3, &[0, 1]), event_set(3, &[2])]
        } else {
            vec![event_set(3, &[2]), event_set(3, &[2]), event_set(3, &[2])]
        };
        relations.push(relation);
    }

    let action = Action::new(
        language.clone(),
        3,
        relations,
        vec![truth, falsity, Formula::top()],
        vec![Postconditions::new(); 3],
        event_set(3, &[0, 1]),
        name,
    )?;
    Ok(action)
}

/// Two-event relation shape shared by the private builders: event 0 is the
/// actual one, event 1 the skip shown to oblivious agents.
fn skip_relations(language: &Language, fully_observant: &FixedBitSet) -> Relations {
    let mut relations: Relations = Vec::with_capacity(language.agents_count());
    for agent in language.agent_ids() {
        let relation = if fully_observant.contains(agent.index()) {
            vec![event_set(2, &[0]), event_set(2, &[1])]
        } else {
            vec![event_set(2, &[1]), event_set(2, &[1])]
        };
        relations.push(relation);
    }
    relations
}
