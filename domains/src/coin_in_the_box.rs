//! Coin-in-the-Box: three agents around a locked box containing a coin
//! whose face none of them can see. Agent `a` holds the key; opening,
//! peeking and shouting manipulate who knows what.

use crate::actions::{private_announcement, private_ontic, semi_private_sensing};
use crate::agent_set;
use anyhow::Result;
use daedalus::{
    Action, AgentId, Formula, Label, LabelStore, Language, Postconditions, Relations, State,
};
use daedalus_search::PlanningTask;
use fixedbitset::FixedBitSet;
use std::sync::Arc;

pub fn name() -> &'static str {
    "coin_in_the_box"
}

pub fn build_language() -> Result<Arc<Language>> {
    let language = Language::new(
        [
            "heads",
            "opened",
            "looking_a",
            "looking_b",
            "looking_c",
            "has_key_a",
            "has_key_b",
            "has_key_c",
        ],
        ["a", "b", "c"],
    )?;
    Ok(Arc::new(language))
}

/// Two worlds differing only in the coin face, indistinguishable to every
/// agent; the box is closed, everyone is looking, `a` holds the key. The
/// heads world is designated.
pub fn build_initial_state(language: &Arc<Language>, labels: &mut LabelStore) -> Result<State> {
    let atoms = language.atoms_count();
    let heads = language.atom_id("heads")?;

    let mut common = Label::new(atoms);
    for atom in ["looking_a", "looking_b", "looking_c", "has_key_a"] {
        common.set(language.atom_id(atom)?, true);
    }

    let mut heads_label = common.clone();
    heads_label.set(heads, true);
    let l0 = labels.intern(heads_label);
    let l1 = labels.intern(common);

    let mut both = FixedBitSet::with_capacity(2);
    both.insert(0);
    both.insert(1);
    let relations: Relations = vec![vec![both.clone(), both]; language.agents_count()];

    let mut designated = FixedBitSet::with_capacity(2);
    designated.insert(0);

    let state = State::new(language.clone(), 2, relations, vec![l0, l1], designated)?;
    Ok(state)
}

/// The key holder opens the box, watched by `fully_observant`.
pub fn build_open(
    language: &Arc<Language>,
    agent: AgentId,
    fully_observant: &FixedBitSet,
) -> Result<Action> {
    let agent_name = language.agent_name(agent);
    let has_key = Formula::atom(language.atom_id(&format!("has_key_{agent_name}"))?);
    let mut post = Postconditions::new();
    post.insert(language.atom_id("opened")?, Formula::top());
    private_ontic(
        format!("open_{agent_name}"),
        language,
        has_key,
        post,
        fully_observant,
    )
}

/// The agent peeks at the coin through the open box; the partially
/// observant agents see the peek without learning the face.
pub fn build_peek(
    language: &Arc<Language>,
    agent: AgentId,
    partially_observant: &FixedBitSet,
) -> Result<Action> {
    let agent_name = language.agent_name(agent);
    let looking = Formula::atom(language.atom_id(&format!("looking_{agent_name}"))?);
    let opened = Formula::atom(language.atom_id("opened")?);
    let heads = Formula::atom(language.atom_id("heads")?);

    let mut fully_observant = FixedBitSet::with_capacity(language.agents_count());
    fully_observant.insert(agent.index());

    semi_private_sensing(
        format!("peek_{agent_name}"),
        language,
        Formula::conjunction(vec![looking, opened]),
        heads,
        &fully_observant,
        partially_observant,
    )
}

/// The agent shouts that it knows the coin lies heads up; only the fully
/// observant agents hear it.
pub fn build_shout(
    language: &Arc<Language>,
    agent: AgentId,
    fully_observant: &FixedBitSet,
) -> Result<Action> {
    let agent_name = language.agent_name(agent);
    let heads = Formula::atom(language.atom_id("heads")?);
    private_announcement(
        format!("shout_{agent_name}"),
        language,
        Formula::knows(agent, heads),
        fully_observant,
    )
}

pub fn build_walk_in(
    language: &Arc<Language>,
    agent: AgentId,
    fully_observant: &FixedBitSet,
) -> Result<Action> {
    let agent_name = language.agent_name(agent);
    let looking = language.atom_id(&format!("looking_{agent_name}"))?;
    let mut post = Postconditions::new();
    post.insert(looking, Formula::top());
    private_ontic(
        format!("walk_in_{agent_name}"),
        language,
        Formula::negate(Formula::atom(looking)),
        post,
        fully_observant,
    )
}

pub fn build_walk_out(
    language: &Arc<Language>,
    agent: AgentId,
    fully_observant: &FixedBitSet,
) -> Result<Action> {
    let agent_name = language.agent_name(agent);
    let looking = language.atom_id(&format!("looking_{agent_name}"))?;
    let mut post = Postconditions::new();
    post.insert(looking, Formula::bottom());
    private_ontic(
        format!("walk_out_{agent_name}"),
        language,
        Formula::atom(looking),
        post,
        fully_observant,
    )
}

/// The action repertoire shared by all tasks: `a` opens in front of
/// everyone, peeks while `b` and `c` watch the peek, shouts to `b`, and
/// can leave and re-enter.
pub fn build_actions(language: &Arc<Language>) -> Result<Vec<Arc<Action>>> {
    let a = language.agent_id("a")?;
    let everyone = agent_set(language, &["a", "b", "c"])?;
    let bystanders = agent_set(language, &["b", "c"])?;
    let listeners = agent_set(language, &["a", "b"])?;

    Ok(vec![
        Arc::new(build_open(language, a, &everyone)?),
        Arc::new(build_peek(language, a, &bystanders)?),
        Arc::new(build_shout(language, a, &listeners)?),
        Arc::new(build_walk_out(language, a, &everyone)?),
        Arc::new(build_walk_in(language, a, &everyone)?),
    ])
}

/// Task 1: `a` comes to know the coin face. Optimal plan: open, peek.
pub fn build_task_1(labels: &mut LabelStore) -> Result<PlanningTask> {
    let language = build_language()?;
    let a = language.agent_id("a")?;
    let heads = Formula::atom(language.atom_id("heads")?);
    let goal = Formula::knows(a, heads);
    build_task("1", language, goal, labels)
}

/// Task 2: `b` learns that `a` knows the face, without learning the face
/// itself. Optimal plan: open, peek.
pub fn build_task_2(labels: &mut LabelStore) -> Result<PlanningTask> {
    let language = build_language()?;
    let a = language.agent_id("a")?;
    let b = language.agent_id("b")?;
    let heads = Formula::atom(language.atom_id("heads")?);

    let knows_face = Formula::disjunction(vec![
        Formula::knows(a, heads.clone()),
        Formula::knows(a, Formula::negate(heads.clone())),
    ]);
    let goal = Formula::conjunction(vec![
        Formula::knows(b, knows_face),
        Formula::negate(Formula::knows(b, heads.clone())),
        Formula::negate(Formula::knows(b, Formula::negate(heads))),
    ]);
    build_task("2", language, goal, labels)
}

/// Task 3: `b` comes to know the face second-hand. Optimal plan: open,
/// peek, shout.
pub fn build_task_3(labels: &mut LabelStore) -> Result<PlanningTask> {
    let language = build_language()?;
    let b = language.agent_id("b")?;
    let heads = Formula::atom(language.atom_id("heads")?);
    let goal = Formula::knows(b, heads);
    build_task("3", language, goal, labels)
}

pub fn build_tasks(labels: &mut LabelStore) -> Result<Vec<PlanningTask>> {
    Ok(vec![
        build_task_1(labels)?,
        build_task_2(labels)?,
        build_task_3(labels)?,
    ])
}

fn build_task(
    id: &str,
    language: Arc<Language>,
    goal: daedalus::FormulaRef,
    labels: &mut LabelStore,
) -> Result<PlanningTask> {
    let initial_state = build_initial_state(&language, labels)?;
    let actions = build_actions(&language)?;
    let task = PlanningTask::new(name(), id, language, initial_state, actions, goal)?;
    Ok(task)
}
