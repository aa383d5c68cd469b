//! Hand-built models exercising the contraction algorithms.

use anyhow::Result;
use daedalus::{Label, LabelStore, Language, State};
use fixedbitset::FixedBitSet;
use std::sync::Arc;

fn world_set(universe: usize, members: &[usize]) -> FixedBitSet {
    let mut set = FixedBitSet::with_capacity(universe);
    for &m in members {
        set.insert(m);
    }
    set
}

fn single_agent_language() -> Result<Arc<Language>> {
    Ok(Arc::new(Language::new(["p"], ["a"])?))
}

/// One world satisfying `p`, optionally reflexive.
pub fn build_singleton(has_loop: bool, labels: &mut LabelStore) -> Result<State> {
    let language = single_agent_language()?;
    let p = language.atom_id("p")?;
    let label = labels.intern(Label::with_true_atoms(1, [p]));

    let members: &[usize] = if has_loop { &[0] } else { &[] };
    let state = State::new(
        language,
        1,
        vec![vec![world_set(1, members)]],
        vec![label],
        world_set(1, &[0]),
    )?;
    Ok(state)
}

/// `length + 1` worlds with uniform labels and edges `w -> w+1`; the last
/// world either loops back to the start or is a dead end. World 0 is
/// designated, or all worlds when `all_designated` is set.
pub fn build_chain(
    length: usize,
    has_final_loop: bool,
    all_designated: bool,
    labels: &mut LabelStore,
) -> Result<State> {
    let language = single_agent_language()?;
    let p = language.atom_id("p")?;
    let worlds = length + 1;
    let label = labels.intern(Label::with_true_atoms(1, [p]));

    let mut relation = Vec::with_capacity(worlds);
    for w in 0..worlds {
        if w < worlds - 1 {
            relation.push(world_set(worlds, &[w + 1]));
        } else if has_final_loop {
            relation.push(world_set(worlds, &[0]));
        } else {
            relation.push(world_set(worlds, &[]));
        }
    }

    let designated = if all_designated {
        let mut set = FixedBitSet::with_capacity(worlds);
        set.insert_range(..);
        set
    } else {
        world_set(worlds, &[0])
    };

    let state = State::new(
        language,
        worlds,
        vec![relation],
        vec![label; worlds],
        designated,
    )?;
    Ok(state)
}

/// Tree of `2^k` uniformly labelled worlds where a node of rank `h` has
/// one child of every rank below `h`; the designated root has rank `k`.
/// All rank-`h` nodes are bisimilar, so the quotient is a `k + 1`-world
/// hierarchy.
pub fn build_k_tree(k: usize, labels: &mut LabelStore) -> Result<State> {
    let language = single_agent_language()?;
    let p = language.atom_id("p")?;
    let worlds = 1usize << k;
    let label = labels.intern(Label::with_true_atoms(1, [p]));

    let mut relation: Vec<FixedBitSet> = vec![FixedBitSet::with_capacity(worlds); worlds];
    let mut next = 0usize;
    build_rank(k, &mut next, &mut relation);
    debug_assert_eq!(next, worlds);

    let state = State::new(
        language,
        worlds,
        vec![relation],
        vec![label; worlds],
        world_set(worlds, &[0]),
    )?;
    Ok(state)
}

fn build_rank(rank: usize, next: &mut usize, relation: &mut [FixedBitSet]) -> usize {
    let node = *next;
    *next += 1;
    for child_rank in 0..rank {
        let child = build_rank(child_rank, next, relation);
        relation[node].insert(child);
    }
    node
}

/// Seven worlds over atoms `p, q` and one agent: three `p`-worlds feeding
/// two branches of `q`-worlds with distinct endings. Used to probe
/// contraction on a model with several label classes.
pub fn build_test_state1(labels: &mut LabelStore) -> Result<State> {
    let language = Arc::new(Language::new(["p", "q"], ["a"])?);
    let p = language.atom_id("p")?;
    let q = language.atom_id("q")?;

    let only_p = labels.intern(Label::with_true_atoms(2, [p]));
    let only_q = labels.intern(Label::with_true_atoms(2, [q]));
    let both = labels.intern(Label::with_true_atoms(2, [p, q]));

    let worlds = 7;
    let relation = vec![
        world_set(worlds, &[1, 2]),
        world_set(worlds, &[1, 3]),
        world_set(worlds, &[2, 4]),
        world_set(worlds, &[5]),
        world_set(worlds, &[6]),
        world_set(worlds, &[]),
        world_set(worlds, &[]),
    ];

    let state = State::new(
        language,
        worlds,
        vec![relation],
        vec![only_p, only_p, only_p, only_q, only_q, only_q, both],
        world_set(worlds, &[0]),
    )?;
    Ok(state)
}
