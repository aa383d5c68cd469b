//! Product update: composition of a state with an event model.

use crate::action::Action;
use crate::label::LabelStore;
use crate::state::{Relations, State, WorldId};
use fixedbitset::FixedBitSet;

/// Composes `s` with `a` and returns the successor state.
///
/// A pair `(w, e)` becomes a world of the successor iff the precondition of
/// `e` holds in `(s, w)`; pairs are enumerated world-major, event-minor,
/// and surviving pairs receive dense fresh ids in that order. Returns
/// `None` when no surviving pair joins a designated world with a
/// designated event: the action is inapplicable in `s`.
pub fn product_update(s: &State, a: &Action, labels: &mut LabelStore) -> Option<State> {
    assert_eq!(
        s.language(),
        a.language(),
        "product update across distinct languages"
    );

    let events = a.events_count();

    // Surviving pairs, and a grid from (w, e) to the fresh id.
    let mut pairs: Vec<(WorldId, crate::action::EventId)> = Vec::new();
    let mut grid: Vec<Option<usize>> = vec![None; s.worlds_count() * events];
    for w in s.worlds() {
        for e in a.events() {
            if a.precondition(e).holds_in(s, w) {
                grid[w.index() * events + e.index()] = Some(pairs.len());
                pairs.push((w, e));
            }
        }
    }

    let count = pairs.len();
    let mut designated = FixedBitSet::with_capacity(count);
    for (id, &(w, e)) in pairs.iter().enumerate() {
        if s.is_designated(w) && a.is_designated(e) {
            designated.insert(id);
        }
    }
    if designated.is_clear() {
        return None;
    }

    let mut new_labels = Vec::with_capacity(count);
    for &(w, e) in &pairs {
        let post = a.postconditions_of(e);
        if post.is_empty() {
            new_labels.push(s.label_of(w));
        } else {
            // Override the assigned atoms; the defining formulas are
            // evaluated in the source state.
            let mut label = labels.get(s.label_of(w)).clone();
            for (&atom, f) in post {
                label.set(atom, f.holds_in(s, w));
            }
            new_labels.push(labels.intern(label));
        }
    }

    let mut relations: Relations = Vec::with_capacity(s.language().agents_count());
    for agent in s.language().agent_ids() {
        let mut relation = Vec::with_capacity(count);
        for &(w, e) in &pairs {
            let mut set = FixedBitSet::with_capacity(count);
            for w2 in s.successors(agent, w) {
                for e2 in a.successors(agent, e) {
                    if let Some(id) = grid[w2.index() * events + e2.index()] {
                        set.insert(id);
                    }
                }
            }
            relation.push(set);
        }
        relations.push(relation);
    }

    Some(State::from_parts(
        s.language().clone(),
        count,
        relations,
        new_labels,
        designated,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, Postconditions};
    use crate::formula::Formula;
    use crate::label::{Label, LabelStore};
    use crate::language::Language;
    use std::sync::Arc;

    fn bitset(universe: usize, members: &[usize]) -> FixedBitSet {
        let mut set = FixedBitSet::with_capacity(universe);
        for &m in members {
            set.insert(m);
        }
        set
    }

    /// w0 |= p, w1 |= ~p; the agent confuses both; w0 designated.
    fn coin_like_state(labels: &mut LabelStore) -> State {
        let language = Arc::new(Language::new(["p"], ["a"]).unwrap());
        let p = language.atom_id("p").unwrap();
        let l0 = labels.intern(Label::with_true_atoms(1, [p]));
        let l1 = labels.intern(Label::new(1));
        let relations = vec![vec![bitset(2, &[0, 1]), bitset(2, &[0, 1])]];
        State::new(language, 2, relations, vec![l0, l1], bitset(2, &[0])).unwrap()
    }

    fn announcement(state: &State, f: crate::formula::FormulaRef) -> Action {
        let language = state.language().clone();
        let relations = vec![vec![bitset(1, &[0])]];
        Action::new(
            language,
            1,
            relations,
            vec![f],
            vec![Postconditions::new()],
            bitset(1, &[0]),
            "announce",
        )
        .unwrap()
    }

    #[test]
    fn announcement_keeps_the_satisfying_submodel() {
        let mut labels = LabelStore::new();
        let s = coin_like_state(&mut labels);
        let p = Formula::atom(s.language().atom_id("p").unwrap());
        let a = announcement(&s, p.clone());

        let s2 = product_update(&s, &a, &mut labels).unwrap();
        assert_eq!(s2.worlds_count(), 1);
        assert!(s2.satisfies(&p));
        assert_eq!(s2.language(), s.language());
        // The single surviving world keeps its interned label.
        assert_eq!(s2.label_of(WorldId::new(0)), s.label_of(WorldId::new(0)));
    }

    #[test]
    fn update_is_inapplicable_without_a_designated_survivor() {
        let mut labels = LabelStore::new();
        let s = coin_like_state(&mut labels);
        let not_p = Formula::negate(Formula::atom(s.language().atom_id("p").unwrap()));
        let a = announcement(&s, not_p);

        // Only the non-designated world satisfies ~p.
        assert!(product_update(&s, &a, &mut labels).is_none());
    }

    #[test]
    fn worlds_are_bounded_by_the_pair_count() {
        let mut labels = LabelStore::new();
        let s = coin_like_state(&mut labels);
        let a = announcement(&s, Formula::top());

        let s2 = product_update(&s, &a, &mut labels).unwrap();
        assert!(s2.worlds_count() <= s.worlds_count() * a.events_count());
        assert_eq!(s2.worlds_count(), 2);
    }

    #[test]
    fn postconditions_override_the_assigned_atoms_only() {
        let mut labels = LabelStore::new();
        let language = Arc::new(Language::new(["p", "q"], ["a"]).unwrap());
        let p = language.atom_id("p").unwrap();
        let q = language.atom_id("q").unwrap();

        let l0 = labels.intern(Label::with_true_atoms(2, [q]));
        let relations = vec![vec![bitset(1, &[0])]];
        let s = State::new(language.clone(), 1, relations, vec![l0], bitset(1, &[0])).unwrap();

        // Flip p to true, leave q untouched.
        let mut post = Postconditions::new();
        post.insert(p, Formula::top());
        let a = Action::new(
            language,
            1,
            vec![vec![bitset(1, &[0])]],
            vec![Formula::top()],
            vec![post],
            bitset(1, &[0]),
            "set_p",
        )
        .unwrap();

        let s2 = product_update(&s, &a, &mut labels).unwrap();
        let label = labels.get(s2.label_of(WorldId::new(0)));
        assert!(label.contains(p));
        assert!(label.contains(q));
    }
}
