//! Product update over the Coin-in-the-Box domain.

use daedalus::{product_update, Formula, LabelStore, State, WorldId};
use daedalus_domains::actions::public_announcement;
use daedalus_domains::{agent_set, coin_in_the_box};

#[test]
fn announcing_heads_keeps_the_induced_submodel() {
    let mut labels = LabelStore::new();
    let language = coin_in_the_box::build_language().unwrap();
    let s = coin_in_the_box::build_initial_state(&language, &mut labels).unwrap();

    let heads = Formula::atom(language.atom_id("heads").unwrap());
    let announce = public_announcement("shout_heads", &language, heads.clone()).unwrap();

    let s2 = product_update(&s, &announce, &mut labels).unwrap();

    // Only the heads world survives; it keeps its label and its loops.
    assert_eq!(s2.worlds_count(), 1);
    assert_eq!(s2.language(), s.language());
    assert!(s2.satisfies(&heads));
    assert_eq!(s2.label_of(WorldId::new(0)), s.label_of(WorldId::new(0)));
    for agent in language.agent_ids() {
        let successors: Vec<_> = s2.successors(agent, WorldId::new(0)).collect();
        assert_eq!(successors, vec![WorldId::new(0)]);
    }
    // Everyone now knows the face.
    for agent in language.agent_ids() {
        assert!(s2.satisfies(&Formula::knows(agent, heads.clone())));
    }
}

#[test]
fn opening_then_peeking_informs_the_peeker_only() {
    let mut labels = LabelStore::new();
    let language = coin_in_the_box::build_language().unwrap();
    let s0 = coin_in_the_box::build_initial_state(&language, &mut labels).unwrap();

    let a = language.agent_id("a").unwrap();
    let b = language.agent_id("b").unwrap();
    let heads = Formula::atom(language.atom_id("heads").unwrap());
    let opened = Formula::atom(language.atom_id("opened").unwrap());

    let everyone = agent_set(&language, &["a", "b", "c"]).unwrap();
    let bystanders = agent_set(&language, &["b", "c"]).unwrap();
    let open = coin_in_the_box::build_open(&language, a, &everyone).unwrap();
    let peek = coin_in_the_box::build_peek(&language, a, &bystanders).unwrap();

    let s1 = product_update(&s0, &open, &mut labels).unwrap();
    assert!(s1.worlds_count() <= s0.worlds_count() * open.events_count());
    assert!(s1.satisfies(&Formula::knows(a, opened.clone())));
    assert!(!s1.satisfies(&Formula::knows(a, heads.clone())));

    let s2 = product_update(&s1, &peek, &mut labels).unwrap();
    assert!(s2.satisfies(&Formula::knows(a, heads.clone())));
    assert!(!s2.satisfies(&Formula::knows(b, heads.clone())));

    // The bystander saw the peek: it knows that a knows the face.
    let knows_face = Formula::disjunction(vec![
        Formula::knows(a, heads.clone()),
        Formula::knows(a, Formula::negate(heads)),
    ]);
    assert!(s2.satisfies(&Formula::knows(b, knows_face)));
}

#[test]
fn actions_without_a_designated_survivor_are_inapplicable() {
    let mut labels = LabelStore::new();
    let language = coin_in_the_box::build_language().unwrap();
    let s0 = coin_in_the_box::build_initial_state(&language, &mut labels).unwrap();

    let a = language.agent_id("a").unwrap();
    let bystanders = agent_set(&language, &["b", "c"]).unwrap();
    let listeners = agent_set(&language, &["a", "b"]).unwrap();

    // The box is still closed, so peeking has no executable event.
    let peek = coin_in_the_box::build_peek(&language, a, &bystanders).unwrap();
    assert!(product_update(&s0, &peek, &mut labels).is_none());

    // Nobody knows the face yet, so shouting it is a lie.
    let shout = coin_in_the_box::build_shout(&language, a, &listeners).unwrap();
    assert!(product_update(&s0, &shout, &mut labels).is_none());
}

#[test]
fn repeated_updates_stay_within_the_shared_language() {
    let mut labels = LabelStore::new();
    let language = coin_in_the_box::build_language().unwrap();
    let s0 = coin_in_the_box::build_initial_state(&language, &mut labels).unwrap();

    let a = language.agent_id("a").unwrap();
    let everyone = agent_set(&language, &["a", "b", "c"]).unwrap();
    let open = coin_in_the_box::build_open(&language, a, &everyone).unwrap();

    let mut state: State = s0;
    for _ in 0..3 {
        state = product_update(&state, &open, &mut labels).unwrap();
        assert_eq!(state.language(), &language);
    }
}
