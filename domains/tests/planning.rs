//! End-to-end planning over the reference domains.

use daedalus::bisimulation::ContractionType;
use daedalus::{Formula, Storages};
use daedalus_domains::{coin_in_the_box, consecutive_numbers};
use daedalus_search::{search, search_with_stats, PlanOutcome, PlanningTask, Strategy};

fn plan_names(task: &PlanningTask, outcome: &PlanOutcome) -> Vec<String> {
    outcome
        .plan()
        .expect("expected a plan")
        .steps()
        .iter()
        .map(|&step| task.action(step).name().to_string())
        .collect()
}

#[test]
fn consecutive_numbers_two_has_a_one_step_plan() {
    let mut storages = Storages::new();
    let task = consecutive_numbers::build_task(2, &mut storages.labels).unwrap();

    let bounded = search_with_stats(
        &task,
        Strategy::IterativeBoundedSearch,
        ContractionType::Canonical,
        None,
        &mut storages,
    );
    let plan = bounded.outcome.plan().expect("solvable task");
    assert!(!plan.is_empty());
    assert_eq!(plan_names(&task, &bounded.outcome), vec!["a_reveals_a_2"]);
    assert_eq!(bounded.stats.bound, Some(1));

    let unbounded = search(
        &task,
        Strategy::UnboundedSearch,
        ContractionType::Full,
        &mut storages,
    );
    assert_eq!(
        unbounded.plan().unwrap().len(),
        plan.len(),
        "both strategies are optimal"
    );
}

#[test]
fn rooted_contraction_finds_the_same_plan() {
    let mut storages = Storages::new();
    let task = consecutive_numbers::build_task(2, &mut storages.labels).unwrap();

    let canonical = search(
        &task,
        Strategy::IterativeBoundedSearch,
        ContractionType::Canonical,
        &mut storages,
    );
    let mut storages = Storages::new();
    let task = consecutive_numbers::build_task(2, &mut storages.labels).unwrap();
    let rooted = search(
        &task,
        Strategy::IterativeBoundedSearch,
        ContractionType::Rooted,
        &mut storages,
    );
    assert_eq!(canonical, rooted);
}

#[test]
fn every_consecutive_numbers_task_is_solvable() {
    let mut storages = Storages::new();
    for task in consecutive_numbers::build_tasks(&mut storages.labels).unwrap() {
        let outcome = search(
            &task,
            Strategy::IterativeBoundedSearch,
            ContractionType::Canonical,
            &mut storages,
        );
        let plan = outcome.plan().unwrap_or_else(|| {
            panic!("task {} should be solvable", task.problem_id());
        });
        assert!(!plan.is_empty());
    }
}

#[test]
fn coin_in_the_box_tasks_have_known_optimal_lengths() {
    let expectations = [
        ("1", vec!["open_a", "peek_a"]),
        ("2", vec!["open_a", "peek_a"]),
        ("3", vec!["open_a", "peek_a", "shout_a"]),
    ];

    let mut storages = Storages::new();
    let tasks = coin_in_the_box::build_tasks(&mut storages.labels).unwrap();

    for (task, (id, expected)) in tasks.iter().zip(&expectations) {
        assert_eq!(task.problem_id(), *id);

        let bounded = search(
            task,
            Strategy::IterativeBoundedSearch,
            ContractionType::Canonical,
            &mut storages,
        );
        assert_eq!(&plan_names(task, &bounded), expected, "task {id}");

        let unbounded = search(
            task,
            Strategy::UnboundedSearch,
            ContractionType::Full,
            &mut storages,
        );
        assert_eq!(
            unbounded.plan().unwrap().len(),
            expected.len(),
            "unbounded search is optimal on task {id}"
        );
    }
}

#[test]
fn repeated_searches_are_deterministic() {
    let run = || {
        let mut storages = Storages::new();
        let task = coin_in_the_box::build_task_1(&mut storages.labels).unwrap();
        search(
            &task,
            Strategy::IterativeBoundedSearch,
            ContractionType::Canonical,
            &mut storages,
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn unachievable_goals_are_proved_unsolvable() {
    let mut storages = Storages::new();
    let language = consecutive_numbers::build_language(2).unwrap();
    let initial_state =
        consecutive_numbers::build_initial_state(2, &language, &mut storages.labels).unwrap();
    let actions = consecutive_numbers::build_actions(2, &language).unwrap();
    let b = language.agent_id("b").unwrap();

    // In the designated world agent a holds 2, and no announcement can
    // make b believe it holds 0.
    let goal = Formula::knows(b, Formula::atom(language.atom_id("has_a_0").unwrap()));
    let task = PlanningTask::new(
        consecutive_numbers::name(),
        "unsolvable",
        language,
        initial_state,
        actions,
        goal,
    )
    .unwrap();

    let result = search_with_stats(
        &task,
        Strategy::IterativeBoundedSearch,
        ContractionType::Canonical,
        None,
        &mut storages,
    );
    assert_eq!(result.outcome, PlanOutcome::NoPlan);
    assert_eq!(result.stats.bound, Some(1));
}

#[test]
fn an_exhausted_node_budget_reports_unknown() {
    let mut storages = Storages::new();
    let task = consecutive_numbers::build_task(2, &mut storages.labels).unwrap();

    let result = search_with_stats(
        &task,
        Strategy::UnboundedSearch,
        ContractionType::Full,
        Some(0),
        &mut storages,
    );
    assert_eq!(result.outcome, PlanOutcome::Unknown);
}
