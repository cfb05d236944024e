//! End-to-end properties of planning and execution on generated worlds.
//!
//! These tests drive `run_loop` over seeded worlds and check that runs are
//! reproducible, that planning never touches the live world, and that the
//! score a run accrues equals the score of its visited targets replayed
//! through `score_sequence`.

use foresight::core::annotate::refresh_annotations;
use foresight::core::generate::generate_world;
use foresight::core::pathfinding::{all_distances, shortest_path};
use foresight::core::planner::{ForesightPlanner, ReplanMode};
use foresight::core::scoring::score_sequence;
use foresight::core::strategy::{Greedy, Strategy};
use foresight::looping::{LoopConfig, LoopStop, run_loop};
use foresight::run::run_seeded;
use foresight::test_support::{corridor_world, small_config, walled_world, world_fingerprint};

#[test]
fn runs_are_deterministic_for_a_seed() {
    let cfg = small_config();
    for seed in [1, 5, 23] {
        let a = run_seeded(&cfg, seed).expect("run");
        let b = run_seeded(&cfg, seed).expect("run");
        assert_eq!(
            (a.score, a.steps, a.final_battery, a.recharges, a.delivered, a.stop),
            (b.score, b.steps, b.final_battery, b.recharges, b.delivered, b.stop),
            "seed {seed}"
        );
    }
}

#[test]
fn planning_leaves_the_live_world_untouched() {
    let cfg = small_config();
    let rules = cfg.rules();
    for seed in 1..=5 {
        let mut world = generate_world(&cfg.world_params(), Some(seed)).expect("world");
        refresh_annotations(&mut world, &rules);
        let before = world_fingerprint(&world);
        let planner = ForesightPlanner::new(3, ReplanMode::FullSequence, rules);
        planner.choose_targets(&world).expect("plan");
        assert_eq!(world_fingerprint(&world), before, "seed {seed}");
    }
}

#[test]
fn executed_score_matches_replayed_score() {
    let cfg = small_config();
    let rules = cfg.rules();
    let loop_config = LoopConfig {
        rules,
        max_cycles: 200,
    };
    for seed in 1..=6 {
        for mode in [ReplanMode::FullSequence, ReplanMode::PerTarget] {
            let initial = generate_world(&cfg.world_params(), Some(seed)).expect("world");
            let mut live = initial.clone();
            let planner = ForesightPlanner::new(2, mode, rules);
            let outcome = run_loop(&mut live, &planner, &loop_config, |_| {}).expect("loop");

            let replayed = score_sequence(&initial, &outcome.state.visited, &rules);
            assert_eq!(replayed, Some(outcome.state.score), "seed {seed} {mode:?}");
        }
    }
}

#[test]
fn greedy_score_matches_replayed_score() {
    let cfg = small_config();
    let rules = cfg.rules();
    let loop_config = LoopConfig {
        rules,
        max_cycles: 200,
    };
    for seed in 1..=6 {
        let initial = generate_world(&cfg.world_params(), Some(seed)).expect("world");
        let mut live = initial.clone();
        let outcome = run_loop(&mut live, &Greedy, &loop_config, |_| {}).expect("loop");
        let replayed = score_sequence(&initial, &outcome.state.visited, &rules);
        assert_eq!(replayed, Some(outcome.state.score), "seed {seed}");
    }
}

#[test]
fn paths_are_as_short_as_the_distance_map() {
    let cfg = small_config();
    for seed in 1..=3 {
        let world = generate_world(&cfg.world_params(), Some(seed)).expect("world");
        let start = world.agent().position;
        let distances = all_distances(world.grid(), start);
        for &target in world.pickups().iter().chain(world.deliveries()) {
            let path = shortest_path(world.grid(), start, target);
            assert_eq!(
                path.map(|p| p.len() as u32),
                distances.get(target),
                "seed {seed} target {target}"
            );
        }
    }
}

#[test]
fn corridor_scenario_ends_with_expected_state() {
    let cfg = small_config();
    let loop_config = LoopConfig {
        rules: cfg.rules(),
        max_cycles: 10,
    };
    let mut world = corridor_world(None, 10);
    let planner = ForesightPlanner::new(2, ReplanMode::FullSequence, cfg.rules());
    let outcome = run_loop(&mut world, &planner, &loop_config, |_| {}).expect("loop");
    assert_eq!(outcome.stop, LoopStop::AllDelivered);
    assert_eq!(outcome.state.score, 46);
    assert_eq!(world.agent().battery, 6);
    assert_eq!(world.agent().cargo, 0);
}

#[test]
fn walled_world_never_moves_the_agent() {
    let cfg = small_config();
    let loop_config = LoopConfig {
        rules: cfg.rules(),
        max_cycles: 4,
    };
    let mut world = walled_world();
    let outcome = run_loop(&mut world, &Greedy, &loop_config, |_| {}).expect("loop");
    assert_eq!(outcome.stop, LoopStop::CycleLimit { max_cycles: 4 });
    assert_eq!(outcome.state.steps, 0);
    assert_eq!(outcome.state.score, 0);
}
