use crate::iteration::tests::two_state_model;
use crate::{Engine, IterationSettings, Outcome, PassMetrics, Phase, TabularModel, Termination};

#[test]
fn two_state_model_moves_to_the_rewarding_terminal() {
    let model = two_state_model();
    let mut engine = Engine::new(&model, 1.0).expect("model is valid");

    let solution = engine.improve(0.001).expect("improve should converge");

    assert_eq!(solution.action_of(&0), Some(&"move"));
    assert_eq!(solution.action_of(&1), Some(&"noop"));
    assert_eq!(solution.value_of(&0), Some(10.0));
    assert_eq!(solution.value_of(&1), Some(0.0));
    assert_eq!(solution.metrics.termination, Termination::PolicyStable);
    assert_eq!(solution.metrics.passes, 2);
}

#[test]
fn single_self_loop_converges_immediately() {
    let mut model = TabularModel::new();
    model.add_action("only", "loop", vec![Outcome::new("only", 0.0, 1.0)]);
    let mut engine = Engine::new(&model, 1.0).expect("model is valid");

    let metrics = engine.evaluate(0.001).expect("evaluation should converge");
    assert_eq!(metrics.sweeps, 1);
    assert_eq!(engine.value(&"only"), Some(0.0));

    let solution = engine.improve(0.001).expect("improve should converge");
    assert_eq!(solution.metrics.passes, 1);
    assert_eq!(solution.metrics.evaluation_sweeps, 0);
    assert_eq!(solution.action_of(&"only"), Some(&"loop"));
    assert_eq!(solution.value_of(&"only"), Some(0.0));
}

#[test]
fn evaluation_sweeps_in_place() {
    // 0 -> 1 -> 2 (absorbing), reward 1 on each step. Sweeping in order 2, 1, 0 lets
    // every state see its successor's fresh value in the same sweep.
    let mut model = TabularModel::new();
    model
        .add_action(2, "end", vec![Outcome::new(2, 0.0, 1.0)])
        .add_action(1, "step", vec![Outcome::new(2, 1.0, 1.0)])
        .add_action(0, "step", vec![Outcome::new(1, 1.0, 1.0)]);
    let mut engine = Engine::new(&model, 1.0).expect("model is valid");

    let metrics = engine.evaluate(0.5).expect("evaluation should converge");

    assert_eq!(metrics.sweeps, 2);
    assert_eq!(engine.value(&0), Some(2.0));
    assert_eq!(engine.value(&1), Some(1.0));
    assert_eq!(engine.value(&2), Some(0.0));
}

#[test]
fn discounted_chain_reaches_fixed_point() {
    let gamma = 0.9;
    let theta = 1e-6;
    let mut model = TabularModel::new();
    model
        .add_action(
            "left",
            "go",
            vec![
                Outcome::new("right", 1.0, 0.5),
                Outcome::new("left", -1.0, 0.5),
            ],
        )
        .add_action("right", "go", vec![Outcome::new("left", 2.0, 1.0)]);
    let mut engine = Engine::new(&model, gamma).expect("model is valid");

    engine.evaluate(theta).expect("evaluation should converge");

    let left = engine.value(&"left").expect("left exists");
    let right = engine.value(&"right").expect("right exists");
    let left_backup = 0.5 * (1.0 + gamma * right) + 0.5 * (-1.0 + gamma * left);
    let right_backup = 2.0 + gamma * left;
    assert!((left - left_backup).abs() < theta);
    assert!((right - right_backup).abs() < theta);
}

#[test]
fn improve_is_idempotent_once_converged() {
    let model = two_state_model();
    let mut engine = Engine::with_seed(&model, 1.0, 3).expect("model is valid");

    let first = engine.improve(0.001).expect("first improve should converge");
    let second = engine.improve(0.001).expect("second improve should converge");

    assert_eq!(first.states, second.states);
    assert_eq!(second.metrics.passes, 1);
    assert_eq!(second.metrics.evaluation_sweeps, 0);
    assert_eq!(second.metrics.termination, Termination::PolicyStable);
}

#[test]
fn seeded_engines_are_deterministic() {
    let model = two_state_model();
    let mut a = Engine::with_seed(&model, 1.0, 99).expect("model is valid");
    let mut b = Engine::with_seed(&model, 1.0, 99).expect("model is valid");

    let initial_a: Vec<_> = a.policy().map(|(_, action)| *action).collect();
    let initial_b: Vec<_> = b.policy().map(|(_, action)| *action).collect();
    assert_eq!(initial_a, initial_b);

    let solution_a = a.improve(0.001).expect("improve should converge");
    let solution_b = b.improve(0.001).expect("improve should converge");
    assert_eq!(solution_a, solution_b);
}

#[test]
fn converged_policy_does_not_depend_on_the_initializer() {
    let model = two_state_model();

    for start in 0..2 {
        let mut engine = Engine::with_initializer(&model, 1.0, |state, _actions| {
            if *state == 0 { start } else { 0 }
        })
        .expect("model is valid");

        let solution = engine.improve(0.001).expect("improve should converge");
        assert_eq!(solution.action_of(&0), Some(&"move"));
        assert_eq!(solution.value_of(&0), Some(10.0));
    }
}

#[test]
fn hook_sees_every_pass() {
    let model = two_state_model();
    let mut engine = Engine::new(&model, 1.0).expect("model is valid");
    let mut passes: Vec<PassMetrics> = Vec::new();

    let solution = engine
        .improve_with_hook(0.001, |pass| passes.push(*pass))
        .expect("improve should converge");

    assert_eq!(passes.len(), solution.metrics.passes);
    assert_eq!(passes[0].pass, 1);
    assert_eq!(passes[0].changed_states, 1);
    assert_eq!(passes[0].evaluation_sweeps, 1);
    assert_eq!(passes[1].changed_states, 0);
    assert_eq!(passes[1].evaluation_sweeps, 2);
    assert_eq!(solution.metrics.policy_values, vec![10.0, 10.0]);
    assert_eq!(solution.metrics.evaluation_sweeps, 3);
}

#[test]
fn pass_limit_stops_and_evaluates_the_last_policy() {
    let model = two_state_model();
    let settings = IterationSettings {
        max_passes: Some(1),
        ..IterationSettings::default()
    };
    let mut engine = Engine::new(&model, 1.0)
        .and_then(|engine| engine.with_settings(settings))
        .expect("settings are valid");

    let solution = engine.improve(0.001).expect("improve should stop");

    assert_eq!(solution.metrics.termination, Termination::PassLimit);
    assert_eq!(solution.action_of(&0), Some(&"move"));
    assert_eq!(solution.value_of(&0), Some(10.0));
}

#[test]
fn phase_tracks_the_lifecycle() {
    let model = two_state_model();
    let mut engine = Engine::new(&model, 1.0).expect("model is valid");
    assert_eq!(engine.phase(), Phase::Initialized);
    assert_eq!(engine.last_policy_value(), None);

    engine.evaluate(0.001).expect("evaluation should converge");
    assert_eq!(engine.phase(), Phase::Evaluating);

    engine.improve(0.001).expect("improve should converge");
    assert_eq!(engine.phase(), Phase::Converged);
    assert_eq!(engine.last_policy_value(), Some(10.0));
}

#[test]
fn accessors_follow_model_order() {
    let model = two_state_model();
    let mut engine = Engine::new(&model, 1.0).expect("model is valid");
    engine.improve(0.001).expect("improve should converge");

    let values: Vec<_> = engine.values().map(|(state, value)| (*state, value)).collect();
    let policy: Vec<_> = engine.policy().map(|(state, action)| (*state, *action)).collect();

    assert_eq!(values, vec![(0, 10.0), (1, 0.0)]);
    assert_eq!(policy, vec![(0, "move"), (1, "noop")]);
    assert_eq!(engine.value(&7), None);
    assert_eq!(engine.action(&7), None);
}

#[test]
fn solution_splits_into_tables_and_serializes() {
    let model = two_state_model();
    let mut engine = Engine::new(&model, 1.0).expect("model is valid");
    let solution = engine.improve(0.001).expect("improve should converge");

    let json = solution.to_json().expect("solution should serialize");
    assert!(json.contains("\"policy_stable\""));

    let (values, policy) = solution.into_tables();
    assert_eq!(values.get(&0), Some(&10.0));
    assert_eq!(policy.get(&0), Some(&"move"));
    assert_eq!(policy.get(&1), Some(&"noop"));
}
