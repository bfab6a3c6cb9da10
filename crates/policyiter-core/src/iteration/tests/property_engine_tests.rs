use proptest::prelude::*;

use crate::{Engine, IterationSettings, MdpModel, Outcome, TabularModel, Termination};

/// Raw outcomes per action per state: `(next, weight, reward)`.
type RawModel = Vec<Vec<Vec<(usize, f64, f64)>>>;

fn arb_model() -> impl Strategy<Value = (RawModel, f64)> {
    (1usize..6, 0.0f64..0.95).prop_flat_map(|(states, gamma)| {
        let outcome = (0..states, 0.1f64..1.0, -5.0f64..5.0);
        let action = proptest::collection::vec(outcome, 1..4);
        let state = proptest::collection::vec(action, 1..4);
        (proptest::collection::vec(state, states), Just(gamma))
    })
}

fn build(raw: RawModel) -> TabularModel<usize, usize> {
    let mut model = TabularModel::new();
    for (state, actions) in raw.into_iter().enumerate() {
        for (action, outcomes) in actions.into_iter().enumerate() {
            let total: f64 = outcomes.iter().map(|(_, weight, _)| weight).sum();
            let outcomes = outcomes
                .into_iter()
                .map(|(next, weight, reward)| Outcome::new(next, reward, weight / total))
                .collect();
            model.add_action(state, action, outcomes);
        }
    }
    model
}

fn backup(engine: &Engine<'_, TabularModel<usize, usize>>, state: usize, action: usize) -> f64 {
    let outcomes = engine
        .model()
        .outcomes(&state, &action)
        .expect("transition exists");
    outcomes
        .iter()
        .map(|outcome| {
            let next = engine.value(&outcome.next).expect("next state exists");
            outcome.prob * (outcome.reward + engine.gamma() * next)
        })
        .sum()
}

proptest! {
    #[test]
    fn evaluation_converges_to_a_fixed_point((raw, gamma) in arb_model()) {
        let theta = 1e-6;
        let model = build(raw);
        let mut engine = Engine::new(&model, gamma).expect("model is valid");

        engine.evaluate(theta).expect("evaluation should converge");

        let policy: Vec<(usize, usize)> = engine.policy().map(|(s, a)| (*s, *a)).collect();
        for (state, action) in policy {
            let value = engine.value(&state).expect("state exists");
            let residual = (value - backup(&engine, state, action)).abs();
            prop_assert!(residual < theta, "state {} residual {}", state, residual);
        }
    }

    #[test]
    fn pass_aggregates_never_decrease((raw, gamma) in arb_model(), seed in 0u64..1000) {
        let model = build(raw);
        let settings = IterationSettings {
            max_passes: Some(500),
            ..IterationSettings::default()
        };
        let mut engine = Engine::with_seed(&model, gamma, seed)
            .and_then(|engine| engine.with_settings(settings))
            .expect("model is valid");

        let solution = engine.improve(1e-9).expect("improve should finish");

        prop_assert_ne!(solution.metrics.termination, Termination::PassLimit);
        for pair in solution.metrics.policy_values.windows(2) {
            prop_assert!(pair[1] >= pair[0] - 1e-6, "aggregate dropped: {:?}", pair);
        }
    }

    #[test]
    fn converged_policy_is_greedy((raw, gamma) in arb_model()) {
        let model = build(raw);
        let settings = IterationSettings {
            max_passes: Some(500),
            ..IterationSettings::default()
        };
        let mut engine = Engine::new(&model, gamma)
            .and_then(|engine| engine.with_settings(settings))
            .expect("model is valid");

        let solution = engine.improve(1e-9).expect("improve should finish");
        prop_assume!(solution.metrics.termination == Termination::PolicyStable);

        for entry in &solution.states {
            let chosen = backup(&engine, entry.state, entry.action);
            for action in model.actions(&entry.state) {
                prop_assert!(backup(&engine, entry.state, *action) <= chosen + 1e-6);
            }
        }
    }
}
