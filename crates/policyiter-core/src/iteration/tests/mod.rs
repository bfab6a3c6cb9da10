mod engine_core_tests;
mod property_engine_tests;

use crate::{Outcome, TabularModel};

/// State 0 may `stay` for nothing or `move` to the absorbing state 1 for a reward of 10.
pub(super) fn two_state_model() -> TabularModel<u8, &'static str> {
    let mut model = TabularModel::new();
    model
        .add_action(0, "stay", vec![Outcome::new(0, 0.0, 1.0)])
        .add_action(0, "move", vec![Outcome::new(1, 10.0, 1.0)])
        .add_action(1, "noop", vec![Outcome::new(1, 0.0, 1.0)]);
    model
}

/// State `a` picks one of two one-shot rewards and lands in the absorbing state `t`.
pub(super) fn one_shot_model(first: f64, second: f64) -> TabularModel<&'static str, &'static str> {
    let mut model = TabularModel::new();
    model
        .add_action("a", "x", vec![Outcome::new("t", first, 1.0)])
        .add_action("a", "y", vec![Outcome::new("t", second, 1.0)])
        .add_action("t", "noop", vec![Outcome::new("t", 0.0, 1.0)]);
    model
}
