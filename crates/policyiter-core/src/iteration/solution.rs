use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::iteration::improvement::RunMetrics;

/// Final value and policy tables returned by `Engine::improve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution<S, A> {
    /// One entry per model state, in model order.
    pub states: Vec<StateSolution<S, A>>,
    pub metrics: RunMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSolution<S, A> {
    pub state: S,
    pub value: f64,
    pub action: A,
}

impl<S: PartialEq, A> Solution<S, A> {
    /// Value of `state`. Linear in the number of states; use `into_tables` for repeated lookups.
    pub fn value_of(&self, state: &S) -> Option<f64> {
        self.entry(state).map(|entry| entry.value)
    }

    /// Policy action of `state`.
    pub fn action_of(&self, state: &S) -> Option<&A> {
        self.entry(state).map(|entry| &entry.action)
    }

    fn entry(&self, state: &S) -> Option<&StateSolution<S, A>> {
        self.states.iter().find(|entry| entry.state == *state)
    }
}

impl<S: Clone + Eq + Hash, A> Solution<S, A> {
    /// Split into `(values, policy)` lookup tables.
    pub fn into_tables(self) -> (HashMap<S, f64>, HashMap<S, A>) {
        let mut values = HashMap::with_capacity(self.states.len());
        let mut policy = HashMap::with_capacity(self.states.len());
        for entry in self.states {
            values.insert(entry.state.clone(), entry.value);
            policy.insert(entry.state, entry.action);
        }
        (values, policy)
    }
}

impl<S: Serialize, A: Serialize> Solution<S, A> {
    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
