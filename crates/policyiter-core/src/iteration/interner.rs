use std::collections::HashMap;
use std::hash::Hash;

/// Dense index assignment for model states, in first-seen order.
#[derive(Debug, Clone)]
pub(crate) struct StateInterner<S>
where
    S: Clone + Eq + Hash,
{
    states: Vec<S>,
    state_to_key: HashMap<S, usize>,
}

impl<S> StateInterner<S>
where
    S: Clone + Eq + Hash,
{
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            states: Vec::with_capacity(capacity),
            state_to_key: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a state and return its dense key, or `None` if it was already present.
    pub(crate) fn insert_new(&mut self, state: S) -> Option<usize> {
        if self.state_to_key.contains_key(&state) {
            return None;
        }

        let key = self.states.len();
        self.states.push(state.clone());
        self.state_to_key.insert(state, key);
        Some(key)
    }

    pub(crate) fn key_of(&self, state: &S) -> Option<usize> {
        self.state_to_key.get(state).copied()
    }

    /// States in key order.
    pub(crate) fn iter(&self) -> std::slice::Iter<'_, S> {
        self.states.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }
}
