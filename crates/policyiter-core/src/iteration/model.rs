use std::{collections::HashMap, fmt::Debug, hash::Hash};

use serde::{Deserialize, Serialize};

use crate::iteration::{error::ModelError, resolved::ResolvedModel};

/// One entry of a transition distribution: land in `next`, collect `reward`, with probability `prob`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<S> {
    pub next: S,
    pub reward: f64,
    pub prob: f64,
}

impl<S> Outcome<S> {
    pub fn new(next: S, reward: f64, prob: f64) -> Self {
        Outcome { next, reward, prob }
    }
}

/// Read-only interface of a finite MDP whose full transition model is known.
///
/// The engine borrows a model for its whole lifetime and never mutates it.
pub trait MdpModel {
    type State: Clone + Eq + Hash + Debug;
    type Action: Clone + Eq + Hash + Debug;

    /// Every state of the model. Evaluation sweeps visit them in this order.
    fn states(&self) -> &[Self::State];

    /// Legal actions of `state`. Action order decides ties during improvement.
    fn actions(&self, state: &Self::State) -> &[Self::Action];

    /// Outcome distribution of `(state, action)`, or `None` when the model has no entry for it.
    fn outcomes(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Option<&[Outcome<Self::State>]>;
}

/// Run the checks engine construction applies to `model`, without building an engine.
pub fn validate_model<M: MdpModel>(model: &M) -> Result<(), ModelError> {
    ResolvedModel::resolve(model).map(|_| ())
}

/// Immutable transition table keyed by `(state, action)`.
#[derive(Debug, Clone)]
pub struct TabularModel<S, A>
where
    S: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
{
    states: Vec<S>,
    actions: HashMap<S, Vec<A>>,
    transitions: HashMap<(S, A), Vec<Outcome<S>>>,
}

impl<S, A> Default for TabularModel<S, A>
where
    S: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self {
            states: Vec::new(),
            actions: HashMap::new(),
            transitions: HashMap::new(),
        }
    }
}

impl<S, A> TabularModel<S, A>
where
    S: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a model from already-built tables.
    ///
    /// Nothing is checked here; the engine validates the model when it is constructed.
    pub fn from_parts(
        states: Vec<S>,
        actions: HashMap<S, Vec<A>>,
        transitions: HashMap<(S, A), Vec<Outcome<S>>>,
    ) -> Self {
        Self {
            states,
            actions,
            transitions,
        }
    }

    /// Declare a state. Declaring the same state twice is reported by the engine.
    pub fn add_state(&mut self, state: S) -> &mut Self {
        self.actions.entry(state.clone()).or_default();
        self.states.push(state);
        self
    }

    /// Add a legal action and its outcome distribution, declaring `state` if it is new.
    /// Re-adding an existing action replaces its outcomes.
    pub fn add_action(&mut self, state: S, action: A, outcomes: Vec<Outcome<S>>) -> &mut Self {
        if !self.actions.contains_key(&state) {
            self.add_state(state.clone());
        }

        let legal = self.actions.entry(state.clone()).or_default();
        if !legal.contains(&action) {
            legal.push(action.clone());
        }
        self.transitions.insert((state, action), outcomes);
        self
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl<S, A> MdpModel for TabularModel<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    type State = S;
    type Action = A;

    fn states(&self) -> &[S] {
        &self.states
    }

    fn actions(&self, state: &S) -> &[A] {
        self.actions.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    fn outcomes(&self, state: &S, action: &A) -> Option<&[Outcome<S>]> {
        self.transitions
            .get(&(state.clone(), action.clone()))
            .map(Vec::as_slice)
    }
}
