use std::collections::HashMap;

use policyiter_core::{MdpModel, Outcome, validate_model};

use crate::{MdpError, MdpSpec};

/// Id of the zero-reward self-loop every terminal state receives on compilation.
pub const TERMINAL_ACTION: &str = "noop";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Dense index for states in a compiled MDP.
pub struct StateKey(usize);

impl StateKey {
    /// Return the underlying state index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for StateKey {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone)]
/// Validated, string-keyed MDP ready to hand to the policy-iteration engine.
pub struct CompiledMdp {
    states: Vec<StateRec>,
    state_ids: Vec<String>,
    state_id_to_key: HashMap<String, StateKey>,
}

#[derive(Debug, Clone)]
struct StateRec {
    terminal: bool,
    action_ids: Vec<String>,
    /// Parallel to `action_ids`.
    outcomes: Vec<Vec<Outcome<String>>>,
}

impl CompiledMdp {
    /// Compile and validate a spec.
    pub(crate) fn from_spec(spec: &MdpSpec) -> Result<Self, MdpError> {
        spec.validate()?;

        let mut state_id_to_key = HashMap::with_capacity(spec.states.len());
        let mut state_ids = Vec::with_capacity(spec.states.len());

        for (idx, state) in spec.states.iter().enumerate() {
            state_id_to_key.insert(state.id.clone(), StateKey::from(idx));
            state_ids.push(state.id.clone());
        }

        let mut states = Vec::with_capacity(spec.states.len());
        for state in &spec.states {
            let terminal = state.is_terminal();

            let rec = if terminal {
                StateRec {
                    terminal,
                    action_ids: vec![TERMINAL_ACTION.to_string()],
                    outcomes: vec![vec![Outcome::new(state.id.clone(), 0.0, 1.0)]],
                }
            } else {
                let actions = state.actions.as_deref().unwrap_or(&[]);
                StateRec {
                    terminal,
                    action_ids: actions.iter().map(|action| action.id.clone()).collect(),
                    outcomes: actions
                        .iter()
                        .map(|action| {
                            action
                                .outcomes
                                .iter()
                                .map(|o| Outcome::new(o.next.clone(), o.reward, o.prob))
                                .collect()
                        })
                        .collect(),
                }
            };

            states.push(rec);
        }

        let compiled = Self {
            states,
            state_ids,
            state_id_to_key,
        };
        validate_model(&compiled)?;
        log::debug!("compiled MDP with {} states", compiled.state_count());
        Ok(compiled)
    }

    /// Return the number of compiled states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Check whether a state is terminal.
    pub fn is_terminal(&self, key: StateKey) -> Option<bool> {
        self.states.get(key.index()).map(|state| state.terminal)
    }

    /// Return the number of actions available from a state.
    pub fn num_actions(&self, key: StateKey) -> Option<usize> {
        self.states
            .get(key.index())
            .map(|state| state.action_ids.len())
    }

    /// Convert a state key back to its original string id.
    pub fn state_id(&self, key: StateKey) -> Option<&str> {
        self.state_ids.get(key.index()).map(String::as_str)
    }

    /// Convert a string id into a compiled state key.
    pub fn state_key(&self, id: &str) -> Option<StateKey> {
        self.state_id_to_key.get(id).copied()
    }

    fn record(&self, id: &str) -> Option<&StateRec> {
        let key = self.state_key(id)?;
        self.states.get(key.index())
    }
}

impl MdpModel for CompiledMdp {
    type State = String;
    type Action = String;

    fn states(&self) -> &[String] {
        &self.state_ids
    }

    fn actions(&self, state: &String) -> &[String] {
        self.record(state)
            .map(|rec| rec.action_ids.as_slice())
            .unwrap_or(&[])
    }

    fn outcomes(&self, state: &String, action: &String) -> Option<&[Outcome<String>]> {
        let rec = self.record(state)?;
        let position = rec.action_ids.iter().position(|id| id == action)?;
        rec.outcomes.get(position).map(Vec::as_slice)
    }
}
