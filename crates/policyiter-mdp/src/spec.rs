use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{CompiledMdp, MdpError};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Serializable MDP schema used for YAML IO and validation.
pub struct MdpSpec {
    /// Schema version for future compatibility checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// All state declarations in the model, in sweep order.
    pub states: Vec<StateSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A single state declaration in the MDP schema.
pub struct StateSpec {
    /// Unique state id.
    pub id: String,
    /// Terminal states absorb with zero reward (defaults to `false` if omitted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<bool>,
    /// Available actions from this state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionSpec>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A named action and its stochastic outcomes.
pub struct ActionSpec {
    pub id: String,
    pub outcomes: Vec<OutcomeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One probabilistic transition for an action.
pub struct OutcomeSpec {
    pub next: String,
    pub prob: f64,
    pub reward: f64,
}

impl MdpSpec {
    /// Check the rules the YAML schema adds on top of a plain MDP.
    ///
    /// Ids must be unique, terminal states must not declare actions and every other
    /// state must declare at least one. Transition numbers are checked on compile.
    pub fn validate(&self) -> Result<(), MdpError> {
        let mut ids = HashSet::with_capacity(self.states.len());
        for state in &self.states {
            if !ids.insert(state.id.as_str()) {
                return Err(MdpError::DuplicateStateId {
                    id: state.id.clone(),
                });
            }

            let actions = state.actions.as_deref().unwrap_or(&[]);
            match (state.is_terminal(), actions.is_empty()) {
                (true, false) => {
                    return Err(MdpError::TerminalStateHasActions {
                        state: state.id.clone(),
                    });
                }
                (false, true) => {
                    return Err(MdpError::StateWithoutActions {
                        state: state.id.clone(),
                    });
                }
                _ => {}
            }

            let mut action_ids = HashSet::with_capacity(actions.len());
            for action in actions {
                if !action_ids.insert(action.id.as_str()) {
                    return Err(MdpError::DuplicateActionId {
                        state: state.id.clone(),
                        action: action.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Compile this spec into a model the engine can solve.
    pub fn compile(&self) -> Result<CompiledMdp, MdpError> {
        CompiledMdp::from_spec(self)
    }
}

impl StateSpec {
    pub fn is_terminal(&self) -> bool {
        self.terminal.unwrap_or(false)
    }
}
