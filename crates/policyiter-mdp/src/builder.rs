use std::collections::HashMap;

use policyiter_core::Outcome;

use crate::{ActionSpec, CompiledMdp, MdpError, MdpSpec, OutcomeSpec, StateSpec};

/// Assembles an [`MdpSpec`] from code.
///
/// States keep declaration order, which is the order evaluation sweeps visit them.
/// Terminal states take no actions; compiling gives them the [`TERMINAL_ACTION`]
/// self-loop.
///
/// [`TERMINAL_ACTION`]: crate::TERMINAL_ACTION
#[derive(Debug, Clone, Default)]
pub struct MdpBuilder {
    states: Vec<StateSpec>,
    positions: HashMap<String, usize>,
}

impl MdpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a state that needs at least one action before compiling.
    pub fn state(&mut self, id: impl Into<String>) -> Result<&mut Self, MdpError> {
        self.declare(id.into(), false)
    }

    /// Declare an absorbing state.
    pub fn terminal(&mut self, id: impl Into<String>) -> Result<&mut Self, MdpError> {
        self.declare(id.into(), true)
    }

    fn declare(&mut self, id: String, terminal: bool) -> Result<&mut Self, MdpError> {
        if self.positions.contains_key(&id) {
            return Err(MdpError::DuplicateStateId { id });
        }
        self.positions.insert(id.clone(), self.states.len());
        self.states.push(StateSpec {
            id,
            terminal: terminal.then_some(true),
            actions: None,
        });
        Ok(self)
    }

    /// Attach an action and its outcome distribution to a declared state.
    pub fn action<N>(
        &mut self,
        state: &str,
        action: impl Into<String>,
        outcomes: impl IntoIterator<Item = Outcome<N>>,
    ) -> Result<&mut Self, MdpError>
    where
        N: Into<String>,
    {
        let action = action.into();
        let spec = self.state_mut(state)?;
        if spec.is_terminal() {
            return Err(MdpError::TerminalStateHasActions {
                state: state.to_string(),
            });
        }

        let actions = spec.actions.get_or_insert_with(Vec::new);
        if actions.iter().any(|existing| existing.id == action) {
            return Err(MdpError::DuplicateActionId {
                state: state.to_string(),
                action,
            });
        }
        actions.push(ActionSpec {
            id: action,
            outcomes: outcomes.into_iter().map(outcome_spec).collect(),
        });
        Ok(self)
    }

    /// Append one outcome to an action already attached to `state`.
    pub fn outcome<N>(
        &mut self,
        state: &str,
        action: &str,
        outcome: Outcome<N>,
    ) -> Result<&mut Self, MdpError>
    where
        N: Into<String>,
    {
        let spec = self.state_mut(state)?;
        let entry = spec
            .actions
            .iter_mut()
            .flatten()
            .find(|existing| existing.id == action)
            .ok_or_else(|| MdpError::BuilderUnknownAction {
                state: state.to_string(),
                action: action.to_string(),
            })?;
        entry.outcomes.push(outcome_spec(outcome));
        Ok(self)
    }

    fn state_mut(&mut self, id: &str) -> Result<&mut StateSpec, MdpError> {
        let position = self
            .positions
            .get(id)
            .copied()
            .ok_or_else(|| MdpError::BuilderUnknownState {
                state: id.to_string(),
            })?;
        Ok(&mut self.states[position])
    }

    /// Finish into a schema-checked spec, e.g. to write it out with `save_yaml`.
    pub fn build_spec(self) -> Result<MdpSpec, MdpError> {
        let spec = MdpSpec {
            version: Some(1),
            states: self.states,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn compile(self) -> Result<CompiledMdp, MdpError> {
        self.build_spec()?.compile()
    }
}

fn outcome_spec<N: Into<String>>(outcome: Outcome<N>) -> OutcomeSpec {
    OutcomeSpec {
        next: outcome.next.into(),
        prob: outcome.prob,
        reward: outcome.reward,
    }
}
