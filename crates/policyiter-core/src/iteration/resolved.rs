use std::collections::HashSet;

use crate::iteration::{error::ModelError, interner::StateInterner, model::MdpModel};

/// Floating point tolerance used when validating probability sums.
pub(crate) const PROB_TOLERANCE: f64 = 1e-9;

/// Dense copy of a model with next states resolved to indices, so sweeps never hash.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedModel {
    states: Vec<StateRec>,
}

#[derive(Debug, Clone)]
struct StateRec {
    actions: Vec<ActionRec>,
}

#[derive(Debug, Clone)]
struct ActionRec {
    outcomes: Vec<OutcomeRec>,
}

#[derive(Debug, Clone, Copy)]
struct OutcomeRec {
    next: usize,
    reward: f64,
    prob: f64,
}

impl ResolvedModel {
    /// Validate `model` and build its dense form plus the state index used to read it back.
    pub(crate) fn resolve<M: MdpModel>(
        model: &M,
    ) -> Result<(Self, StateInterner<M::State>), ModelError> {
        let declared = model.states();
        let mut index = StateInterner::with_capacity(declared.len());
        for state in declared {
            if index.insert_new(state.clone()).is_none() {
                return Err(ModelError::DuplicateState {
                    state: format!("{state:?}"),
                });
            }
        }

        let mut states = Vec::with_capacity(index.len());
        for state in index.iter() {
            let legal = model.actions(state);
            if legal.is_empty() {
                return Err(ModelError::NoActions {
                    state: format!("{state:?}"),
                });
            }

            let mut seen = HashSet::with_capacity(legal.len());
            let mut actions = Vec::with_capacity(legal.len());
            for action in legal {
                if !seen.insert(action) {
                    return Err(ModelError::DuplicateAction {
                        state: format!("{state:?}"),
                        action: format!("{action:?}"),
                    });
                }
                actions.push(resolve_action(model, &index, state, action)?);
            }

            states.push(StateRec { actions });
        }

        Ok((Self { states }, index))
    }

    pub(crate) fn state_count(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn num_actions(&self, state: usize) -> usize {
        self.states[state].actions.len()
    }

    /// `Σ p · (r + γ · values[next])` over the outcomes of `(state, action)`.
    pub(crate) fn expected_return(
        &self,
        state: usize,
        action: usize,
        gamma: f64,
        values: &[f64],
    ) -> f64 {
        self.states[state].actions[action]
            .outcomes
            .iter()
            .map(|outcome| outcome.prob * (outcome.reward + gamma * values[outcome.next]))
            .sum()
    }
}

fn resolve_action<M: MdpModel>(
    model: &M,
    index: &StateInterner<M::State>,
    state: &M::State,
    action: &M::Action,
) -> Result<ActionRec, ModelError> {
    let entries = model
        .outcomes(state, action)
        .ok_or_else(|| ModelError::MissingTransition {
            state: format!("{state:?}"),
            action: format!("{action:?}"),
        })?;

    if entries.is_empty() {
        return Err(ModelError::EmptyOutcomes {
            state: format!("{state:?}"),
            action: format!("{action:?}"),
        });
    }

    let mut outcomes = Vec::with_capacity(entries.len());
    let mut sum = 0.0_f64;
    for (i, outcome) in entries.iter().enumerate() {
        if !outcome.prob.is_finite() || outcome.prob < 0.0 {
            return Err(ModelError::InvalidProbability {
                state: format!("{state:?}"),
                action: format!("{action:?}"),
                outcome_index: i,
                value: outcome.prob,
            });
        }

        if !outcome.reward.is_finite() {
            return Err(ModelError::InvalidReward {
                state: format!("{state:?}"),
                action: format!("{action:?}"),
                outcome_index: i,
                value: outcome.reward,
            });
        }

        let next = index
            .key_of(&outcome.next)
            .ok_or_else(|| ModelError::UnknownNextState {
                state: format!("{state:?}"),
                action: format!("{action:?}"),
                next: format!("{:?}", outcome.next),
            })?;

        sum += outcome.prob;
        outcomes.push(OutcomeRec {
            next,
            reward: outcome.reward,
            prob: outcome.prob,
        });
    }

    if (sum - 1.0).abs() > PROB_TOLERANCE {
        return Err(ModelError::ProbabilitySum {
            state: format!("{state:?}"),
            action: format!("{action:?}"),
            sum,
            tolerance: PROB_TOLERANCE,
        });
    }

    Ok(ActionRec { outcomes })
}
