use serde::{Deserialize, Serialize};

use crate::iteration::{
    engine::{Engine, Phase, check_theta},
    error::EngineError,
    model::MdpModel,
    solution::Solution,
};

/// Where the greedy search in a state starts before scanning its actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementBaseline {
    /// Start from 0 with the old action as candidate. An action is adopted only if its
    /// value strictly exceeds 0, so a state whose actions are all non-positive keeps its
    /// old action, and among tied positive actions the first one in model order wins.
    Zero,
    /// Start from the old action's own value. An action replaces it only when strictly
    /// better, so ties keep the incumbent.
    #[default]
    CurrentAction,
}

/// Why an `improve` call stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The last pass changed no action.
    PolicyStable,
    /// The last pass produced the same aggregate value as the one before it.
    Oscillation,
    /// The configured pass bound was reached.
    PassLimit,
}

/// Per-pass metrics emitted by `improve_with_hook`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassMetrics {
    /// 1-based pass number within the current `improve` call.
    pub pass: usize,
    /// Sum over states of the best action value found in this pass.
    pub policy_value: f64,
    pub changed_states: usize,
    /// Sweeps spent evaluating the policy this pass improved on.
    pub evaluation_sweeps: usize,
}

/// Aggregate metrics for a complete `improve` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub passes: usize,
    pub evaluation_sweeps: usize,
    /// `policy_value` of every pass, in order.
    pub policy_values: Vec<f64>,
    pub termination: Termination,
}

impl RunMetrics {
    fn new() -> Self {
        RunMetrics {
            passes: 0,
            evaluation_sweeps: 0,
            policy_values: Vec::new(),
            termination: Termination::PolicyStable,
        }
    }

    fn record(&mut self, pass: &PassMetrics) {
        self.passes += 1;
        self.evaluation_sweeps += pass.evaluation_sweeps;
        self.policy_values.push(pass.policy_value);
    }
}

impl<M: MdpModel> Engine<'_, M> {
    /// Alternate evaluation and greedy improvement until the policy stops changing,
    /// then return the final values and policy.
    pub fn improve(&mut self, theta: f64) -> Result<Solution<M::State, M::Action>, EngineError> {
        self.improve_with_hook(theta, |_| {})
    }

    /// Run `improve` and invoke a callback after each completed improvement pass.
    pub fn improve_with_hook<FHook>(
        &mut self,
        theta: f64,
        mut on_pass: FHook,
    ) -> Result<Solution<M::State, M::Action>, EngineError>
    where
        FHook: FnMut(&PassMetrics),
    {
        check_theta(theta)?;
        let mut metrics = RunMetrics::new();

        // Values left over from construction or a coarser evaluation are not trusted.
        let mut sweeps = if self.is_evaluated_within(theta) {
            0
        } else {
            self.evaluate_policy(theta)?.sweeps
        };

        let termination = loop {
            let (changed_states, policy_value) = self.improvement_pass();
            let pass = PassMetrics {
                pass: metrics.passes + 1,
                policy_value,
                changed_states,
                evaluation_sweeps: sweeps,
            };
            log::debug!(
                "improvement pass {}: {} states changed, policy value {}",
                pass.pass,
                changed_states,
                policy_value
            );
            on_pass(&pass);
            metrics.record(&pass);

            if changed_states == 0 {
                break Termination::PolicyStable;
            }
            if self.is_oscillating(policy_value) {
                break Termination::Oscillation;
            }
            if self
                .settings
                .max_passes
                .is_some_and(|max| metrics.passes >= max)
            {
                log::warn!(
                    "policy still changing after {} improvement passes",
                    metrics.passes
                );
                break Termination::PassLimit;
            }

            self.last_policy_value = Some(policy_value);
            sweeps = self.evaluate_policy(theta)?.sweeps;
        };

        // The last pass may have changed the policy without a follow-up evaluation.
        if !self.is_evaluated_within(theta) {
            metrics.evaluation_sweeps += self.evaluate_policy(theta)?.sweeps;
        }

        metrics.termination = termination;
        self.phase = Phase::Converged;
        log::info!(
            "policy iteration finished after {} passes and {} evaluation sweeps ({:?})",
            metrics.passes,
            metrics.evaluation_sweeps,
            termination
        );

        Ok(self.solution(metrics))
    }

    /// Greedily re-derive every state's action. Returns how many states changed and the
    /// summed best action value.
    fn improvement_pass(&mut self) -> (usize, f64) {
        self.phase = Phase::Improving;
        let mut changed_states = 0;
        let mut policy_value = 0.0_f64;

        for state in 0..self.policy.len() {
            let old_action = self.policy[state];
            let (best_action, best_value) = self.greedy_action(state, old_action);
            policy_value += best_value;

            if best_action != old_action {
                self.policy[state] = best_action;
                changed_states += 1;
            }
        }

        if changed_states > 0 {
            self.evaluated_theta = None;
        }
        (changed_states, policy_value)
    }

    fn greedy_action(&self, state: usize, incumbent: usize) -> (usize, f64) {
        let mut best_action = incumbent;
        let mut best_value = match self.settings.baseline {
            ImprovementBaseline::Zero => 0.0,
            ImprovementBaseline::CurrentAction => self.action_value(state, incumbent),
        };

        for action in 0..self.resolved.num_actions(state) {
            let value = self.action_value(state, action);
            if value > best_value {
                best_action = action;
                best_value = value;
            }
        }

        (best_action, best_value)
    }

    fn action_value(&self, state: usize, action: usize) -> f64 {
        self.resolved
            .expected_return(state, action, self.gamma, &self.values)
    }

    fn is_oscillating(&self, policy_value: f64) -> bool {
        self.last_policy_value
            .is_some_and(|last| (policy_value - last).abs() <= self.settings.oscillation_tolerance)
    }
}
