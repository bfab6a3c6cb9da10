use crate::iteration::{
    engine::{Engine, Phase, check_theta},
    error::EngineError,
    model::MdpModel,
};

/// Summary of one policy evaluation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationMetrics {
    pub sweeps: usize,
    /// Largest per-state change seen in the last sweep; always below `theta` on success.
    pub final_delta: f64,
}

impl<M: MdpModel> Engine<'_, M> {
    /// Evaluate the current policy until a full sweep changes no value by `theta` or more.
    ///
    /// Sweeps update the value table in place, so states later in model order already
    /// see the values written earlier in the same sweep.
    pub fn evaluate(&mut self, theta: f64) -> Result<EvaluationMetrics, EngineError> {
        check_theta(theta)?;
        self.evaluate_policy(theta)
    }

    pub(crate) fn evaluate_policy(&mut self, theta: f64) -> Result<EvaluationMetrics, EngineError> {
        self.phase = Phase::Evaluating;
        self.evaluated_theta = None;
        let mut sweeps = 0;

        loop {
            let delta = self.sweep();
            sweeps += 1;

            if delta < theta {
                self.evaluated_theta = Some(theta);
                log::debug!("policy evaluation converged after {sweeps} sweeps (delta {delta:e})");
                return Ok(EvaluationMetrics {
                    sweeps,
                    final_delta: delta,
                });
            }

            if self.settings.max_sweeps.is_some_and(|max| sweeps >= max) {
                return Err(EngineError::NonConvergence { sweeps, delta });
            }
        }
    }

    /// Run one in-place sweep and return the largest absolute change.
    fn sweep(&mut self) -> f64 {
        let mut delta = 0.0_f64;
        for state in 0..self.values.len() {
            let old = self.values[state];
            let new =
                self.resolved
                    .expected_return(state, self.policy[state], self.gamma, &self.values);
            self.values[state] = new;
            delta = delta.max((old - new).abs());
        }
        delta
    }

    /// Whether `values` belong to the current policy at least as tightly as `theta`.
    pub(crate) fn is_evaluated_within(&self, theta: f64) -> bool {
        self.evaluated_theta.is_some_and(|done| done <= theta)
    }
}
