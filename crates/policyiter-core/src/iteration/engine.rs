use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::iteration::{
    error::{EngineError, ParameterError},
    improvement::{ImprovementBaseline, RunMetrics},
    interner::StateInterner,
    model::MdpModel,
    resolved::ResolvedModel,
    solution::{Solution, StateSolution},
};

/// Knobs controlling improvement tie-breaking and the optional safety bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationSettings {
    /// Starting point of the greedy search in each state.
    pub baseline: ImprovementBaseline,
    /// Two consecutive pass aggregates closer than this count as an oscillation. `0.0` means exact equality.
    pub oscillation_tolerance: f64,
    /// Upper bound on sweeps per evaluation; exceeding it is `NonConvergence`.
    pub max_sweeps: Option<usize>,
    /// Upper bound on improvement passes per `improve` call.
    pub max_passes: Option<usize>,
}

impl Default for IterationSettings {
    fn default() -> Self {
        IterationSettings {
            baseline: ImprovementBaseline::CurrentAction,
            oscillation_tolerance: 0.0,
            max_sweeps: None,
            max_passes: None,
        }
    }
}

impl IterationSettings {
    pub(crate) fn validate(&self) -> Result<(), ParameterError> {
        if !self.oscillation_tolerance.is_finite() || self.oscillation_tolerance < 0.0 {
            return Err(ParameterError::OscillationTolerance {
                tolerance: self.oscillation_tolerance,
            });
        }
        if self.max_sweeps == Some(0) {
            return Err(ParameterError::ZeroBound { name: "max_sweeps" });
        }
        if self.max_passes == Some(0) {
            return Err(ParameterError::ZeroBound { name: "max_passes" });
        }
        Ok(())
    }
}

/// Last stage the engine entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initialized,
    Evaluating,
    Improving,
    Converged,
}

/// Policy-iteration engine over a borrowed model.
///
/// The engine owns the value table, the policy table, and the aggregate of the
/// last improvement pass. The model must outlive it and is never mutated.
#[derive(Debug)]
pub struct Engine<'m, M: MdpModel> {
    model: &'m M,
    index: StateInterner<M::State>,
    pub(crate) resolved: ResolvedModel,
    pub(crate) gamma: f64,
    pub(crate) settings: IterationSettings,
    pub(crate) values: Vec<f64>,
    /// Chosen action per state, as a position in `model.actions(state)`.
    pub(crate) policy: Vec<usize>,
    pub(crate) last_policy_value: Option<f64>,
    pub(crate) phase: Phase,
    /// Threshold of the last evaluation that converged for the current `policy`.
    pub(crate) evaluated_theta: Option<f64>,
}

impl<'m, M: MdpModel> Engine<'m, M> {
    /// Build an engine whose initial policy takes the first legal action of every state.
    pub fn new(model: &'m M, gamma: f64) -> Result<Self, EngineError> {
        Self::with_initializer(model, gamma, |_state, _actions| 0)
    }

    /// Build an engine whose initial policy is a uniform random choice from a seeded ChaCha8 RNG.
    pub fn with_seed(model: &'m M, gamma: f64, seed: u64) -> Result<Self, EngineError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::with_initializer(model, gamma, |_state, actions| {
            rng.gen_range(0..actions.len())
        })
    }

    /// Build an engine, asking `init` for the position of each state's initial action.
    ///
    /// `init` is only called once the model has been validated, so `actions` is never empty.
    pub fn with_initializer<F>(model: &'m M, gamma: f64, mut init: F) -> Result<Self, EngineError>
    where
        F: FnMut(&M::State, &[M::Action]) -> usize,
    {
        check_gamma(gamma)?;
        let (resolved, index) = ResolvedModel::resolve(model)?;

        let mut policy = Vec::with_capacity(index.len());
        for state in index.iter() {
            let actions = model.actions(state);
            let choice = init(state, actions);
            if choice >= actions.len() {
                return Err(ParameterError::InitialAction {
                    state: format!("{state:?}"),
                    index: choice,
                    num_actions: actions.len(),
                }
                .into());
            }
            policy.push(choice);
        }

        log::debug!(
            "resolved model with {} states, gamma {}",
            resolved.state_count(),
            gamma
        );

        Ok(Self {
            model,
            values: vec![0.0; index.len()],
            index,
            resolved,
            gamma,
            settings: IterationSettings::default(),
            policy,
            last_policy_value: None,
            phase: Phase::Initialized,
            evaluated_theta: None,
        })
    }

    /// Replace the iteration settings.
    pub fn with_settings(mut self, settings: IterationSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        self.settings = settings;
        Ok(self)
    }

    /// Borrow the underlying model.
    pub fn model(&self) -> &'m M {
        self.model
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn settings(&self) -> &IterationSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Aggregate greedy value recorded by the last improvement pass that led to another evaluation.
    pub fn last_policy_value(&self) -> Option<f64> {
        self.last_policy_value
    }

    /// Current value estimate of `state`, or `None` if the model does not contain it.
    pub fn value(&self, state: &M::State) -> Option<f64> {
        self.index.key_of(state).map(|key| self.values[key])
    }

    /// Current policy action of `state`, or `None` if the model does not contain it.
    pub fn action(&self, state: &M::State) -> Option<&'m M::Action> {
        let key = self.index.key_of(state)?;
        self.model.actions(state).get(self.policy[key])
    }

    /// Value table in model order.
    pub fn values(&self) -> impl Iterator<Item = (&M::State, f64)> + '_ {
        self.index.iter().zip(self.values.iter().copied())
    }

    /// Policy table in model order.
    pub fn policy(&self) -> impl Iterator<Item = (&M::State, &'m M::Action)> + '_ {
        let model = self.model;
        self.index
            .iter()
            .zip(self.policy.iter())
            .map(move |(state, &choice)| (state, &model.actions(state)[choice]))
    }

    /// Copy the current tables into a `Solution`.
    pub(crate) fn solution(&self, metrics: RunMetrics) -> Solution<M::State, M::Action> {
        let states = self
            .values()
            .zip(self.policy())
            .map(|((state, value), (_, action))| StateSolution {
                state: state.clone(),
                value,
                action: action.clone(),
            })
            .collect();

        Solution { states, metrics }
    }
}

pub(crate) fn check_gamma(gamma: f64) -> Result<(), ParameterError> {
    if !(0.0..=1.0).contains(&gamma) {
        return Err(ParameterError::Discount { gamma });
    }
    Ok(())
}

pub(crate) fn check_theta(theta: f64) -> Result<(), ParameterError> {
    if !theta.is_finite() || theta <= 0.0 {
        return Err(ParameterError::Threshold { theta });
    }
    Ok(())
}
