use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::iteration::{
    engine::{Engine, IterationSettings},
    error::EngineError,
    improvement::ImprovementBaseline,
    model::MdpModel,
    solution::Solution,
};

const DEFAULT_SOLVER_CONFIG_YAML: &str = include_str!("../../config/solver.default.yaml");

/// Solver configuration for a complete policy-iteration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub gamma: f64,
    pub theta: f64,
    pub baseline: ImprovementBaseline,
    pub oscillation_tolerance: f64,
    pub max_sweeps: Option<usize>,
    pub max_passes: Option<usize>,
    /// Seed for a random initial policy. Without one every state starts on its first action.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let settings = IterationSettings::default();
        SolverConfig {
            gamma: 1.0,
            theta: 0.01,
            baseline: settings.baseline,
            oscillation_tolerance: settings.oscillation_tolerance,
            max_sweeps: settings.max_sweeps,
            max_passes: settings.max_passes,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Parse a solver config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SolverConfigError> {
        let config: SolverConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a solver config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, SolverConfigError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SOLVER_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, SolverConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    fn validate(&self) -> Result<(), SolverConfigError> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(SolverConfigError::Invalid(
                "gamma must be within [0, 1]".to_string(),
            ));
        }
        if !self.theta.is_finite() || self.theta <= 0.0 {
            return Err(SolverConfigError::Invalid(
                "theta must be finite and > 0".to_string(),
            ));
        }
        self.settings()
            .validate()
            .map_err(|err| SolverConfigError::Invalid(err.to_string()))
    }

    /// Iteration settings carried by this config.
    pub fn settings(&self) -> IterationSettings {
        IterationSettings {
            baseline: self.baseline,
            oscillation_tolerance: self.oscillation_tolerance,
            max_sweeps: self.max_sweeps,
            max_passes: self.max_passes,
        }
    }

    /// Build an engine for `model` from this config.
    pub fn engine<'m, M: MdpModel>(&self, model: &'m M) -> Result<Engine<'m, M>, EngineError> {
        let engine = match self.seed {
            Some(seed) => Engine::with_seed(model, self.gamma, seed)?,
            None => Engine::new(model, self.gamma)?,
        };
        engine.with_settings(self.settings())
    }

    /// Solve `model` to convergence with this config.
    pub fn solve<M: MdpModel>(
        &self,
        model: &M,
    ) -> Result<Solution<M::State, M::Action>, EngineError> {
        self.engine(model)?.improve(self.theta)
    }
}

/// Error type for loading and validating `SolverConfig`.
#[derive(Debug, Error)]
pub enum SolverConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid solver config: {0}")]
    Invalid(String),
}
