use thiserror::Error;

/// Error type for engine construction, evaluation, and improvement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid model: {0}")]
    InvalidModel(#[from] ModelError),

    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    /// Only raised when a sweep bound is configured.
    #[error("policy evaluation did not converge within {sweeps} sweeps, last delta {delta}")]
    NonConvergence { sweeps: usize, delta: f64 },
}

/// Malformed MDP detected while the engine resolves the model.
///
/// States and actions are rendered with their `Debug` representation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("duplicate state {state}")]
    DuplicateState { state: String },

    #[error("state {state} has no legal actions")]
    NoActions { state: String },

    #[error("duplicate action {action} in state {state}")]
    DuplicateAction { state: String, action: String },

    #[error("no transition entry for state {state}, action {action}")]
    MissingTransition { state: String, action: String },

    #[error("state {state} action {action} must contain at least one outcome")]
    EmptyOutcomes { state: String, action: String },

    #[error("outcome in state {state}, action {action} references unknown next state {next}")]
    UnknownNextState {
        state: String,
        action: String,
        next: String,
    },

    #[error(
        "invalid probability in state {state}, action {action}, outcome {outcome_index}: {value}"
    )]
    InvalidProbability {
        state: String,
        action: String,
        outcome_index: usize,
        value: f64,
    },

    #[error("invalid reward in state {state}, action {action}, outcome {outcome_index}: {value}")]
    InvalidReward {
        state: String,
        action: String,
        outcome_index: usize,
        value: f64,
    },

    #[error(
        "probability sum for state {state}, action {action} must be within {tolerance} of 1.0, got {sum}"
    )]
    ProbabilitySum {
        state: String,
        action: String,
        sum: f64,
        tolerance: f64,
    },
}

/// Out-of-range argument passed to the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("discount factor must be within [0, 1], got {gamma}")]
    Discount { gamma: f64 },

    #[error("convergence threshold must be finite and > 0, got {theta}")]
    Threshold { theta: f64 },

    #[error("oscillation tolerance must be finite and >= 0, got {tolerance}")]
    OscillationTolerance { tolerance: f64 },

    #[error("{name} must be greater than 0 when set")]
    ZeroBound { name: &'static str },

    #[error("initializer chose action {index} for state {state}, which has {num_actions} actions")]
    InitialAction {
        state: String,
        index: usize,
        num_actions: usize,
    },
}
