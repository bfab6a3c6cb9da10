use policyiter_core::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for MDP loading, validation, compilation, and builder operations.
pub enum MdpError {
    #[error("failed to read or write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate state id '{id}'")]
    DuplicateStateId { id: String },

    #[error("duplicate action id '{action}' in state '{state}'")]
    DuplicateActionId { state: String, action: String },

    #[error("state '{state}' is terminal and cannot declare actions")]
    TerminalStateHasActions { state: String },

    #[error("state '{state}' is not terminal and declares no actions")]
    StateWithoutActions { state: String },

    #[error("invalid model: {0}")]
    Model(#[from] ModelError),

    #[error("builder referenced unknown state '{state}'")]
    BuilderUnknownState { state: String },

    #[error("builder referenced unknown action '{action}' in state '{state}'")]
    BuilderUnknownAction { state: String, action: String },

    #[error("gambler goal must be at least 1, got {goal}")]
    InvalidGoal { goal: u32 },

    #[error("gambler head probability must be within [0, 1], got {value}")]
    InvalidHeadProbability { value: f64 },
}
