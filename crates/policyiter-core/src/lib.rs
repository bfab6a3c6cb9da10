mod iteration;

pub use iteration::config::{SolverConfig, SolverConfigError};
pub use iteration::engine::{Engine, IterationSettings, Phase};
pub use iteration::error::{EngineError, ModelError, ParameterError};
pub use iteration::evaluation::EvaluationMetrics;
pub use iteration::improvement::{ImprovementBaseline, PassMetrics, RunMetrics, Termination};
pub use iteration::model::{MdpModel, Outcome, TabularModel, validate_model};
pub use iteration::solution::{Solution, StateSolution};
