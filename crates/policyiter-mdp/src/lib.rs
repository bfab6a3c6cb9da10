mod builder;
mod compiled;
mod error;
mod gambler;
mod io;
mod spec;

pub use builder::MdpBuilder;
pub use compiled::{CompiledMdp, StateKey, TERMINAL_ACTION};
pub use error::MdpError;
pub use gambler::GamblerProblem;
pub use io::{compile_yaml, load_yaml, save_solution_json, save_yaml};
pub use spec::{ActionSpec, MdpSpec, OutcomeSpec, StateSpec};
