use std::{fs, path::Path};

use policyiter_core::Solution;
use serde::Serialize;

use crate::{CompiledMdp, MdpError, MdpSpec};

/// Load an MDP spec from YAML on disk.
pub fn load_yaml(path: impl AsRef<Path>) -> Result<MdpSpec, MdpError> {
    let yaml = fs::read_to_string(path)?;
    let spec: MdpSpec = serde_yaml::from_str(&yaml)?;
    Ok(spec)
}

/// Load and compile an MDP from a YAML file.
pub fn compile_yaml(path: impl AsRef<Path>) -> Result<CompiledMdp, MdpError> {
    let spec = load_yaml(path)?;
    spec.compile()
}

/// Serialize and write an MDP spec to YAML.
pub fn save_yaml(path: impl AsRef<Path>, spec: &MdpSpec) -> Result<(), MdpError> {
    let yaml = serde_yaml::to_string(spec)?;
    fs::write(path, yaml)?;
    Ok(())
}

/// Write a solved value table and policy as pretty JSON.
pub fn save_solution_json<S, A>(
    path: impl AsRef<Path>,
    solution: &Solution<S, A>,
) -> Result<(), MdpError>
where
    S: Serialize,
    A: Serialize,
{
    let json = solution.to_json()?;
    fs::write(path, json)?;
    Ok(())
}
