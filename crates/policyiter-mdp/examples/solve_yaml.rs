use std::path::PathBuf;

use policyiter_core::SolverConfig;
use policyiter_mdp::{compile_yaml, save_solution_json};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crates/policyiter-mdp/examples/sample.mdp.yaml"));
    let config = match args.next() {
        Some(config_path) => {
            SolverConfig::from_yaml_path(config_path).expect("failed to load solver config")
        }
        None => SolverConfig::from_default_yaml().expect("default config should parse"),
    };

    let compiled = compile_yaml(&path).expect("failed to compile MDP YAML");
    let solution = config.solve(&compiled).expect("policy iteration failed");

    for entry in &solution.states {
        println!("{:<12} {:>10.6}  {}", entry.state, entry.value, entry.action);
    }

    let out = path.with_extension("solution.json");
    save_solution_json(&out, &solution).expect("failed to write solution");
    println!("wrote {}", out.display());
}
