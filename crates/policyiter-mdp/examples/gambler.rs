use policyiter_core::SolverConfig;
use policyiter_mdp::GamblerProblem;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let goal = args
        .next()
        .map(|arg| arg.parse().expect("goal must be a positive integer"))
        .unwrap_or(100);
    let head_prob = args
        .next()
        .map(|arg| arg.parse().expect("head probability must be a number"))
        .unwrap_or(0.4);

    let problem = GamblerProblem::new(goal, head_prob).expect("invalid gambler parameters");
    let model = problem.model();
    let config = SolverConfig::from_default_yaml().expect("default config should parse");

    let solution = config.solve(&model).expect("policy iteration failed");

    println!("capital  value     stake");
    for entry in &solution.states {
        println!("{:>7}  {:<8.6}  {}", entry.state, entry.value, entry.action);
    }
    println!(
        "passes={} evaluation_sweeps={} termination={:?}",
        solution.metrics.passes, solution.metrics.evaluation_sweeps, solution.metrics.termination
    );
}
