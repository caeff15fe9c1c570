use gravsim::{Integrator, Scenario, ScenarioConfig, Universe};
use gravsim::{bench_accelerations, bench_step, filler_bodies};
use gravsim::{check_acceleration_methods, forward_back_offset};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "All-pairs N-body gravity simulator")]
struct Args {
    /// Scenario file, looked up in `scenarios/` unless the path exists as given
    #[arg(short, long, default_value = "solar_system.yaml")]
    file_name: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate the scenario and report final positions
    Run {
        /// Override the scenario's integrator
        #[arg(long, value_enum)]
        integrator: Option<Integrator>,
    },
    /// Cross-check vectorized and naive accelerations on the scenario bodies
    Check,
    /// Integrate forward, reverse velocities, integrate back, report offsets
    Reverse {
        #[arg(long, default_value_t = 10_000)]
        steps: usize,
        #[arg(long, value_enum, default_value_t = Integrator::VelocityVerlet)]
        integrator: Integrator,
    },
    /// Time both acceleration methods
    Bench {
        /// Light bodies added on top of the scenario's
        #[arg(long, default_value_t = 100)]
        extra_bodies: usize,
        #[arg(long, default_value_t = 2000)]
        iters: usize,
    },
}

fn scenario_path(file_name: &str) -> PathBuf {
    let given = PathBuf::from(file_name);
    if given.exists() {
        return given;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

// load here to keep main clean
fn load_scenario(file_name: &str) -> Result<Scenario> {
    let path = scenario_path(file_name);
    let cfg = ScenarioConfig::from_path(&path)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;
    Ok(Scenario::build_scenario(cfg)?)
}

fn print_positions(scenario: &Scenario) {
    let positions = scenario.final_positions();
    for (i, body) in scenario.universe.bodies().iter().enumerate() {
        let p = positions.row(i);
        println!("{:>12}  {:>22.15e} {:>22.15e} {:>22.15e}", body.name, p[0], p[1], p[2]);
    }
}

fn run(mut scenario: Scenario, integrator: Option<Integrator>) {
    if let Some(integrator) = integrator {
        scenario.engine.integrator = integrator;
    }
    scenario.run();
    print_positions(&scenario);

    if let Some(errors) = scenario.percent_errors() {
        println!();
        println!("percent error vs expected:");
        for (i, err) in errors {
            println!("{:>12}  {:.6} %", scenario.universe.bodies()[i].name, err);
        }
    }
}

fn reverse(universe: &Universe, integrator: Integrator, dt: f64, steps: usize) {
    let offsets = forward_back_offset(universe, integrator, dt, steps);
    for (body, offset) in universe.bodies().iter().zip(offsets) {
        println!("{:>12}  {:.6e} km", body.name, offset);
    }
}

fn bench(universe: &Universe, extra_bodies: usize, iters: usize) {
    let mut bodies = universe.bodies().to_vec();
    bodies.extend(filler_bodies(extra_bodies));

    let report = bench_accelerations(&bodies, iters / 2, iters);
    println!("{} bodies, {} iterations", report.bodies, report.iters);
    println!(
        "vectorized: {:e} s/iter ({:.1} iters/s)",
        report.vectorized_secs,
        report.vectorized_per_sec()
    );
    println!("naive:      {:e} s/iter ({:.1} iters/s)", report.naive_secs, report.naive_per_sec());
    println!("speedup:    {:.2}x", report.speedup());

    for integrator in [Integrator::Euler, Integrator::VelocityVerlet, Integrator::RungeKutta4] {
        let per_step = bench_step(&bodies, integrator, 3600.0, iters);
        println!("{:?}: {:e} s/step", integrator, per_step);
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let scenario = load_scenario(&args.file_name)?;

    match args.command.unwrap_or(Command::Run { integrator: None }) {
        Command::Run { integrator } => run(scenario, integrator),
        Command::Check => {
            let u = &scenario.universe;
            let difference = check_acceleration_methods(u.positions(), u.gm())?;
            println!("methods agree: |vectorized - naive| = {:e}", difference);
        }
        Command::Reverse { steps, integrator } => {
            reverse(&scenario.universe, integrator, scenario.parameters.h0, steps)
        }
        Command::Bench { extra_bodies, iters } => bench(&scenario.universe, extra_bodies, iters),
    }

    Ok(())
}
