use orbsim::{bench_update_orders, display_radii, load_scenario, run_2d};
use orbsim::{CheckpointConfig, ScenarioConfig, Simulator, StdoutSink, UpdateOrderConfig};

use anyhow::{bail, Context, Result};
use bevy::app::AppExit;
use clap::Parser;

use std::io::{self, Write};
use std::path::PathBuf;

/// Two-body gravity simulation with kinetic energy checkpoints
#[derive(Parser, Debug)]
struct Args {
    /// Scenario file (.txt or .yaml); prompts for a base name when omitted
    #[arg(short, long)]
    file_name: Option<String>,

    /// Run every tick without opening a window
    #[arg(long)]
    headless: bool,

    /// Time the scenario under both update orders and exit
    #[arg(long)]
    bench: bool,

    #[arg(long, value_enum)]
    update_order: Option<UpdateOrderConfig>,

    #[arg(long, value_enum)]
    checkpoints: Option<CheckpointConfig>,
}

/// Interactive fallback: base name typed by the user, `.txt` appended
fn prompt_file_name() -> Result<String> {
    print!("Enter Filename: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(format!("{}.txt", line.trim()))
}

// relative to the working directory first, then the bundled scenarios
fn resolve_path(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.exists() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

fn load_scenario_from_args(args: &Args) -> Result<ScenarioConfig> {
    let file_name = match &args.file_name {
        Some(name) => name.clone(),
        None => prompt_file_name()?,
    };
    let path = resolve_path(&file_name);
    let mut cfg = load_scenario(&path).with_context(|| format!("failed to load scenario {}", path.display()))?;

    if let Some(order) = args.update_order {
        cfg.engine.update_order = order;
    }
    if let Some(checkpoints) = args.checkpoints {
        cfg.engine.checkpoints = checkpoints;
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = load_scenario_from_args(&args)?;
    let mut simulator = Simulator::from_config(&cfg)?;

    if args.bench {
        bench_update_orders(&simulator)?;
        return Ok(());
    }

    if args.headless {
        let positions = simulator.run(&mut StdoutSink)?;
        for (body, x) in simulator.bodies().iter().zip(positions) {
            println!("{}: x = ({:e}, {:e}) m", body.name, x.x, x.y);
        }
        return Ok(());
    }

    match run_2d(simulator, display_radii(&cfg)) {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => bail!("viewer exited with code {code}"),
    }
}
