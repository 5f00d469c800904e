//! Segment Rooms headless runner.
//!
//! Drives a [`Simulation`] with scripted input, without a window:
//! - **bevy_ecs** for the entity-component-system simulation
//! - **configparser** for the INI configuration
//! - **clap** for the command line
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (or `--config`) and the persisted stages
//! 2. Parse the `--input` script into per-step intents
//! 3. Step the simulation `--steps` times with a fixed `--dt`
//! 4. Flush pending saves and print the explored rooms
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --input "R20 J R30 W40 L50"
//! ```

use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;

use segmentrooms::game::Simulation;
use segmentrooms::resources::gameconfig::GameConfig;
use segmentrooms::script::{expand, parse_script};

/// Segment Rooms headless runner
#[derive(Parser)]
#[command(version, about = "Walk the segment rooms from a scripted input")]
struct Cli {
    /// INI configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Stage file to load and autosave, overriding `[storage] stages_path`.
    #[arg(long, value_name = "PATH")]
    stages: Option<PathBuf>,

    /// Number of steps to simulate.
    #[arg(long, default_value = "600")]
    steps: u32,

    /// Seconds per step.
    #[arg(long, value_name = "SECONDS", default_value = "0.016666668")]
    dt: f32,

    /// Input script, e.g. "R20 J R30 W10 L5".
    #[arg(long, value_name = "SCRIPT", default_value = "")]
    input: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        if cli.config.is_some() {
            warn!("{e}; using defaults");
        } else {
            info!("{e}; using defaults");
        }
    }
    if let Some(stages) = cli.stages {
        config.stages_path = Some(stages);
    }

    let commands = match parse_script(&cli.input) {
        Ok(commands) => commands,
        Err(e) => {
            eprintln!("Error in input script: {e}");
            std::process::exit(2);
        }
    };
    let mut script = expand(&commands).into_iter();

    let mut sim = Simulation::load(config);
    for _ in 0..cli.steps {
        sim.step(cli.dt, script.next().unwrap_or_default());
        for cmd in sim.feedback().try_iter() {
            debug!("Feedback: {:?}", cmd);
        }
    }
    sim.shutdown();

    let actor = sim.actor();
    let current = sim.world_graph().current();
    println!(
        "Stopped in room {} (stage {}) at ({:.2}, {:.2}) after {:.2}s",
        current,
        sim.current_stage().id,
        actor.pos.x,
        actor.pos.y,
        sim.time().elapsed
    );
    println!("Explored rooms:");
    for (coord, id) in sim.world_graph().rooms() {
        let marker = if coord == current { " *" } else { "" };
        println!("  {coord} -> {id}{marker}");
    }
}
