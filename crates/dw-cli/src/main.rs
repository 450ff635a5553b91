//! CLI frontend for the Dronewar harvesting simulation.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::run::RunOptions;

#[derive(Parser)]
#[command(
    name = "dw",
    about = "Dronewar: two drone fleets racing for a shared resource pool",
    version,
    propagate_version = true
)]
struct Cli {
    /// Show debug logging (and the full event log for `run`)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless match and print the result
    Run {
        /// Simulated seconds to run
        #[arg(long, default_value = "30")]
        seconds: f32,

        /// Seconds per tick
        #[arg(long, default_value = "0.1")]
        dt: f32,

        /// RNG seed for deterministic matches
        #[arg(short, long)]
        seed: Option<u64>,

        /// Agents per team (1-5)
        #[arg(long)]
        fleet_size: Option<usize>,

        /// Agent speed in units per second (1-10)
        #[arg(long)]
        speed: Option<f32>,

        /// Seconds between resource spawns (0.5-10)
        #[arg(long)]
        spawn_rate: Option<f32>,

        /// Include agent paths in the output
        #[arg(long)]
        show_paths: bool,

        /// Searching agents skip resources already targeted by a peer
        #[arg(long)]
        reserve: bool,

        /// Only list agents of this team (a/b, blue/red)
        #[arg(short, long)]
        team: Option<String>,

        /// JSON configuration file; flags override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the final snapshot as JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Write the final snapshot as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration as JSON
    Config {
        /// JSON configuration file to merge over the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            seconds,
            dt,
            seed,
            fleet_size,
            speed,
            spawn_rate,
            show_paths,
            reserve,
            team,
            config,
            json,
            output,
        } => commands::run::run(&RunOptions {
            seconds,
            dt,
            seed,
            fleet_size,
            speed,
            spawn_rate,
            show_paths,
            reserve,
            team,
            config,
            json,
            output,
            verbose: cli.verbose,
        }),
        Commands::Config { config } => commands::config::run(config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
