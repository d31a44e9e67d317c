//! Command-line entry point: load a run configuration, execute it,
//! and write the result as JSON.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

use sted_kmc::config;
use sted_kmc::run;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one simulation from a TOML configuration file.
    Run {
        /// Path to a RunConfigFile in TOML format.
        #[arg(short, long)]
        config: PathBuf,

        /// Path to write the resulting ResultRecord as pretty JSON.
        #[arg(short, long)]
        out: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config: config_path, out } => run_command(&config_path, &out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run_command(config_path: &PathBuf, out_path: &PathBuf) -> Result<(), String> {
    let contents = fs::read_to_string(config_path)
        .map_err(|e| format!("failed to read {}: {e}", config_path.display()))?;
    let run_config = config::load_from_str(&contents).map_err(|e| e.to_string())?;

    let record = run::run(run_config).map_err(|e| e.to_string())?;

    let is_binary = out_path.extension().and_then(|e| e.to_str()) == Some("bin");
    if is_binary {
        let bytes = run::to_bincode(&record).map_err(|e| e.to_string())?;
        fs::write(out_path, bytes)
            .map_err(|e| format!("failed to write {}: {e}", out_path.display()))?;
    } else {
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| format!("failed to serialize result: {e}"))?;
        fs::write(out_path, json)
            .map_err(|e| format!("failed to write {}: {e}", out_path.display()))?;
    }

    Ok(())
}
