//! Replay entry point.
//!
//! Usage: `floorplan-replay <blueprint.json> <script.json> [config.json]`.
//! Prints the final report as JSON on stdout; `RUST_LOG` controls logging.

use floorplan_app::{AppError, AppResult, replay_files};
use std::path::PathBuf;
use std::process::ExitCode;

fn run() -> AppResult<()> {
    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let (blueprint, script, config) = match args.as_slice() {
        [blueprint, script] => (blueprint, script, None),
        [blueprint, script, config] => (blueprint, script, Some(config.as_path())),
        _ => {
            return Err(AppError::Usage(
                "floorplan-replay <blueprint.json> <script.json> [config.json]".to_string(),
            ));
        }
    };

    let report = replay_files(blueprint, script, config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting floorplan-replay");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
