mod cli;
mod commands;
mod error;
mod paths;

use std::fs;
use std::fs::File;
use std::process::ExitCode;

use clap::Parser;
use log::error;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

use crate::cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match commands::run(args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr with `--verbose`, otherwise to `latest.log` in the cache directory.
fn init_logging(verbose: bool) {
    if verbose {
        let _ = TermLogger::init(LevelFilter::Debug, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
        return;
    }

    paths::rotate_logs();
    let Some(path) = paths::log_file() else { return };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }

    match File::create(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
        }
        Err(e) => eprintln!("Could not create log file {}: {}", path.display(), e),
    }
}
