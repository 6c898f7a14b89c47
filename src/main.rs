mod cli;
mod commands;
mod error;
mod install;
mod logging;
mod path;

use clap::Parser;
use cli::Cli;
use indicatif::MultiProgress;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let progress_bars = MultiProgress::new();
    logging::init(cli.log_directive(), progress_bars.clone());

    match commands::run(cli, progress_bars).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            if err.is_retryable() {
                eprintln!("This may be a temporary problem; try again later.");
            }
            ExitCode::FAILURE
        },
    }
}
