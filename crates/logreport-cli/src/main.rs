use clap::Parser;
use logreport_cli::commands::analyze;
use logreport_cli::{logging, settings};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "logreport")]
#[command(author, version)]
#[command(
    about = "Analyze nginx access logs and create a report",
    long_about = "logreport picks the newest nginx access log in LOG_DIR, aggregates request \
                  times per URL, and renders an HTML report into REPORT_DIR. A log that already \
                  has a report is skipped."
)]
struct Cli {
    /// Config file, or a directory containing config.json
    #[arg(long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = settings::load(cli.config.as_deref());

    let dispatch = match logging::build_dispatch(&loaded.config, cli.verbose) {
        Ok(dispatch) => dispatch,
        Err(e) => {
            eprintln!("logreport: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::dispatcher::with_default(&dispatch, || {
        for warning in &loaded.warnings {
            tracing::error!("{}", warning);
        }
        if let Some(e) = &loaded.error {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }

        match analyze::run(&loaded.config) {
            Ok(outcome) => {
                tracing::debug!("Run finished: {:?}", outcome);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("We have a problem: {:#}", e);
                ExitCode::FAILURE
            }
        }
    })
}
