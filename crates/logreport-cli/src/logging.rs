use anyhow::{Context, Result};
use logreport_core::config::{Config, LogFormat};
use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::sync::Mutex;
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::ChronoLocal;

const VERBOSE_FILTER: &str = "logreport=debug,logreport_cli=debug,logreport_core=debug";

/// Build the diagnostics dispatcher described by the config
///
/// Nothing is installed globally; the caller decides the scope in which the
/// returned dispatcher is active.
pub fn build_dispatch(config: &Config, verbose: bool) -> Result<Dispatch> {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_new(&config.log_level)
            .with_context(|| format!("Invalid LOG_LEVEL '{}'", config.log_level))?
    };

    match &config.log_output_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log output file {}", path.display()))?;
            Ok(dispatch_with(config, filter, Mutex::new(file), false))
        }
        None => {
            let ansi = io::stderr().is_terminal();
            Ok(dispatch_with(config, filter, io::stderr, ansi))
        }
    }
}

fn dispatch_with<W>(config: &Config, filter: EnvFilter, writer: W, ansi: bool) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new(config.log_time_format.clone()))
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer);

    match config.log_format {
        LogFormat::Full => Dispatch::new(builder.finish()),
        LogFormat::Compact => Dispatch::new(builder.compact().finish()),
        LogFormat::Json => Dispatch::new(builder.json().finish()),
    }
}
