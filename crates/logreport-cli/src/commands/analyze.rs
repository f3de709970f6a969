use anyhow::{Context, Result};
use logreport_core::Config;
use logreport_core::analysis::{Aggregator, ErrorRateGuard, Finalizer};
use logreport_core::log::{LineParser, LogFileReference, LogReader, LogSelector};
use logreport_core::report::ReportWriter;
use std::path::PathBuf;

/// How a run ended when it did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No file in the log directory carried a usable date
    NoCandidates,
    /// The report for the newest log already exists
    AlreadyReported {
        log_file: LogFileReference,
        report: PathBuf,
    },
    Reported {
        log_file: LogFileReference,
        report: PathBuf,
        rows: usize,
    },
}

/// Analyze the newest log in `LOG_DIR` and write its report
pub fn run(config: &Config) -> Result<Outcome> {
    let selector = LogSelector::new(&config.file_date_pattern)?;
    let parser = LineParser::new(&config.parser_pattern)?;

    let log_file = selector
        .latest(&config.log_dir)
        .with_context(|| format!("Failed to scan log directory {}", config.log_dir.display()))?;
    let Some(log_file) = log_file else {
        tracing::info!("No file to analyze in {}", config.log_dir.display());
        return Ok(Outcome::NoCandidates);
    };

    let report = config.report_path(&log_file.display_date());
    if report.exists() {
        tracing::info!(
            "The report for {} is ready: {}",
            log_file.name,
            report.display()
        );
        return Ok(Outcome::AlreadyReported { log_file, report });
    }

    let lines = LogReader::open(&log_file.path)
        .with_context(|| format!("Open file error: {}", log_file.path.display()))?;

    tracing::info!("Start analysis log {}", log_file.name);

    let mut aggregator = Aggregator::new(&parser);
    aggregator
        .try_extend(lines)
        .with_context(|| format!("Read error in {}", log_file.path.display()))?;
    let aggregation = aggregator.finish();

    ErrorRateGuard::new(config.max_error_percent).check_stats(&aggregation.stats);

    let rows = Finalizer::new(config.report_size).finalize(&aggregation);

    let report = ReportWriter::new(&config.report_template)
        .write(&rows, &report)
        .context("Save report error")?;

    tracing::info!("End analysis and save report in {}", report.display());

    Ok(Outcome::Reported {
        log_file,
        report,
        rows: rows.len(),
    })
}
