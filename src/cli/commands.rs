use crate::cli::args::Cli;
use crate::config::ProcessingConfig;
use crate::error::Result;
use crate::models::StationReport;
use crate::processors::ParallelProcessor;
use crate::readers::MeasurementReader;
use crate::utils::constants::DEFAULT_CSV_FILE;
use crate::utils::progress::ProgressReporter;
use crate::writers::{ReportFormat, ReportWriter};
use std::path::PathBuf;
use tracing::{debug, info};

pub fn run(cli: Cli) -> Result<()> {
    let config = cli.to_config().checked()?;
    debug!(?config, "Resolved configuration");

    let reports = aggregate(&config)?;
    emit(&config, &reports)
}

/// Ingest the configured input and return the finalized, sorted rows.
pub fn aggregate(config: &ProcessingConfig) -> Result<Vec<StationReport>> {
    info!(
        input = %config.input.display(),
        workers = config.workers,
        "Processing measurements"
    );

    let total = std::fs::metadata(&config.input).map(|m| m.len()).unwrap_or(0);
    let progress =
        ProgressReporter::new_bytes(total, "Aggregating measurements...", !config.show_progress);

    let reader = MeasurementReader::from_config(config);
    let (table, stats) = if config.is_parallel() {
        ParallelProcessor::new(config.workers)
            .with_reader(reader)
            .aggregate_file(&config.input, Some(&progress))?
    } else {
        reader.aggregate_file(&config.input, Some(&progress))?
    };

    progress.finish_with_message(&format!(
        "Aggregated {} records from {} stations",
        stats.records,
        table.len()
    ));
    if stats.empty_lines > 0 {
        debug!(empty_lines = stats.empty_lines, "Skipped empty lines");
    }

    Ok(table.drain())
}

fn emit(config: &ProcessingConfig, reports: &[StationReport]) -> Result<()> {
    let writer = ReportWriter::new(config.format);
    match (config.format, &config.output) {
        (_, Some(path)) => writer.write_to_path(reports, path),
        (ReportFormat::Csv, None) => {
            writer.write_to_path(reports, &PathBuf::from(DEFAULT_CSV_FILE))
        }
        (ReportFormat::Log, None) => writer.write(reports, std::io::stdout().lock()),
    }
}
