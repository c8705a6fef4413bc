use crate::error::{ProcessingError, Result};
use crate::models::StationReport;
use crate::utils::constants::CSV_HEADER;
use clap::ValueEnum;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// `<station> Min: <min> Max: <max> Avg: <mean>`, shortest round-trip numbers
    #[default]
    Log,
    /// `City,Min,Max,Sum,Count,Avg` with two-decimal numbers
    Csv,
}

pub struct ReportWriter {
    format: ReportFormat,
}

impl ReportWriter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Write the report to `out`. `reports` must already be sorted.
    pub fn write<W: Write>(&self, reports: &[StationReport], out: W) -> Result<()> {
        match self.format {
            ReportFormat::Log => write_log(reports, out),
            ReportFormat::Csv => write_csv(reports, out),
        }
    }

    pub fn write_to_path(&self, reports: &[StationReport], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| output_error(path, source))?;
        }
        let file = File::create(path).map_err(|source| output_error(path, source))?;
        self.write(reports, BufWriter::new(file))?;

        info!(path = %path.display(), stations = reports.len(), "Wrote report");
        Ok(())
    }
}

fn output_error(path: &Path, source: std::io::Error) -> ProcessingError {
    ProcessingError::OutputUnavailable {
        path: path.to_path_buf(),
        source,
    }
}

fn write_log<W: Write>(reports: &[StationReport], mut out: W) -> Result<()> {
    for report in reports {
        out.write_all(&report.station)?;
        writeln!(
            out,
            " Min: {} Max: {} Avg: {:?}",
            report.summary.min, report.summary.max, report.mean
        )?;
    }
    out.flush()?;
    Ok(())
}

fn write_csv<W: Write>(reports: &[StationReport], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;

    for report in reports {
        let min = two_decimals(report.min_celsius());
        let max = two_decimals(report.max_celsius());
        let sum = two_decimals(report.summary.sum_celsius());
        let count = report.summary.count.to_string();
        let avg = two_decimals(report.mean);

        writer.write_record([
            &report.station[..],
            min.as_bytes(),
            max.as_bytes(),
            sum.as_bytes(),
            count.as_bytes(),
            avg.as_bytes(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// `{:.2}`, except that values which round to zero are written as `0.00`.
fn two_decimals(value: f64) -> String {
    let text = format!("{:.2}", value);
    match text.as_str() {
        "-0.00" => "0.00".to_string(),
        _ => text,
    }
}
