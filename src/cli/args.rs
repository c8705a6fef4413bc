use clap::Parser;
use std::path::PathBuf;

use crate::config::ProcessingConfig;
use crate::utils::constants::{
    DEFAULT_BUFFER_SIZE, DEFAULT_INPUT_FILE, DEFAULT_MAX_LINE_LEN, DEFAULT_WORKERS,
};
use crate::writers::ReportFormat;

#[derive(Parser, Debug)]
#[command(name = "brc-processor")]
#[command(about = "Per-station min/max/mean of a `station;temperature` measurements file")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, default_value = DEFAULT_INPUT_FILE, help = "Input measurements file")]
    pub input: PathBuf,

    #[arg(short, long, value_enum, default_value_t = ReportFormat::Log)]
    pub format: ReportFormat,

    #[arg(
        short,
        long,
        help = "Report path [default: stdout for log, weather_data.csv for csv]"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE, help = "Bulk read size in bytes")]
    pub buffer_size: usize,

    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LEN, help = "Longest accepted record in bytes")]
    pub max_line_len: usize,

    #[arg(
        short,
        long,
        default_value_t = DEFAULT_WORKERS,
        help = "Worker threads; 0 uses every CPU, 1 streams on the main thread"
    )]
    pub workers: usize,

    #[arg(long, help = "Memory-map the input instead of streaming reads")]
    pub mmap: bool,

    #[arg(long, help = "Show a progress bar")]
    pub progress: bool,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn to_config(&self) -> ProcessingConfig {
        ProcessingConfig {
            input: self.input.clone(),
            output: self.output.clone(),
            format: self.format,
            buffer_size: self.buffer_size,
            max_line_len: self.max_line_len,
            use_mmap: self.mmap,
            show_progress: self.progress,
            ..ProcessingConfig::default()
        }
        .with_workers(self.workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_uses_defaults() {
        let cli = Cli::try_parse_from(["brc-processor"]).unwrap();
        let config = cli.to_config();

        assert_eq!(config.input, PathBuf::from("measurements.txt"));
        assert_eq!(config.format, ReportFormat::Log);
        assert_eq!(config.output, None);
        assert_eq!(config.workers, 1);
        assert!(!config.use_mmap);
    }

    #[test]
    fn test_csv_with_workers() {
        let cli = Cli::try_parse_from([
            "brc-processor",
            "--input",
            "data.txt",
            "--format",
            "csv",
            "-w",
            "4",
            "--mmap",
        ])
        .unwrap();
        let config = cli.to_config();

        assert_eq!(config.input, PathBuf::from("data.txt"));
        assert_eq!(config.format, ReportFormat::Csv);
        assert_eq!(config.workers, 4);
        assert!(config.is_parallel());
        assert!(config.use_mmap);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["brc-processor", "--format", "json"]).is_err());
    }
}
