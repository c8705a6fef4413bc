use std::path::PathBuf;

use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_BUFFER_SIZE, DEFAULT_INPUT_FILE, DEFAULT_MAX_LINE_LEN, DEFAULT_WORKERS,
};
use crate::writers::ReportFormat;

/// Resolved run settings, checked before any input is opened.
#[derive(Debug, Clone, Validate)]
pub struct ProcessingConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub format: ReportFormat,

    #[validate(range(min = 4096, max = 16777216))]
    pub buffer_size: usize,

    #[validate(range(min = 8, max = 65536))]
    pub max_line_len: usize,

    #[validate(range(min = 1, max = 1024))]
    pub workers: usize,

    pub use_mmap: bool,
    pub show_progress: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_FILE),
            output: None,
            format: ReportFormat::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            workers: DEFAULT_WORKERS,
            use_mmap: false,
            show_progress: false,
        }
    }
}

impl ProcessingConfig {
    /// `0` selects one worker per logical CPU.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = if workers == 0 { num_cpus::get() } else { workers };
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.workers > 1
    }

    pub fn checked(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use crate::utils::constants::{
        MAX_BUFFER_SIZE, MAX_LINE_LEN_LIMIT, MAX_WORKERS, MIN_BUFFER_SIZE, MIN_LINE_LEN_LIMIT,
    };

    #[test]
    fn test_defaults_are_valid() {
        let config = ProcessingConfig::default().checked().unwrap();
        assert_eq!(config.input, PathBuf::from("measurements.txt"));
        assert_eq!(config.format, ReportFormat::Log);
        assert!(!config.is_parallel());
    }

    #[test]
    fn test_validation_bounds_match_constants() {
        let mut config = ProcessingConfig {
            buffer_size: MIN_BUFFER_SIZE,
            max_line_len: MIN_LINE_LEN_LIMIT,
            workers: 1,
            ..ProcessingConfig::default()
        };
        assert!(config.validate().is_ok());

        config.buffer_size = MAX_BUFFER_SIZE;
        config.max_line_len = MAX_LINE_LEN_LIMIT;
        config.workers = MAX_WORKERS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_tiny_buffer() {
        let config = ProcessingConfig {
            buffer_size: 16,
            ..ProcessingConfig::default()
        };
        assert!(matches!(config.checked(), Err(ProcessingError::Validation(_))));
    }

    #[test]
    fn test_rejects_oversized_buffer() {
        let config = ProcessingConfig {
            buffer_size: MAX_BUFFER_SIZE + 1,
            ..ProcessingConfig::default()
        };
        assert!(config.checked().is_err());
    }

    #[test]
    fn test_zero_workers_means_all_cpus() {
        let config = ProcessingConfig::default().with_workers(0);
        assert_eq!(config.workers, num_cpus::get());
        assert!(config.checked().is_ok());
    }
}
