use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read input {}: {source}", path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write output {}: {source}", path.display())]
    OutputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed record at line {line}: {source} in '{context}'")]
    MalformedRecord {
        line: u64,
        context: String,
        #[source]
        source: RecordError,
    },

    #[error("Line {line} exceeds the maximum record length of {limit} bytes")]
    LineTooLong { line: u64, limit: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Failure to interpret a single framed line.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing ';' between station and temperature")]
    MissingDelimiter,

    #[error("temperature is not of the form -?D[D].D")]
    InvalidTemperature,
}

const CONTEXT_LIMIT: usize = 64;

impl ProcessingError {
    pub fn malformed(line: u64, bytes: &[u8], source: RecordError) -> Self {
        let shown = &bytes[..bytes.len().min(CONTEXT_LIMIT)];
        let mut context = String::from_utf8_lossy(shown).into_owned();
        if bytes.len() > CONTEXT_LIMIT {
            context.push_str("...");
        }
        ProcessingError::MalformedRecord {
            line,
            context,
            source,
        }
    }

    /// Shift the line number of a per-line error by `lines_before`, for input
    /// that was framed starting part-way into a file.
    pub fn offset_line(self, lines_before: u64) -> Self {
        match self {
            ProcessingError::MalformedRecord {
                line,
                context,
                source,
            } => ProcessingError::MalformedRecord {
                line: line + lines_before,
                context,
                source,
            },
            ProcessingError::LineTooLong { line, limit } => ProcessingError::LineTooLong {
                line: line + lines_before,
                limit,
            },
            other => other,
        }
    }
}
