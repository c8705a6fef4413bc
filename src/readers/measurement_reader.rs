use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, Result};
use crate::models::Temperature;
use crate::processors::StationTable;
use crate::readers::{split_record, LineFramer};
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_MAX_LINE_LEN};
use crate::utils::progress::ProgressReporter;
use memmap2::Mmap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Counters gathered while ingesting one input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub bytes_read: u64,
    pub records: u64,
    pub empty_lines: u64,
}

impl IngestStats {
    pub fn merge(&mut self, other: &IngestStats) {
        self.bytes_read += other.bytes_read;
        self.records += other.records;
        self.empty_lines += other.empty_lines;
    }
}

/// Streams a measurements file through framing, splitting, decoding and
/// aggregation on the calling thread.
#[derive(Debug, Clone)]
pub struct MeasurementReader {
    buffer_size: usize,
    max_line_len: usize,
    use_mmap: bool,
}

impl MeasurementReader {
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            use_mmap: false,
        }
    }

    pub fn from_config(config: &ProcessingConfig) -> Self {
        Self {
            buffer_size: config.buffer_size,
            max_line_len: config.max_line_len,
            use_mmap: config.use_mmap,
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Aggregate every record in the file at `path`.
    pub fn aggregate_file(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<(StationTable, IngestStats)> {
        let started = Instant::now();
        let file = open_input(path)?;
        let mut table = StationTable::new();

        let stats = if self.use_mmap {
            self.aggregate_mapped(&file, &mut table, progress)?
        } else {
            self.aggregate_reader(file, &mut table, progress)?
        };

        info!(
            path = %path.display(),
            bytes = stats.bytes_read,
            records = stats.records,
            stations = table.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregated measurements"
        );

        Ok((table, stats))
    }

    /// Aggregate from any byte source using one reusable read buffer.
    pub fn aggregate_reader<R: Read>(
        &self,
        mut reader: R,
        table: &mut StationTable,
        progress: Option<&ProgressReporter>,
    ) -> Result<IngestStats> {
        let mut buffer = vec![0u8; self.buffer_size];
        let mut framer = LineFramer::new(self.max_line_len);
        let mut bytes_read = 0u64;

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            bytes_read += n as u64;
            framer.feed(&buffer[..n], |line_number, line| {
                observe_line(table, line_number, line)
            })?;

            if let Some(p) = progress {
                p.increment(n as u64);
            }
        }

        framer.finish(|line_number, line| observe_line(table, line_number, line))?;
        debug!(bytes_read, records = framer.records(), "Reached end of input");

        Ok(IngestStats {
            bytes_read,
            records: framer.records(),
            empty_lines: framer.empty_lines(),
        })
    }

    /// Aggregate an in-memory region as a single chunk.
    pub fn aggregate_bytes(&self, data: &[u8], table: &mut StationTable) -> Result<IngestStats> {
        let mut framer = LineFramer::new(self.max_line_len);
        framer.feed(data, |line_number, line| observe_line(table, line_number, line))?;
        framer.finish(|line_number, line| observe_line(table, line_number, line))?;

        Ok(IngestStats {
            bytes_read: data.len() as u64,
            records: framer.records(),
            empty_lines: framer.empty_lines(),
        })
    }

    fn aggregate_mapped(
        &self,
        file: &File,
        table: &mut StationTable,
        progress: Option<&ProgressReporter>,
    ) -> Result<IngestStats> {
        if file.metadata()?.len() == 0 {
            return Ok(IngestStats::default());
        }

        let mmap = unsafe { Mmap::map(file)? };
        let stats = self.aggregate_bytes(&mmap, table)?;
        if let Some(p) = progress {
            p.increment(stats.bytes_read);
        }
        Ok(stats)
    }
}

impl Default for MeasurementReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Open the input, attaching its path to any failure.
pub fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| ProcessingError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

#[inline]
fn observe_line(table: &mut StationTable, line_number: u64, line: &[u8]) -> Result<()> {
    let (station, raw) =
        split_record(line).map_err(|e| ProcessingError::malformed(line_number, line, e))?;
    let temperature =
        Temperature::parse(raw).map_err(|e| ProcessingError::malformed(line_number, line, e))?;
    table.observe(station, temperature);
    Ok(())
}
