use crate::error::{ProcessingError, Result};
use crate::processors::StationTable;
use crate::readers::{open_input, IngestStats, MeasurementReader};
use crate::utils::progress::ProgressReporter;
use memchr::{memchr, memchr_iter};
use memmap2::Mmap;
use rayon::prelude::*;
use std::ops::Range;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Aggregates a memory-mapped input by splitting it into newline-aligned
/// shards, one private `StationTable` per shard, merged at the end.
pub struct ParallelProcessor {
    max_workers: usize,
    reader: MeasurementReader,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            reader: MeasurementReader::new(),
        }
    }

    pub fn with_reader(mut self, reader: MeasurementReader) -> Self {
        self.reader = reader;
        self
    }

    pub fn aggregate_file(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<(StationTable, IngestStats)> {
        let started = Instant::now();
        let file = open_input(path)?;
        if file.metadata()?.len() == 0 {
            return Ok((StationTable::new(), IngestStats::default()));
        }

        let mmap = unsafe { Mmap::map(&file)? };
        let (table, stats) = self.aggregate_bytes(&mmap)?;

        if let Some(p) = progress {
            p.increment(stats.bytes_read);
        }

        info!(
            path = %path.display(),
            workers = self.max_workers,
            bytes = stats.bytes_read,
            records = stats.records,
            stations = table.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregated measurements in parallel"
        );

        Ok((table, stats))
    }

    pub fn aggregate_bytes(&self, data: &[u8]) -> Result<(StationTable, IngestStats)> {
        let shards = shard_ranges(data, self.max_workers);
        debug!(shards = shards.len(), "Split input into shards");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let partials: Vec<(StationTable, IngestStats)> = pool.install(|| {
            shards
                .par_iter()
                .map(|range| -> Result<(StationTable, IngestStats)> {
                    let mut table = StationTable::new();
                    let stats = self
                        .reader
                        .aggregate_bytes(&data[range.clone()], &mut table)
                        .map_err(|e| e.offset_line(lines_before(data, range.start)))?;
                    debug!(
                        start = range.start,
                        end = range.end,
                        records = stats.records,
                        "Shard done"
                    );
                    Ok((table, stats))
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut table = StationTable::new();
        let mut stats = IngestStats::default();
        for (partial, partial_stats) in partials {
            table.merge(partial);
            stats.merge(&partial_stats);
        }

        Ok((table, stats))
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

/// Lines wholly contained in `data[..offset]`. Shards start right after a
/// `\n`, so this is the file line count preceding the shard.
fn lines_before(data: &[u8], offset: usize) -> u64 {
    memchr_iter(b'\n', &data[..offset]).count() as u64
}

/// Split `data` into at most about `shards` contiguous ranges, each ending just
/// after a `\n` or at the end of `data`.
pub fn shard_ranges(data: &[u8], shards: usize) -> Vec<Range<usize>> {
    let target = (data.len() / shards.max(1)).max(1);
    let mut ranges = Vec::with_capacity(shards.max(1));
    let mut start = 0;

    while start < data.len() {
        let tentative = (start + target).min(data.len());
        let end = match memchr(b'\n', &data[tentative - 1..]) {
            Some(pos) => tentative + pos,
            None => data.len(),
        };
        ranges.push(start..end);
        start = end;
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges_cover(data: &[u8], ranges: &[Range<usize>]) {
        let mut expected_start = 0;
        for range in ranges {
            assert_eq!(range.start, expected_start);
            assert!(range.end > range.start);
            if range.end < data.len() {
                assert_eq!(data[range.end - 1], b'\n');
            }
            expected_start = range.end;
        }
        assert_eq!(expected_start, data.len());
    }

    #[test]
    fn test_shard_ranges_align_to_newlines() {
        let data = b"Hamburg;12.0\nBulawayo;8.9\nHamburg;-1.2\nX;1.0\nY;2.0\n";
        for shards in 1..=8 {
            let ranges = shard_ranges(data, shards);
            ranges_cover(data, &ranges);
        }
    }

    #[test]
    fn test_shard_ranges_without_trailing_newline() {
        let data = b"a;1.0\nb;2.0\nc;3.0";
        let ranges = shard_ranges(data, 3);
        ranges_cover(data, &ranges);
        assert_eq!(ranges.last().unwrap().end, data.len());
    }

    #[test]
    fn test_shard_ranges_of_empty_input() {
        assert!(shard_ranges(b"", 4).is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut data = Vec::new();
        for i in 0..500 {
            let station = ["Oslo", "Rome", "Lima", "Pune", "Baku"][i % 5];
            let tenths = (i as i32 * 37) % 1999 - 999;
            let sign = if tenths < 0 { "-" } else { "" };
            let abs = tenths.abs();
            data.extend_from_slice(
                format!("{};{}{}.{}\n", station, sign, abs / 10, abs % 10).as_bytes(),
            );
        }

        let mut sequential = StationTable::new();
        MeasurementReader::new()
            .aggregate_bytes(&data, &mut sequential)
            .unwrap();

        for workers in [1, 2, 3, 7] {
            let (parallel, stats) = ParallelProcessor::new(workers).aggregate_bytes(&data).unwrap();
            assert_eq!(stats.records, 500);
            assert_eq!(parallel.drain(), sequential.clone().drain());
        }
    }

    #[test]
    fn test_parallel_surfaces_shard_errors() {
        let data = b"a;1.0\nb;2.0\nbroken\nc;3.0\n";
        let err = ParallelProcessor::new(2).aggregate_bytes(data).unwrap_err();
        assert!(matches!(err, ProcessingError::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn test_shard_errors_report_file_line_numbers() {
        let mut data = Vec::new();
        for i in 0..200 {
            match i {
                150 => data.extend_from_slice(b"Oslo1.0\n"),
                _ => data.extend_from_slice(format!("S{};{}.0\n", i % 7, i % 50).as_bytes()),
            }
        }

        for workers in [1, 2, 4, 8] {
            let err = ParallelProcessor::new(workers).aggregate_bytes(&data).unwrap_err();
            assert!(
                matches!(err, ProcessingError::MalformedRecord { line: 151, .. }),
                "workers={workers}: {err}"
            );
        }
    }

    #[test]
    fn test_shard_overlong_line_reports_file_line_number() {
        let mut data = b"a;1.0\n".repeat(40);
        data.extend_from_slice(&[b'x'; 64]);
        data.extend_from_slice(b"\n");
        data.extend_from_slice(&b"b;2.0\n".repeat(40));

        let reader = MeasurementReader::new().with_max_line_len(16);
        for workers in [1, 3, 6] {
            let err = ParallelProcessor::new(workers)
                .with_reader(reader.clone())
                .aggregate_bytes(&data)
                .unwrap_err();
            assert!(
                matches!(err, ProcessingError::LineTooLong { line: 41, limit: 16 }),
                "workers={workers}: {err}"
            );
        }
    }
}
