pub mod parallel_processor;
pub mod station_table;

pub use parallel_processor::{shard_ranges, ParallelProcessor};
pub use station_table::StationTable;
