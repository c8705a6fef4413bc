/// File names
pub const DEFAULT_INPUT_FILE: &str = "measurements.txt";
pub const DEFAULT_CSV_FILE: &str = "weather_data.csv";

/// CSV report header
pub const CSV_HEADER: [&str; 6] = ["City", "Min", "Max", "Sum", "Count", "Avg"];

/// Record format
pub const RECORD_DELIMITER: u8 = b';';
pub const DEFAULT_MAX_LINE_LEN: usize = 1024;
pub const MIN_LINE_LEN_LIMIT: usize = 8;
pub const MAX_LINE_LEN_LIMIT: usize = 64 * 1024;

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024; // 1MB
pub const MIN_BUFFER_SIZE: usize = 4 * 1024;
pub const MAX_BUFFER_SIZE: usize = 16 * 1024 * 1024;
pub const DEFAULT_TABLE_CAPACITY: usize = 16 * 1024;
pub const DEFAULT_WORKERS: usize = 1;
pub const MAX_WORKERS: usize = 1024;
