pub mod line_framer;
pub mod measurement_reader;
pub mod record;

pub use line_framer::LineFramer;
pub use measurement_reader::{open_input, IngestStats, MeasurementReader};
pub use record::split_record;
