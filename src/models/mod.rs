pub mod summary;
pub mod temperature;

pub use summary::{StationReport, StationSummary};
pub use temperature::Temperature;
