use rustc_hash::FxHashMap;

use crate::models::{StationReport, StationSummary, Temperature};
use crate::utils::constants::DEFAULT_TABLE_CAPACITY;

/// Station name to running summary.
///
/// Keys are owned boxed byte slices; lookups borrow the caller's bytes, so a
/// key is copied only the first time a station is seen.
#[derive(Debug, Clone, Default)]
pub struct StationTable {
    entries: FxHashMap<Box<[u8]>, StationSummary>,
}

impl StationTable {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TABLE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    #[inline]
    pub fn observe(&mut self, station: &[u8], temperature: Temperature) {
        if let Some(summary) = self.entries.get_mut(station) {
            summary.record(temperature);
        } else {
            self.entries
                .insert(Box::from(station), StationSummary::new(temperature));
        }
    }

    pub fn get(&self, station: &[u8]) -> Option<&StationSummary> {
        self.entries.get(station)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold another table built from a disjoint part of the input into this one.
    pub fn merge(&mut self, other: StationTable) {
        for (station, summary) in other.entries {
            match self.entries.get_mut(&station) {
                Some(existing) => existing.merge(&summary),
                None => {
                    self.entries.insert(station, summary);
                }
            }
        }
    }

    /// Finalize every station, sorted byte-wise ascending by name.
    pub fn drain(self) -> Vec<StationReport> {
        let mut reports: Vec<StationReport> = self
            .entries
            .into_iter()
            .map(|(station, summary)| StationReport::new(station, summary))
            .collect();
        reports.sort_unstable_by(|a, b| a.station.cmp(&b.station));
        reports
    }
}
