use super::Temperature;

/// Running reduction of every temperature observed for one station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationSummary {
    pub min: Temperature,
    pub max: Temperature,
    /// Sum in tenths of a degree.
    pub sum: i64,
    pub count: u64,
}

impl StationSummary {
    #[inline]
    pub fn new(temperature: Temperature) -> Self {
        Self {
            min: temperature,
            max: temperature,
            sum: i64::from(temperature.tenths()),
            count: 1,
        }
    }

    #[inline]
    pub fn record(&mut self, temperature: Temperature) {
        self.min = self.min.min(temperature);
        self.max = self.max.max(temperature);
        self.sum += i64::from(temperature.tenths());
        self.count += 1;
    }

    /// Combine with a summary of a disjoint set of observations.
    pub fn merge(&mut self, other: &StationSummary) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    /// Mean in degrees. The division is done once, on the exact scaled sum.
    pub fn mean(&self) -> f64 {
        self.sum as f64 / (self.count as f64 * 10.0)
    }

    pub fn sum_celsius(&self) -> f64 {
        self.sum as f64 / 10.0
    }
}

/// One finalized output row.
#[derive(Debug, Clone, PartialEq)]
pub struct StationReport {
    pub station: Box<[u8]>,
    pub summary: StationSummary,
    pub mean: f64,
}

impl StationReport {
    pub fn new(station: Box<[u8]>, summary: StationSummary) -> Self {
        let mean = summary.mean();
        Self {
            station,
            summary,
            mean,
        }
    }

    pub fn min_celsius(&self) -> f64 {
        self.summary.min.to_celsius()
    }

    pub fn max_celsius(&self) -> f64 {
        self.summary.max.to_celsius()
    }
}
