mod aggregator;
mod error_rate;
mod finalizer;

pub use aggregator::{Aggregation, Aggregator};
pub use error_rate::{ErrorRateCheck, ErrorRateGuard};
pub use finalizer::Finalizer;

use serde::{Deserialize, Serialize};

/// Running totals for one URL
#[derive(Debug, Clone, PartialEq)]
pub struct UrlAccumulator {
    pub url: String,
    pub time_sum: f64,
    /// Every observed request time, in encounter order
    pub durations: Vec<f64>,
}

impl UrlAccumulator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            time_sum: 0.0,
            durations: Vec::new(),
        }
    }

    pub fn record(&mut self, duration: f64) {
        self.time_sum += duration;
        self.durations.push(duration);
    }

    pub fn count(&self) -> usize {
        self.durations.len()
    }
}

/// Whole-file counters collected during the pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStatistics {
    pub total_lines: usize,
    pub parsed_lines: usize,
    pub parse_errors: usize,
    /// Sum of request times over every parsed line
    pub total_duration: f64,
}

/// One row of the rendered report
///
/// Field names and order are part of the report format consumed by the
/// HTML template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub url: String,
    pub time_sum: f64,
    pub count: usize,
    pub count_perc: f64,
    pub time_perc: f64,
    pub time_avg: f64,
    pub time_max: f64,
    pub time_med: f64,
}
