use super::{Aggregation, ReportRow, UrlAccumulator};

/// Decimal places kept in every real-valued report field
pub const ROUND_DIGITS: i32 = 3;

/// Turns accumulators into report rows
///
/// URLs whose cumulative time is below `min_time_sum` are left out. There is
/// no row cap and no sorting: rows come out in first-seen URL order.
/// Percentages are shares of all parsed traffic, not of the reported subset.
pub struct Finalizer {
    min_time_sum: f64,
}

impl Finalizer {
    pub fn new(min_time_sum: f64) -> Self {
        Self { min_time_sum }
    }

    pub fn finalize(&self, aggregation: &Aggregation) -> Vec<ReportRow> {
        let stats = &aggregation.stats;

        let rows: Vec<ReportRow> = aggregation
            .accumulators
            .iter()
            .filter(|acc| acc.time_sum >= self.min_time_sum)
            .map(|acc| build_row(acc, stats.parsed_lines, stats.total_duration))
            .collect();

        tracing::info!(
            "Finalized {} of {} URLs (time threshold {})",
            rows.len(),
            aggregation.accumulators.len(),
            self.min_time_sum
        );

        rows
    }
}

fn build_row(acc: &UrlAccumulator, parsed_lines: usize, total_duration: f64) -> ReportRow {
    let count = acc.count();

    ReportRow {
        url: acc.url.clone(),
        time_sum: round(acc.time_sum),
        count,
        count_perc: round(percent(count as f64, parsed_lines as f64)),
        time_perc: round(percent(acc.time_sum, total_duration)),
        time_avg: round(acc.time_sum / count as f64),
        time_max: round(acc.durations.iter().copied().fold(0.0, f64::max)),
        time_med: round(median(&acc.durations)),
    }
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part * 100.0 / whole } else { 0.0 }
}

/// Median of the values; mean of the two middle values for even lengths
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Round to [`ROUND_DIGITS`] decimals
///
/// Rounds the exact binary value with ties to even, so `0.0625` becomes
/// `0.062` and `0.1245` (stored just below the tie) becomes `0.124`.
pub fn round(value: f64) -> f64 {
    format!("{:.*}", ROUND_DIGITS as usize, value)
        .parse()
        .unwrap_or(value)
}
