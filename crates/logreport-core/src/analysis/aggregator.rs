use super::{RunStatistics, UrlAccumulator};
use crate::log::LineParser;
use std::collections::HashMap;

/// Result of a full pass over a log
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// One accumulator per distinct URL, in first-seen order
    pub accumulators: Vec<UrlAccumulator>,
    pub stats: RunStatistics,
}

impl Aggregation {
    /// Accumulator for `url`, if it was seen
    pub fn get(&self, url: &str) -> Option<&UrlAccumulator> {
        self.accumulators.iter().find(|acc| acc.url == url)
    }
}

/// Folds log lines into per-URL timing accumulators
pub struct Aggregator<'p> {
    parser: &'p LineParser,
    accumulators: Vec<UrlAccumulator>,
    index: HashMap<String, usize>,
    stats: RunStatistics,
}

impl<'p> Aggregator<'p> {
    pub fn new(parser: &'p LineParser) -> Self {
        Self {
            parser,
            accumulators: Vec::new(),
            index: HashMap::new(),
            stats: RunStatistics::default(),
        }
    }

    /// Account for a single raw line
    pub fn push(&mut self, line: &str) {
        self.stats.total_lines += 1;

        let entry = match self.parser.parse(line) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::trace!("Skipping line {}: {}", self.stats.total_lines, e);
                self.stats.parse_errors += 1;
                return;
            }
        };

        self.stats.parsed_lines += 1;
        self.stats.total_duration += entry.duration;

        let idx = match self.index.get(entry.url) {
            Some(&idx) => idx,
            None => {
                self.accumulators.push(UrlAccumulator::new(entry.url));
                self.index
                    .insert(entry.url.to_string(), self.accumulators.len() - 1);
                self.accumulators.len() - 1
            }
        };
        self.accumulators[idx].record(entry.duration);
    }

    /// Account for in-memory lines, such as a slice of strings
    pub fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.push(line.as_ref());
        }
    }

    /// Like [`extend`](Self::extend), but stops at the first read error
    pub fn try_extend<I, S, E>(&mut self, lines: I) -> Result<(), E>
    where
        I: IntoIterator<Item = Result<S, E>>,
        S: AsRef<str>,
    {
        for line in lines {
            self.push(line?.as_ref());
        }
        Ok(())
    }

    pub fn finish(self) -> Aggregation {
        tracing::debug!(
            "Aggregated {} lines ({} parsed, {} errors) into {} URLs",
            self.stats.total_lines,
            self.stats.parsed_lines,
            self.stats.parse_errors,
            self.accumulators.len()
        );

        Aggregation {
            accumulators: self.accumulators,
            stats: self.stats,
        }
    }
}
