use super::RunStatistics;

/// Outcome of an error-rate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorRateCheck {
    /// Truncated percentage of unparsable lines
    pub percent: u64,
    pub breached: bool,
}

/// Advisory check on the share of lines the parser could not handle
///
/// A breach is logged and reported back, but never stops the run. A high
/// rate usually means the log format drifted away from the parser pattern.
#[derive(Debug, Clone, Copy)]
pub struct ErrorRateGuard {
    max_percent: u32,
}

impl ErrorRateGuard {
    pub fn new(max_percent: u32) -> Self {
        Self { max_percent }
    }

    pub fn check(&self, total_lines: usize, parse_errors: usize) -> ErrorRateCheck {
        let percent = if total_lines == 0 {
            0
        } else {
            (parse_errors as u64 * 100) / total_lines as u64
        };
        let breached = percent > u64::from(self.max_percent);

        if breached {
            tracing::error!(
                "Reached maximum number of parser errors ({} from {}) it's more than {}%",
                parse_errors,
                total_lines,
                self.max_percent
            );
        } else {
            tracing::debug!(
                "Parser error rate {}% ({} from {})",
                percent,
                parse_errors,
                total_lines
            );
        }

        ErrorRateCheck { percent, breached }
    }

    pub fn check_stats(&self, stats: &RunStatistics) -> ErrorRateCheck {
        self.check(stats.total_lines, stats.parse_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_lines_is_zero_percent() {
        let check = ErrorRateGuard::new(0).check(0, 0);
        assert_eq!(
            check,
            ErrorRateCheck {
                percent: 0,
                breached: false
            }
        );
    }

    #[test]
    fn test_percentage_is_truncated() {
        // 2/3 = 66.66..%
        assert_eq!(ErrorRateGuard::new(75).check(3, 2).percent, 66);
        // 1/7 = 14.28..%
        assert_eq!(ErrorRateGuard::new(75).check(7, 1).percent, 14);
    }

    #[test]
    fn test_breach_only_above_threshold() {
        let guard = ErrorRateGuard::new(75);
        assert!(!guard.check(4, 3).breached); // exactly 75%
        assert!(guard.check(100, 76).breached);
        assert!(!guard.check(100, 0).breached);
    }

    #[test]
    fn test_everything_failed() {
        let check = ErrorRateGuard::new(99).check(10, 10);
        assert_eq!(check.percent, 100);
        assert!(check.breached);
    }

    #[test]
    fn test_check_stats() {
        let stats = RunStatistics {
            total_lines: 10,
            parsed_lines: 2,
            parse_errors: 8,
            total_duration: 1.0,
        };
        assert!(ErrorRateGuard::new(50).check_stats(&stats).breached);
    }
}
