use super::types::LogFileReference;
use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Finds the newest log file in a directory by the date embedded in its name
#[derive(Debug, Clone)]
pub struct LogSelector {
    pattern: Regex,
}

impl LogSelector {
    /// `pattern` is applied to each file name; capture group 1 must hold
    /// the date as `YYYYMMDD`.
    pub fn new(pattern: &str) -> crate::Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            crate::Error::InvalidPattern(format!(
                "Invalid file name pattern '{}': {}",
                pattern, e
            ))
        })?;

        if regex.captures_len() < 2 {
            return Err(crate::Error::InvalidPattern(format!(
                "File name pattern '{}' has no capture group for the date",
                pattern
            )));
        }

        Ok(Self { pattern: regex })
    }

    /// Extract the embedded date from a file name, if it has a valid one
    pub fn date_from_name(&self, name: &str) -> Option<NaiveDate> {
        let caps = self.pattern.captures(name)?;
        parse_compact_date(caps.get(1)?.as_str())
    }

    /// Pick the most recent candidate in `dir`
    ///
    /// Returns `Ok(None)` when nothing in the directory matches. When two
    /// files carry the same date, the one enumerated last wins.
    pub fn latest(&self, dir: &Path) -> crate::Result<Option<LogFileReference>> {
        tracing::debug!("Scanning for log files in: {}", dir.display());

        let mut latest: Option<LogFileReference> = None;

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let Some(date) = self.date_from_name(&name) else {
                continue;
            };

            if latest.as_ref().is_none_or(|current| date >= current.date) {
                latest = Some(LogFileReference {
                    path: entry.path(),
                    name,
                    date,
                });
            }
        }

        match &latest {
            Some(file) => tracing::debug!("Latest log file: {} ({})", file.name, file.date),
            None => tracing::debug!("No log files matched in {}", dir.display()),
        }

        Ok(latest)
    }
}

/// Parse exactly eight ASCII digits as `YYYYMMDD`
fn parse_compact_date(digits: &str) -> Option<NaiveDate> {
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year = digits[0..4].parse().ok()?;
    let month = digits[4..6].parse().ok()?;
    let day = digits[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_FILE_DATE_PATTERN;
    use std::fs::File;

    fn selector() -> LogSelector {
        LogSelector::new(DEFAULT_FILE_DATE_PATTERN).unwrap()
    }

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            File::create(dir.join(name)).unwrap();
        }
    }

    #[test]
    fn test_empty_directory_has_no_candidate() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(selector().latest(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_non_matching_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            &["nginx-access.log-20210630", "README.md", "nginx-access-ui.log-2021"],
        );
        assert_eq!(selector().latest(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_selects_most_recent_date() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            &[
                "nginx-access-ui.log-20170630.gz",
                "nginx-access-ui.log-20210630",
                "nginx-access-ui.log-20190101",
            ],
        );

        let latest = selector().latest(dir.path()).unwrap().unwrap();
        assert_eq!(latest.name, "nginx-access-ui.log-20210630");
        assert_eq!(latest.path, dir.path().join("nginx-access-ui.log-20210630"));
        assert_eq!(latest.display_date(), "2021.06.30");
        assert!(!latest.name.ends_with(".gz"));
    }

    #[test]
    fn test_gzip_candidate_can_win() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            &["nginx-access-ui.log-20170630", "nginx-access-ui.log-20170701.gz"],
        );

        let latest = selector().latest(dir.path()).unwrap().unwrap();
        assert_eq!(latest.name, "nginx-access-ui.log-20170701.gz");
        assert!(latest.name.ends_with(".gz"));
    }

    #[test]
    fn test_invalid_dates_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            &[
                "nginx-access-ui.log-20211340",
                "nginx-access-ui.log-20210230",
                "nginx-access-ui.log-20170630",
            ],
        );

        let latest = selector().latest(dir.path()).unwrap().unwrap();
        assert_eq!(latest.name, "nginx-access-ui.log-20170630");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let raw = OsStr::from_bytes(b"nginx-access-ui.log-20991231\xff");
        File::create(dir.path().join(raw)).unwrap();
        touch(dir.path(), &["nginx-access-ui.log-20170630"]);

        let latest = selector().latest(dir.path()).unwrap().unwrap();
        assert_eq!(latest.name, "nginx-access-ui.log-20170630");
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = selector().latest(&dir.path().join("missing"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }

    #[test]
    fn test_parse_compact_date() {
        assert_eq!(
            parse_compact_date("20210630"),
            NaiveDate::from_ymd_opt(2021, 6, 30)
        );
        assert_eq!(parse_compact_date("2021063"), None);
        assert_eq!(parse_compact_date("2021o630"), None);
        assert_eq!(parse_compact_date("20210631"), None);
    }

    #[test]
    fn test_pattern_without_group_rejected() {
        let result = LogSelector::new(r"^nginx-access-ui\.log-\d{8}");
        assert!(matches!(result, Err(crate::Error::InvalidPattern(_))));
    }
}
