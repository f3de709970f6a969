use chrono::NaiveDate;
use std::path::PathBuf;

/// Date format used in report names and log messages
pub const DISPLAY_DATE_FORMAT: &str = "%Y.%m.%d";

/// The log file picked for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileReference {
    /// File name as found in the log directory
    pub name: String,
    pub path: PathBuf,
    /// Date embedded in the file name
    pub date: NaiveDate,
}

impl LogFileReference {
    /// The embedded date as `YYYY.MM.DD`
    pub fn display_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

/// A single successfully parsed log line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedLogEntry<'a> {
    pub url: &'a str,
    /// Request time in seconds
    pub duration: f64,
}
