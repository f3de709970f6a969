//! Run configuration.
//!
//! A [`Config`] always starts from built-in defaults. An optional JSON object
//! (usually `config.json`) is merged over them key by key, using the same
//! upper-case key names the tool has always accepted:
//!
//! ```json
//! {
//!     "REPORT_SIZE": 0,
//!     "LOG_DIR": "/var/log/nginx",
//!     "PARSER_MAX_PERCENT_ERRORS": 20
//! }
//! ```
//!
//! Keys that are absent keep their default; unknown keys are ignored.
//!
//! Older config files carry numeric `LOG_LEVEL` values (`10`, `20`, ...) and
//! a printf-style `LOG_FORMAT`. Numeric levels are translated to filter
//! directives; a `LOG_FORMAT` that is not `full`, `compact` or `json` is
//! dropped with a warning so the default format applies.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up when the config path points at a directory
pub const DEFAULT_CONFIG_NAME: &str = "config.json";

/// Placeholder in `REPORT_NAME` replaced by the dotted log date
pub const DATE_PLACEHOLDER: &str = "{}";

pub const DEFAULT_PARSER_PATTERN: &str = concat!(
    r#"(?P<ipaddress>\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})([\s-]+).+"#,
    r#"(?P<date>\[[/\w:\s+]+\])\s"#,
    r#""\w*\s*(?P<url>[\w/.\-?&%_=:]+).+"#,
    r#"\s(?P<request_time>[0-9.]+)$"#,
);

pub const DEFAULT_FILE_DATE_PATTERN: &str = r"^nginx-access-ui.log-([0-9]{8})";

/// Raw key/value overrides read from a config file
pub type Overrides = Map<String, Value>;

/// How diagnostic lines are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum cumulative request time a URL needs to appear in the report.
    ///
    /// Despite the name this is a time threshold, not a row count.
    #[serde(rename = "REPORT_SIZE")]
    pub report_size: f64,

    #[serde(rename = "REPORT_DIR")]
    pub report_dir: PathBuf,

    #[serde(rename = "LOG_DIR")]
    pub log_dir: PathBuf,

    #[serde(rename = "REPORT_TEMPLATE")]
    pub report_template: PathBuf,

    /// Report file name; `{}` is replaced by the log date (`YYYY.MM.DD`)
    #[serde(rename = "REPORT_NAME")]
    pub report_name: String,

    /// Regex applied to log file names; group 1 must capture `YYYYMMDD`
    #[serde(rename = "REGEXP_FIND_DATE_FROM_FILE_NAME")]
    pub file_date_pattern: String,

    /// Diagnostics go to stderr when unset
    #[serde(rename = "LOG_OUTPUT_FILE")]
    pub log_output_file: Option<PathBuf>,

    #[serde(rename = "LOG_FORMAT")]
    pub log_format: LogFormat,

    /// strftime format for diagnostic timestamps
    #[serde(rename = "LOG_DATA_FORMAT")]
    pub log_time_format: String,

    /// Filter directive, e.g. `info` or `logreport_core=debug`; numeric
    /// levels such as `20` are accepted too
    #[serde(rename = "LOG_LEVEL")]
    pub log_level: String,

    /// Line regex; must define `url` and `request_time` groups
    #[serde(rename = "PARSER_REGEXP")]
    pub parser_pattern: String,

    #[serde(rename = "PARSER_MAX_PERCENT_ERRORS")]
    pub max_error_percent: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_size: 1000.0,
            report_dir: PathBuf::from("./reports"),
            log_dir: PathBuf::from("./log"),
            report_template: PathBuf::from("templates/report.html"),
            report_name: "report-{}.html".to_string(),
            file_date_pattern: DEFAULT_FILE_DATE_PATTERN.to_string(),
            log_output_file: None,
            log_format: LogFormat::default(),
            log_time_format: "%Y.%m.%d %H:%M:%S".to_string(),
            log_level: "info".to_string(),
            parser_pattern: DEFAULT_PARSER_PATTERN.to_string(),
            max_error_percent: 75,
        }
    }
}

impl Config {
    /// Merge overrides over the defaults. Any key present in `overrides` wins.
    pub fn merged(overrides: &Overrides) -> Result<Self> {
        Self::merged_with_warnings(overrides).map(|(config, _)| config)
    }

    /// Like [`merged`](Self::merged), also returning the legacy values that
    /// were replaced by defaults
    pub fn merged_with_warnings(overrides: &Overrides) -> Result<(Self, Vec<String>)> {
        let Value::Object(mut merged) = serde_json::to_value(Self::default())? else {
            return Err(Error::Config(
                "defaults did not serialize to an object".to_string(),
            ));
        };
        let mut warnings = Vec::new();

        for (key, value) in overrides {
            if !merged.contains_key(key) {
                tracing::debug!("Ignoring unknown config key: {}", key);
                continue;
            }
            let value = match key.as_str() {
                "LOG_LEVEL" => legacy_log_level(value),
                "LOG_FORMAT" => match value {
                    Value::String(format) if !is_log_format(format) => {
                        warnings.push(format!(
                            "Unsupported LOG_FORMAT '{}', using {}",
                            format,
                            LogFormat::default().name()
                        ));
                        continue;
                    }
                    _ => value.clone(),
                },
                _ => value.clone(),
            };
            merged.insert(key.clone(), value);
        }

        let config: Self = serde_json::from_value(Value::Object(merged))
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok((config, warnings))
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_error_percent > 100 {
            return Err(Error::Config(format!(
                "PARSER_MAX_PERCENT_ERRORS must be between 0 and 100, got {}",
                self.max_error_percent
            )));
        }
        if !self.report_size.is_finite() || self.report_size < 0.0 {
            return Err(Error::Config(format!(
                "REPORT_SIZE must be a non-negative number, got {}",
                self.report_size
            )));
        }
        if !self.report_name.contains(DATE_PLACEHOLDER) {
            return Err(Error::Config(format!(
                "REPORT_NAME must contain the '{}' date placeholder, got '{}'",
                DATE_PLACEHOLDER, self.report_name
            )));
        }
        Ok(())
    }

    /// Where the report for the given dotted date lives
    pub fn report_path(&self, display_date: &str) -> PathBuf {
        self.report_dir
            .join(self.report_name.replace(DATE_PLACEHOLDER, display_date))
    }
}

/// Read overrides from a config file, or from `config.json` inside a directory
pub fn read_overrides(path: &Path) -> Result<Overrides> {
    let pathname = if path.is_file() {
        path.to_path_buf()
    } else if path.is_dir() {
        path.join(DEFAULT_CONFIG_NAME)
    } else {
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    };

    tracing::debug!("Reading config overrides from: {}", pathname.display());

    let content = fs::read_to_string(&pathname)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Config(format!(
            "Expected a JSON object in {}, found {}",
            pathname.display(),
            json_kind(&other)
        ))),
    }
}

impl LogFormat {
    pub fn name(self) -> &'static str {
        match self {
            LogFormat::Full => "full",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

fn is_log_format(format: &str) -> bool {
    [LogFormat::Full, LogFormat::Compact, LogFormat::Json]
        .iter()
        .any(|known| known.name() == format)
}

/// Translate numeric levels (`10` debug .. `50` critical) and their upper-case
/// names into filter directives; anything else passes through untouched
fn legacy_log_level(value: &Value) -> Value {
    let level = match value {
        Value::Number(n) => match n.as_f64() {
            Some(n) if n <= 0.0 => "trace",
            Some(n) if n <= 10.0 => "debug",
            Some(n) if n <= 20.0 => "info",
            Some(n) if n <= 30.0 => "warn",
            Some(_) => "error",
            None => return value.clone(),
        },
        Value::String(name) => match name.as_str() {
            "NOTSET" => "trace",
            "WARNING" => "warn",
            "CRITICAL" | "FATAL" => "error",
            _ => return value.clone(),
        },
        _ => return value.clone(),
    };
    Value::String(level.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
