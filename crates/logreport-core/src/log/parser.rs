use super::types::ParsedLogEntry;
use regex::Regex;
use thiserror::Error;

const URL_GROUP: &str = "url";
const DURATION_GROUP: &str = "request_time";

/// Why a single line was skipped
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineError {
    #[error("line does not match the parser pattern")]
    NoMatch,

    #[error("invalid request time '{0}'")]
    InvalidDuration(String),
}

/// Extracts URL and request time from raw access log lines
#[derive(Debug, Clone)]
pub struct LineParser {
    pattern: Regex,
}

impl LineParser {
    /// Compile a line pattern
    ///
    /// The pattern must define the named groups `url` and `request_time`.
    pub fn new(pattern: &str) -> crate::Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            crate::Error::InvalidPattern(format!("Invalid parser pattern '{}': {}", pattern, e))
        })?;

        for group in [URL_GROUP, DURATION_GROUP] {
            if !regex.capture_names().flatten().any(|name| name == group) {
                return Err(crate::Error::InvalidPattern(format!(
                    "Parser pattern is missing the '{}' group",
                    group
                )));
            }
        }

        Ok(Self { pattern: regex })
    }

    pub fn parse<'a>(&self, line: &'a str) -> Result<ParsedLogEntry<'a>, LineError> {
        let caps = self.pattern.captures(line).ok_or(LineError::NoMatch)?;

        let url = caps.name(URL_GROUP).ok_or(LineError::NoMatch)?.as_str();
        let raw_duration = caps.name(DURATION_GROUP).ok_or(LineError::NoMatch)?.as_str();

        let duration: f64 = raw_duration
            .parse()
            .map_err(|_| LineError::InvalidDuration(raw_duration.to_string()))?;
        if !duration.is_finite() || duration < 0.0 {
            return Err(LineError::InvalidDuration(raw_duration.to_string()));
        }

        Ok(ParsedLogEntry { url, duration })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PARSER_PATTERN;

    const STATS_LINE: &str = concat!(
        r#"1.126.153.80 -  - [29/Jun/2017:04:46:00 +0300] "#,
        r#""GET /agency/outgoings_stats/?date1=28-06-2017&date2=28-06-2017&date_type=day&do=1&rt=banner&oi=25754435&as_json=1 HTTP/1.1" "#,
        r#"200 217 "-" "-" "-" "1498700760-48424485-4709-9957635" "1835ae0f17f" 0.068"#,
    );

    fn default_parser() -> LineParser {
        LineParser::new(DEFAULT_PARSER_PATTERN).unwrap()
    }

    #[test]
    fn test_parse_request_line() {
        let entry = default_parser().parse(STATS_LINE).unwrap();
        assert_eq!(
            entry.url,
            "/agency/outgoings_stats/?date1=28-06-2017&date2=28-06-2017&date_type=day&do=1&rt=banner&oi=25754435&as_json=1"
        );
        assert_eq!(entry.duration, 0.068);
    }

    #[test]
    fn test_parse_bare_request() {
        let line = r#"1.202.56.176 -  - [29/Jun/2017:03:59:15 +0300] "0" 400 166 "-" "-" "-" "-" "-" 0.000"#;
        let entry = default_parser().parse(line).unwrap();
        assert_eq!(entry.url, "0");
        assert_eq!(entry.duration, 0.0);
    }

    #[test]
    fn test_parse_garbage_is_no_match() {
        assert_eq!(
            default_parser().parse("this is not an access log line"),
            Err(LineError::NoMatch)
        );
        assert_eq!(default_parser().parse(""), Err(LineError::NoMatch));
    }

    #[test]
    fn test_parse_missing_request_time() {
        let line = r#"1.202.56.176 -  - [29/Jun/2017:03:59:15 +0300] "GET /api/v2/banner/1 HTTP/1.1" 200 166 "-" "-""#;
        assert_eq!(default_parser().parse(line), Err(LineError::NoMatch));
    }

    #[test]
    fn test_parse_malformed_request_time() {
        let line = r#"1.202.56.176 -  - [29/Jun/2017:03:59:15 +0300] "GET /api/v2/banner/1 HTTP/1.1" 200 166 "-" 1.2.3"#;
        assert_eq!(
            default_parser().parse(line),
            Err(LineError::InvalidDuration("1.2.3".to_string()))
        );
    }

    #[test]
    fn test_custom_pattern() {
        let parser = LineParser::new(r"^(?P<url>\S+) (?P<request_time>\d+\.\d+)$").unwrap();
        let entry = parser.parse("/health 0.250").unwrap();
        assert_eq!(entry.url, "/health");
        assert_eq!(entry.duration, 0.25);
    }

    #[test]
    fn test_pattern_without_required_groups() {
        let result = LineParser::new(r"(?P<url>\S+) (\d+)");
        assert!(matches!(result, Err(crate::Error::InvalidPattern(_))));
    }

    #[test]
    fn test_invalid_regex() {
        let result = LineParser::new(r"(?P<url>[unclosed");
        assert!(matches!(result, Err(crate::Error::InvalidPattern(_))));
    }
}
