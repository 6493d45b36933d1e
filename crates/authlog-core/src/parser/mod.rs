//! auth-log line parsing pipeline - prefix split, timestamp, repeat unwrap, classify

pub mod classify;
pub mod timestamp;

pub use classify::{ClassifiedEvent, EventClassifier};
pub use timestamp::resolve_timestamp;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use chrono::{Datelike, Utc};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::SecurityEventRecord;

// parse error type

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unknown month abbreviation: {0}")]
    UnknownMonth(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

// LINE PARSER (pure, per-line pipeline)

/// Parses one syslog-style auth line into zero-or-one [`SecurityEventRecord`].
///
/// All patterns are compiled once at construction. Lines that fail any stage
/// (no syslog prefix, unresolvable timestamp, no classification match) are
/// inapplicable, not errors: `parse_line` just returns `None`.
pub struct LineParser {
    // fixed "Mon DD HH:MM:SS rest" prefix; month is case-sensitive, day may be space-padded
    prefix_pattern: Regex,
    // syslog's de-duplication wrapper: message repeated N times: [ ... ]
    repeat_pattern: Regex,
    classifier: EventClassifier,
}

impl LineParser {
    pub fn new() -> Self {
        Self {
            prefix_pattern: Regex::new(
                r"^(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+([ 0-9]{1,2})\s+([0-9]{2}:[0-9]{2}:[0-9]{2})\s+(.*)$",
            )
            .unwrap(),
            repeat_pattern: Regex::new(r"message repeated (\d+) times: \[(.+)\]").unwrap(),
            classifier: EventClassifier::new(),
        }
    }

    /// Parse a single line with the given fallback year.
    ///
    /// Pure and I/O-free; the raw line (trailing newline stripped) is kept
    /// verbatim in the record regardless of any unwrapping done for
    /// classification.
    pub fn parse_line(&self, line: &str, year: i32) -> Option<SecurityEventRecord> {
        let raw = line.trim_end_matches(['\n', '\r']);

        let caps = match self.prefix_pattern.captures(raw) {
            Some(caps) => caps,
            None => {
                debug!("line did not match syslog prefix");
                return None;
            }
        };

        let timestamp =
            match resolve_timestamp(&caps[1], &caps[2], &caps[3], year) {
                Ok(ts) => ts,
                Err(e) => {
                    debug!(error = %e, "timestamp resolution failed");
                    return None;
                }
            };

        // isolate the message after the "host process[pid]: " segment; if the
        // separator is missing, fall back to the whole remainder
        let rest = caps.get(4).map(|m| m.as_str()).unwrap_or("");
        let message = match rest.find(": ") {
            Some(idx) => &rest[idx + 2..],
            None => rest,
        };

        let (repetition_count, inner) = self.unwrap_repeated(message);

        let details = match self.classifier.classify(inner) {
            Some(details) => details,
            None => {
                debug!("no classification rule matched");
                return None;
            }
        };

        Some(SecurityEventRecord {
            timestamp,
            ip_address: details.ip_address,
            username: details.username,
            event_type: details.event_type,
            repetition_count,
            raw_message: raw.to_string(),
        })
    }

    /// Detect the "message repeated N times: [...]" wrapper.
    ///
    /// Returns the repetition count and the inner message; without the
    /// wrapper the count is 1 and the message passes through unchanged.
    /// A count that fails to parse falls back to 1 rather than failing.
    fn unwrap_repeated<'a>(&self, message: &'a str) -> (u32, &'a str) {
        match self.repeat_pattern.captures(message) {
            Some(caps) => {
                let count = caps[1].parse().unwrap_or(1);
                let inner = caps.get(2).map(|m| m.as_str()).unwrap_or(message);
                debug!(repetitions = count, "detected repeated wrapper");
                (count, inner)
            }
            None => (1, message),
        }
    }
}

// LOG FILE PARSER (lazy ingestion driver)

/// Lazy iterator over the successfully classified records of one log file.
///
/// Each call to [`LogFileParser::open`] opens its own handle, so a run is
/// restartable by re-opening. Decoding is byte-lenient: invalid UTF-8 is
/// replaced, never an error. Lines that fail any pipeline stage are dropped
/// silently; only failure to open the file is surfaced.
///
/// Syslog lines carry no year, so one fallback year applies to the whole
/// file. A file spanning a Dec->Jan boundary will mis-date the lines after
/// the rollover; callers that know about the boundary must split the file
/// and supply per-segment years.
pub struct LogFileParser {
    reader: BufReader<File>,
    parser: LineParser,
    year: i32,
    buf: Vec<u8>,
}

impl LogFileParser {
    /// Open a log file for lazy parsing. `year` defaults to the current
    /// calendar year when not given.
    pub fn open<P: AsRef<Path>>(path: P, year: Option<i32>) -> io::Result<Self> {
        let year = year.unwrap_or_else(|| Utc::now().year());
        let file = File::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), year, "parsing log file");

        Ok(Self {
            reader: BufReader::new(file),
            parser: LineParser::new(),
            year,
            buf: Vec::new(),
        })
    }
}

impl Iterator for LogFileParser {
    type Item = SecurityEventRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&self.buf);
                    if let Some(record) = self.parser.parse_line(&line, self.year) {
                        return Some(record);
                    }
                }
                Err(e) => {
                    debug!(error = %e, "read failed, ending iteration");
                    return None;
                }
            }
        }
    }
}
