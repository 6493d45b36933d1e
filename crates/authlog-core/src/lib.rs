//! Core types for the SSH auth-log analysis pipeline
//! this crate turns raw syslog-style auth lines into a structured event table.

pub mod parser;
pub mod table;

use serde::{Deserialize, Serialize};

pub use parser::{ClassifiedEvent, EventClassifier, LineParser, LogFileParser, ParseError};
pub use table::{read_csv, write_csv};

// EVENT TYPE //

/// Security event kinds produced by the classifier
/// Wire names are the SCREAMING_SNAKE_CASE strings stored in the CSV table.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    FailedLogin,
    FailedLoginInvalidUser,
    InvalidUser,
    PamAuthFailure,
}

impl EventType {
    /// Wire/table name of the event kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FailedLogin => "FAILED_LOGIN",
            Self::FailedLoginInvalidUser => "FAILED_LOGIN_INVALID_USER",
            Self::InvalidUser => "INVALID_USER",
            Self::PamAuthFailure => "PAM_AUTH_FAILURE",
        }
    }
}

// SECURITY EVENT RECORD (one output row)

/// One fully parsed security event
/// Field order matches the CSV column order, so serde+csv emit the table as-is.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityEventRecord {
    pub timestamp: String, // canonical "YYYY-MM-DD HH:MM:SS"

    pub ip_address: String, // dotted quad, or whatever rhost= carried for PAM events

    pub username: String,

    pub event_type: EventType,

    pub repetition_count: u32, // >= 1; absorbs syslog's "message repeated N times" wrapper

    pub raw_message: String, // verbatim original line, trailing newline stripped
}
