//! Core data types for the prover power report.
//!
//! This module defines the shared domain model imported by all other modules:
//! the query, the hourly window, the fetched sample, and the error enums for
//! each failure domain. It contains no I/O.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Formats and fixed names
// ---------------------------------------------------------------------------

/// Layout of every human-entered and human-displayed timestamp.
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Zone used when no configuration overrides it, labelled "BJ" in the report.
pub const DEFAULT_TIMEZONE: &str = "Asia/Shanghai";

/// Width of one query window, in seconds.
pub const WINDOW_SECS: i64 = 3600;

// ---------------------------------------------------------------------------
// Query and window types
// ---------------------------------------------------------------------------

/// The resolved inputs of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub address: String,
    /// Inclusive start of the range.
    pub start: DateTime<Tz>,
    /// Exclusive end of the range. Only window starts are compared against it.
    pub end: DateTime<Tz>,
}

/// One hour-long interval `[start, start + 1h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl HourlyWindow {
    pub fn starting_at(start: DateTime<Tz>) -> Self {
        Self {
            start,
            end: start + Duration::seconds(WINDOW_SECS),
        }
    }

    pub fn start_epoch(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_epoch(&self) -> i64 {
        self.end.timestamp()
    }

    /// Window start rendered in the window's own zone.
    pub fn start_local(&self) -> String {
        self.start.format(LOCAL_TIME_FORMAT).to_string()
    }

    pub fn end_local(&self) -> String {
        self.end.format(LOCAL_TIME_FORMAT).to_string()
    }
}

/// A successfully fetched power value for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub window: HourlyWindow,
    pub power: f64,
}

/// Outcome counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Problems with operator-supplied input. All of them stop the run before any
/// network or file activity.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid {which} date: {value:?}: {source}")]
    InvalidDate {
        which: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Invalid {which} date: {value:?} has surrounding whitespace")]
    PaddedDate { which: &'static str, value: String },
    /// The wall-clock time falls in a DST gap of the zone.
    #[error("Invalid {which} date: {value:?} does not exist in {zone}")]
    NonexistentLocalTime {
        which: &'static str,
        value: String,
        zone: Tz,
    },
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure of a single window fetch. Never aborts the run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure or unreadable response body.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Body was not a valid response envelope, or `data` was not a float.
    #[error("Parse error: {0}")]
    Decode(String),
    /// The API answered with a non-zero code.
    #[error("API error: {0}")]
    Api(String),
}

/// Failure to build or save the spreadsheet.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report {path}: {source}")]
    Xlsx {
        path: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
