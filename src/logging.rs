//! Structured logging for the prover power report.
//!
//! Installs a `tracing` subscriber with console output on stderr and an
//! optional append-only log file. Also classifies per-window fetch failures
//! so that expected API refusals and protocol breakage are logged at
//! different levels.

use std::fmt;
use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt as fmt_layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::model::{FetchError, HourlyWindow, RunSummary};

// ---------------------------------------------------------------------------
// Subscriber setup
// ---------------------------------------------------------------------------

/// Initialize the global subscriber.
///
/// `RUST_LOG` wins over `level` when set. A log file that cannot be opened
/// is reported on stderr and logging continues on the console only.
pub fn init_logger(level: &str, log_file: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = fmt_layer::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => Some(
                fmt_layer::layer()
                    .with_writer(Mutex::new(f))
                    .with_ansi(false)
                    .with_target(false),
            ),
            Err(e) => {
                eprintln!("Failed to open log file {}: {}", path, e);
                None
            }
        }
    });

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init();
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// The server answered and declined, e.g. no data for this address/hour.
    Expected,
    /// The response broke the API contract.
    Unexpected,
    /// Network-level failure; may be transient or the service may be down.
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

pub fn classify_fetch_failure(err: &FetchError) -> FailureType {
    match err {
        FetchError::Api(_) => FailureType::Expected,
        FetchError::Decode(_) => FailureType::Unexpected,
        FetchError::Transport(_) => FailureType::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a skipped window with its classification.
pub fn log_fetch_failure(address: &str, window: &HourlyWindow, err: &FetchError) {
    let failure_type = classify_fetch_failure(err);
    let start = window.start_local();

    match failure_type {
        FailureType::Expected => warn!(
            address,
            window_start = %start,
            kind = %failure_type,
            "Error fetching prover speed: {}", err
        ),
        FailureType::Unexpected => error!(
            address,
            window_start = %start,
            kind = %failure_type,
            "Error fetching prover speed: {}", err
        ),
        FailureType::Unknown => warn!(
            address,
            window_start = %start,
            kind = %failure_type,
            "Error fetching prover speed: {}", err
        ),
    }
}

pub fn log_fetch_success(window: &HourlyWindow, power: f64) {
    debug!(window_start = %window.start_local(), power, "fetched prover speed");
}

// ---------------------------------------------------------------------------
// Run Summary Logging
// ---------------------------------------------------------------------------

pub fn log_run_summary(summary: &RunSummary) {
    let message = format!(
        "Fetch complete: {}/{} windows successful, {} failed",
        summary.successful, summary.total, summary.failed
    );

    if summary.failed == 0 {
        info!("{}", message);
    } else if summary.successful == 0 {
        error!("{}", message);
    } else {
        warn!("{}", message);
    }
}
