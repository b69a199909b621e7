//! Window loop and row assembly.
//!
//! Walks the query range one hour at a time, asks the power source for each
//! window, and appends a row for every success. Failures are logged and the
//! window is skipped; nothing here aborts the run.

use crate::ingest::prover::PowerSource;
use crate::logging;
use crate::model::{MetricSample, Query, RunSummary};
use crate::report::Report;
use crate::window::hourly_windows;

/// Result of the fetch phase: the rows to write and the counters to log.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub report: Report,
    pub summary: RunSummary,
}

/// Fetches every window of `query` sequentially and builds the report.
pub fn collect_report<S: PowerSource + ?Sized>(source: &S, query: &Query) -> RunOutcome {
    let mut report = Report::new();
    let mut summary = RunSummary::default();

    for window in hourly_windows(query.start, query.end) {
        summary.total += 1;

        match source.fetch_power(&query.address, &window) {
            Ok(power) => {
                logging::log_fetch_success(&window, power);
                report.push(&MetricSample { window, power });
                summary.successful += 1;
            }
            Err(e) => {
                logging::log_fetch_failure(&query.address, &window, &e);
                summary.failed += 1;
            }
        }
    }

    RunOutcome { report, summary }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
