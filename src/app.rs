//! One report run, from resolved settings to the saved spreadsheet.

use std::path::PathBuf;

use tracing::{error, info};

use crate::cli::RequiredInputs;
use crate::config::Settings;
use crate::generator::collect_report;
use crate::ingest::prover::ProverSpeedClient;
use crate::logging;
use crate::model::{InputError, Query, RunSummary};
use crate::window::{parse_local, resolve_timezone};

/// What happened after the inputs were accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub summary: RunSummary,
    pub output: PathBuf,
    /// `false` when the spreadsheet could not be written; the error is logged.
    pub saved: bool,
}

/// Validates the inputs, then fetches every window and writes the report.
///
/// Input errors return before any request is sent or file is touched.
pub fn run(settings: &Settings, inputs: RequiredInputs<'_>) -> Result<RunResult, InputError> {
    let query = resolve_query(settings, inputs)?;

    info!(
        address = %query.address,
        start = %inputs.start,
        end = %inputs.end,
        zone = %settings.timezone,
        "Fetching hourly prover speed"
    );

    let client = ProverSpeedClient::new(reqwest::blocking::Client::new(), &settings.api_base_url);
    let outcome = collect_report(&client, &query);

    let output = PathBuf::from(&settings.output_path);
    let saved = match outcome.report.write_xlsx(&output) {
        Ok(()) => {
            info!(path = %output.display(), rows = outcome.report.len(), "Report saved");
            true
        }
        Err(e) => {
            error!("{}", e);
            false
        }
    };

    logging::log_run_summary(&outcome.summary);

    Ok(RunResult {
        summary: outcome.summary,
        output,
        saved,
    })
}

pub fn resolve_query(settings: &Settings, inputs: RequiredInputs<'_>) -> Result<Query, InputError> {
    let zone = resolve_timezone(&settings.timezone)?;
    let start = parse_local("start", inputs.start, zone)?;
    let end = parse_local("end", inputs.end, zone)?;

    Ok(Query {
        address: inputs.address.to_string(),
        start,
        end,
    })
}
