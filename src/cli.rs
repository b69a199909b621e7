//! Command-line flags.
//!
//! The required inputs are optional at the clap level so that a missing flag
//! leads to a guidance message and a clean exit instead of a usage error.
//! Single-dash long flags (`-address`, `-start=...`) are accepted alongside
//! the usual `--address` form.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};

pub const MISSING_INPUTS_MESSAGE: &str = "Address, start date, and end date must be provided";

const LONG_FLAGS: &[&str] = &[
    "address",
    "start",
    "end",
    "config",
    "output",
    "log-level",
    "log-file",
    "help",
    "version",
];

#[derive(Debug, Parser)]
#[command(name = "prover-power-calculator")]
#[command(args_override_self = true)]
#[command(version, about = "Hourly prover speed report for one address, written to xlsx")]
#[command(
    long_about = "Queries the prover service once per hour between --start and --end\n\
    and writes one spreadsheet row per successful hour.\n\
    \nExamples:\n  \
    prover-power-calculator -address 0xabc -start \"2024-01-01 00:00:00\" -end \"2024-01-02 00:00:00\"\n  \
    prover-power-calculator --address 0xabc --start \"2024-01-01 00:00:00\" --end \"2024-01-01 06:00:00\" --output day1.xlsx"
)]
pub struct Cli {
    /// The address to query
    #[arg(long)]
    pub address: Option<String>,

    /// Start date (format: 2006-01-02 15:04:05), inclusive
    #[arg(long)]
    pub start: Option<String>,

    /// End date (format: 2006-01-02 15:04:05), exclusive
    #[arg(long)]
    pub end: Option<String>,

    /// TOML settings file (api_base_url, timezone, output_path)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output spreadsheet path [default: ProverPowerCalculator.xlsx]
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level filter; RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Append log lines to this file as well as stderr
    #[arg(long)]
    pub log_file: Option<String>,
}

/// The three mandatory inputs, all non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredInputs<'a> {
    pub address: &'a str,
    pub start: &'a str,
    pub end: &'a str,
}

impl Cli {
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Returns `None` when any of address/start/end is missing or empty.
    /// Whitespace-only values count as given.
    pub fn required_inputs(&self) -> Option<RequiredInputs<'_>> {
        Some(RequiredInputs {
            address: non_empty(&self.address)?,
            start: non_empty(&self.start)?,
            end: non_empty(&self.end)?,
        })
    }

    pub fn usage() -> String {
        Self::command().render_help().to_string()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Rewrites `-flag` / `-flag=value` to `--flag` / `--flag=value` for known
/// long flags. Everything else, including values that start with `-`, passes
/// through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            let Some(s) = arg.to_str() else {
                return arg;
            };
            if s.starts_with("--") {
                return arg;
            }
            let Some(flag) = s.strip_prefix('-') else {
                return arg;
            };
            let name = flag.split('=').next().unwrap_or_default();
            if LONG_FLAGS.contains(&name) {
                OsString::from(format!("-{}", s))
            } else {
                arg
            }
        })
        .collect()
}
