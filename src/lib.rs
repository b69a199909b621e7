//! Hourly prover speed report.
//!
//! Queries the prover service once per hour over a date range for one
//! address and writes the results to an xlsx sheet.

pub mod app;
pub mod cli;
pub mod config;
pub mod generator;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;
pub mod window;
