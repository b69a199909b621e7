//! Upstream data sources.
//!
//! Submodules:
//! - `prover`: HTTP client for the prover speed endpoint.

pub mod prover;
