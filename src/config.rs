//! Runtime settings.
//!
//! Resolution order, later wins:
//!   1. built-in defaults (local prover service, Asia/Shanghai, fixed file name)
//!   2. optional TOML file passed with `--config`
//!   3. environment (`PROVER_API_URL`, `PROVER_TIMEZONE`, `PROVER_OUTPUT`),
//!      including values loaded from `.env`
//!   4. `--output` on the command line (applied by the caller)

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::model::{DEFAULT_TIMEZONE, InputError};
use crate::report::DEFAULT_OUTPUT_PATH;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8088";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Scheme, host and port of the prover service; the endpoint path is fixed.
    pub api_base_url: String,
    /// IANA zone for parsing inputs and rendering the `_BJ` columns.
    pub timezone: String,
    pub output_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file, then apply process
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, InputError> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, InputError> {
        let raw = fs::read_to_string(path).map_err(|source| InputError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| InputError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Override fields from `lookup`; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("PROVER_API_URL") {
            self.api_base_url = url;
        }
        if let Some(tz) = get("PROVER_TIMEZONE") {
            self.timezone = tz;
        }
        if let Some(out) = get("PROVER_OUTPUT") {
            self.output_path = out;
        }
    }
}
