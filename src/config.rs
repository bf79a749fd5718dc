//! Runtime configuration utilities for epi-assoc.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::measures::DEFAULT_ALPHA;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Default significance level for confidence intervals.
    pub alpha: f64,
    /// Default sentinel treated as missing, in addition to blanks and NaN.
    pub missing: Option<String>,
    /// Field delimiter of input CSV files.
    pub delimiter: u8,
    /// Root folder for written results.
    pub outputs_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            missing: None,
            delimiter: b',',
            outputs_dir: PathBuf::from("./outputs"),
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        let alpha = match env::var("ASSOC_ALPHA") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("parsing ASSOC_ALPHA={raw}"))?,
            Err(_) => defaults.alpha,
        };
        if !(alpha > 0.0 && alpha < 1.0) {
            bail!("ASSOC_ALPHA must lie in (0, 1), got {alpha}");
        }
        let missing = env::var("ASSOC_MISSING").ok().filter(|v| !v.is_empty());
        let delimiter = match env::var("ASSOC_DELIMITER") {
            Ok(raw) => parse_delimiter(&raw)?,
            Err(_) => defaults.delimiter,
        };
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.outputs_dir);

        Ok(Self {
            alpha,
            missing,
            delimiter,
            outputs_dir,
        })
    }

    /// Resolve an output path; relative paths land under `outputs_dir`.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.outputs_dir.join(path)
        }
    }
}

/// Accept a single-byte delimiter, with `\t` / `tab` as spellings of a tab.
pub fn parse_delimiter(raw: &str) -> anyhow::Result<u8> {
    match raw {
        "\\t" | "tab" => Ok(b'\t'),
        s if s.len() == 1 => Ok(s.as_bytes()[0]),
        other => bail!("delimiter must be a single byte, got '{other}'"),
    }
}
