use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::format_adapter::DEFAULT_CAPTION_DURATION_MS;
use crate::timeline::DegeneratePolicy;

/// Application configuration module
/// This module handles loading and validating the converter settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Duration of each caption synthesized from plain text, in milliseconds
    #[serde(default = "default_caption_duration_ms")]
    pub default_caption_duration_ms: u64,

    /// Handling of captions collapsed to zero length by a negative shift
    #[serde(default)]
    pub degenerate_shift_policy: DegeneratePolicy,

    /// Reject cut files whose ranges overlap each other
    #[serde(default)]
    pub strict_cuts: bool,

    /// Number of files converted in parallel in batch mode
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,

    /// Suffix inserted before the extension of batch outputs
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_caption_duration_ms() -> u64 {
    DEFAULT_CAPTION_DURATION_MS
}

fn default_batch_concurrency() -> usize {
    4
}

fn default_output_suffix() -> String {
    "converted".to_string()
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults if it does not exist
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config file not found at '{}', using default settings.", path.display());
            return Ok(Config::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.default_caption_duration_ms == 0 {
            return Err(anyhow!("default_caption_duration_ms must be greater than zero"));
        }

        if self.batch_concurrency == 0 {
            return Err(anyhow!("batch_concurrency must be at least 1"));
        }

        if self.output_suffix.trim().is_empty() {
            return Err(anyhow!("output_suffix must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            default_caption_duration_ms: default_caption_duration_ms(),
            degenerate_shift_policy: DegeneratePolicy::default(),
            strict_cuts: false,
            batch_concurrency: default_batch_concurrency(),
            output_suffix: default_output_suffix(),
            log_level: LogLevel::default(),
        }
    }
}
