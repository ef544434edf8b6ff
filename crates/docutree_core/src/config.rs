//! Core tuning knobs.
//!
//! # Responsibility
//! - Hold thresholds and defaults shared by validation and export.
//! - Parse caller-supplied JSON overrides with per-field defaults.
//!
//! # Invariants
//! - `max_depth >= 1` and `export_batch_size >= 1` after parsing.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_MAX_DEPTH: usize = 5;
const DEFAULT_EXPORT_BATCH_SIZE: usize = 50;
const DEFAULT_PLACEHOLDER_VALUE: &str = "TBD";
const DEFAULT_PLACEHOLDER_NAMES: &[&str] = &[
    "untitled",
    "new item",
    "new category",
    "new field",
    "new node",
];

/// Errors from configuration parsing.
#[derive(Debug)]
pub enum ConfigError {
    /// Input is not valid JSON for `CoreConfig`.
    Parse(serde_json::Error),
    /// A field is out of its allowed range.
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid core config: {err}"),
            Self::Invalid(message) => write!(f, "invalid core config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Settings consumed by validation rules and exporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreConfig {
    /// Nodes deeper than this (root = 1) get an optimization issue.
    pub max_depth: usize,
    /// Entries serialized between progress reports and cancellation checks.
    pub export_batch_size: usize,
    /// Value proposed by the blank-value fix.
    pub placeholder_value: String,
    /// Names considered default placeholders, compared case-insensitively.
    pub placeholder_names: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            export_batch_size: DEFAULT_EXPORT_BATCH_SIZE,
            placeholder_value: DEFAULT_PLACEHOLDER_VALUE.to_string(),
            placeholder_names: DEFAULT_PLACEHOLDER_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl CoreConfig {
    /// Parses JSON overrides; missing fields keep their defaults.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks field ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("maxDepth must be at least 1".to_string()));
        }
        if self.export_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "exportBatchSize must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns `true` when `name` equals a configured placeholder name.
    pub fn is_placeholder_name(&self, name: &str) -> bool {
        let normalized = name.trim().to_lowercase();
        self.placeholder_names
            .iter()
            .any(|placeholder| placeholder.trim().to_lowercase() == normalized)
    }
}
