//! Error types for the configuration and command layers.
//!
//! The behavior core itself never fails: missing dependencies and invalid
//! states resolve to documented no-ops.

use std::path::PathBuf;

use thiserror::Error;

/// Failure loading or validating `Settings`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failure executing a queued command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("nothing to undo")]
    EmptyHistory,
    #[error("entity {0} no longer exists")]
    UnknownEntity(u64),
}
