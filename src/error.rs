use std::io;
use thiserror::Error;

/// Failures surfaced by the dashboard core.
///
/// Only `InvalidConfiguration` is meant to stop a session. Operation and
/// render failures are turned into data or skipped frames by their callers.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("operation failed for {label}: {message}")]
    OperationFailure { label: String, message: String },

    #[error("render failed: {0}")]
    RenderFailure(String),

    #[error("terminal restore failed: {0}")]
    TeardownFailure(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl DashboardError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}
