//! Top-level error types.
//!
//! Per-ticker data problems (empty series, short history, indicator faults)
//! are scan outcomes, not errors: they are logged and the ticker is skipped.
//! Everything here aborts the run.

use crate::domain::ledger::LedgerError;

#[derive(Debug, thiserror::Error)]
pub enum TraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error("universe error: {reason}")]
    Universe { reason: String },

    #[error("notification error: {reason}")]
    Notify { reason: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TraderError> for std::process::ExitCode {
    fn from(err: &TraderError) -> Self {
        let code: u8 = match err {
            TraderError::Io(_) | TraderError::Notify { .. } => 1,
            TraderError::ConfigParse { .. }
            | TraderError::ConfigMissing { .. }
            | TraderError::ConfigInvalid { .. } => 2,
            TraderError::Storage { .. } | TraderError::Universe { .. } => 3,
            TraderError::Ledger(_) => 4,
        };
        std::process::ExitCode::from(code)
    }
}
