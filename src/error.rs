use crate::auth::error::AuthError;
use crate::transport::error::TransportError;
use chrono::NaiveDate;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HidrowebError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Invalid date range {start}..{end}: {reason}")]
    InvalidRange {
        start: NaiveDate,
        end: NaiveDate,
        reason: String,
    },

    #[error("No {what} found{}", .station.map(|s| format!(" for station {s}")).unwrap_or_default())]
    NotFound {
        what: &'static str,
        station: Option<u64>,
    },

    #[error("Item {index} does not match the {record} schema")]
    SchemaValidation {
        record: &'static str,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Call did not complete within {limit:?}")]
    Timeout { limit: Duration },

    #[error("Call was cancelled")]
    Cancelled,

    #[error("Polars error: {0}")]
    PolarsError(#[from] polars::prelude::PolarsError),
}

/// Coarse classification of a [`HidrowebError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The caller did not supply enough, or consistent, input.
    InvalidInput,
    /// The service answered but had nothing to return.
    NotFound,
    /// The call itself failed: authentication, network, decoding or a timeout.
    CallFailed,
}

impl HidrowebError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HidrowebError::InvalidArguments(_) | HidrowebError::InvalidRange { .. } => {
                ErrorCategory::InvalidInput
            }
            HidrowebError::NotFound { .. } => ErrorCategory::NotFound,
            HidrowebError::Auth(_)
            | HidrowebError::Transport(_)
            | HidrowebError::SchemaValidation { .. }
            | HidrowebError::Timeout { .. }
            | HidrowebError::Cancelled
            | HidrowebError::PolarsError(_) => ErrorCategory::CallFailed,
        }
    }
}
