// src/error.rs
//! Unified error handling for EMG reflex analysis
//!
//! Every fallible operation in the crate returns [`EmgResult`]. Data-integrity
//! failures (malformed records, empty or mixed datasets) abort the operation,
//! while a channel-label mismatch is recoverable and travels as a
//! [`ChannelNameMismatch`] warning alongside a successful result.

use crate::config::ConfigError;
use thiserror::Error;

/// Unified error type for session loading and amplitude analysis
#[derive(Debug, Error)]
pub enum EmgError {
    /// A persisted session record is missing fields or has the wrong shape
    #[error("malformed session data{}: {reason}", path_suffix(.path))]
    MalformedSessionData {
        path: Option<String>,
        reason: String,
    },

    /// A query ran against a session that has not been loaded yet
    #[error("session has not been loaded")]
    NotLoaded,

    /// `load` was called on a session that already holds data
    #[error("session '{session_name}' is already loaded")]
    AlreadyLoaded { session_name: String },

    /// A dataset needs at least one session
    #[error("a dataset requires at least one session")]
    EmptyDataset,

    /// Member sessions disagree on a recording parameter
    #[error(
        "session '{session}' has {field} = {actual}, expected {expected} (from the first session)"
    )]
    InhomogeneousDataset {
        field: &'static str,
        session: String,
        expected: String,
        actual: String,
    },

    /// Channel index beyond the recorded channels
    #[error("channel {channel} is out of range ({num_channels} channels recorded)")]
    ChannelOutOfRange { channel: usize, num_channels: usize },

    /// Custom channel labels promoted from a warning to a hard error
    #[error(transparent)]
    ChannelNameMismatch(#[from] ChannelNameMismatch),

    /// Nothing to average: no matching recordings or an empty sample slice
    #[error("empty aggregation window: {reason}")]
    EmptyAggregationWindow { reason: String },

    /// Configuration could not be loaded or is inconsistent
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn path_suffix(path: &Option<String>) -> String {
    match path {
        Some(p) => format!(" at '{}'", p),
        None => String::new(),
    }
}

/// Custom channel labels whose count differs from the recorded channel count
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{provided} custom channel names were given but {expected} channels were recorded")]
pub struct ChannelNameMismatch {
    pub provided: usize,
    pub expected: usize,
}

/// Result type alias for EMG operations
pub type EmgResult<T> = Result<T, EmgError>;

impl EmgError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        EmgError::MalformedSessionData {
            path: None,
            reason: reason.into(),
        }
    }

    pub(crate) fn empty_window(reason: impl Into<String>) -> Self {
        EmgError::EmptyAggregationWindow {
            reason: reason.into(),
        }
    }

    /// True for errors that invalidate the input data rather than a single query
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            EmgError::MalformedSessionData { .. }
                | EmgError::EmptyDataset
                | EmgError::InhomogeneousDataset { .. }
        )
    }
}
