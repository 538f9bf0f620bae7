//! Error types for the data-source and configuration boundaries.
//!
//! The layout and query core never fails; absence is modelled as `None` or an
//! empty list. These errors only surface while importing records or loading
//! configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid timestamp: '{0}'")]
    InvalidTimestamp(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
