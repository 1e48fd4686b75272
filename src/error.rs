//! Errors raised at the configuration boundary
//!
//! The accrual arithmetic itself never fails; only instrument and target lookup
//! and rate table loading can.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccrualError {
    #[error("Unknown instrument '{0}' (expected one of: elite, world)")]
    UnknownInstrument(String),

    #[error("Unknown award target '{0}' (expected one of: saver, advantage, star)")]
    UnknownTarget(String),

    #[error("Instrument '{key}' is not present in the rate table")]
    MissingInstrument { key: String },

    #[error("Invalid rules for '{name}': {reason}")]
    InvalidRules { name: String, reason: String },

    #[error("Award target '{key}' is not present in the rate table")]
    MissingTarget { key: String },

    #[error("Invalid miles for award target '{key}': {miles}")]
    InvalidTarget { key: String, miles: f64 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AccrualError>;
