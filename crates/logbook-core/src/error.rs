//! Error types for logbook-core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown nag intensity: {0}")]
    UnknownIntensity(String),

    #[error("unknown nag tone: {0}")]
    UnknownTone(String),

    #[error("unknown entry kind: {0}")]
    UnknownEntryKind(String),

    /// Cutoff hours must fall in 0..=23.
    #[error("cutoff hour out of range: {0}")]
    CutoffHourOutOfRange(i64),

    #[error("invalid timestamp {value:?}: {message}")]
    InvalidTimestamp { value: String, message: String },

    #[error("{kind} entries {problem}")]
    InvalidEntry { kind: String, problem: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
