//! Error types for availability-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Invalid horizon: {0} days (must be at least 1)")]
    InvalidHorizon(u32),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid datetime: {0}")]
    InvalidDateTime(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
