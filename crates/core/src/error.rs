//! Error types for the rover reconciliation library.

use thiserror::Error;

use crate::recognizer::EngineId;

/// Primary error type for merge configuration problems.
///
/// Data-level defects (malformed detection items, failed engines) never
/// surface here; they degrade locally and are reported through merge
/// statistics instead.
#[derive(Error, Debug)]
pub enum RoverError {
    #[error("min_agreement must be at least 1, got {0}")]
    InvalidMinAgreement(usize),

    #[error("unknown primary engine: {0}")]
    UnknownPrimaryEngine(EngineId),

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidTolerance { name: &'static str, value: f64 },
}

/// Convenience Result type alias for RoverError.
pub type Result<T> = std::result::Result<T, RoverError>;
