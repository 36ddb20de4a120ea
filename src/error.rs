//! Error types for curve fitting and analysis.

use thiserror::Error;

use crate::domain::CurveKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CurveError>;

/// Errors surfaced by fitting and series construction.
///
/// Domain failures of the inverse (`y <= 0`) are not errors: they are reported
/// as `f64::NEG_INFINITY` and callers check for the sentinel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// The least-squares solver stopped without converging.
    #[error("{kind} fit did not converge: {reason}")]
    FitConvergence { kind: CurveKind, reason: String },

    /// `JᵀJ` at the solution could not be inverted.
    #[error("{kind} fit produced a singular covariance matrix")]
    SingularCovariance { kind: CurveKind },

    /// Not enough observations for the requested operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Two inputs that must agree in length do not.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A series was built with no observations.
    #[error("empty time series")]
    EmptySeries,

    /// Dates were not strictly increasing.
    #[error("dates must be strictly increasing (violated at index {index})")]
    NonMonotonicDates { index: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
