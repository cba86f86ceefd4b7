//! Error types shared by every model in the crate.

use thiserror::Error;

/// Result type for fallible operations in this crate
pub type Result<T> = std::result::Result<T, FinitoError>;

/// Errors raised by constructors and operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FinitoError {
    /// Mixture parameters violate one of the construction invariants
    #[error("invalid mixture parameters: {0}")]
    InvalidParameters(#[from] ParameterError),

    /// A scalar argument is out of range (negative count, empty data, bad durations)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl FinitoError {
    pub(crate) fn argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }
}

/// The mixture invariant that failed during construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error(
        "parameters must have the same length \
         (means: {means}, variances: {variances}, weights: {weights})"
    )]
    ShapeMismatch {
        means: usize,
        variances: usize,
        weights: usize,
    },

    #[error("a mixture needs at least one component")]
    NoComponents,

    #[error("means must be finite, got {value} at component {index}")]
    NonFiniteMean { index: usize, value: f64 },

    #[error("variances must be positive and finite, got {value} at component {index}")]
    NonPositiveVariance { index: usize, value: f64 },

    #[error("weights must be non-negative, got {value} at component {index}")]
    NegativeWeight { index: usize, value: f64 },

    #[error("weights must sum to 1, got {sum}")]
    WeightsNotNormalized { sum: f64 },
}
