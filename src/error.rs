//! Error types for significance computation
//!
//! Only out-of-contract input is an error. Degenerate numeric input (zero
//! hits, zero conversions) is not: it propagates as NaN through every
//! dependent metric.

use thiserror::Error;

/// Errors raised at the boundary of a significance computation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignificanceError {
    /// Unrecognized result kind, colliding labels, out-of-range options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A hit or conversion count that is not a non-negative base-10 integer
    #[error("Invalid count for {field}: {value:?} is not a non-negative base-10 integer")]
    InvalidCount { field: String, value: String },
}

/// Result type for significance operations
pub type Result<T> = std::result::Result<T, SignificanceError>;
