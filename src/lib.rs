//! ab-significance - Statistical significance for two-variant A/B tests
//!
//! This library compares a control and a treatment variant (hits and
//! conversions) with a two-proportion z-test, and reports conversion rates,
//! z-score, confidence, p-value and a significance verdict. It also
//! recommends sample sizes for planned experiments.

pub mod cli;
pub mod error;
pub mod json_output;
pub mod request;
pub mod sample_size;
pub mod significance;
pub mod variant;

pub use error::{Result, SignificanceError};
pub use request::{compute_significance, ComputationRequest, ResultKind, SignificanceResult};
pub use variant::Variant;
