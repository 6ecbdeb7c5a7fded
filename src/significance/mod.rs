// Statistical significance of a two-variant A/B comparison
//
// Pipeline: conversion rate -> z-score -> cumulative normal distribution
// (confidence) -> p-value / significance. Each stage depends only on the
// raw variant counts and the previous stage's number.
//
// Computation and presentation are separate: statistics.rs returns f64,
// format.rs turns numbers into rounded / percent-suffixed text on request.
//
// Scientific Foundation:
// - Two-proportion z-test (unpooled standard error)
// - Zelen, M. & Severo, N. (1964). Probability functions. In Abramowitz &
//   Stegun, Handbook of Mathematical Functions, 26.2.17.

mod config;
mod format;
mod report;
mod statistics;

pub use config::{ConfidenceOptions, FormattingOptions, DEFAULT_TARGET_VALUE, MAX_DECIMAL_PLACES};
pub use format::{to_fixed, FormattedValue};
pub use report::{calculate_all, conversion_rates, SignificanceReport};
pub use statistics::{
    confidence, conversion_rate, cumulative_normal_distribution, is_significant,
    is_significant_at, p_value, raw_confidence, z_score,
};
