// Aggregate significance report
//
// Combines every metric for a variant pair into one record. The confidence
// that feeds p-value and significance is always the raw 0-1 value, whatever
// presentation the caller asked for.

use super::config::{ConfidenceOptions, FormattingOptions};
use super::format::FormattedValue;
use super::statistics::{conversion_rate, is_significant_at, p_value, raw_confidence, z_score};
use crate::variant::{Variant, VariantMap};
use serde::Serialize;

/// Every metric for one control/treatment comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignificanceReport {
    /// Conversion rate per variant label, formatted per caller options
    pub conversion_rates: VariantMap<FormattedValue>,

    /// Two-proportion z-statistic
    pub z_score: f64,

    /// Unscaled (0-1) confidence, never formatted
    pub confidence: f64,

    /// Confidence ×100, two decimals, `%` suffix
    pub confidence_percentage: FormattedValue,

    /// `1 - confidence`
    pub p_value: f64,

    /// Scaled confidence meets `target_value`
    pub significant: bool,

    /// Threshold the verdict was judged against (0-100 scale)
    #[serde(skip)]
    pub target_value: f64,
}

impl SignificanceReport {
    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        if self.significant {
            report.push_str("✅ SIGNIFICANT\n\n");
        } else if self.confidence.is_nan() {
            report.push_str("⚠️  INDETERMINATE (a variant has zero hits)\n\n");
        } else {
            report.push_str("❌ NOT SIGNIFICANT\n\n");
        }

        report.push_str("Conversion rates:\n");
        for (label, rate) in self.conversion_rates.iter() {
            report.push_str(&format!("  {}: {}\n", label, rate));
        }

        report.push_str(&format!("\nZ-score: {:.4}\n", self.z_score));
        report.push_str(&format!(
            "Confidence: {} (target {}%)\n",
            self.confidence_percentage, self.target_value
        ));
        report.push_str(&format!("P-value: {:.6}\n", self.p_value));

        report
    }
}

/// Conversion rate of each variant, keyed by label
pub fn conversion_rates(
    control: &Variant,
    treatment: &Variant,
    options: &FormattingOptions,
) -> VariantMap<FormattedValue> {
    VariantMap::from_pair(control, treatment, |v| options.apply(conversion_rate(v)))
}

/// Compute every metric for a control/treatment pair
///
/// Only `conversion_rate_options` and `confidence_options.target_value`
/// influence the output; the confidence fields have fixed presentation.
///
/// # Example
/// ```
/// use ab_significance::significance::{calculate_all, ConfidenceOptions, FormattingOptions};
/// use ab_significance::variant::Variant;
///
/// let control = Variant::new("Control A", 600, 100);
/// let treatment = Variant::new("Treatment A", 700, 150);
///
/// let report = calculate_all(
///     &control,
///     &treatment,
///     &FormattingOptions::percentage(2),
///     &ConfidenceOptions::default(),
/// );
/// assert!(report.significant);
/// assert_eq!(report.confidence_percentage.to_string(), "98.58%");
/// ```
pub fn calculate_all(
    control: &Variant,
    treatment: &Variant,
    conversion_rate_options: &FormattingOptions,
    confidence_options: &ConfidenceOptions,
) -> SignificanceReport {
    let confidence = raw_confidence(control, treatment);

    SignificanceReport {
        conversion_rates: conversion_rates(control, treatment, conversion_rate_options),
        z_score: z_score(control, treatment),
        confidence,
        confidence_percentage: FormattingOptions::percentage(2).apply(confidence * 100.0),
        p_value: p_value(confidence),
        significant: is_significant_at(confidence, confidence_options),
        target_value: confidence_options.target_value,
    }
}
